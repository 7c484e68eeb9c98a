use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Validation,
    Storage,
}

impl ErrorCode {
    pub fn exit_code(self) -> u8 {
        match self {
            Self::Validation => 2,
            Self::Storage => 1,
        }
    }
}

/// Message shown when a required order field is empty.
pub const REQUIRED_FIELDS_MESSAGE: &str =
    "Пожалуйста, заполните обязательные поля: имя, email, услуга.";

#[derive(Debug, Error)]
pub enum OrderError {
    #[error("{0}")]
    Validation(String),
    #[error("storage failure: {0:#}")]
    Storage(#[from] anyhow::Error),
}

impl OrderError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Validation(_) => ErrorCode::Validation,
            Self::Storage(_) => ErrorCode::Storage,
        }
    }
}
