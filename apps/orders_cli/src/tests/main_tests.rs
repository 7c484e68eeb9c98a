use super::{exit_code_for, is_affirmative};

use anyhow::anyhow;
use shared::error::{OrderError, REQUIRED_FIELDS_MESSAGE};

#[test]
fn accepts_yes_in_either_language() {
    for answer in ["y", "Y", "yes\n", " Да\n", "д"] {
        assert!(is_affirmative(answer), "{answer:?} should confirm");
    }
}

#[test]
fn anything_else_declines() {
    for answer in ["", "\n", "n", "no", "нет", "yes please"] {
        assert!(!is_affirmative(answer), "{answer:?} should decline");
    }
}

#[test]
fn validation_failures_exit_with_two() {
    let err = anyhow::Error::new(OrderError::Validation(REQUIRED_FIELDS_MESSAGE.to_string()));
    assert_eq!(exit_code_for(&err), 2);
}

#[test]
fn storage_and_other_failures_exit_with_one() {
    let storage = anyhow::Error::new(OrderError::Storage(anyhow!("disk full")));
    assert_eq!(exit_code_for(&storage), 1);
    assert_eq!(exit_code_for(&anyhow!("failed to open storage")), 1);
}
