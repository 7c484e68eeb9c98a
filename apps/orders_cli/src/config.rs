use std::{collections::HashMap, fs, path::Path};

use anyhow::Context;
use orders::DEFAULT_STORAGE_KEY;
use storage::StoreUrl;

pub const SETTINGS_FILE: &str = "orders.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub storage_url: String,
    pub storage_key: String,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            storage_url: "file://./data".into(),
            storage_key: DEFAULT_STORAGE_KEY.into(),
            log_filter: "warn".into(),
        }
    }
}

pub fn load_settings() -> Settings {
    load_settings_from(Path::new(SETTINGS_FILE), |name| std::env::var(name).ok())
}

/// Defaults, then the settings file, then environment variables. The later
/// source wins; unreadable files are ignored.
pub fn load_settings_from(path: &Path, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(&raw) {
            if let Some(v) = file_cfg.get("storage_url") {
                settings.storage_url = v.clone();
            }
            if let Some(v) = file_cfg.get("storage_key") {
                settings.storage_key = v.clone();
            }
            if let Some(v) = file_cfg.get("log_filter") {
                settings.log_filter = v.clone();
            }
        }
    }

    if let Some(v) = env("ORDERS_STORAGE_URL") {
        settings.storage_url = v;
    }
    if let Some(v) = env("APP__STORAGE_URL") {
        settings.storage_url = v;
    }

    if let Some(v) = env("ORDERS_STORAGE_KEY") {
        settings.storage_key = v;
    }
    if let Some(v) = env("APP__STORAGE_KEY") {
        settings.storage_key = v;
    }

    if let Some(v) = env("APP__LOG_FILTER") {
        settings.log_filter = v;
    }

    settings
}

pub fn prepare_storage_url(raw_storage_url: &str) -> anyhow::Result<String> {
    let storage_url = normalize_storage_url(raw_storage_url);
    if let StoreUrl::File(root) = StoreUrl::parse(&storage_url)? {
        fs::create_dir_all(&root).with_context(|| {
            format!(
                "failed to create storage directory '{}' for storage url '{storage_url}'",
                root.display()
            )
        })?;
    }
    Ok(storage_url)
}

fn normalize_storage_url(raw_storage_url: &str) -> String {
    let raw_storage_url = raw_storage_url.trim();

    if raw_storage_url.is_empty() {
        return Settings::default().storage_url;
    }

    if raw_storage_url == "memory"
        || raw_storage_url == "memory:"
        || raw_storage_url.starts_with("sqlite:")
        || raw_storage_url.contains("://")
    {
        return raw_storage_url.replace('\\', "/");
    }

    if let Some(path) = raw_storage_url.strip_prefix("file:") {
        return format!("file://{}", path.replace('\\', "/"));
    }

    format!("file://{}", raw_storage_url.replace('\\', "/"))
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
