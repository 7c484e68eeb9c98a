use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Row, Sqlite,
};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    str::FromStr,
    sync::Arc,
};
use tokio::sync::Mutex;
use tracing::debug;

/// Whole-value key/blob persistence. Every `set` overwrites the previous
/// value for the key; there is no merge and no versioning.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreUrl {
    Memory,
    File(PathBuf),
    Sqlite(String),
}

impl StoreUrl {
    /// Accepts `memory:`, `file://<dir>`, `file:<dir>`, `sqlite:...` or a
    /// bare directory path.
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            bail!("storage url is empty");
        }
        if raw == "memory" || raw == "memory:" {
            return Ok(Self::Memory);
        }
        if raw.starts_with("sqlite:") {
            return Ok(Self::Sqlite(raw.to_string()));
        }
        if let Some(path) = raw
            .strip_prefix("file://")
            .or_else(|| raw.strip_prefix("file:"))
        {
            if path.is_empty() {
                bail!("file storage url '{raw}' has no path");
            }
            return Ok(Self::File(PathBuf::from(path)));
        }
        if raw.contains("://") {
            bail!("unsupported storage url '{raw}'");
        }
        Ok(Self::File(PathBuf::from(raw)))
    }
}

pub async fn open_store(url: &str) -> Result<Arc<dyn BlobStore>> {
    let parsed = StoreUrl::parse(url)?;
    debug!(?parsed, "opening blob store");
    let store: Arc<dyn BlobStore> = match parsed {
        StoreUrl::Memory => Arc::new(MemoryStore::default()),
        StoreUrl::File(root) => Arc::new(FileStore::new(root)),
        StoreUrl::Sqlite(database_url) => {
            let store = SqliteStore::new(&database_url).await?;
            store.health_check().await?;
            Arc::new(store)
        }
    };
    Ok(store)
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    blobs: Arc<Mutex<HashMap<String, String>>>,
}

#[async_trait]
impl BlobStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.blobs.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.blobs
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One `<key>.json` file per key under `root`.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn blob_path(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.root.join(format!("{key}.json")))
    }
}

#[async_trait]
impl BlobStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.blob_path(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(raw) => Ok(Some(raw)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err).with_context(|| format!("failed to read '{}'", path.display())),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.blob_path(key)?;
        tokio::fs::create_dir_all(&self.root)
            .await
            .with_context(|| format!("failed to create '{}'", self.root.display()))?;

        // Readers never observe a partially written blob.
        let staging = path.with_extension("json.tmp");
        tokio::fs::write(&staging, value)
            .await
            .with_context(|| format!("failed to write '{}'", staging.display()))?;
        tokio::fs::rename(&staging, &path)
            .await
            .with_context(|| format!("failed to replace '{}'", path.display()))?;
        Ok(())
    }
}

#[derive(Clone)]
pub struct SqliteStore {
    pool: Pool<Sqlite>,
}

impl SqliteStore {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        // Every connection to `sqlite::memory:` is a separate database.
        let max_connections = if sqlite_path(database_url).is_none() { 1 } else { 5 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(connect_options)
            .await
            .with_context(|| format!("failed to open sqlite database '{database_url}'"))?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }
}

#[async_trait]
impl BlobStore for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let row = sqlx::query("SELECT value FROM blobs WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("failed to load blob '{key}'"))?;
        Ok(row.map(|r| r.get::<String, _>(0)))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            "INSERT INTO blobs (key, value, updated_at) VALUES (?, ?, CURRENT_TIMESTAMP)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = CURRENT_TIMESTAMP",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await
        .with_context(|| format!("failed to store blob '{key}'"))?;
        Ok(())
    }
}

fn validate_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
        && !key.starts_with('.');
    if !valid {
        bail!("invalid storage key '{key}'");
    }
    Ok(())
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if database_url.starts_with("sqlite::memory:") || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
