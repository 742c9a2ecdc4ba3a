//! Store Configuration
//!
//! Connection string and pool settings for the backing store.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::errors::{StoreError, StoreResult};

/// Which backend a connection string selects
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backend {
    Postgres,
    Sqlite(PathBuf),
    SqliteMemory,
}

/// Store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Connection string (default: "sqlite:studentdb.sqlite3")
    #[serde(default = "default_url")]
    pub url: String,

    /// Maximum pooled connections, PostgreSQL only (default: 10)
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Connect timeout in milliseconds (default: 5000)
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,

    /// Per-statement timeout in milliseconds, PostgreSQL only (default: 30000)
    #[serde(default = "default_statement_timeout_ms")]
    pub statement_timeout_ms: u64,
}

fn default_url() -> String {
    "sqlite:studentdb.sqlite3".to_string()
}

fn default_max_connections() -> u32 {
    10
}

fn default_connect_timeout_ms() -> u64 {
    5_000
}

fn default_statement_timeout_ms() -> u64 {
    30_000
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            max_connections: default_max_connections(),
            connect_timeout_ms: default_connect_timeout_ms(),
            statement_timeout_ms: default_statement_timeout_ms(),
        }
    }
}

impl StoreConfig {
    /// Config for the given connection string with default pool settings
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Resolve the backend from the URL scheme
    pub fn backend(&self) -> StoreResult<Backend> {
        let url = self.url.trim();
        if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            return Ok(Backend::Postgres);
        }
        if url == "sqlite::memory:" {
            return Ok(Backend::SqliteMemory);
        }
        let path = url
            .strip_prefix("sqlite://")
            .or_else(|| url.strip_prefix("sqlite:"))
            .ok_or_else(|| {
                StoreError::Config(format!("unsupported connection string scheme: {}", url))
            })?;
        if path.is_empty() {
            return Err(StoreError::Config("sqlite path is empty".to_string()));
        }
        Ok(Backend::Sqlite(PathBuf::from(path)))
    }

    /// Validate pool settings and the URL scheme
    pub fn validate(&self) -> StoreResult<()> {
        if self.max_connections == 0 {
            return Err(StoreError::Config("max_connections must be > 0".to_string()));
        }
        self.backend().map(|_| ())
    }
}
