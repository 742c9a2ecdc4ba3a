//! Storage error types

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Failures raised by a backing store
#[derive(Debug, Error)]
pub enum StoreError {
    /// SQLite driver error
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// PostgreSQL driver error
    #[error("postgres error: {0}")]
    Postgres(#[from] postgres::Error),

    /// Could not check a connection out of the pool
    #[error("connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    /// A previous holder of the connection lock panicked
    #[error("store connection lock poisoned")]
    Poisoned,

    /// Connection string or pool settings are unusable
    #[error("invalid store configuration: {0}")]
    Config(String),

    /// A stored value could not be converted
    #[error("invalid stored data: {0}")]
    InvalidData(String),
}
