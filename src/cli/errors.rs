//! CLI-specific error types
//!
//! Every CLI error is fatal: main prints it and exits non-zero.

use thiserror::Error;

use crate::config::ConfigError;
use crate::observability::LoggingError;
use crate::store::StoreError;

/// CLI error
#[derive(Debug, Error)]
pub enum CliError {
    #[error("STUDENTDB_CLI_CONFIG_ERROR: {0}")]
    Config(#[from] ConfigError),

    #[error("STUDENTDB_CLI_LOGGING_ERROR: {0}")]
    Logging(#[from] LoggingError),

    #[error("STUDENTDB_CLI_STORE_ERROR: {0}")]
    Store(#[from] StoreError),

    #[error("STUDENTDB_CLI_BOOT_FAILED: {0}")]
    BootFailed(String),
}

impl CliError {
    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        match self {
            Self::Config(_) => "STUDENTDB_CLI_CONFIG_ERROR",
            Self::Logging(_) => "STUDENTDB_CLI_LOGGING_ERROR",
            Self::Store(_) => "STUDENTDB_CLI_STORE_ERROR",
            Self::BootFailed(_) => "STUDENTDB_CLI_BOOT_FAILED",
        }
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
