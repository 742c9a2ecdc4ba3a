//! CLI module for studentdb
//!
//! Provides command-line interface for:
//! - serve: Open the store, ensure the schema and serve HTTP
//! - init-db: Ensure the schema and exit

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::{init_db, run, run_command, serve};
pub use errors::{CliError, CliResult};
