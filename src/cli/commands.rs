//! CLI command implementations
//!
//! Both commands resolve configuration the same way: defaults, then the
//! JSON file, then environment, then flags.

use std::path::Path;

use tracing::{error, info};

use crate::config::Config;
use crate::http_server::HttpServer;
use crate::observability::init_logging;
use crate::store;
use crate::student::StudentRepository;

use super::args::Command;
use super::errors::{CliError, CliResult};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve {
            config,
            port,
            database_url,
        } => {
            let config = load_config(config.as_deref(), port, database_url)?;
            serve(config)
        }
        Command::InitDb {
            config,
            database_url,
        } => {
            let config = load_config(config.as_deref(), None, database_url)?;
            init_db(config)
        }
    }
}

/// Resolve configuration and apply flag overrides
pub fn load_config(
    path: Option<&Path>,
    port: Option<u16>,
    database_url: Option<String>,
) -> CliResult<Config> {
    let mut config = Config::resolve(path)?;
    if let Some(port) = port {
        config.server.port = port;
    }
    if let Some(url) = database_url {
        config.store.url = url;
    }
    config.validate()?;
    Ok(config)
}

/// Open the configured store and wrap it in a repository
fn open_repository(config: &Config) -> CliResult<StudentRepository> {
    let store = store::open(&config.store)?;
    Ok(StudentRepository::new(store))
}

/// Serve the student API until Ctrl-C
///
/// A failed schema bootstrap is logged and the server still starts, so
/// a database that comes up late is picked up by the pool.
pub fn serve(config: Config) -> CliResult<()> {
    init_logging(&config.log)?;

    let repository = open_repository(&config)?;
    match repository.store().init_schema() {
        Ok(()) => info!("students table ready"),
        Err(err) => error!(error = %err, "failed to initialize students table"),
    }

    let server = HttpServer::new(config.server, repository);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::BootFailed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::BootFailed(format!("HTTP server failed: {}", e)))
    })
}

/// Create the students table and exit
pub fn init_db(config: Config) -> CliResult<()> {
    init_logging(&config.log)?;
    ensure_schema(&config)?;
    info!(url = %config.store.url, "students table ready");
    Ok(())
}

fn ensure_schema(config: &Config) -> CliResult<StudentRepository> {
    let repository = open_repository(config)?;
    repository.store().init_schema()?;
    Ok(repository)
}
