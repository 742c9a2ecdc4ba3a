//! CLI argument definitions using clap
//!
//! Commands:
//! - studentdb serve [--config <path>] [--port <port>] [--database-url <url>]
//! - studentdb init-db [--config <path>] [--database-url <url>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// studentdb - Student records over HTTP
#[derive(Parser, Debug)]
#[command(name = "studentdb")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP server
    Serve {
        /// Path to a JSON configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Port to listen on
        #[arg(long, env = "PORT")]
        port: Option<u16>,

        /// Database connection URL (postgres://... or sqlite:...)
        #[arg(long, env = "DATABASE_URL")]
        database_url: Option<String>,
    },

    /// Create the students table if it does not exist and exit
    InitDb {
        /// Path to a JSON configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Database connection URL (postgres://... or sqlite:...)
        #[arg(long, env = "DATABASE_URL")]
        database_url: Option<String>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
