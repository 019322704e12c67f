//! CLI adapter for the soda review service
//!
//! Starts the HTTP server or inspects the effective configuration.
//! Depends on `core/` for configuration and services and on `http/`
//! for the router.

pub mod commands;
pub mod logging;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::core::config::Config;

/// Soda Review - rate soda fountains, restaurants and dispensers
#[derive(Parser, Debug)]
#[command(name = "soda-review")]
#[command(version)]
#[command(about = "Soda fountain review service", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file (defaults to SODA_REVIEW_CONFIG, then the XDG config file)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output for scripting
    Json,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP API server
    Serve(commands::ServeArgs),

    /// Show the effective configuration
    #[command(name = "show-config")]
    ShowConfig(commands::ConfigArgs),
}

/// Load configuration, preferring an explicit file over discovery
pub fn load_config(path: Option<&PathBuf>) -> crate::core::error::Result<Config> {
    match path {
        Some(path) => {
            let mut config = Config::from_file(path)?;
            config.merge_env()?;
            config.validate()?;
            Ok(config)
        }
        None => Config::load(),
    }
}

/// Run the CLI with the provided arguments
pub async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Serve(args) => commands::serve::execute(args, config).await,
        Commands::ShowConfig(args) => commands::config::execute(args, &config),
    }
}
