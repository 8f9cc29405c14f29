//! vutil CLI - retry, cleanup and timestamp helpers
//!
//! This is the main entry point for the vutil command-line interface.

mod cli;
mod commands;
mod output;

use anyhow::{Context, Result};
use camino::Utf8Path;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use vutil_core::{ConfigLoader, VutilConfig};

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI args
    let cli = Cli::parse();

    // Initialize tracing
    init_tracing(cli.verbose, cli.quiet);

    // Run command
    match cli.command {
        Commands::Retry(args) => {
            let (_, config) = load_config(cli.config.as_deref())?;
            commands::retry::run(args, &config).await
        }
        Commands::Remove(args) => commands::remove::run(args),
        Commands::Stamp(args) => commands::stamp::run(args),
        Commands::Config(cmd) => {
            let (loader, config) = load_config(cli.config.as_deref())?;
            commands::config::run(cmd, &loader, &config, cli.config.as_deref())
        }
    }
}

/// Resolve configuration for the commands that read it
fn load_config(explicit: Option<&Utf8Path>) -> Result<(ConfigLoader, VutilConfig)> {
    let loader = ConfigLoader::new()?;
    let config = loader
        .load(explicit)
        .context("Failed to load configuration")?;
    Ok((loader, config))
}

/// Initialize tracing with appropriate verbosity
fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("info"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}
