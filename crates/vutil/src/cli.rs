//! CLI argument parsing with clap

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

/// vutil - retry, cleanup and timestamp helpers for data pipelines
#[derive(Parser, Debug)]
#[command(name = "vutil")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to vutil.yaml config file
    #[arg(short, long, global = true)]
    pub config: Option<Utf8PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a command, retrying with exponential backoff until it succeeds
    Retry(RetryArgs),

    /// Remove a file or directory tree; a missing target is not an error
    Remove(RemoveArgs),

    /// Print the current time, or a file's timestamps, as RFC 3339 JSON
    Stamp(StampArgs),

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),
}

// Retry command
#[derive(Args, Debug)]
pub struct RetryArgs {
    /// Retries after the first failure (overrides config)
    #[arg(short, long)]
    pub retries: Option<u32>,

    /// Base backoff in seconds (overrides config)
    #[arg(short, long)]
    pub backoff: Option<f64>,

    /// Program and arguments to run
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

// Remove command
#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// Path to remove
    pub path: Utf8PathBuf,

    /// Remove a directory and everything under it
    #[arg(short, long)]
    pub tree: bool,
}

// Stamp command
#[derive(Args, Debug)]
pub struct StampArgs {
    /// Report this file's modification time as well
    #[arg(short, long)]
    pub path: Option<Utf8PathBuf>,

    /// Pretty-print the JSON document
    #[arg(long)]
    pub pretty: bool,
}

// Config commands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show resolved configuration
    Show(ConfigShowArgs),

    /// Show which configuration file would be loaded
    Path,
}

#[derive(Args, Debug)]
pub struct ConfigShowArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}
