//! Config command

use anyhow::Result;
use camino::Utf8Path;
use vutil_core::{ConfigLoader, VutilConfig};

use crate::cli::{ConfigCommands, ConfigShowArgs};
use crate::output;

pub fn run(
    cmd: ConfigCommands,
    loader: &ConfigLoader,
    config: &VutilConfig,
    explicit: Option<&Utf8Path>,
) -> Result<()> {
    match cmd {
        ConfigCommands::Show(args) => show(args, config),
        ConfigCommands::Path => path(loader, explicit),
    }
}

fn show(args: ConfigShowArgs, config: &VutilConfig) -> Result<()> {
    if args.json {
        println!("{}", serde_json::to_string_pretty(config)?);
    } else {
        print!("{}", config.to_yaml()?);
    }
    Ok(())
}

fn path(loader: &ConfigLoader, explicit: Option<&Utf8Path>) -> Result<()> {
    match explicit.or_else(|| loader.locate()) {
        Some(found) => println!("{}", found),
        None => {
            output::info("No configuration file found, using defaults");
            for candidate in loader.candidates() {
                output::kv("searched", candidate.as_str());
            }
        }
    }
    Ok(())
}
