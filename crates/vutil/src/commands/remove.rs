//! Remove command

use anyhow::{Context, Result};
use vutil_core::fs::remove_if_exists;

use crate::cli::RemoveArgs;
use crate::output;

pub fn run(args: RemoveArgs) -> Result<()> {
    let existed = args.path.symlink_metadata().is_ok();

    remove_if_exists(&args.path, args.tree)
        .with_context(|| format!("Failed to remove {}", args.path))?;

    if existed {
        output::success(&format!("Removed {}", args.path));
    } else {
        output::info(&format!("Nothing to remove at {}", args.path));
    }

    Ok(())
}
