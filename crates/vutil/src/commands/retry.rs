//! Retry command

use std::process::ExitStatus;

use anyhow::{Context, Result};
use thiserror::Error;
use tokio::process::Command;
use vutil_core::retry::{CancelWhen, RetryExecutorBuilder, RetryPolicy, TracingObserver};
use vutil_core::VutilConfig;

use crate::cli::RetryArgs;
use crate::output;

/// SIGINT on unix platforms
#[cfg(unix)]
const SIGINT: i32 = 2;

/// Failure of a single run of the child program
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}")]
    Failed { program: String, status: ExitStatus },

    #[error("{program} was interrupted")]
    Interrupted { program: String },
}

impl CommandError {
    /// Whether this failure came from an interrupt rather than the program
    pub fn is_interrupt(&self) -> bool {
        matches!(self, Self::Interrupted { .. })
    }

    fn from_status(program: &str, status: ExitStatus) -> Self {
        if killed_by_sigint(&status) {
            Self::Interrupted {
                program: program.to_string(),
            }
        } else {
            Self::Failed {
                program: program.to_string(),
                status,
            }
        }
    }
}

#[cfg(unix)]
fn killed_by_sigint(status: &ExitStatus) -> bool {
    use std::os::unix::process::ExitStatusExt;
    status.signal() == Some(SIGINT)
}

#[cfg(not(unix))]
fn killed_by_sigint(_status: &ExitStatus) -> bool {
    false
}

/// Merge CLI overrides into the configured policy
pub fn resolve_policy(args: &RetryArgs, config: &VutilConfig) -> Result<RetryPolicy> {
    let mut policy = config.retry.clone();
    if let Some(retries) = args.retries {
        policy.retries = retries;
    }
    if let Some(backoff) = args.backoff {
        policy.backoff_seconds = backoff;
    }
    policy.validate().context("Invalid retry options")?;
    Ok(policy)
}

pub async fn run(args: RetryArgs, config: &VutilConfig) -> Result<()> {
    let policy = resolve_policy(&args, config)?;
    let (program, program_args) = args
        .command
        .split_first()
        .context("No command given")?;

    let executor = RetryExecutorBuilder::new()
        .with_policy(policy)
        .with_observer(TracingObserver::new(program.as_str()))
        .with_cancellation(CancelWhen::new(|err: &CommandError| err.is_interrupt()))
        .build();

    // Dropping the attempt future kills the child
    let outcome = tokio::select! {
        result = executor.execute_async(move || run_once(program, program_args)) => result,
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!("interrupted, cancelling {}", program);
            Err(CommandError::Interrupted { program: program.clone() })
        }
    };

    match outcome {
        Ok(()) => {
            output::success(&format!("{} succeeded", program));
            Ok(())
        }
        Err(err) => {
            if err.is_interrupt() {
                output::error("Interrupted");
            }
            Err(err.into())
        }
    }
}

async fn run_once(program: &str, args: &[String]) -> Result<(), CommandError> {
    let status = Command::new(program)
        .args(args)
        .kill_on_drop(true)
        .status()
        .await
        .map_err(|source| CommandError::Spawn {
            program: program.to_string(),
            source,
        })?;

    if status.success() {
        Ok(())
    } else {
        Err(CommandError::from_status(program, status))
    }
}
