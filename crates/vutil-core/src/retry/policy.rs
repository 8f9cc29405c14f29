//! Retry policy and backoff schedule
//!
//! The schedule is fixed: `backoff_seconds * 2^attempt` plus up to one second
//! of additive jitter. There is no upper bound on the delay.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{Error, Result};

/// Largest jitter contribution, just under one second.
const MAX_JITTER: Duration = Duration::from_nanos(999_999_999);

/// Retry policy for an operation
///
/// An operation wrapped with this policy is invoked at most `retries + 1`
/// times and sleeps at most `retries` times.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RetryPolicy {
    /// Maximum number of retries after the first attempt
    #[serde(default = "default_retries")]
    pub retries: u32,

    /// Base backoff unit in seconds
    #[serde(default = "default_backoff_seconds")]
    pub backoff_seconds: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: default_retries(),
            backoff_seconds: default_backoff_seconds(),
        }
    }
}

fn default_retries() -> u32 {
    10
}
fn default_backoff_seconds() -> f64 {
    1.0
}

impl RetryPolicy {
    /// Create a policy with the given retry budget and base backoff
    pub fn new(retries: u32, backoff_seconds: f64) -> Self {
        Self {
            retries,
            backoff_seconds,
        }
    }

    /// Check that the backoff unit is a finite, strictly positive number
    pub fn validate(&self) -> Result<()> {
        if !self.backoff_seconds.is_finite() || self.backoff_seconds <= 0.0 {
            return Err(Error::invalid_config(format!(
                "backoff-seconds must be a positive number, got {}",
                self.backoff_seconds
            )));
        }
        Ok(())
    }

    /// Total number of invocations allowed, counting the first one
    pub fn max_attempts(&self) -> u32 {
        self.retries.saturating_add(1)
    }

    /// Delay before retry number `attempt` (0-indexed), without jitter
    pub fn base_delay(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let secs = self.backoff_seconds * 2f64.powi(exponent);
        match Duration::try_from_secs_f64(secs) {
            Ok(delay) => delay,
            Err(_) if secs > 0.0 => Duration::MAX,
            Err(_) => Duration::ZERO,
        }
    }
}

/// Calculate the delay before the next retry attempt
///
/// `attempt` is the 0-indexed attempt counter and `jitter` a sample in
/// `[0, 1)`; samples outside that range are clamped. The result always lies
/// in `[base, base + 1s)` and saturates at `Duration::MAX`.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use vutil_core::retry::{calculate_delay, RetryPolicy};
///
/// let policy = RetryPolicy::new(5, 1.0);
///
/// assert_eq!(calculate_delay(&policy, 0, 0.0), Duration::from_secs(1));
/// assert_eq!(calculate_delay(&policy, 2, 0.5), Duration::from_millis(4500));
/// ```
pub fn calculate_delay(policy: &RetryPolicy, attempt: u32, jitter: f64) -> Duration {
    let jitter = if jitter.is_nan() {
        0.0
    } else {
        jitter.clamp(0.0, 1.0)
    };
    let jitter = Duration::from_nanos((jitter * 1e9) as u64).min(MAX_JITTER);

    policy.base_delay(attempt).saturating_add(jitter)
}
