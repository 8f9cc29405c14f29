//! # vutil-core
//!
//! Small building blocks shared by data-fetching tools:
//! - Retry execution with exponential backoff and additive jitter
//! - Idempotent file and directory removal
//! - RFC 3339 aware JSON encoding
//! - YAML configuration for retry defaults

pub mod config;
pub mod encoding;
pub mod error;
pub mod fs;
pub mod retry;

pub use config::{ConfigLoader, VutilConfig};
pub use encoding::{Rfc3339, TemporalEncoder, Timestamp};
pub use error::{Error, Result};
pub use fs::remove_if_exists;
pub use retry::{retry_with_backoff, RetryExecutor, RetryExecutorBuilder, RetryPolicy};
