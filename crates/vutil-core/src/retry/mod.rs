//! Retry with exponential backoff
//!
//! Wraps a fallible operation so that failures are retried after
//! `backoff_seconds * 2^attempt` seconds plus up to one second of jitter.
//!
//! # Features
//!
//! - At most `retries + 1` invocations; the last error is returned verbatim
//! - Cancellation predicates that stop retrying immediately
//! - Observable attempts via the `RetryObserver` trait, `TracingObserver` by default
//! - Injectable `Sleeper` and `JitterSource` for deterministic tests
//! - Blocking (`execute`) and tokio (`execute_async`) variants
//!
//! # Example
//!
//! ```rust,no_run
//! use vutil_core::retry::{RetryExecutorBuilder, RetryPolicy, TracingObserver};
//!
//! let executor = RetryExecutorBuilder::new()
//!     .with_policy(RetryPolicy::new(5, 1.0))
//!     .with_observer(TracingObserver::new("fetch-advisories"))
//!     .build();
//!
//! let body = executor.execute(|| std::fs::read_to_string("/var/cache/advisories.json"));
//! ```

mod cancellation;
mod executor;
mod observer;
mod policy;
mod sleeper;

pub use cancellation::{CancelWhen, Cancellation, InterruptFlag, InterruptedIo, NeverCancel};
pub use executor::{retry_with_backoff, RetryExecutor, RetryExecutorBuilder};
pub use observer::{NoOpObserver, RetryObserver, StatsObserver, TracingObserver};
pub use policy::{calculate_delay, RetryPolicy};
pub use sleeper::{FixedJitter, JitterSource, NoSleep, RandomJitter, Sleeper, ThreadSleeper};
