//! Retry execution engine
//!
//! This module provides the core retry loop. The loop is strictly
//! sequential: one invocation, then either a return or a sleep followed by
//! the next invocation.

use std::fmt::Display;
use std::future::Future;
use std::time::{Duration, Instant};

use super::cancellation::{Cancellation, NeverCancel};
use super::observer::{RetryObserver, TracingObserver};
use super::policy::{calculate_delay, RetryPolicy};
use super::sleeper::{JitterSource, RandomJitter, Sleeper, ThreadSleeper};

/// Run `op` with retry and exponential backoff
///
/// Uses the default collaborators: blocking thread sleep, random jitter, no
/// cancellation predicate and a `TracingObserver` named `operation`, so the
/// retry warnings say what failed. The operation runs at most `retries + 1`
/// times; the last error is returned unchanged.
///
/// # Example
///
/// ```rust,no_run
/// use vutil_core::retry::retry_with_backoff;
///
/// let body = retry_with_backoff("read feed", 5, 1.0, || {
///     std::fs::read_to_string("/tmp/feed.json")
/// });
/// ```
pub fn retry_with_backoff<F, T, E>(
    operation: impl Into<String>,
    retries: u32,
    backoff_seconds: f64,
    op: F,
) -> Result<T, E>
where
    F: FnMut() -> Result<T, E>,
    E: Display,
{
    named_executor(operation, RetryPolicy::new(retries, backoff_seconds)).execute(op)
}

/// Executor with default collaborators and a named tracing observer
fn named_executor(
    operation: impl Into<String>,
    policy: RetryPolicy,
) -> RetryExecutor<TracingObserver, ThreadSleeper, RandomJitter, NeverCancel> {
    RetryExecutorBuilder::new()
        .with_policy(policy)
        .with_observer(TracingObserver::new(operation))
        .build()
}

/// Builder for configuring a `RetryExecutor`
///
/// # Example
///
/// ```rust
/// use vutil_core::retry::{InterruptedIo, RetryExecutorBuilder, RetryPolicy, TracingObserver};
///
/// let executor = RetryExecutorBuilder::new()
///     .with_policy(RetryPolicy::new(3, 0.5))
///     .with_observer(TracingObserver::new("download"))
///     .with_cancellation(InterruptedIo)
///     .build();
///
/// assert_eq!(executor.policy().retries, 3);
/// ```
pub struct RetryExecutorBuilder<
    O = TracingObserver,
    S = ThreadSleeper,
    J = RandomJitter,
    C = NeverCancel,
> {
    policy: RetryPolicy,
    observer: O,
    sleeper: S,
    jitter: J,
    cancellation: C,
}

impl Default for RetryExecutorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RetryExecutorBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self {
            policy: RetryPolicy::default(),
            observer: TracingObserver::default(),
            sleeper: ThreadSleeper,
            jitter: RandomJitter,
            cancellation: NeverCancel,
        }
    }
}

impl<O, S, J, C> RetryExecutorBuilder<O, S, J, C> {
    /// Set the retry policy
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the observer that receives attempt callbacks
    pub fn with_observer<O2>(self, observer: O2) -> RetryExecutorBuilder<O2, S, J, C> {
        RetryExecutorBuilder {
            policy: self.policy,
            observer,
            sleeper: self.sleeper,
            jitter: self.jitter,
            cancellation: self.cancellation,
        }
    }

    /// Set the sleeper used between synchronous attempts
    pub fn with_sleeper<S2>(self, sleeper: S2) -> RetryExecutorBuilder<O, S2, J, C> {
        RetryExecutorBuilder {
            policy: self.policy,
            observer: self.observer,
            sleeper,
            jitter: self.jitter,
            cancellation: self.cancellation,
        }
    }

    /// Set the jitter source
    pub fn with_jitter<J2>(self, jitter: J2) -> RetryExecutorBuilder<O, S, J2, C> {
        RetryExecutorBuilder {
            policy: self.policy,
            observer: self.observer,
            sleeper: self.sleeper,
            jitter,
            cancellation: self.cancellation,
        }
    }

    /// Set the predicate that recognises cancellation failures
    pub fn with_cancellation<C2>(self, cancellation: C2) -> RetryExecutorBuilder<O, S, J, C2> {
        RetryExecutorBuilder {
            policy: self.policy,
            observer: self.observer,
            sleeper: self.sleeper,
            jitter: self.jitter,
            cancellation,
        }
    }

    /// Build the executor
    pub fn build(self) -> RetryExecutor<O, S, J, C> {
        RetryExecutor {
            policy: self.policy,
            observer: self.observer,
            sleeper: self.sleeper,
            jitter: self.jitter,
            cancellation: self.cancellation,
        }
    }
}

/// A retry executor with configurable policy and collaborators
///
/// Use `RetryExecutorBuilder` to create an instance. The executor holds no
/// per-call state, so one instance can run any number of operations; every
/// call starts its own attempt counter at zero.
pub struct RetryExecutor<O, S, J, C> {
    policy: RetryPolicy,
    observer: O,
    sleeper: S,
    jitter: J,
    cancellation: C,
}

impl<O, S, J, C> RetryExecutor<O, S, J, C>
where
    O: RetryObserver,
    S: Sleeper,
    J: JitterSource,
{
    /// The policy this executor applies
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// The observer receiving attempt callbacks
    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Execute an operation with retry logic
    ///
    /// Returns the first success, or the error of the final attempt once the
    /// retry budget is spent, or a cancellation error as soon as it occurs.
    pub fn execute<F, T, E>(&self, mut op: F) -> Result<T, E>
    where
        F: FnMut() -> Result<T, E>,
        E: Display,
        C: Cancellation<E>,
    {
        let start = Instant::now();
        let mut attempt: u32 = 0;

        loop {
            self.observer
                .on_attempt_start(attempt + 1, self.policy.max_attempts());

            match op() {
                Ok(value) => {
                    self.observer.on_success(attempt + 1, start.elapsed());
                    return Ok(value);
                }
                Err(err) => match self.backoff_after(attempt, &err) {
                    Some(delay) => {
                        self.sleeper.sleep(delay);
                        attempt += 1;
                    }
                    None => return Err(err),
                },
            }
        }
    }

    /// Execute an async operation with retry logic
    ///
    /// Same policy as [`execute`](Self::execute), but waits on the tokio
    /// timer instead of the configured `Sleeper`. Attempts still run one
    /// after another.
    pub async fn execute_async<F, Fut, T, E>(&self, mut op: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
        C: Cancellation<E>,
    {
        let start = Instant::now();
        let mut attempt: u32 = 0;

        loop {
            self.observer
                .on_attempt_start(attempt + 1, self.policy.max_attempts());

            match op().await {
                Ok(value) => {
                    self.observer.on_success(attempt + 1, start.elapsed());
                    return Ok(value);
                }
                Err(err) => match self.backoff_after(attempt, &err) {
                    Some(delay) => {
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                    }
                    None => return Err(err),
                },
            }
        }
    }

    /// Wrap `f` into a function with the same argument and result types
    ///
    /// The argument is cloned for every attempt.
    ///
    /// # Example
    ///
    /// ```rust
    /// use vutil_core::retry::{FixedJitter, NoSleep, RetryExecutorBuilder, RetryPolicy};
    ///
    /// let mut calls = 0;
    /// let mut parse = RetryExecutorBuilder::new()
    ///     .with_policy(RetryPolicy::new(2, 1.0))
    ///     .with_sleeper(NoSleep)
    ///     .with_jitter(FixedJitter(0.0))
    ///     .build()
    ///     .wrap(|input: String| {
    ///         calls += 1;
    ///         if calls < 2 {
    ///             Err("not ready".to_string())
    ///         } else {
    ///             input.parse::<u32>().map_err(|e| e.to_string())
    ///         }
    ///     });
    ///
    /// assert_eq!(parse("42".to_string()), Ok(42));
    /// ```
    pub fn wrap<A, F, T, E>(self, mut f: F) -> impl FnMut(A) -> Result<T, E>
    where
        A: Clone,
        F: FnMut(A) -> Result<T, E>,
        E: Display,
        C: Cancellation<E>,
    {
        move |args: A| self.execute(|| f(args.clone()))
    }

    /// Decide what follows a failed attempt
    ///
    /// Returns the delay before the next attempt, or `None` when the error
    /// must be handed back to the caller.
    fn backoff_after<E>(&self, attempt: u32, err: &E) -> Option<Duration>
    where
        E: Display,
        C: Cancellation<E>,
    {
        if self.cancellation.is_cancellation(err) {
            self.observer.on_cancelled(attempt + 1, err);
            return None;
        }

        if attempt >= self.policy.retries {
            self.observer.on_exhausted(self.policy.retries, err);
            return None;
        }

        let delay = calculate_delay(&self.policy, attempt, self.jitter.sample());
        self.observer
            .on_attempt_failed(attempt + 1, self.policy.retries, err, delay);
        Some(delay)
    }
}
