//! Injectable sleep and randomness sources
//!
//! The executor never calls `std::thread::sleep` or the thread RNG directly,
//! so tests can swap in deterministic fakes and skip wall-clock waits.

use rand::Rng;
use std::sync::Arc;
use std::time::Duration;

/// Blocks the calling thread between attempts
pub trait Sleeper: Send + Sync {
    /// Wait for `delay` before returning
    fn sleep(&self, delay: Duration);
}

/// Sleeps on the current thread with `std::thread::sleep`
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, delay: Duration) {
        std::thread::sleep(delay);
    }
}

/// Returns immediately
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSleep;

impl Sleeper for NoSleep {
    fn sleep(&self, _delay: Duration) {}
}

impl<T: Sleeper + ?Sized> Sleeper for Arc<T> {
    fn sleep(&self, delay: Duration) {
        (**self).sleep(delay)
    }
}

/// Produces the additive jitter, in seconds, for each backoff delay
pub trait JitterSource: Send + Sync {
    /// Draw a sample in `[0, 1)`
    fn sample(&self) -> f64;
}

/// Uniform jitter in `[0, 1)` from the thread-local RNG
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomJitter;

impl JitterSource for RandomJitter {
    fn sample(&self) -> f64 {
        rand::rng().random::<f64>()
    }
}

/// Always yields the same sample
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedJitter(pub f64);

impl JitterSource for FixedJitter {
    fn sample(&self) -> f64 {
        self.0
    }
}

impl<T: JitterSource + ?Sized> JitterSource for Arc<T> {
    fn sample(&self) -> f64 {
        (**self).sample()
    }
}
