//! Cancellation predicates
//!
//! Every failure is retried unless the configured predicate classifies it as
//! a cancellation, in which case it is handed back on the spot.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Decides whether a failure is an explicit cancellation
///
/// # Example
///
/// ```rust
/// use vutil_core::retry::Cancellation;
///
/// #[derive(Debug)]
/// enum FetchError {
///     Timeout,
///     Aborted,
/// }
///
/// struct AbortCancels;
///
/// impl Cancellation<FetchError> for AbortCancels {
///     fn is_cancellation(&self, error: &FetchError) -> bool {
///         matches!(error, FetchError::Aborted)
///     }
/// }
///
/// assert!(AbortCancels.is_cancellation(&FetchError::Aborted));
/// assert!(!AbortCancels.is_cancellation(&FetchError::Timeout));
/// ```
pub trait Cancellation<E: ?Sized>: Send + Sync {
    /// Return true if `error` means the caller asked to stop
    fn is_cancellation(&self, error: &E) -> bool;
}

/// Treats every failure as retryable
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverCancel;

impl<E: ?Sized> Cancellation<E> for NeverCancel {
    fn is_cancellation(&self, _error: &E) -> bool {
        false
    }
}

/// Treats `io::ErrorKind::Interrupted` as a cancellation
#[derive(Debug, Clone, Copy, Default)]
pub struct InterruptedIo;

impl Cancellation<io::Error> for InterruptedIo {
    fn is_cancellation(&self, error: &io::Error) -> bool {
        error.kind() == io::ErrorKind::Interrupted
    }
}

/// A cancellation predicate backed by a closure
pub struct CancelWhen<F> {
    predicate: F,
}

impl<F> CancelWhen<F> {
    /// Create a new closure-based predicate
    pub fn new(predicate: F) -> Self {
        Self { predicate }
    }
}

impl<E, F> Cancellation<E> for CancelWhen<F>
where
    F: Fn(&E) -> bool + Send + Sync,
{
    fn is_cancellation(&self, error: &E) -> bool {
        (self.predicate)(error)
    }
}

/// Shared flag tripped by the environment, typically a Ctrl-C handler
///
/// Any failure observed while the flag is set counts as a cancellation.
/// Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct InterruptFlag {
    tripped: Arc<AtomicBool>,
}

impl InterruptFlag {
    /// Create an untripped flag
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the flag as interrupted
    pub fn trip(&self) {
        self.tripped.store(true, Ordering::SeqCst);
    }

    /// Clear the flag
    pub fn reset(&self) {
        self.tripped.store(false, Ordering::SeqCst);
    }

    /// Whether an interrupt has been recorded
    pub fn is_tripped(&self) -> bool {
        self.tripped.load(Ordering::SeqCst)
    }
}

impl<E: ?Sized> Cancellation<E> for InterruptFlag {
    fn is_cancellation(&self, _error: &E) -> bool {
        self.is_tripped()
    }
}

impl<E: ?Sized, T: Cancellation<E> + ?Sized> Cancellation<E> for Arc<T> {
    fn is_cancellation(&self, error: &E) -> bool {
        (**self).is_cancellation(error)
    }
}
