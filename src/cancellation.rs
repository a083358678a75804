//! Provides a token-based mechanism for graceful cancellation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A token that can be used to signal cancellation to long-running operations.
///
/// This struct is a cloneable, thread-safe wrapper around an `Arc<AtomicBool>`.
/// A token may also carry a deadline; once the deadline has passed the token
/// reports itself as cancelled, which is how run-level timeouts are enforced.
///
/// # Examples
///
/// ```
/// use sential::CancellationToken;
/// use std::thread;
/// use std::time::Duration;
///
/// let token = CancellationToken::new();
/// let token_clone = token.clone();
///
/// let handle = thread::spawn(move || {
///     while !token_clone.is_cancelled() {
///         thread::sleep(Duration::from_millis(10));
///     }
/// });
///
/// token.cancel();
/// handle.join().unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct CancellationToken {
    inner: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl CancellationToken {
    /// Creates a new `CancellationToken` in a non-cancelled state.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(AtomicBool::new(false)), // false means not cancelled
            deadline: None,
        }
    }

    /// Returns a clone of this token that additionally expires after `timeout`.
    ///
    /// Cancelling either token cancels both; only the returned token observes the deadline.
    ///
    /// ```
    /// use sential::CancellationToken;
    /// use std::time::Duration;
    ///
    /// let token = CancellationToken::new().with_timeout(Duration::ZERO);
    /// assert!(token.is_cancelled());
    /// ```
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        Self {
            inner: self.inner.clone(),
            deadline: Some(Instant::now() + timeout),
        }
    }

    /// Signals cancellation.
    pub fn cancel(&self) {
        self.inner.store(true, Ordering::SeqCst);
    }

    /// Checks if the token has been cancelled or its deadline has passed.
    pub fn is_cancelled(&self) -> bool {
        if self.inner.load(Ordering::Relaxed) {
            return true;
        }
        matches!(self.deadline, Some(deadline) if Instant::now() >= deadline)
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_token_is_not_cancelled() {
        let token = CancellationToken::new();
        assert!(!token.is_cancelled());
    }

    #[test]
    fn test_cancel_propagates_to_clones() {
        let token = CancellationToken::new();
        let clone = token.clone();
        clone.cancel();
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_timeout_token_shares_flag_with_parent() {
        let parent = CancellationToken::new();
        let timed = parent.with_timeout(Duration::from_secs(3600));
        assert!(!timed.is_cancelled());
        parent.cancel();
        assert!(timed.is_cancelled());
    }

    #[test]
    fn test_expired_deadline_cancels_only_timed_token() {
        let parent = CancellationToken::new();
        let timed = parent.with_timeout(Duration::ZERO);
        assert!(timed.is_cancelled());
        assert!(!parent.is_cancelled());
    }
}
