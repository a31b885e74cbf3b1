//! Poll observation and logging
//!
//! This module provides the `PollObserver` trait for monitoring polling
//! sessions and a `TracingObserver` implementation that logs using the
//! `tracing` crate. The poller itself never logs; attach an observer when
//! session events should be visible.

use std::fmt::Display;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

/// Observer trait for polling session events
///
/// # Example
///
/// ```rust
/// use std::fmt::Display;
/// use std::time::Duration;
/// use vigil_core::poll::PollObserver;
///
/// struct MetricsObserver;
///
/// impl PollObserver for MetricsObserver {
///     fn on_attempt_start(&self, attempt: u32, elapsed: Duration) {}
///
///     fn on_not_met(&self, attempt: u32, next_wait: Duration) {}
///
///     fn on_eval_failed(&self, attempt: u32, error: &dyn Display, next_wait: Duration) {}
///
///     fn on_success(&self, attempts: u32, elapsed: Duration) {}
///
///     fn on_timed_out(&self, attempts: u32, elapsed: Duration, last_error: Option<&dyn Display>) {}
/// }
/// ```
pub trait PollObserver: Send + Sync {
    /// Called right before the condition is evaluated
    ///
    /// # Arguments
    ///
    /// * `attempt` - The attempt number (1-indexed)
    /// * `elapsed` - Time since the session started
    fn on_attempt_start(&self, attempt: u32, elapsed: Duration);

    /// Called when an evaluation reports the condition is not met yet
    ///
    /// # Arguments
    ///
    /// * `attempt` - The attempt number (1-indexed)
    /// * `next_wait` - The wait before the next attempt
    fn on_not_met(&self, attempt: u32, next_wait: Duration);

    /// Called when an evaluation fails with a transient error
    ///
    /// # Arguments
    ///
    /// * `attempt` - The attempt number (1-indexed)
    /// * `error` - The evaluation failure
    /// * `next_wait` - The wait before the next attempt
    fn on_eval_failed(&self, attempt: u32, error: &dyn Display, next_wait: Duration);

    /// Called when the condition is met
    fn on_success(&self, attempts: u32, elapsed: Duration);

    /// Called when the deadline passes before the condition is met
    fn on_timed_out(&self, attempts: u32, elapsed: Duration, last_error: Option<&dyn Display>);

    /// Called when the session is cancelled
    fn on_cancelled(&self, attempts: u32, elapsed: Duration) {
        let _ = (attempts, elapsed);
    }
}

/// A no-op observer that does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpObserver;

impl PollObserver for NoOpObserver {
    fn on_attempt_start(&self, _attempt: u32, _elapsed: Duration) {}

    fn on_not_met(&self, _attempt: u32, _next_wait: Duration) {}

    fn on_eval_failed(&self, _attempt: u32, _error: &dyn Display, _next_wait: Duration) {}

    fn on_success(&self, _attempts: u32, _elapsed: Duration) {}

    fn on_timed_out(&self, _attempts: u32, _elapsed: Duration, _last_error: Option<&dyn Display>) {}
}

/// An observer that logs polling events using the `tracing` crate
///
/// # Log Levels
///
/// - `on_attempt_start`, `on_not_met`: DEBUG
/// - `on_eval_failed`: WARN
/// - `on_success`: INFO (if > 1 attempt) or DEBUG (first attempt)
/// - `on_timed_out`: ERROR
/// - `on_cancelled`: WARN
///
/// # Example
///
/// ```rust
/// use vigil_core::poll::TracingObserver;
///
/// let observer = TracingObserver::new("database-ready");
/// assert_eq!(observer.operation(), "database-ready");
/// ```
#[derive(Debug, Clone)]
pub struct TracingObserver {
    /// Name of the condition being polled (for log context)
    operation: String,
}

impl TracingObserver {
    /// Create a new tracing observer
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
        }
    }

    /// Get the operation name
    pub fn operation(&self) -> &str {
        &self.operation
    }
}

impl Default for TracingObserver {
    fn default() -> Self {
        Self::new("poll")
    }
}

impl PollObserver for TracingObserver {
    fn on_attempt_start(&self, attempt: u32, elapsed: Duration) {
        tracing::debug!(
            operation = %self.operation,
            attempt = attempt,
            elapsed_ms = elapsed.as_millis() as u64,
            "evaluating condition"
        );
    }

    fn on_not_met(&self, attempt: u32, next_wait: Duration) {
        tracing::debug!(
            operation = %self.operation,
            attempt = attempt,
            next_wait_ms = next_wait.as_millis() as u64,
            "condition not met yet"
        );
    }

    fn on_eval_failed(&self, attempt: u32, error: &dyn Display, next_wait: Duration) {
        tracing::warn!(
            operation = %self.operation,
            attempt = attempt,
            error = %error,
            next_wait_ms = next_wait.as_millis() as u64,
            "condition evaluation failed, will poll again"
        );
    }

    fn on_success(&self, attempts: u32, elapsed: Duration) {
        if attempts > 1 {
            tracing::info!(
                operation = %self.operation,
                attempts = attempts,
                elapsed_ms = elapsed.as_millis() as u64,
                "condition met after polling"
            );
        } else {
            tracing::debug!(
                operation = %self.operation,
                elapsed_ms = elapsed.as_millis() as u64,
                "condition met on first attempt"
            );
        }
    }

    fn on_timed_out(&self, attempts: u32, elapsed: Duration, last_error: Option<&dyn Display>) {
        match last_error {
            Some(err) => tracing::error!(
                operation = %self.operation,
                attempts = attempts,
                elapsed_ms = elapsed.as_millis() as u64,
                last_error = %err,
                "polling timed out"
            ),
            None => tracing::error!(
                operation = %self.operation,
                attempts = attempts,
                elapsed_ms = elapsed.as_millis() as u64,
                "polling timed out"
            ),
        }
    }

    fn on_cancelled(&self, attempts: u32, elapsed: Duration) {
        tracing::warn!(
            operation = %self.operation,
            attempts = attempts,
            elapsed_ms = elapsed.as_millis() as u64,
            "polling cancelled"
        );
    }
}

/// An observer that counts polling events
///
/// Useful for testing and metrics collection.
#[derive(Debug, Default)]
pub struct StatsObserver {
    /// Evaluation start events
    pub attempt_starts: AtomicU32,
    /// Not-met evaluation events
    pub not_met: AtomicU32,
    /// Failed evaluation events
    pub failures: AtomicU32,
    /// Success events
    pub successes: AtomicU32,
    /// Timeout events
    pub timeouts: AtomicU32,
    /// Cancellation events
    pub cancellations: AtomicU32,
}

impl StatsObserver {
    /// Create a new stats observer
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of evaluation starts
    pub fn attempt_starts(&self) -> u32 {
        self.attempt_starts.load(Ordering::SeqCst)
    }

    /// Get the number of not-met evaluations
    pub fn not_met(&self) -> u32 {
        self.not_met.load(Ordering::SeqCst)
    }

    /// Get the number of failed evaluations
    pub fn failures(&self) -> u32 {
        self.failures.load(Ordering::SeqCst)
    }

    /// Get the number of successes
    pub fn successes(&self) -> u32 {
        self.successes.load(Ordering::SeqCst)
    }

    /// Get the number of timeouts
    pub fn timeouts(&self) -> u32 {
        self.timeouts.load(Ordering::SeqCst)
    }

    /// Get the number of cancellations
    pub fn cancellations(&self) -> u32 {
        self.cancellations.load(Ordering::SeqCst)
    }
}

impl PollObserver for StatsObserver {
    fn on_attempt_start(&self, _attempt: u32, _elapsed: Duration) {
        self.attempt_starts.fetch_add(1, Ordering::SeqCst);
    }

    fn on_not_met(&self, _attempt: u32, _next_wait: Duration) {
        self.not_met.fetch_add(1, Ordering::SeqCst);
    }

    fn on_eval_failed(&self, _attempt: u32, _error: &dyn Display, _next_wait: Duration) {
        self.failures.fetch_add(1, Ordering::SeqCst);
    }

    fn on_success(&self, _attempts: u32, _elapsed: Duration) {
        self.successes.fetch_add(1, Ordering::SeqCst);
    }

    fn on_timed_out(&self, _attempts: u32, _elapsed: Duration, _last_error: Option<&dyn Display>) {
        self.timeouts.fetch_add(1, Ordering::SeqCst);
    }

    fn on_cancelled(&self, _attempts: u32, _elapsed: Duration) {
        self.cancellations.fetch_add(1, Ordering::SeqCst);
    }
}

/// Implement PollObserver for Arc<T> where T: PollObserver
impl<T: PollObserver + ?Sized> PollObserver for std::sync::Arc<T> {
    fn on_attempt_start(&self, attempt: u32, elapsed: Duration) {
        (**self).on_attempt_start(attempt, elapsed)
    }

    fn on_not_met(&self, attempt: u32, next_wait: Duration) {
        (**self).on_not_met(attempt, next_wait)
    }

    fn on_eval_failed(&self, attempt: u32, error: &dyn Display, next_wait: Duration) {
        (**self).on_eval_failed(attempt, error, next_wait)
    }

    fn on_success(&self, attempts: u32, elapsed: Duration) {
        (**self).on_success(attempts, elapsed)
    }

    fn on_timed_out(&self, attempts: u32, elapsed: Duration, last_error: Option<&dyn Display>) {
        (**self).on_timed_out(attempts, elapsed, last_error)
    }

    fn on_cancelled(&self, attempts: u32, elapsed: Duration) {
        (**self).on_cancelled(attempts, elapsed)
    }
}

/// Implement PollObserver for Box<T> where T: PollObserver
impl<T: PollObserver + ?Sized> PollObserver for Box<T> {
    fn on_attempt_start(&self, attempt: u32, elapsed: Duration) {
        (**self).on_attempt_start(attempt, elapsed)
    }

    fn on_not_met(&self, attempt: u32, next_wait: Duration) {
        (**self).on_not_met(attempt, next_wait)
    }

    fn on_eval_failed(&self, attempt: u32, error: &dyn Display, next_wait: Duration) {
        (**self).on_eval_failed(attempt, error, next_wait)
    }

    fn on_success(&self, attempts: u32, elapsed: Duration) {
        (**self).on_success(attempts, elapsed)
    }

    fn on_timed_out(&self, attempts: u32, elapsed: Duration, last_error: Option<&dyn Display>) {
        (**self).on_timed_out(attempts, elapsed, last_error)
    }

    fn on_cancelled(&self, attempts: u32, elapsed: Duration) {
        (**self).on_cancelled(attempts, elapsed)
    }
}
