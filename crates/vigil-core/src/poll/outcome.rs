//! Condition outcomes and terminal poll results

use std::fmt;
use std::future::Future;
use std::time::Duration;

use crate::error::{Error, Result};

/// Result of evaluating a condition once
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConditionOutcome<E = String> {
    /// Condition satisfied, stop polling
    Met,
    /// Condition not yet satisfied, keep polling
    NotMet,
    /// Transient failure while evaluating; treated as `NotMet` but recorded
    EvalFailed(E),
}

impl<E> ConditionOutcome<E> {
    /// Check if the condition was met
    pub fn is_met(&self) -> bool {
        matches!(self, ConditionOutcome::Met)
    }
}

impl<E> From<std::result::Result<bool, E>> for ConditionOutcome<E> {
    fn from(result: std::result::Result<bool, E>) -> Self {
        match result {
            Ok(true) => ConditionOutcome::Met,
            Ok(false) => ConditionOutcome::NotMet,
            Err(err) => ConditionOutcome::EvalFailed(err),
        }
    }
}

/// A check that can be evaluated repeatedly by the poller
///
/// Any `FnMut() -> impl Future<Output = ConditionOutcome<E>>` is a
/// `Condition`, so async closures work directly. Implement the trait on a
/// struct when the check carries its own state.
///
/// # Example
///
/// ```rust
/// use vigil_core::{Condition, ConditionOutcome};
///
/// struct Countdown(u32);
///
/// impl Condition for Countdown {
///     type Error = String;
///
///     async fn check(&mut self) -> ConditionOutcome<String> {
///         if self.0 == 0 {
///             return ConditionOutcome::Met;
///         }
///         self.0 -= 1;
///         ConditionOutcome::NotMet
///     }
/// }
/// ```
pub trait Condition {
    /// Error reported by a failed evaluation
    type Error;

    /// Evaluate the condition once
    fn check(&mut self) -> impl Future<Output = ConditionOutcome<Self::Error>>;
}

impl<F, Fut, E> Condition for F
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ConditionOutcome<E>>,
{
    type Error = E;

    fn check(&mut self) -> impl Future<Output = ConditionOutcome<E>> {
        self()
    }
}

/// Terminal result of a polling session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollResult<E = String> {
    /// The condition was met
    Success {
        /// Time from session start until the condition was met
        elapsed: Duration,
        /// Number of evaluations performed
        attempts: u32,
    },

    /// The deadline passed before the condition was met
    TimedOut {
        /// Time from session start until the deadline was detected
        elapsed: Duration,
        /// Number of evaluations performed
        attempts: u32,
        /// Most recent evaluation failure, if any
        last_error: Option<E>,
    },

    /// Cancellation was requested before the condition was met
    Cancelled {
        /// Time from session start until cancellation was observed
        elapsed: Duration,
        /// Number of evaluations performed
        attempts: u32,
    },
}

impl<E> PollResult<E> {
    /// Time spent in the session
    pub fn elapsed(&self) -> Duration {
        match self {
            PollResult::Success { elapsed, .. }
            | PollResult::TimedOut { elapsed, .. }
            | PollResult::Cancelled { elapsed, .. } => *elapsed,
        }
    }

    /// Number of condition evaluations performed
    pub fn attempts(&self) -> u32 {
        match self {
            PollResult::Success { attempts, .. }
            | PollResult::TimedOut { attempts, .. }
            | PollResult::Cancelled { attempts, .. } => *attempts,
        }
    }

    /// Check if the condition was met
    pub fn is_success(&self) -> bool {
        matches!(self, PollResult::Success { .. })
    }

    /// Check if the session hit its deadline
    pub fn is_timed_out(&self) -> bool {
        matches!(self, PollResult::TimedOut { .. })
    }

    /// Check if the session was cancelled
    pub fn is_cancelled(&self) -> bool {
        matches!(self, PollResult::Cancelled { .. })
    }

    /// The last recorded evaluation failure of a timed out session
    pub fn last_error(&self) -> Option<&E> {
        match self {
            PollResult::TimedOut { last_error, .. } => last_error.as_ref(),
            _ => None,
        }
    }
}

impl<E: fmt::Display> PollResult<E> {
    /// Turn timeout and cancellation into hard errors
    ///
    /// Returns the elapsed time on success.
    pub fn into_result(self) -> Result<Duration> {
        match self {
            PollResult::Success { elapsed, .. } => Ok(elapsed),
            PollResult::TimedOut {
                elapsed,
                attempts,
                last_error,
            } => Err(Error::timed_out(
                elapsed,
                attempts,
                last_error.map(|e| e.to_string()),
            )),
            PollResult::Cancelled { elapsed, attempts } => {
                Err(Error::cancelled(elapsed, attempts))
            }
        }
    }
}
