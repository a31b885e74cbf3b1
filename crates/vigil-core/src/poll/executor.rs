//! Condition polling engine
//!
//! Runs a bounded, interruptible loop around a caller-provided condition.
//! Each iteration checks cancellation, then the deadline, then evaluates the
//! condition, then waits for the current interval while watching the
//! cancellation token.

use std::fmt::Display;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::Result;

use super::config::PollConfig;
use super::observer::{NoOpObserver, PollObserver};
use super::outcome::{Condition, ConditionOutcome, PollResult};

/// Poll a condition until it is met, the timeout elapses, or `cancel` fires
///
/// This is a convenience function for unobserved polling. Use
/// `PollerBuilder` to attach an observer.
///
/// Returns `Error::InvalidConfig` without evaluating the condition when
/// `config` is invalid.
///
/// # Example
///
/// ```rust,no_run
/// use std::time::Duration;
/// use vigil_core::{poll, ConditionOutcome, PollConfig};
///
/// async fn wait_for_marker() -> vigil_core::Result<()> {
///     let config = PollConfig::new(Duration::from_secs(30), Duration::from_millis(500));
///
///     let result = poll(
///         || async {
///             match tokio::fs::try_exists("/tmp/ready").await {
///                 Ok(true) => ConditionOutcome::Met,
///                 Ok(false) => ConditionOutcome::NotMet,
///                 Err(e) => ConditionOutcome::EvalFailed(e.to_string()),
///             }
///         },
///         &config,
///         None,
///     )
///     .await?;
///
///     result.into_result()?;
///     Ok(())
/// }
/// ```
pub async fn poll<C>(
    condition: C,
    config: &PollConfig,
    cancel: Option<&CancellationToken>,
) -> Result<PollResult<C::Error>>
where
    C: Condition,
    C::Error: Display,
{
    Poller::new(config.clone()).poll(condition, cancel).await
}

/// Builder for configuring a `Poller`
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use vigil_core::poll::{PollerBuilder, TracingObserver};
/// use vigil_core::PollConfig;
///
/// let poller = PollerBuilder::new()
///     .with_config(PollConfig::new(Duration::from_secs(60), Duration::from_secs(2)))
///     .with_observer(TracingObserver::new("service-health"))
///     .build();
/// ```
pub struct PollerBuilder<O = NoOpObserver> {
    config: PollConfig,
    observer: O,
}

impl Default for PollerBuilder<NoOpObserver> {
    fn default() -> Self {
        Self::new()
    }
}

impl PollerBuilder<NoOpObserver> {
    /// Create a new builder with the default policy and no observer
    pub fn new() -> Self {
        Self {
            config: PollConfig::new(Duration::from_secs(30), Duration::from_secs(1)),
            observer: NoOpObserver,
        }
    }
}

impl<O> PollerBuilder<O> {
    /// Set the poll configuration
    pub fn with_config(mut self, config: PollConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the observer
    pub fn with_observer<O2>(self, observer: O2) -> PollerBuilder<O2> {
        PollerBuilder {
            config: self.config,
            observer,
        }
    }

    /// Build the poller
    pub fn build(self) -> Poller<O> {
        Poller {
            config: self.config,
            observer: self.observer,
        }
    }
}

/// A condition poller with a fixed configuration and observer
///
/// The poller holds no per-session state, so one instance can drive any
/// number of sequential or concurrent `poll` calls.
pub struct Poller<O = NoOpObserver> {
    config: PollConfig,
    observer: O,
}

impl Poller<NoOpObserver> {
    /// Create an unobserved poller
    pub fn new(config: PollConfig) -> Self {
        Self {
            config,
            observer: NoOpObserver,
        }
    }
}

impl<O> Poller<O> {
    /// Get the poll configuration
    pub fn config(&self) -> &PollConfig {
        &self.config
    }
}

impl<O> Poller<O>
where
    O: PollObserver,
{
    /// Poll `condition` until it is met, the timeout elapses, or `cancel` fires
    ///
    /// Cancellation is checked before the deadline and before every
    /// evaluation, and again while waiting between attempts. An evaluation
    /// that is already running is always awaited to completion.
    pub async fn poll<C>(
        &self,
        mut condition: C,
        cancel: Option<&CancellationToken>,
    ) -> Result<PollResult<C::Error>>
    where
        C: Condition,
        C::Error: Display,
    {
        self.config.validate()?;

        let mut session = PollSession::start(&self.config);
        let mut last_error: Option<C::Error> = None;

        loop {
            if cancel.is_some_and(CancellationToken::is_cancelled) {
                return Ok(self.cancelled(&session));
            }

            let elapsed = session.elapsed();
            if elapsed >= self.config.timeout {
                self.observer.on_timed_out(
                    session.attempt_count,
                    elapsed,
                    last_error.as_ref().map(|e| e as &dyn Display),
                );
                return Ok(PollResult::TimedOut {
                    elapsed,
                    attempts: session.attempt_count,
                    last_error,
                });
            }

            let attempt = session.record_attempt();
            self.observer.on_attempt_start(attempt, elapsed);

            let wait = match condition.check().await {
                ConditionOutcome::Met => {
                    let elapsed = session.elapsed();
                    self.observer.on_success(session.attempt_count, elapsed);
                    return Ok(PollResult::Success {
                        elapsed,
                        attempts: session.attempt_count,
                    });
                }
                ConditionOutcome::NotMet => {
                    let wait = session.next_wait(self.config.timeout);
                    self.observer.on_not_met(session.attempt_count, wait);
                    wait
                }
                ConditionOutcome::EvalFailed(err) => {
                    let wait = session.next_wait(self.config.timeout);
                    self.observer.on_eval_failed(session.attempt_count, &err, wait);
                    last_error = Some(err);
                    wait
                }
            };

            if !wait_unless_cancelled(wait, cancel).await {
                return Ok(self.cancelled(&session));
            }

            session.current_interval = self.config.next_interval(session.current_interval);
        }
    }

    fn cancelled<E>(&self, session: &PollSession) -> PollResult<E> {
        let elapsed = session.elapsed();
        self.observer.on_cancelled(session.attempt_count, elapsed);
        PollResult::Cancelled {
            elapsed,
            attempts: session.attempt_count,
        }
    }
}

/// Loop-local state of one `poll` call
struct PollSession {
    start_time: Instant,
    current_interval: Duration,
    attempt_count: u32,
}

impl PollSession {
    fn start(config: &PollConfig) -> Self {
        Self {
            start_time: Instant::now(),
            current_interval: config.initial_interval,
            attempt_count: 0,
        }
    }

    fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Count one more evaluation, saturating at `u32::MAX`
    fn record_attempt(&mut self) -> u32 {
        self.attempt_count = self.attempt_count.saturating_add(1);
        self.attempt_count
    }

    /// The current interval, clipped to the time left before the deadline
    fn next_wait(&self, timeout: Duration) -> Duration {
        let remaining = timeout.saturating_sub(self.elapsed());
        self.current_interval.min(remaining)
    }
}

/// Sleep for `wait`, returning `false` if cancellation arrives first
async fn wait_unless_cancelled(wait: Duration, cancel: Option<&CancellationToken>) -> bool {
    if wait.is_zero() {
        return true;
    }

    match cancel {
        Some(token) => tokio::select! {
            biased;
            () = token.cancelled() => false,
            () = tokio::time::sleep(wait) => true,
        },
        None => {
            tokio::time::sleep(wait).await;
            true
        }
    }
}
