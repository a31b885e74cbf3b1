//! Polling configuration and interval progression

use std::time::Duration;

use crate::error::{Error, Result};

/// Timing parameters for a polling session
///
/// `timeout` bounds the whole session, `initial_interval` is the wait after
/// the first unsuccessful attempt. Setting `backoff_multiplier` above `1.0`
/// grows the interval after every unsuccessful attempt, up to `max_interval`
/// when one is configured.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use vigil_core::PollConfig;
///
/// let config = PollConfig::new(Duration::from_secs(60), Duration::from_secs(1))
///     .with_backoff(2.0, Duration::from_secs(8));
///
/// assert!(config.validate().is_ok());
/// assert_eq!(config.next_interval(Duration::from_secs(4)), Duration::from_secs(8));
/// assert_eq!(config.next_interval(Duration::from_secs(8)), Duration::from_secs(8));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PollConfig {
    /// Maximum wall-clock duration to keep polling
    pub timeout: Duration,
    /// Wait duration before the first retry
    pub initial_interval: Duration,
    /// Cap for the interval when backoff is enabled
    pub max_interval: Option<Duration>,
    /// Factor applied to the interval after each unsuccessful attempt
    ///
    /// `None` or `1.0` keeps the interval fixed.
    pub backoff_multiplier: Option<f64>,
}

impl PollConfig {
    /// Create a fixed-interval configuration
    pub fn new(timeout: Duration, initial_interval: Duration) -> Self {
        Self {
            timeout,
            initial_interval,
            max_interval: None,
            backoff_multiplier: None,
        }
    }

    /// Enable exponential backoff capped at `max_interval`
    pub fn with_backoff(mut self, multiplier: f64, max_interval: Duration) -> Self {
        self.backoff_multiplier = Some(multiplier);
        self.max_interval = Some(max_interval);
        self
    }

    /// Check the configuration invariants
    ///
    /// Called by the poller before the first evaluation, so an invalid
    /// configuration never reaches the condition.
    pub fn validate(&self) -> Result<()> {
        if self.timeout.is_zero() {
            return Err(Error::invalid_config("timeout must be greater than zero"));
        }

        if self.initial_interval.is_zero() {
            return Err(Error::invalid_config("initial interval must be greater than zero"));
        }

        if let Some(max) = self.max_interval {
            if max < self.initial_interval {
                return Err(Error::invalid_config(format!(
                    "max interval ({}ms) must not be smaller than initial interval ({}ms)",
                    max.as_millis(),
                    self.initial_interval.as_millis()
                )));
            }
        }

        if let Some(multiplier) = self.backoff_multiplier {
            if !multiplier.is_finite() || multiplier < 1.0 {
                return Err(Error::invalid_config(format!(
                    "backoff multiplier must be a finite number >= 1.0, got {}",
                    multiplier
                )));
            }
        }

        Ok(())
    }

    /// Whether the interval grows between attempts
    pub fn has_backoff(&self) -> bool {
        self.backoff_multiplier.is_some_and(|m| m > 1.0)
    }

    /// Calculate the interval that follows `current`
    ///
    /// Without backoff this is always `initial_interval`. With backoff the
    /// interval is multiplied and capped at `max_interval`; an uncapped
    /// interval saturates at `Duration::MAX` instead of overflowing.
    pub fn next_interval(&self, current: Duration) -> Duration {
        let multiplier = match self.backoff_multiplier {
            Some(m) if m > 1.0 => m,
            _ => return self.initial_interval,
        };

        let grown = Duration::try_from_secs_f64(current.as_secs_f64() * multiplier)
            .unwrap_or(Duration::MAX);

        match self.max_interval {
            Some(max) => grown.min(max),
            None => grown,
        }
    }
}
