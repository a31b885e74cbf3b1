//! Condition polling engine with timeout, interval and backoff control
//!
//! This module repeatedly evaluates a caller-supplied asynchronous condition
//! until it is met, a deadline elapses, or cancellation is requested.
//!
//! # Features
//!
//! - Fixed or exponentially growing intervals, capped by `max_interval`
//! - Deadline checked before every evaluation; at least one evaluation always runs
//! - Transient evaluation failures are retried and the latest one is reported
//! - Cooperative cancellation via `tokio_util::sync::CancellationToken`
//! - Observable sessions via the `PollObserver` trait
//!
//! # Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//! use vigil_core::poll::{PollerBuilder, TracingObserver};
//! use vigil_core::{ConditionOutcome, PollConfig, PollResult};
//!
//! async fn example(cancel: CancellationToken) -> vigil_core::Result<()> {
//!     let config = PollConfig::new(Duration::from_secs(120), Duration::from_secs(1))
//!         .with_backoff(2.0, Duration::from_secs(8));
//!
//!     let poller = PollerBuilder::new()
//!         .with_config(config)
//!         .with_observer(TracingObserver::new("service-health"))
//!         .build();
//!
//!     let result = poller
//!         .poll(|| async { ConditionOutcome::<String>::Met }, Some(&cancel))
//!         .await?;
//!
//!     if let PollResult::TimedOut { last_error, .. } = &result {
//!         eprintln!("service never became healthy: {:?}", last_error);
//!     }
//!     Ok(())
//! }
//! ```

mod config;
mod executor;
mod observer;
mod outcome;

pub use config::PollConfig;
pub use executor::{poll, Poller, PollerBuilder};
pub use observer::{NoOpObserver, PollObserver, StatsObserver, TracingObserver};
pub use outcome::{Condition, ConditionOutcome, PollResult};
