//! # vigil-core
//!
//! Core library for Vigil providing:
//! - A condition polling engine with timeout, interval and backoff control
//! - Cooperative cancellation of polling sessions
//! - Observable polling events via the `PollObserver` trait
//! - Poll policy configuration loaded from embedded defaults, YAML and env

pub mod config;
pub mod error;
pub mod poll;
pub mod types;

pub use config::PollConfigLoader;
pub use error::{Error, Result};
pub use poll::{poll, Condition, ConditionOutcome, PollConfig, PollResult, Poller};
