//! Poll policy configuration types
//!
//! These types describe polling behavior in configuration files. They use
//! plain millisecond fields so they read naturally in YAML, and convert into
//! a validated [`PollConfig`] for the polling engine.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use crate::error::Result;
use crate::poll::PollConfig;

/// Poll policy configurations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PollPoliciesConfig {
    /// Default poll policy
    #[serde(default)]
    pub default: PollPolicy,

    /// Per-operation poll policies
    #[serde(default)]
    pub operations: HashMap<String, PollPolicy>,
}

impl PollPoliciesConfig {
    /// Get the policy for an operation, falling back to the default policy
    pub fn policy_for(&self, operation: &str) -> &PollPolicy {
        self.operations.get(operation).unwrap_or(&self.default)
    }
}

/// Poll policy for an operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PollPolicy {
    /// Maximum wall-clock time to keep polling, in milliseconds
    #[serde(default = "default_timeout")]
    pub timeout_ms: u64,

    /// Wait before the first retry, in milliseconds
    #[serde(default = "default_initial_interval")]
    pub initial_interval_ms: u64,

    /// Upper bound for the interval when backoff is enabled, in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_interval_ms: Option<u64>,

    /// Factor applied to the interval after each unsuccessful attempt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backoff_multiplier: Option<f64>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout(),
            initial_interval_ms: default_initial_interval(),
            max_interval_ms: None,
            backoff_multiplier: None,
        }
    }
}

fn default_timeout() -> u64 {
    30_000 // 30 seconds
}
fn default_initial_interval() -> u64 {
    1000
}

impl PollPolicy {
    /// Convert this policy into a validated [`PollConfig`]
    pub fn to_config(&self) -> Result<PollConfig> {
        let config = PollConfig {
            timeout: Duration::from_millis(self.timeout_ms),
            initial_interval: Duration::from_millis(self.initial_interval_ms),
            max_interval: self.max_interval_ms.map(Duration::from_millis),
            backoff_multiplier: self.backoff_multiplier,
        };
        config.validate()?;
        Ok(config)
    }
}
