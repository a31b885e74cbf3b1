//! Error types for vigil-core

use std::time::Duration;
use thiserror::Error;

/// Result type alias using vigil-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for Vigil
#[derive(Error, Debug)]
pub enum Error {
    /// Poll configuration violates one of its invariants
    #[error("Invalid poll configuration: {message}")]
    InvalidConfig { message: String },

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polling reached its deadline before the condition was met
    #[error("{}", timed_out_message(.elapsed, .attempts, .last_error))]
    TimedOut {
        elapsed: Duration,
        attempts: u32,
        last_error: Option<String>,
    },

    /// Polling was cancelled by the caller
    #[error("polling cancelled after {attempts} attempts ({:.2}s)", secs(.elapsed))]
    Cancelled { elapsed: Duration, attempts: u32 },
}

fn secs(elapsed: &Duration) -> f64 {
    elapsed.as_secs_f64()
}

fn timed_out_message(elapsed: &Duration, attempts: &u32, last_error: &Option<String>) -> String {
    match last_error {
        Some(err) => format!(
            "polling timed out after {} attempts over {:.2}s: {}",
            attempts,
            elapsed.as_secs_f64(),
            err
        ),
        None => format!(
            "polling timed out after {} attempts over {:.2}s",
            attempts,
            elapsed.as_secs_f64()
        ),
    }
}

impl Error {
    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a config not found error
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    /// Create a timed out error
    pub fn timed_out(elapsed: Duration, attempts: u32, last_error: Option<String>) -> Self {
        Self::TimedOut {
            elapsed,
            attempts,
            last_error,
        }
    }

    /// Create a cancelled error
    pub fn cancelled(elapsed: Duration, attempts: u32) -> Self {
        Self::Cancelled { elapsed, attempts }
    }

    /// Check if this error is a polling timeout
    pub fn is_timed_out(&self) -> bool {
        matches!(self, Error::TimedOut { .. })
    }

    /// Check if this error is a polling cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled { .. })
    }
}
