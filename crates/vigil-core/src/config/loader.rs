//! Poll policy loader with precedence
//!
//! Loads poll policies from multiple sources with the following precedence (low to high):
//! 1. Embedded defaults (built into binary)
//! 2. Policy file (~/.vigil/vigil-poll.yaml)
//! 3. Environment variables (VIGIL_POLL_* prefix, default policy only)

use crate::error::{Error, Result};
use crate::poll::PollConfig;
use crate::types::{PollPoliciesConfig, PollPolicy};
use camino::{Utf8Path, Utf8PathBuf};
use rust_embed::RustEmbed;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use std::env;
use std::fs;
use std::str::FromStr;

/// Embedded configuration files
#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/embedded/"]
#[prefix = ""]
struct EmbeddedConfigs;

const DEFAULTS_FILE: &str = "poll-defaults.yaml";
const POLICY_FILE: &str = "vigil-poll.yaml";

/// Policy file contents layered over the embedded defaults
///
/// `default` stays unset when the file omits it, so the lower layer keeps its
/// default policy.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct PollPoliciesOverlay {
    #[serde(default)]
    default: Option<PollPolicy>,

    #[serde(default)]
    operations: HashMap<String, PollPolicy>,
}

/// Poll policy loader
pub struct PollConfigLoader {
    /// Base directory for configuration files
    config_dir: Utf8PathBuf,
}

impl PollConfigLoader {
    /// Create a loader rooted at the standard config directory (~/.vigil)
    pub fn new() -> Result<Self> {
        let config_dir = Self::get_config_dir()?;
        Ok(Self { config_dir })
    }

    /// Create a loader with a custom config directory
    pub fn with_dir(config_dir: Utf8PathBuf) -> Self {
        Self { config_dir }
    }

    /// Get the standard config directory (~/.vigil)
    fn get_config_dir() -> Result<Utf8PathBuf> {
        let home = env::var("HOME")
            .or_else(|_| env::var("USERPROFILE"))
            .map_err(|_| Error::invalid_config("Could not determine home directory"))?;

        let config_dir = Utf8PathBuf::from(home).join(".vigil");

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)?;
        }

        Ok(config_dir)
    }

    /// Load poll policies with hierarchical precedence
    pub fn load_policies(&self) -> Result<PollPoliciesConfig> {
        let mut policies = Self::load_embedded_config::<PollPoliciesConfig>(DEFAULTS_FILE)?;

        let policy_path = self.config_dir.join(POLICY_FILE);
        if policy_path.exists() {
            let file_policies = self.load_yaml_file::<PollPoliciesOverlay>(&policy_path)?;
            policies = Self::merge_policies(policies, file_policies);
        }

        Self::apply_env_overrides(policies)
    }

    /// Load the validated poll configuration for an operation
    ///
    /// Operations without a dedicated policy use the default policy.
    pub fn load_config_for(&self, operation: &str) -> Result<PollConfig> {
        let policies = self.load_policies()?;
        let config = policies.policy_for(operation).to_config()?;

        tracing::debug!(
            operation = operation,
            timeout_ms = config.timeout.as_millis() as u64,
            initial_interval_ms = config.initial_interval.as_millis() as u64,
            backoff = config.has_backoff(),
            "resolved poll policy"
        );

        Ok(config)
    }

    /// Load an embedded configuration file
    fn load_embedded_config<T: DeserializeOwned>(filename: &str) -> Result<T> {
        let embedded_file = EmbeddedConfigs::get(filename).ok_or_else(|| {
            Error::config_not_found(format!("Embedded config not found: {}", filename))
        })?;

        let content = std::str::from_utf8(&embedded_file.data).map_err(|_| {
            Error::invalid_config(format!("Invalid UTF-8 in embedded config: {}", filename))
        })?;

        let config: T = serde_yaml_ng::from_str(content).map_err(|e| {
            Error::invalid_config(format!(
                "Failed to parse embedded config {}: {}",
                filename, e
            ))
        })?;

        Ok(config)
    }

    /// Load a YAML file and parse it
    fn load_yaml_file<T: DeserializeOwned>(&self, path: &Utf8Path) -> Result<T> {
        let content = fs::read_to_string(path)?;
        let config: T = serde_yaml_ng::from_str(&content)?;
        Ok(config)
    }

    /// Merge two policy sets (base is overridden by overlay)
    fn merge_policies(
        mut base: PollPoliciesConfig,
        overlay: PollPoliciesOverlay,
    ) -> PollPoliciesConfig {
        for (key, policy) in overlay.operations {
            base.operations.insert(key, policy);
        }
        if let Some(default) = overlay.default {
            base.default = default;
        }
        base
    }

    /// Apply environment variable overrides to the default policy
    fn apply_env_overrides(mut policies: PollPoliciesConfig) -> Result<PollPoliciesConfig> {
        if let Some(val) = env_number::<u64>("VIGIL_POLL_TIMEOUT_MS")? {
            policies.default.timeout_ms = val;
        }

        if let Some(val) = env_number::<u64>("VIGIL_POLL_INTERVAL_MS")? {
            policies.default.initial_interval_ms = val;
        }

        if let Some(val) = env_number::<u64>("VIGIL_POLL_MAX_INTERVAL_MS")? {
            policies.default.max_interval_ms = Some(val);
        }

        if let Some(val) = env_number::<f64>("VIGIL_POLL_BACKOFF_MULTIPLIER")? {
            policies.default.backoff_multiplier = Some(val);
        }

        Ok(policies)
    }

    /// Get the config directory path
    pub fn config_dir(&self) -> &Utf8Path {
        &self.config_dir
    }
}

fn env_number<T: FromStr>(name: &str) -> Result<Option<T>> {
    match env::var(name) {
        Ok(val) => val
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| Error::invalid_config(format!("{} must be a valid number", name))),
        Err(_) => Ok(None),
    }
}
