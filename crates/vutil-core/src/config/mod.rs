//! Configuration loading and management

mod loader;

pub use loader::{ConfigLoader, CONFIG_FILE_NAMES, ENV_BACKOFF_SECONDS, ENV_RETRIES};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::retry::RetryPolicy;

/// Contents of a `vutil.yaml` file
///
/// ```yaml
/// retry:
///   retries: 5
///   backoff-seconds: 0.5
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct VutilConfig {
    /// Defaults for retried operations
    #[serde(default)]
    pub retry: RetryPolicy,
}

impl VutilConfig {
    /// Parse and validate a YAML document; an empty document yields defaults
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: Self = if content.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml_ng::from_str(content)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Check every section for out-of-range values
    pub fn validate(&self) -> Result<()> {
        self.retry.validate()
    }

    /// Render as YAML
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }
}
