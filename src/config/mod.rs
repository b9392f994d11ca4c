//! Configuration loading and management

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::entity::PartnerBucket;

fn default_channel_capacity() -> usize {
    1024
}

/// Tunables for a session's stores
///
/// Every field has a default, so a config file only names what it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Buffer size of the change bus broadcast channel.
    ///
    /// Subscribers further behind than this start skipping events.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,

    /// Bucket the partner store should come up showing, if any
    #[serde(default)]
    pub partner_home_bucket: Option<PartnerBucket>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            channel_capacity: default_channel_capacity(),
            partner_home_bucket: None,
        }
    }
}

impl StoreConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read store config {}", path.display()))?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml).context("invalid store config")?;
        Ok(config)
    }
}
