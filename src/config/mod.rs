//! Configuration loading and management

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::core::filter::Page;

/// Tuning knobs for the data-access layer.
///
/// All fields have defaults, so a partial (or empty) YAML document is fine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShopConfig {
    /// Hard ceiling on order-search results; results silently truncate
    /// beyond it
    pub search_cap: usize,

    /// Page size used when the caller omits a limit
    pub default_page_limit: usize,

    /// How many parent ids a single batched `IN (…)` query may carry
    pub batch_fetch_size: usize,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            search_cap: 1000,
            default_page_limit: 100,
            batch_fetch_size: 1000,
        }
    }
}

impl ShopConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// The page window used when a caller paginates without parameters.
    pub fn default_page(&self) -> Page {
        Page {
            offset: 0,
            limit: self.default_page_limit,
        }
    }
}
