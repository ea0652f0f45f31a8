//! Runtime configuration
//!
//! Loaded from YAML; every key is optional and falls back to its default.
//!
//! ```yaml
//! scan_yield_interval: 64
//! traversal_yield_interval: 1
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Tuning knobs for stores and traversal runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Unit steps of a store scan or cascade between scheduler hand-offs
    pub scan_yield_interval: usize,
    /// Queue entries processed by a traversal run between scheduler hand-offs
    pub traversal_yield_interval: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            scan_yield_interval: 1,
            traversal_yield_interval: 1,
        }
    }
}

impl GraphConfig {
    /// Parse and validate a YAML document
    pub fn from_yaml_str(yaml: &str) -> ConfigResult<Self> {
        let config: GraphConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.scan_yield_interval == 0 {
            return Err(ConfigError::Invalid(
                "scan_yield_interval must be at least 1".to_string(),
            ));
        }
        if self.traversal_yield_interval == 0 {
            return Err(ConfigError::Invalid(
                "traversal_yield_interval must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
