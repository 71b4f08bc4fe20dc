//! Settings file
//!
//! A TOML file with optional `[colony]` and `[network]` tables and an
//! optional top-level `seed`. Missing keys fall back to defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use sinkhole_core::ColonyConfig;
use sinkhole_net::NetworkConfig;

use crate::RuntimeError;

/// Everything needed to reproduce a run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub seed: Option<u64>,
    pub colony: ColonyConfig,
    pub network: NetworkConfig,
}

impl Settings {
    /// Load and validate settings from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, RuntimeError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate settings
    pub fn from_toml_str(content: &str) -> Result<Self, RuntimeError> {
        let settings: Settings = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_toml_string(&self) -> Result<String, RuntimeError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), RuntimeError> {
        self.colony.validate()?;
        self.network.validate()?;
        Ok(())
    }
}
