//! Lane configuration
//!
//! Optional TOML file (default `.morn/defines.toml`) pointing the lane at
//! the modules root and the project settings store. Every field has a
//! default, so a missing file means a default configuration, not an error.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors loading the lane configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Lane configuration file contents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaneConfig {
    /// Root folder whose child folders derive define symbols
    #[serde(default = "default_modules_root")]
    pub modules_root: PathBuf,

    /// Path to the project settings store
    #[serde(default = "default_settings_path")]
    pub settings_path: PathBuf,

    /// Flag list delimiter used by the store
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

fn default_modules_root() -> PathBuf {
    PathBuf::from("modules")
}

fn default_settings_path() -> PathBuf {
    PathBuf::from("project_settings.toml")
}

fn default_delimiter() -> char {
    ';'
}

impl Default for LaneConfig {
    fn default() -> Self {
        Self {
            modules_root: default_modules_root(),
            settings_path: default_settings_path(),
            delimiter: default_delimiter(),
        }
    }
}

impl LaneConfig {
    /// Default config file location
    pub fn default_path() -> PathBuf {
        PathBuf::from(".morn/defines.toml")
    }

    /// Load configuration, falling back to defaults if the file is absent
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Ok(Self::parse(&content)?)
    }

    /// Parse configuration from a TOML string
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}
