//! Configuration loading
//!
//! Precedence order (highest to lowest):
//! 1. Command-line flags and `REFLECTOR_*` environment variables
//! 2. YAML config file passed with `--config`
//! 3. Built-in defaults

use super::schema::Config;
use anyhow::{Context, Result};
use std::path::Path;

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load defaults, layered with the config file if one is given
    ///
    /// Command-line overrides are applied by the caller afterwards.
    pub fn load(path: Option<&Path>) -> Result<Config> {
        match path {
            Some(path) => Self::load_file(path),
            None => Ok(Self::load_defaults()),
        }
    }

    /// Load configuration from a file
    ///
    /// Keys missing from the file take their default values.
    pub fn load_file(path: &Path) -> Result<Config> {
        if !path.exists() {
            return Err(anyhow::anyhow!("Config file not found: {}", path.display()));
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load default configuration
    pub fn load_defaults() -> Config {
        Config::default()
    }
}
