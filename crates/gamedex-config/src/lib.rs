//! Configuration management for Gamedex
//!
//! Locates the data tables (genre reference, platform catalogs, favorites) and
//! lists the platforms a front end offers. Stored as TOML.

mod data_config;

pub use data_config::DataConfig;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// Config file looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "gamedex.toml";

/// Main Gamedex configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GamedexConfig {
    /// Platforms offered for selection, in display order
    #[serde(default = "default_platforms")]
    pub platforms: Vec<String>,

    #[serde(default)]
    pub data: DataConfig,
}

fn default_platforms() -> Vec<String> {
    ["PlayStation", "XBOX", "Nintendo", "PC"]
        .iter()
        .map(|p| p.to_string())
        .collect()
}

impl Default for GamedexConfig {
    fn default() -> Self {
        Self {
            platforms: default_platforms(),
            data: DataConfig::default(),
        }
    }
}

impl GamedexConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from default locations
    pub fn load_default() -> Result<Self, ConfigError> {
        let local = Path::new(LOCAL_CONFIG_FILE);
        if local.exists() {
            return Self::load(local);
        }

        if let Some(user_config) = user_config_path()
            && user_config.exists()
        {
            return Self::load(&user_config);
        }

        tracing::warn!("No configuration file found, using defaults");
        Ok(Self::default())
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, contents)?;
        tracing::info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Check the platform list is usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.platforms.is_empty() {
            return Err(ConfigError::Invalid("no platforms configured".to_string()));
        }

        if let Some(blank) = self.platforms.iter().position(|p| p.trim().is_empty()) {
            return Err(ConfigError::Invalid(format!(
                "platform #{} has an empty name",
                blank + 1
            )));
        }

        Ok(())
    }

    /// Whether `platform` is one of the configured platforms
    pub fn has_platform(&self, platform: &str) -> bool {
        self.platforms.iter().any(|p| p == platform)
    }
}

/// `$XDG_CONFIG_HOME/gamedex/config.toml`, falling back to `~/.config`
fn user_config_path() -> Option<PathBuf> {
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))?;
    Some(base.join("gamedex").join("config.toml"))
}
