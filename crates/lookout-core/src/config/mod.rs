//! Configuration management for Lookout.
//!
//! Configuration is loaded from the platform config directory with sensible
//! defaults. It is read once at startup and never mutated afterwards.

mod provider;
mod types;
mod validate;

pub use provider::{resolve_env_var, ProviderConfig, ProviderKind};
pub use types::*;

use crate::detection::ClassTable;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure for Lookout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP boundary settings
    pub server: ServerConfig,

    /// Question answering settings
    pub qa: QaConfig,

    /// Detector class table
    pub detector: DetectorConfig,

    /// Logging settings
    pub logging: LoggingConfig,

    /// LLM provider settings
    pub llm: LlmConfig,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// Uses platform-appropriate directories:
    /// - macOS: ~/Library/Application Support/com.lookout.lookout/config.toml
    /// - Linux: ~/.config/lookout/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\lookout\config\config.toml
    ///
    /// Falls back to ~/.lookout/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "lookout", "lookout")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = shellexpand::tilde("~").into_owned();
                PathBuf::from(home).join(".lookout").join("config.toml")
            })
    }

    /// The detector class table.
    pub fn class_table(&self) -> ClassTable {
        ClassTable::new(self.detector.class_names.iter().cloned())
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}
