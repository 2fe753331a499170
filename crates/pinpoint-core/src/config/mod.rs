//! Configuration management for pinpoint.
//!
//! Configuration is loaded from the platform config directory
//! (`~/.config/pinpoint/config.toml` on Linux) with defaults for every field,
//! so running without a config file only needs `GEMINI_API_KEY` set.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure for pinpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Gemini API settings
    pub llm: LlmConfig,

    /// Report output settings
    pub output: OutputConfig,

    /// Logging settings
    pub logging: LoggingConfig,
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
    /// - macOS: ~/Library/Application Support/com.pinpoint.pinpoint/config.toml
    /// - Linux: ~/.config/pinpoint/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\pinpoint\config\config.toml
    ///
    /// Falls back to ~/.pinpoint/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "pinpoint", "pinpoint")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".pinpoint").join("config.toml")
            })
    }

    /// Get the resolved report directory (with ~ expansion).
    pub fn output_dir(&self) -> PathBuf {
        let path_str = self.output.dir.to_string_lossy();
        let expanded = shellexpand::tilde(&path_str);
        PathBuf::from(expanded.into_owned())
    }

    /// Resolve the API key, following `${ENV_VAR}` references.
    pub fn api_key(&self) -> Result<String, ConfigError> {
        resolve_env_var(&self.llm.api_key).ok_or_else(|| ConfigError::MissingApiKey {
            var: env_var_name(&self.llm.api_key)
                .unwrap_or(API_KEY_ENV)
                .to_string(),
        })
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

/// Resolve `${ENV_VAR}` references in config strings.
///
/// Unset and empty variables both resolve to `None`.
pub fn resolve_env_var(value: &str) -> Option<String> {
    if let Some(var_name) = env_var_name(value) {
        std::env::var(var_name).ok().filter(|v| !v.is_empty())
    } else if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn env_var_name(value: &str) -> Option<&str> {
    value
        .strip_prefix("${")
        .and_then(|rest| rest.strip_suffix('}'))
}
