//! Configuration module
//!
//! Loaded from TOML (default `~/.config/erp-paging/config.toml`). Every key
//! is optional; missing keys take their defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{WildcardSet, DEFAULT_WILDCARDS};
use crate::infrastructure::DatabaseConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Paging defaults shared by every list view
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PagingConfig {
    pub default_page_size: u64,
    pub max_page_size: u64,
    /// Filter values that mean "no constraint"
    pub wildcards: Vec<String>,
    /// Per round trip; unset means no timeout
    pub remote_timeout_ms: Option<u64>,
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            default_page_size: 10,
            max_page_size: 100,
            wildcards: DEFAULT_WILDCARDS.iter().map(|s| s.to_string()).collect(),
            remote_timeout_ms: None,
        }
    }
}

impl PagingConfig {
    pub fn wildcard_set(&self) -> WildcardSet {
        WildcardSet::new(self.wildcards.iter().cloned())
    }

    pub fn remote_timeout(&self) -> Option<Duration> {
        self.remote_timeout_ms.map(Duration::from_millis)
    }

    /// Requested size clamped to `[1, max_page_size]`, default when absent
    pub fn page_size(&self, requested: Option<u64>) -> u64 {
        requested
            .unwrap_or(self.default_page_size)
            .clamp(1, self.max_page_size.max(1))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// trace, debug, info, warn, error
    pub level: String,
    /// "text" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub paging: PagingConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.paging.default_page_size == 0 {
            return Err(ConfigError::Invalid(
                "paging.default_page_size must be greater than zero".into(),
            ));
        }
        if self.paging.default_page_size > self.paging.max_page_size {
            return Err(ConfigError::Invalid(format!(
                "paging.default_page_size ({}) exceeds paging.max_page_size ({})",
                self.paging.default_page_size, self.paging.max_page_size
            )));
        }
        Ok(())
    }
}

/// `<config dir>/erp-paging/config.toml`, or `./config.toml` when the
/// platform has no config directory.
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .map(|dir| dir.join("erp-paging").join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("config.toml"))
}
