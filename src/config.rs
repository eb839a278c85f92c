//! Host configuration: collector settings, extended mode, credentials.
//!
//! # File location
//!
//! `config.toml` lives in `dirs::config_dir()/topic-digest/` by default
//! (`~/.config/topic-digest/` on Linux). Set `TOPIC_DIGEST_CONFIG_DIR` to
//! use another directory. A missing default file means all defaults.
//!
//! ```toml
//! extended_mode = "auto"
//!
//! [sources]
//! max_results = 12
//! per_domain_cap = 3
//! language = "english"
//!
//! [sources.domains]
//! preferred = ["reuters.com", "investor.*"]
//! blocked = ["reddit.com", "medium.com/@"]
//! ```

use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate, Weekday};
use digest_sources::CollectorConfig;
use serde::{Deserialize, Serialize};

use crate::error::{DigestError, Result};

/// Environment variable holding the search provider API key.
pub const API_KEY_ENV: &str = "TAVILY_API_KEY";

/// Environment variable overriding the config directory.
pub const CONFIG_DIR_ENV: &str = "TOPIC_DIGEST_CONFIG_DIR";

/// When to add the technical/research query facet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtendedMode {
    /// Extended on Saturdays and Sundays.
    #[default]
    Auto,
    /// Always extended.
    On,
    /// Never extended.
    Off,
}

impl ExtendedMode {
    /// Whether a run on `date` uses extended mode.
    pub fn resolve(self, date: NaiveDate) -> bool {
        match self {
            Self::Auto => matches!(date.weekday(), Weekday::Sat | Weekday::Sun),
            Self::On => true,
            Self::Off => false,
        }
    }
}

/// Top-level host configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DigestConfig {
    /// When to add the extended query facet.
    pub extended_mode: ExtendedMode,
    /// Collector settings.
    pub sources: CollectorConfig,
}

impl DigestConfig {
    /// Load configuration from a TOML file, falling back to defaults for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or fails validation.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self =
            toml::from_str(&content).map_err(|e| DigestError::Config(e.to_string()))?;
        config.sources.validate()?;
        Ok(config)
    }

    /// Load `path` if given, otherwise the default file if it exists, otherwise defaults.
    ///
    /// # Errors
    ///
    /// An explicit `path` must exist. Parse and validation errors are returned
    /// for whichever file is read.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }
        let default_path = Self::default_config_path();
        if default_path.exists() {
            Self::from_file(&default_path)
        } else {
            tracing::debug!(path = %default_path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| DigestError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path: `config_dir()/config.toml`.
    pub fn default_config_path() -> PathBuf {
        config_dir().join("config.toml")
    }
}

/// Configuration directory, honouring `TOPIC_DIGEST_CONFIG_DIR`.
#[must_use]
pub fn config_dir() -> PathBuf {
    resolve_config_dir(std::env::var_os(CONFIG_DIR_ENV).map(PathBuf::from))
}

fn resolve_config_dir(override_dir: Option<PathBuf>) -> PathBuf {
    if let Some(dir) = override_dir {
        return dir;
    }
    dirs::config_dir()
        .map(|d| d.join("topic-digest"))
        .unwrap_or_else(|| PathBuf::from("/tmp/topic-digest-config"))
}

/// Read the search provider API key from the environment.
///
/// # Errors
///
/// Returns [`DigestError::ConfigurationMissing`] if the variable is unset or blank.
pub fn api_key_from_env() -> Result<String> {
    api_key_from(std::env::var(API_KEY_ENV).ok())
}

fn api_key_from(value: Option<String>) -> Result<String> {
    match value {
        Some(key) if !key.trim().is_empty() => Ok(key.trim().to_owned()),
        _ => Err(DigestError::ConfigurationMissing(format!(
            "{API_KEY_ENV} is not set"
        ))),
    }
}
