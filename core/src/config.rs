//! Configuration management (`<config dir>/simscope/config.toml`)
//!
//! Settings are stored in TOML format. Missing sections and keys fall back
//! to their defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Registry build and access settings
    #[serde(default)]
    pub inspection: InspectionConfig,
}

/// How two members resolving to the same display name are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicateNamePolicy {
    /// Fail registry construction
    #[default]
    Reject,
    /// The member declared later replaces the earlier one
    LastWins,
}

/// Inspection registry configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InspectionConfig {
    /// Display-name collision handling (default: reject)
    #[serde(default)]
    pub duplicate_names: DuplicateNamePolicy,
    /// Log swallowed access faults at warn level instead of debug (default: true)
    #[serde(default = "default_true")]
    pub report_access_faults: bool,
}

fn default_true() -> bool {
    true
}

impl Default for InspectionConfig {
    fn default() -> Self {
        Self {
            duplicate_names: DuplicateNamePolicy::default(),
            report_access_faults: default_true(),
        }
    }
}

/// Error loading a configuration file
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File is not valid configuration TOML
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Returns the platform-specific configuration directory.
///
/// On Linux: `~/.config/simscope`
///
/// Returns `None` if the home directory cannot be determined.
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("de", "fius", "simscope")
        .map(|dirs| dirs.config_dir().to_path_buf())
}

/// Loads the configuration from the platform's configuration directory.
///
/// Returns default values if the file doesn't exist or cannot be parsed.
pub fn load() -> Config {
    config_dir()
        .and_then(|dir| load_from(&dir.join("config.toml")).ok())
        .unwrap_or_default()
}

/// Loads the configuration from an explicit path.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid TOML.
pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
