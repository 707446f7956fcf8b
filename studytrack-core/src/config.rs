//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/studytrack/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/studytrack/` (~/.config/studytrack/)
//! - Data: `$XDG_DATA_HOME/studytrack/` (~/.local/share/studytrack/)
//! - State/Logs: `$XDG_STATE_HOME/studytrack/` (~/.local/state/studytrack/)

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::PathBuf;

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_DATA_HOME or ~/.local/share
fn xdg_data_home() -> PathBuf {
    std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/share"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Storage configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Group membership rules
    #[serde(default)]
    pub groups: GroupConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Storage configuration
#[derive(Debug, Deserialize, Default)]
pub struct StorageConfig {
    /// Override path for the SQLite database file
    pub database_path: Option<PathBuf>,
}

/// Group membership rules
#[derive(Debug, Deserialize)]
pub struct GroupConfig {
    /// Maximum number of members per group
    #[serde(default = "default_max_members")]
    pub max_members: usize,
}

impl Default for GroupConfig {
    fn default() -> Self {
        Self {
            max_members: default_max_members(),
        }
    }
}

fn default_max_members() -> usize {
    6
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Maximum number of log files to keep
    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            max_files: default_max_log_files(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_log_files() -> usize {
    5
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        Ok(config)
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/studytrack/config.toml`
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("studytrack").join("config.toml")
    }

    /// Returns the data directory path (for the SQLite database)
    ///
    /// `$XDG_DATA_HOME/studytrack/`
    pub fn data_dir() -> PathBuf {
        xdg_data_home().join("studytrack")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/studytrack/`
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("studytrack")
    }

    /// Returns the database file path, honoring any configured override
    ///
    /// Default: `$XDG_DATA_HOME/studytrack/data.db`
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::data_dir().join("data.db"))
    }

    /// Returns the log file path
    ///
    /// `$XDG_STATE_HOME/studytrack/studytrack.log`
    pub fn log_path() -> PathBuf {
        Self::state_dir().join("studytrack.log")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.storage.database_path.is_none());
        assert_eq!(config.groups.max_members, 6);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
[storage]
database_path = "/tmp/studytrack-test.db"

[groups]
max_members = 10

[logging]
level = "debug"
"#;
        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(
            config.storage.database_path.as_deref(),
            Some(std::path::Path::new("/tmp/studytrack-test.db"))
        );
        assert_eq!(config.groups.max_members, 10);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_database_path_override() {
        let config = Config {
            storage: StorageConfig {
                database_path: Some(PathBuf::from("/tmp/override.db")),
            },
            ..Default::default()
        };
        assert_eq!(config.database_path(), PathBuf::from("/tmp/override.db"));

        let default_config = Config::default();
        assert!(default_config.database_path().ends_with("data.db"));
    }
}
