#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Configuration management for pace
//!
//! This crate handles loading and merging configuration from:
//! - Default values (hard-coded)
//! - Configuration file (~/.config/pace/config.toml)
//! - Environment variables
//! - CLI flags (applied by the binary)

use pace_errors::{ConfigError, Error};
use pace_progress::{ProgressConfig, MIN_WINDOW_CAPACITY};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tracing::debug;

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub progress: ProgressSettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Progress engine tunables, in milliseconds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSettings {
    #[serde(default = "default_refresh_interval_ms")]
    pub refresh_interval_ms: u64,
    #[serde(default = "default_display_threshold_ms")]
    pub display_threshold_ms: u64,
    #[serde(default = "default_minimum_time_left_ms")]
    pub minimum_time_left_ms: u64,
    #[serde(default = "default_window_capacity")]
    pub window_capacity: usize,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Filter used when `RUST_LOG` is not set
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Emit logs as JSON lines
    #[serde(default)]
    pub json: bool,
}

impl Default for ProgressSettings {
    fn default() -> Self {
        Self {
            refresh_interval_ms: default_refresh_interval_ms(),
            display_threshold_ms: default_display_threshold_ms(),
            minimum_time_left_ms: default_minimum_time_left_ms(),
            window_capacity: default_window_capacity(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            json: false,
        }
    }
}

// Default value functions for serde
fn default_refresh_interval_ms() -> u64 {
    millis(ProgressConfig::default().refresh_interval)
}

fn default_display_threshold_ms() -> u64 {
    millis(ProgressConfig::default().display_threshold)
}

fn default_minimum_time_left_ms() -> u64 {
    millis(ProgressConfig::default().minimum_time_left)
}

fn default_window_capacity() -> usize {
    ProgressConfig::default().window_capacity
}

fn default_log_filter() -> String {
    "warn".to_string()
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

impl ProgressSettings {
    /// Convert to the engine's configuration
    #[must_use]
    pub fn to_progress_config(&self) -> ProgressConfig {
        ProgressConfig {
            refresh_interval: Duration::from_millis(self.refresh_interval_ms),
            display_threshold: Duration::from_millis(self.display_threshold_ms),
            minimum_time_left: Duration::from_millis(self.minimum_time_left_ms),
            window_capacity: self.window_capacity,
        }
    }
}

impl Config {
    /// Get the default config file path
    ///
    /// # Errors
    ///
    /// Returns an error if the system config directory cannot be determined.
    pub fn default_path() -> Result<PathBuf, Error> {
        let config_dir = dirs::config_dir().ok_or_else(|| ConfigError::NotFound {
            path: "config directory".to_string(),
        })?;
        Ok(config_dir.join("pace").join("config.toml"))
    }

    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] if the file does not exist, an I/O
    /// error carrying the path if it cannot be read, and a config error on
    /// invalid TOML or values that fail validation.
    pub async fn load_from_file(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::from(ConfigError::NotFound {
                    path: path.display().to_string(),
                })
            } else {
                Error::io_with_path(&e, path)
            }
        })?;

        let config = Self::from_toml(&contents)?;
        debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Parse and validate configuration from a TOML string
    ///
    /// # Errors
    ///
    /// Returns an error on invalid TOML or values that fail validation.
    pub fn from_toml(contents: &str) -> Result<Self, Error> {
        let config: Self = toml::from_str(contents).map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with fallback to defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be read
    /// or contains invalid TOML syntax.
    pub async fn load() -> Result<Self, Error> {
        let config_path = Self::default_path()?;

        if config_path.exists() {
            Self::load_from_file(&config_path).await
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from an optional path or use default
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self, Error> {
        match path {
            Some(config_path) => Self::load_from_file(config_path).await,
            None => Self::load().await,
        }
    }

    /// Merge with environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables contain values that cannot
    /// be parsed into the expected types.
    pub fn merge_env(&mut self) -> Result<(), Error> {
        if let Some(value) = env_parse("PACE_REFRESH_INTERVAL_MS")? {
            self.progress.refresh_interval_ms = value;
        }

        if let Some(value) = env_parse("PACE_DISPLAY_THRESHOLD_MS")? {
            self.progress.display_threshold_ms = value;
        }

        if let Some(value) = env_parse("PACE_MINIMUM_TIME_LEFT_MS")? {
            self.progress.minimum_time_left_ms = value;
        }

        if let Some(value) = env_parse("PACE_WINDOW_CAPACITY")? {
            self.progress.window_capacity = value;
        }

        if let Ok(json) = std::env::var("PACE_LOG_JSON") {
            self.logging.json = match json.as_str() {
                "true" | "1" | "yes" => true,
                "false" | "0" | "no" => false,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        field: "PACE_LOG_JSON".to_string(),
                        value: json,
                    }
                    .into())
                }
            };
        }

        self.validate()
    }

    /// Check values that deserialize fine but cannot be used
    ///
    /// # Errors
    ///
    /// Returns an error if the window capacity is too small to ever produce
    /// an estimate.
    pub fn validate(&self) -> Result<(), Error> {
        if self.progress.window_capacity < MIN_WINDOW_CAPACITY {
            return Err(ConfigError::InvalidValue {
                field: "progress.window_capacity".to_string(),
                value: self.progress.window_capacity.to_string(),
            }
            .into());
        }
        Ok(())
    }
}

fn env_parse<T: std::str::FromStr>(var: &str) -> Result<Option<T>, Error> {
    match std::env::var(var) {
        Ok(value) => value
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue {
                field: var.to_string(),
                value,
            }
            .into()),
        Err(_) => Ok(None),
    }
}
