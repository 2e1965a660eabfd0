//! Configuration System using Figment
//!
//! Configuration is loaded from:
//! 1. A TOML file (base configuration)
//! 2. Environment variables (prefixed with `KINESIS_`, nested keys joined by `__`)
//!
//! # Environment Variable Overrides
//!
//! ```text
//! KINESIS_LOG_LEVEL=debug
//! KINESIS_INDENT=4
//! KINESIS_RUN__LOG_PATH="C:\sequences\run.log"
//! KINESIS_RUN__REPEAT_COUNT=3
//! ```
//!
//! # Example File
//!
//! ```toml
//! log_level = "info"
//! indent = 2
//!
//! [run]
//! log_path = "C:\\sequences\\run.log"
//!
//! [[devices]]
//! alias = "Device001"
//! device_name = "Benchtop Brushless Motor Controller"
//! device_prefix = "73"
//! serial_no = "73867454-1"
//! actuator = "MLS203 X Axis"
//! ```

use crate::device::Device;
use crate::document::{DocumentBuilder, RunSettings};
use crate::format::{Formatter, DEFAULT_INDENT};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

/// Environment variable prefix for overrides.
pub const ENV_PREFIX: &str = "KINESIS_";

/// Largest accepted formatter indent.
pub const MAX_INDENT: usize = 8;

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source could not be read or deserialized.
    #[error("Configuration load error: {0}")]
    LoadError(#[from] figment::Error),
    #[error("Configuration validation error: {0}")]
    /// Values loaded but rejected by [`SequenceConfig::validate`].
    ValidationError(String),
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceConfig {
    /// Logging level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Spaces per nesting level when formatting
    #[serde(default = "default_indent")]
    pub indent: usize,
    /// Trailing run settings for generated documents
    #[serde(default)]
    pub run: RunSettings,
    /// Devices declared in every generated document
    #[serde(default)]
    pub devices: Vec<Device>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_indent() -> usize {
    DEFAULT_INDENT
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            indent: default_indent(),
            run: RunSettings::default(),
            devices: Vec::new(),
        }
    }
}

impl SequenceConfig {
    /// Load configuration from a TOML file and `KINESIS_` environment variables.
    ///
    /// Environment variables take precedence over the file; missing keys fall
    /// back to defaults. The result is validated.
    ///
    /// # Errors
    ///
    /// Returns a ConfigError if the sources cannot be merged or validation fails.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Self::extract(
            Figment::from(Serialized::defaults(Self::default()))
                .merge(Toml::file(path.as_ref()))
                .merge(Env::prefixed(ENV_PREFIX).split("__")),
        )
    }

    /// Load from defaults and environment variables only.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::extract(
            Figment::from(Serialized::defaults(Self::default()))
                .merge(Env::prefixed(ENV_PREFIX).split("__")),
        )
    }

    /// Parse a TOML string over the defaults, ignoring the environment.
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        Self::extract(Figment::from(Serialized::defaults(Self::default())).merge(Toml::string(toml)))
    }

    fn extract(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract().map_err(ConfigError::LoadError)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration after loading
    ///
    /// Checks:
    /// - Log level is valid (trace, debug, info, warn, error)
    /// - Indent is at most `MAX_INDENT`
    /// - Repeat count is at least 1
    /// - Device aliases are unique
    pub fn validate(&self) -> Result<(), ConfigError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            )));
        }

        if self.indent > MAX_INDENT {
            return Err(ConfigError::ValidationError(format!(
                "Invalid indent {}. Must be 0-{}",
                self.indent, MAX_INDENT
            )));
        }

        if self.run.repeat_count == 0 {
            return Err(ConfigError::ValidationError(
                "run.repeat_count must be at least 1".to_string(),
            ));
        }

        let mut aliases = HashSet::new();
        for device in &self.devices {
            if !aliases.insert(device.alias.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "Duplicate device alias: '{}'",
                    device.alias
                )));
            }
        }

        Ok(())
    }

    /// Document builder pre-populated with the configured devices and run settings.
    pub fn builder(&self) -> DocumentBuilder {
        DocumentBuilder::new()
            .devices(self.devices.iter().cloned())
            .settings(self.run.clone())
    }

    /// Formatter using the configured indent.
    pub fn formatter(&self) -> Formatter {
        Formatter::new(self.indent)
    }
}
