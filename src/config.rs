//! Editor configuration.
//!
//! Display colors, zoom limits, history depth and log verbosity live here
//! instead of in global state. An [`EditorConfig`] is handed to
//! [`crate::EditorSession::new`] and can be stored as JSON.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// RGB color triple.
pub type Rgb = [u8; 3];

/// Log level setting for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    Warn,
    /// Show errors, warnings, and info messages
    #[default]
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Current configuration file format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Color of the id label drawn inside each box (blue).
pub const DEFAULT_NUMBER_COLOR: Rgb = [0, 0, 255];

/// Color of the box outline (yellow-green).
pub const DEFAULT_SQUARE_COLOR: Rgb = [154, 205, 50];

/// Editor settings that can be exported and imported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Version of the configuration file format
    pub version: u32,
    /// Color for the id drawn in each box
    pub number_color: Rgb,
    /// Color for box outlines and the drag preview
    pub square_color: Rgb,
    /// Factor applied per zoom step
    pub zoom_step: f64,
    /// Smallest allowed view scale
    pub min_scale: f64,
    /// Largest allowed view scale
    pub max_scale: f64,
    /// Maximum number of undo entries kept
    pub max_history: usize,
    /// Log verbosity level
    pub log_level: LogLevel,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            number_color: DEFAULT_NUMBER_COLOR,
            square_color: DEFAULT_SQUARE_COLOR,
            zoom_step: 1.1,
            min_scale: 0.05,
            max_scale: 20.0,
            max_history: 100,
            log_level: LogLevel::default(),
        }
    }
}

impl EditorConfig {
    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;

        // Validate version compatibility
        if config.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                file_version: config.version,
                supported_version: CONFIG_VERSION,
            });
        }

        if config.zoom_step.is_nan() || config.zoom_step <= 1.0 {
            return Err(ConfigError::Invalid(format!(
                "zoom_step must be greater than 1, got {}",
                config.zoom_step
            )));
        }
        if config.min_scale.is_nan()
            || config.max_scale.is_nan()
            || config.min_scale <= 0.0
            || config.min_scale > config.max_scale
        {
            return Err(ConfigError::Invalid(format!(
                "scale range {}..{} is empty or not positive",
                config.min_scale, config.max_scale
            )));
        }

        Ok(config)
    }

    /// Load configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Save configuration to a JSON file, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = self.to_json()?;
        std::fs::write(path, json)?;
        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Clamp a view scale into the configured range.
    pub fn clamp_scale(&self, scale: f64) -> f64 {
        scale.max(self.min_scale).min(self.max_scale)
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// JSON parsing error
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Configuration version is newer than supported
    #[error(
        "Configuration file version {file_version} is newer than supported version {supported_version}"
    )]
    VersionTooNew {
        file_version: u32,
        supported_version: u32,
    },

    /// A value is out of its allowed range
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// I/O error when reading/writing config
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
