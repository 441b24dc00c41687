//! Configuration file loading and parsing.
//!
//! This module handles loading the configuration file from disk and
//! parsing it into validated, type-safe structures.
//!
//! # Configuration File Locations
//!
//! The configuration file is searched in the following order:
//!
//! 1. Path specified via the CLI
//! 2. Default location:
//!    - **Linux/macOS:** `~/.workbench-mcp/config.json`
//!    - **Windows:** `%USERPROFILE%\.workbench-mcp\config.json`
//!
//! An explicitly specified path must exist. If the default path does
//! not exist the built-in defaults are used instead, so the server can
//! run with no configuration file at all.

mod settings;

pub use settings::{Config, LoggingConfig, ServerSettings};

use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Returns the default configuration directory.
///
/// - **Linux/macOS:** `~/.workbench-mcp/`
/// - **Windows:** `%USERPROFILE%\.workbench-mcp\`
#[must_use]
pub fn default_config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|p| p.join(".workbench-mcp"))
}

/// Returns the platform-specific default configuration file path.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    default_config_dir().map(|p| p.join("config.json"))
}

/// Loads and parses the configuration file.
///
/// If `path` is `None`, uses the platform-specific default location,
/// falling back to [`Config::default`] when no file exists there.
///
/// # Errors
///
/// Returns an error if:
/// - An explicitly specified file does not exist or cannot be read
/// - The JSON is malformed
/// - Fields fail validation
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(ConfigError::NotFound {
                    path: p.to_path_buf(),
                });
            }
            p.to_path_buf()
        }
        None => {
            let Some(default_path) = default_config_path() else {
                return Ok(Config::default());
            };
            if !default_path.exists() {
                return Ok(Config::default());
            }
            default_path
        }
    };

    load_config_file(&config_path)
}

/// Reads and parses one configuration file.
fn load_config_file(config_path: &Path) -> Result<Config, ConfigError> {
    let contents = std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
        path: config_path.to_path_buf(),
        source: e,
    })?;

    let config: Config = serde_json::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: config_path.to_path_buf(),
        source: e,
    })?;

    config.validate()?;

    Ok(config)
}
