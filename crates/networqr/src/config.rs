//! Configuration management for networqr.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::payload::PhonePolicy;
use crate::render::{parse_hex_color, RenderOptions};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "networqr";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "contact.db";

/// Largest accepted quiet zone, in modules.
const MAX_MARGIN: u32 = 32;

/// Largest accepted output width, in pixels.
const MAX_WIDTH: u32 = 8192;

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `NETWORQR_`, nested with `__`)
/// 2. TOML config file at `~/.config/networqr/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// QR rendering configuration.
    pub render: RenderOptions,
    /// Contact form rules.
    pub contact: ContactConfig,
    /// Output configuration.
    pub output: OutputConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/networqr/contact.db`
    pub database_path: Option<PathBuf>,
}

/// Contact form rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactConfig {
    /// Treat the phone number as a required field.
    pub require_phone: bool,
    /// What to do with phone numbers that contain no digits.
    pub phone_policy: PhonePolicy,
}

/// Output-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory PNG files are written to.
    pub directory: PathBuf,
    /// Base of the shareable link built from the transfer parameters.
    pub link_base: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("networqr-codes"),
            link_base: "/my-qr".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("NETWORQR_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        let render = &self.render;

        if render.width == 0 || render.width > MAX_WIDTH {
            return Err(Error::ConfigValidation {
                message: format!(
                    "render.width must be between 1 and {MAX_WIDTH}, got {}",
                    render.width
                ),
            });
        }

        if render.margin > MAX_MARGIN {
            return Err(Error::ConfigValidation {
                message: format!(
                    "render.margin must be at most {MAX_MARGIN}, got {}",
                    render.margin
                ),
            });
        }

        for (name, color) in [("dark", &render.dark), ("light", &render.light)] {
            if let Err(e) = parse_hex_color(color) {
                return Err(Error::ConfigValidation {
                    message: format!("render.{name}: {e}"),
                });
            }
        }

        if self.output.link_base.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "output.link_base must not be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }
}
