//! Biscuit configuration module.
//!
//! Provides configuration file support via `biscuit.toml`, environment
//! variables, and defaults.
//!
//! # Priority (highest to lowest)
//!
//! 1. Environment variables (`BISCUIT_*`)
//! 2. Configuration file (`biscuit.toml`)
//! 3. Default values

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to parse configuration sources.
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Invalid configuration value.
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue {
        /// Configuration key that failed validation.
        key: String,
        /// Validation error message.
        message: String,
    },

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Tunables for a Biscuit index instance.
///
/// All fields have sensible defaults; hosts embedding the index can pass
/// `IndexConfig::default()` and never touch this module.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Number of tombstoned slots that triggers batch compaction.
    ///
    /// Compaction removes every tombstoned slot from every bitmap in one
    /// pass; a higher threshold amortizes that pass over more deletes at
    /// the cost of slightly larger bitmaps in between.
    pub tombstone_cleanup_threshold: usize,

    /// Initial capacity reserved for the slot table.
    pub initial_slot_capacity: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            tombstone_cleanup_threshold: 1000,
            initial_slot_capacity: 1024,
        }
    }
}

impl IndexConfig {
    /// Loads configuration from defaults, an optional TOML file, and
    /// `BISCUIT_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a source fails to parse or a value fails
    /// validation.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = config_file {
            figment = figment.merge(Toml::file(path));
        }
        let config: Self = figment
            .merge(Env::prefixed("BISCUIT_"))
            .extract()
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for out-of-range tunables.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tombstone_cleanup_threshold == 0 {
            return Err(ConfigError::InvalidValue {
                key: "tombstone_cleanup_threshold".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
