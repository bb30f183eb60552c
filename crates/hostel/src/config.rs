//! Configuration management for the hostel ledger.
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
use crate::room::RoomCatalog;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "hostel";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "students.db";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `HOSTEL_`, `__` between sections)
/// 2. TOML config file at `~/.config/hostel/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory storage configuration.
    pub storage: StorageConfig,
    /// Room catalog configuration.
    pub catalog: CatalogConfig,
    /// Assignment rules.
    pub assignment: AssignmentConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the student directory database.
    /// Defaults to `~/.local/share/hostel/students.db`
    pub database_path: Option<PathBuf>,
}

/// The room catalog, described as a single block of numbered rooms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Block prefix, e.g. `A`.
    pub block: String,
    /// Number of the first room in the block.
    pub first_number: u32,
    /// How many rooms the block has.
    pub room_count: u32,
    /// Beds in every room.
    pub beds_per_room: u32,
}

/// Assignment rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssignmentConfig {
    /// Reject assignments to rooms with no free bed.
    ///
    /// Off by default, in which case capacity is only reported, not enforced.
    pub enforce_capacity: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            block: "A".to_string(),
            first_number: 101,
            room_count: 10,
            beds_per_room: 4,
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
            .merge(Env::prefixed("HOSTEL_").split("__"));

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
        let catalog = &self.catalog;

        if catalog.block.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "catalog.block must not be empty".to_string(),
            });
        }

        if catalog.room_count == 0 {
            return Err(Error::ConfigValidation {
                message: "catalog.room_count must be greater than 0".to_string(),
            });
        }

        if catalog.beds_per_room == 0 {
            return Err(Error::ConfigValidation {
                message: "catalog.beds_per_room must be greater than 0".to_string(),
            });
        }

        if catalog.first_number.checked_add(catalog.room_count - 1).is_none() {
            return Err(Error::ConfigValidation {
                message: format!(
                    "catalog numbering overflows: {} rooms from {}",
                    catalog.room_count, catalog.first_number
                ),
            });
        }

        Ok(())
    }

    /// Build the room catalog described by this configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigValidation` if the catalog settings are invalid.
    pub fn room_catalog(&self) -> Result<RoomCatalog> {
        self.validate()?;
        RoomCatalog::block(
            self.catalog.block.trim(),
            self.catalog.first_number,
            self.catalog.room_count,
            self.catalog.beds_per_room,
        )
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
