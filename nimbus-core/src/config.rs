//! Configuration for NimbusKV
//!
//! This module provides:
//! - Configuration loading from TOML files
//! - Configuration validation and defaults
//!
//! The server binary layers CLI overrides on top of a loaded (or
//! default) configuration.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// NimbusKV server configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Server settings
    pub server: ServerSettings,
    /// Store settings
    pub store: StoreSettings,
    /// Snapshot settings
    pub snapshot: SnapshotSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// HTTP listen address
    pub listen_addr: String,
    /// Worker thread count; `None` selects one per CPU core
    pub worker_threads: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".to_string(),
            worker_threads: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// Number of store shards (power of 2)
    pub num_shards: usize,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self { num_shards: 16 }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct SnapshotSettings {
    /// If set, every snapshot export is also written to this file
    pub persist_path: Option<PathBuf>,
}

/// Errors loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl Config {
    /// Load configuration from a TOML file and validate it
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate settings that would otherwise fail at runtime
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.listen_addr.is_empty() {
            return Err(ConfigError::Invalid("listen_addr must not be empty".into()));
        }
        if self.server.worker_threads == Some(0) {
            return Err(ConfigError::Invalid(
                "worker_threads must be at least 1".into(),
            ));
        }
        if !self.store.num_shards.is_power_of_two() {
            return Err(ConfigError::Invalid(format!(
                "num_shards must be a power of 2, got {}",
                self.store.num_shards
            )));
        }
        Ok(())
    }
}
