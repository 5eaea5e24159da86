//! Top-level entity-sync configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{ObservabilityConfig, SyncConfig};
use crate::constants::LOG_LEVELS;
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Environment variables (`ENTITY_SYNC_*`)
/// 2. Config file passed to [`EntitySyncConfig::load`]
/// 3. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EntitySyncConfig {
    pub sync: SyncConfig,
    pub observability: ObservabilityConfig,
}

impl EntitySyncConfig {
    /// Load a config file, apply environment overrides, and validate.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        let mut config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `ENTITY_SYNC_*` environment variables over the current values.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(value) = std::env::var("ENTITY_SYNC_FRESHNESS_FIELD") {
            self.sync.freshness_field = value;
        }
        if let Ok(value) = std::env::var("ENTITY_SYNC_ID_ATTRIBUTE") {
            self.sync.default_id_attribute = value;
        }
        if let Ok(value) = std::env::var("ENTITY_SYNC_LOG_LEVEL") {
            self.observability.log_level = value;
        }
    }

    /// Validate the configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sync.freshness_field.trim().is_empty() {
            return Err(ConfigError::ValidationFailed {
                field: "sync.freshness_field".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        if self.sync.default_id_attribute.trim().is_empty() {
            return Err(ConfigError::ValidationFailed {
                field: "sync.default_id_attribute".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        let level = self.observability.log_level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::ValidationFailed {
                field: "observability.log_level".to_string(),
                message: format!("must be one of {}", LOG_LEVELS.join(", ")),
            });
        }
        Ok(())
    }
}
