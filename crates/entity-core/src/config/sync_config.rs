use serde::{Deserialize, Serialize};

use super::defaults;

/// Merge/update gate configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Record attribute holding the freshness marker.
    pub freshness_field: String,
    /// Id attribute for entities that do not declare their own.
    pub default_id_attribute: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            freshness_field: defaults::DEFAULT_FRESHNESS_FIELD.to_string(),
            default_id_attribute: defaults::DEFAULT_ID_ATTRIBUTE.to_string(),
        }
    }
}
