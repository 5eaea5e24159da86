// Single source of truth for all default values.

use crate::constants;

// --- Sync ---
pub const DEFAULT_FRESHNESS_FIELD: &str = constants::DEFAULT_FRESHNESS_FIELD;
pub const DEFAULT_ID_ATTRIBUTE: &str = constants::DEFAULT_ID_ATTRIBUTE;

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_JSON_LOGS: bool = false;
