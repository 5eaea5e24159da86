/// entity-sync version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Attribute that identifies a record unless the type overrides it.
pub const DEFAULT_ID_ATTRIBUTE: &str = "id";

/// Per-record freshness marker consulted by merge and update.
pub const DEFAULT_FRESHNESS_FIELD: &str = "requested_at";

// Wire names of the five entity operations.
pub const MERGE_ENTITIES: &str = "MERGE_ENTITIES";
pub const UPDATE_ENTITIES: &str = "UPDATE_ENTITIES";
pub const REPLACE_ENTITIES: &str = "REPLACE_ENTITIES";
pub const RESET_ENTITIES: &str = "RESET_ENTITIES";
pub const REMOVE_ENTITIES: &str = "REMOVE_ENTITIES";

/// Log levels accepted by the observability config.
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
