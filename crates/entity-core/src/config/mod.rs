//! Configuration system for entity-sync.
//! TOML-based, environment overrides on top of file values and defaults.

pub mod defaults;
pub mod entity_sync_config;
pub mod observability_config;
pub mod sync_config;

pub use entity_sync_config::EntitySyncConfig;
pub use observability_config::ObservabilityConfig;
pub use sync_config::SyncConfig;
