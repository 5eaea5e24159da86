//! # entity-core
//!
//! Foundation crate for entity-sync.
//! Defines record, store and relation types, errors, config, constants,
//! and the normalization boundary trait. Every other crate in the
//! workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::EntitySyncConfig;
pub use errors::{EntityError, EntityResult};
pub use models::{
    has_many, has_one, Cardinality, EntityConfig, EntityOptions, EntityStore, EntityTable,
    NormalizedEntities, Operation, ProcessStrategy, Record, RecordId, Relation, Relations,
};
pub use traits::{Normalized, Normalizer};
