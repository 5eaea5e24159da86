//! # entity-sync
//!
//! Keeps a normalized, relationally linked record store consistent under
//! concurrent and possibly out-of-order writes.
//!
//! ## Building blocks
//!
//! - [`compile_relation_keys`]: dependency closure of a record type over its
//!   relation declarations (cycle-safe)
//! - [`EntityExtractor`]: projects the dependency slices out of a store and
//!   memoizes the projection on slice identity
//! - [`DiffMerger`]: freshness-gated deep diff producing a record-level
//!   [`WriteSet`] or [`MergeOutcome::NoChange`]
//! - [`EntityReducer`] / [`EntityReducers`]: per-type state transitions for
//!   merge, update, replace, reset and remove
//!
//! ## Composition
//!
//! - [`EntityRegistry`]: registration, validation, and per-type [`Entity`]
//!   handles
//! - [`TreeNormalizer`]: reference implementation of the normalization
//!   boundary

pub mod diff;
pub mod extractor;
pub mod graph;
pub mod normalize;
pub mod reducer;
pub mod registry;
pub mod tracing_setup;

// Re-export public API
pub use diff::{apply_write_set, diff_merge, structurally_equal, DiffMerger, MergeOutcome, WriteSet};
pub use extractor::{make_extractor, EntityExtractor};
pub use graph::{compile_relation_keys, RelationSchema};
pub use normalize::TreeNormalizer;
pub use reducer::{
    create_action, merge_entities, remove_entities, remove_object_in_slice,
    replace_entities, replace_object_in_slice, reset_entities, update_entities, EntityAction,
    EntityReducer, EntityReducers,
};
pub use registry::{Entity, EntityRegistry};
