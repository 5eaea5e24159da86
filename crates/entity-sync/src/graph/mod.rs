//! Relation graph compiler.
//!
//! Turns per-type relation declarations into the set of record types a
//! type transitively depends on.

pub mod relation_graph;

pub use relation_graph::{compile_relation_keys, RelationSchema};
