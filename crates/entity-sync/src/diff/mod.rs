//! Freshness-gated deep-diff merger.
//!
//! Decides, per record, whether an incoming write must reach the store.
//! Output is record-granular: an included id always carries the full
//! incoming record, never a field patch.

pub mod equality;
pub mod freshness;
pub mod merger;
pub mod write_set;

pub use equality::{records_equal_except, structurally_equal};
pub use freshness::{compare_freshness, is_stale};
pub use merger::{diff_merge, DiffMerger, MergeOutcome};
pub use write_set::{apply_write_set, WriteSet};
