//! Structured log events for key sync operations.
//!
//! Each function emits a `tracing` event with structured fields.

/// Log that tracing init found a host subscriber and kept it.
pub fn subscriber_already_installed(reason: &str) {
    tracing::debug!(
        event = "subscriber_already_installed",
        reason = %reason,
        "global subscriber already set, keeping the host's"
    );
}

/// Log an entity registration.
pub fn entity_registered(key: &str, relation_count: usize) {
    tracing::debug!(
        event = "entity_registered",
        entity = %key,
        relation_count = relation_count,
        "entity registered"
    );
}

/// Log a completed registry initialization.
pub fn registry_initialized(entity_count: usize) {
    tracing::info!(
        event = "registry_initialized",
        entity_count = entity_count,
        "entity registry initialized"
    );
}

/// Log a write rejected because its freshness marker is older than the
/// stored record's.
pub fn stale_write_rejected(entity: &str, id: &str) {
    tracing::debug!(
        event = "stale_write_rejected",
        entity = %entity,
        id = %id,
        "stale write rejected"
    );
}

/// Log a record skipped during a diff pass.
pub fn malformed_record_skipped(entity: &str, id: &str, reason: &str) {
    tracing::warn!(
        event = "malformed_record_skipped",
        entity = %entity,
        id = %id,
        reason = %reason,
        "malformed record skipped"
    );
}

/// Log the size of a computed write-set.
pub fn write_set_computed(submitted: usize, included: usize) {
    tracing::trace!(
        event = "write_set_computed",
        submitted = submitted,
        included = included,
        "write-set computed"
    );
}

/// Log an extractor cache miss.
pub fn extractor_recomputed(root: &str, slices: usize, recomputations: u64) {
    tracing::trace!(
        event = "extractor_recomputed",
        root = %root,
        slices = slices,
        recomputations = recomputations,
        "extractor projection rebuilt"
    );
}

/// Log a reducer producing a new slice.
pub fn slice_written(entity: &str, operation: &str, records: usize) {
    tracing::debug!(
        event = "slice_written",
        entity = %entity,
        operation = %operation,
        records = records,
        "entity slice written"
    );
}
