//! The diff gate applied by merge and update.
//!
//! For every incoming record:
//! 1. Malformed (not an object, or no id attribute): skipped, siblings go on.
//! 2. Unknown to the store: included in full.
//! 3. Freshness marker strictly older than the stored one: rejected,
//!    whatever its fields say.
//! 4. Otherwise included in full iff it differs structurally from the
//!    stored record, the marker itself aside. A newer marker alone never
//!    forces a write, and a tie with different data is included.
//!
//! Nested values that look like freshness markers are ordinary data here;
//! only the top-level marker gates acceptance.
//!
//! # Examples
//!
//! ```
//! use entity_core::models::store::entities_from_value;
//! use entity_core::EntityStore;
//! use entity_sync::{diff_merge, MergeOutcome};
//! use serde_json::json;
//!
//! let store = EntityStore::from_value(&json!({
//!     "pencils": { "1": { "id": 1, "requested_at": 2 } }
//! })).unwrap();
//!
//! let stale = entities_from_value(&json!({
//!     "pencils": { "1": { "id": 1, "requested_at": 1, "colors": "blue" } }
//! })).unwrap();
//! assert_eq!(diff_merge(&stale, &store), MergeOutcome::NoChange);
//!
//! let fresh = entities_from_value(&json!({
//!     "pencils": { "1": { "id": 1, "requested_at": 3, "colors": "blue" } }
//! })).unwrap();
//! assert!(diff_merge(&fresh, &store).write_set().is_some());
//! ```

use std::collections::BTreeMap;

use entity_core::config::SyncConfig;
use entity_core::errors::RecordError;
use entity_core::{EntityStore, EntityTable, NormalizedEntities, Record, RecordId};

use super::equality::records_equal_except;
use super::freshness::is_stale;
use super::write_set::WriteSet;
use crate::tracing_setup::events;

/// Result of a diff pass.
#[derive(Debug, Clone, PartialEq)]
pub enum MergeOutcome {
    /// Nothing in the payload would change the store.
    NoChange,
    /// The records to write. Never empty.
    Changed(WriteSet),
}

impl MergeOutcome {
    pub fn is_no_change(&self) -> bool {
        matches!(self, MergeOutcome::NoChange)
    }

    pub fn write_set(&self) -> Option<&WriteSet> {
        match self {
            MergeOutcome::NoChange => None,
            MergeOutcome::Changed(write_set) => Some(write_set),
        }
    }

    pub fn into_write_set(self) -> Option<WriteSet> {
        match self {
            MergeOutcome::NoChange => None,
            MergeOutcome::Changed(write_set) => Some(write_set),
        }
    }
}

/// Stateless, configurable diff gate.
#[derive(Debug, Clone)]
pub struct DiffMerger {
    freshness_field: String,
    default_id_attribute: String,
    id_attributes: BTreeMap<String, String>,
}

impl Default for DiffMerger {
    fn default() -> Self {
        Self::new(&SyncConfig::default())
    }
}

impl DiffMerger {
    pub fn new(config: &SyncConfig) -> Self {
        Self {
            freshness_field: config.freshness_field.clone(),
            default_id_attribute: config.default_id_attribute.clone(),
            id_attributes: BTreeMap::new(),
        }
    }

    /// Use `id_attribute` for records of type `key`.
    pub fn with_id_attribute(mut self, key: impl Into<String>, id_attribute: impl Into<String>) -> Self {
        self.id_attributes.insert(key.into(), id_attribute.into());
        self
    }

    pub fn freshness_field(&self) -> &str {
        &self.freshness_field
    }

    pub fn id_attribute(&self, key: &str) -> &str {
        self.id_attributes
            .get(key)
            .map(String::as_str)
            .unwrap_or(&self.default_id_attribute)
    }

    /// Diff a whole payload against the current store.
    pub fn diff(&self, incoming: &NormalizedEntities, current: &EntityStore) -> MergeOutcome {
        let mut write_set = WriteSet::new();
        for (key, records) in incoming {
            let table = current.slice(key).map(|table| &**table);
            self.diff_into(key, records, table, &mut write_set);
        }
        let submitted = incoming.values().map(BTreeMap::len).sum();
        Self::finish(write_set, submitted)
    }

    /// Diff one type's records against that type's current slice.
    pub fn diff_table(
        &self,
        key: &str,
        incoming: &BTreeMap<RecordId, Record>,
        current: Option<&EntityTable>,
    ) -> MergeOutcome {
        let mut write_set = WriteSet::new();
        self.diff_into(key, incoming, current, &mut write_set);
        Self::finish(write_set, incoming.len())
    }

    fn finish(write_set: WriteSet, submitted: usize) -> MergeOutcome {
        events::write_set_computed(submitted, write_set.len());
        if write_set.is_empty() {
            MergeOutcome::NoChange
        } else {
            MergeOutcome::Changed(write_set)
        }
    }

    fn diff_into(
        &self,
        key: &str,
        incoming: &BTreeMap<RecordId, Record>,
        current: Option<&EntityTable>,
        write_set: &mut WriteSet,
    ) {
        for (id, record) in incoming {
            if let Err(err) = self.check_record(key, id, record) {
                events::malformed_record_skipped(key, id.as_str(), &err.to_string());
                continue;
            }

            let Some(existing) = current.and_then(|table| table.get(id)) else {
                write_set.insert(key, id.clone(), record.clone());
                continue;
            };

            let field = self.freshness_field.as_str();
            if is_stale(record.get(field), existing.get(field)) {
                events::stale_write_rejected(key, id.as_str());
                continue;
            }

            if !records_equal_except(record, existing, field) {
                write_set.insert(key, id.clone(), record.clone());
            }
        }
    }

    fn check_record(&self, key: &str, id: &RecordId, record: &Record) -> Result<(), RecordError> {
        if !record.is_object() {
            return Err(RecordError::NotAnObject {
                entity: key.to_string(),
                id: id.to_string(),
            });
        }
        let id_attribute = self.id_attribute(key);
        if RecordId::of_record(record, id_attribute).is_none() {
            return Err(RecordError::MissingIdAttribute {
                entity: key.to_string(),
                id_attribute: id_attribute.to_string(),
            });
        }
        Ok(())
    }
}

/// Diff with the default freshness field and id attribute.
pub fn diff_merge(incoming: &NormalizedEntities, current: &EntityStore) -> MergeOutcome {
    DiffMerger::default().diff(incoming, current)
}
