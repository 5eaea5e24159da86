use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;

use entity_core::models::store::entities_to_value;
use entity_core::{EntityStore, EntityTable, NormalizedEntities, Record, RecordId};

/// Records that must actually change the store, by type and id.
///
/// A type is present only if at least one of its records is included.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteSet {
    entries: NormalizedEntities,
}

impl WriteSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: &str, id: RecordId, record: Record) {
        self.entries
            .entry(key.to_string())
            .or_default()
            .insert(id, record);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of records across all types.
    pub fn len(&self) -> usize {
        self.entries.values().map(BTreeMap::len).sum()
    }

    pub fn entity_keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn table(&self, key: &str) -> Option<&BTreeMap<RecordId, Record>> {
        self.entries.get(key)
    }

    pub fn record(&self, key: &str, id: &RecordId) -> Option<&Record> {
        self.entries.get(key).and_then(|records| records.get(id))
    }

    pub fn contains(&self, key: &str, id: &RecordId) -> bool {
        self.record(key, id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeMap<RecordId, Record>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn into_entities(self) -> NormalizedEntities {
        self.entries
    }

    pub fn to_value(&self) -> Value {
        entities_to_value(&self.entries)
    }
}

/// Shallow-merge `write_set` into a copy of `store`. Slices without
/// entries in the write-set are shared, not copied.
pub fn apply_write_set(store: &EntityStore, write_set: &WriteSet) -> EntityStore {
    let mut next = store.clone();
    for (key, records) in write_set.iter() {
        let table = merge_records(
            store.slice(key).map(|table| &**table),
            records
                .iter()
                .map(|(id, record)| (id.clone(), record.clone())),
        );
        next.insert_slice(key, Arc::new(table));
    }
    next
}

/// New table holding `base` overlaid with `records`.
pub(crate) fn merge_records(
    base: Option<&EntityTable>,
    records: impl IntoIterator<Item = (RecordId, Record)>,
) -> EntityTable {
    let mut table = base.cloned().unwrap_or_default();
    for (id, record) in records {
        table.insert(id, Arc::new(record));
    }
    table
}
