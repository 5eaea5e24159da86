//! The flat by-type, by-id store and the payload shape written into it.
//!
//! Slices are shared behind `Arc`. A write builds a new table and a new
//! store that reuses every untouched slice, so "did this slice change?" is
//! answered by `Arc::ptr_eq` rather than by walking records.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::{Map, Value};

use super::RecordId;
use crate::errors::{EntityResult, RecordError};

/// A record: a JSON object of attribute name to value.
pub type Record = Value;

/// All records of one type, keyed by id.
pub type EntityTable = BTreeMap<RecordId, Arc<Record>>;

/// Incoming payload: record type → id → record.
pub type NormalizedEntities = BTreeMap<String, BTreeMap<RecordId, Record>>;

/// Record type → slice. Cloning is shallow.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityStore {
    slices: BTreeMap<String, Arc<EntityTable>>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_slices(slices: impl IntoIterator<Item = (String, Arc<EntityTable>)>) -> Self {
        Self {
            slices: slices.into_iter().collect(),
        }
    }

    /// Build a store owning `entities`.
    pub fn from_entities(entities: NormalizedEntities) -> Self {
        Self {
            slices: entities
                .into_iter()
                .map(|(key, records)| (key, Arc::new(table_from_records(records))))
                .collect(),
        }
    }

    /// Parse `{ type: { id: record } }`.
    pub fn from_value(value: &Value) -> EntityResult<Self> {
        Ok(Self::from_entities(entities_from_value(value)?))
    }

    pub fn to_value(&self) -> Value {
        let mut out = Map::new();
        for (key, table) in &self.slices {
            out.insert(key.clone(), table_to_value(table));
        }
        Value::Object(out)
    }

    pub fn slice(&self, key: &str) -> Option<&Arc<EntityTable>> {
        self.slices.get(key)
    }

    pub fn record(&self, key: &str, id: &RecordId) -> Option<&Arc<Record>> {
        self.slices.get(key).and_then(|table| table.get(id))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.slices.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.slices.keys().map(String::as_str)
    }

    pub fn slices(&self) -> impl Iterator<Item = (&str, &Arc<EntityTable>)> {
        self.slices.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of record types present.
    pub fn len(&self) -> usize {
        self.slices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    /// Total records across all slices.
    pub fn record_count(&self) -> usize {
        self.slices.values().map(|table| table.len()).sum()
    }

    /// Copy of this store with `key` pointing at `table`.
    pub fn with_slice(&self, key: impl Into<String>, table: Arc<EntityTable>) -> Self {
        let mut next = self.clone();
        next.slices.insert(key.into(), table);
        next
    }

    /// Copy of this store without `key`.
    pub fn without_slice(&self, key: &str) -> Self {
        let mut next = self.clone();
        next.slices.remove(key);
        next
    }

    /// In-place slice replacement, for building a store that is not yet shared.
    pub fn insert_slice(&mut self, key: impl Into<String>, table: Arc<EntityTable>) {
        self.slices.insert(key.into(), table);
    }
}

/// Wrap owned records into a table.
pub fn table_from_records(records: BTreeMap<RecordId, Record>) -> EntityTable {
    records
        .into_iter()
        .map(|(id, record)| (id, Arc::new(record)))
        .collect()
}

pub fn table_to_value(table: &EntityTable) -> Value {
    let mut out = Map::new();
    for (id, record) in table {
        out.insert(id.to_string(), record.as_ref().clone());
    }
    Value::Object(out)
}

/// Parse `{ type: { id: record } }` into a payload.
pub fn entities_from_value(value: &Value) -> EntityResult<NormalizedEntities> {
    let types = value.as_object().ok_or_else(|| RecordError::InvalidPayload {
        reason: "entities must be an object keyed by record type".to_string(),
    })?;

    let mut entities = NormalizedEntities::new();
    for (key, records) in types {
        let records = records
            .as_object()
            .ok_or_else(|| RecordError::InvalidPayload {
                reason: format!("entities.{key} must be an object keyed by id"),
            })?;
        let table = records
            .iter()
            .map(|(id, record)| (RecordId::from(id.as_str()), record.clone()))
            .collect();
        entities.insert(key.clone(), table);
    }
    Ok(entities)
}

pub fn entities_to_value(entities: &NormalizedEntities) -> Value {
    let mut out = Map::new();
    for (key, records) in entities {
        let mut table = Map::new();
        for (id, record) in records {
            table.insert(id.to_string(), record.clone());
        }
        out.insert(key.clone(), Value::Object(table));
    }
    Value::Object(out)
}
