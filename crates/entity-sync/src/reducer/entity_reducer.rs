//! Per-type state transitions.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use entity_core::models::store::entities_from_value;
//! use entity_core::Operation;
//! use entity_sync::{merge_entities, EntityReducer};
//! use serde_json::json;
//!
//! let reducer = EntityReducer::new("pencils", Vec::<String>::new(), Operation::ALL);
//! let action = merge_entities(entities_from_value(&json!({
//!     "pencils": { "1": { "id": 1, "requested_at": 1 } }
//! })).unwrap());
//!
//! let state = reducer.reduce(None, &action);
//! assert_eq!(state.len(), 1);
//!
//! // Re-applying the same payload changes nothing, by reference.
//! let again = reducer.reduce(Some(&state), &action);
//! assert!(Arc::ptr_eq(&state, &again));
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use entity_core::models::store::table_from_records;
use entity_core::{EntityTable, NormalizedEntities, Operation, RecordId};

use super::action::EntityAction;
use crate::diff::write_set::merge_records;
use crate::diff::DiffMerger;
use crate::tracing_setup::events;

/// Reducer for one record type's slice.
#[derive(Debug, Clone)]
pub struct EntityReducer {
    key: String,
    relation_fields: Vec<String>,
    operations: BTreeSet<Operation>,
    merger: DiffMerger,
}

impl EntityReducer {
    pub fn new<I, S>(
        key: impl Into<String>,
        relation_fields: I,
        operations: impl IntoIterator<Item = Operation>,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            key: key.into(),
            relation_fields: relation_fields.into_iter().map(Into::into).collect(),
            operations: operations.into_iter().collect(),
            merger: DiffMerger::default(),
        }
    }

    /// Gate merge and update through `merger` instead of the default one.
    pub fn with_merger(mut self, merger: DiffMerger) -> Self {
        self.merger = merger;
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Field names of the type's relation declarations.
    pub fn relation_fields(&self) -> &[String] {
        &self.relation_fields
    }

    pub fn handles(&self, operation: Operation) -> bool {
        self.operations.contains(&operation)
    }

    /// State of a slice that has never been written.
    pub fn initial_state() -> Arc<EntityTable> {
        Arc::new(EntityTable::new())
    }

    /// Apply `action` to `state` (`None` means uninitialized).
    ///
    /// Returns the same `Arc` when nothing changed: unknown actions,
    /// operations outside this reducer's set, payloads that do not name
    /// this type, and merges/updates the diff gate turns into no-ops.
    pub fn reduce(&self, state: Option<&Arc<EntityTable>>, action: &EntityAction) -> Arc<EntityTable> {
        let state = state.cloned().unwrap_or_else(Self::initial_state);
        let Some(operation) = action.operation() else {
            return state;
        };
        if !self.handles(operation) {
            return state;
        }

        let next = match action {
            EntityAction::Merge { entities } | EntityAction::Update { entities } => {
                self.merge(&state, entities)
            }
            EntityAction::Replace { entities } => self.replace(&state, entities),
            EntityAction::Reset { entities } => self.reset(entities),
            EntityAction::Remove { ids } => self.remove(&state, ids),
            EntityAction::Other { .. } => None,
        };

        match next {
            Some(table) => {
                events::slice_written(&self.key, operation.action_type(), table.len());
                Arc::new(table)
            }
            None => state,
        }
    }

    fn merge(&self, state: &EntityTable, entities: &NormalizedEntities) -> Option<EntityTable> {
        let incoming = entities.get(&self.key)?;
        let write_set = self
            .merger
            .diff_table(&self.key, incoming, Some(state))
            .into_write_set()?;
        let records = write_set.into_entities().remove(&self.key)?;
        Some(merge_records(Some(state), records))
    }

    fn replace(&self, state: &EntityTable, entities: &NormalizedEntities) -> Option<EntityTable> {
        let incoming = entities.get(&self.key)?;
        if incoming.is_empty() {
            return None;
        }
        Some(merge_records(Some(state), incoming.clone()))
    }

    fn reset(&self, entities: &NormalizedEntities) -> Option<EntityTable> {
        let incoming = entities.get(&self.key)?;
        Some(table_from_records(incoming.clone()))
    }

    fn remove(
        &self,
        state: &EntityTable,
        ids: &BTreeMap<String, Vec<RecordId>>,
    ) -> Option<EntityTable> {
        let ids = ids.get(&self.key)?;
        if !ids.iter().any(|id| state.contains_key(id)) {
            return None;
        }
        let mut table = state.clone();
        for id in ids {
            table.remove(id);
        }
        Some(table)
    }
}
