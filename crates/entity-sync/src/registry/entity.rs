//! Per-type handle produced by [`EntityRegistry::init`](super::EntityRegistry::init).

use std::collections::{BTreeMap, BTreeSet};

use entity_core::{EntityConfig, EntityOptions, NormalizedEntities, Record, RecordId, Relations};

use crate::diff::DiffMerger;
use crate::extractor::EntityExtractor;
use crate::reducer::{
    merge_entities, remove_entities, replace_entities, reset_entities, update_entities,
    EntityAction, EntityReducer,
};

/// A registered, validated record type.
#[derive(Debug, Clone)]
pub struct Entity {
    config: EntityConfig,
    dependency_keys: BTreeSet<String>,
    merger: DiffMerger,
}

impl Entity {
    pub(crate) fn new(config: EntityConfig, dependency_keys: BTreeSet<String>, merger: DiffMerger) -> Self {
        Self {
            config,
            dependency_keys,
            merger,
        }
    }

    /// Store key of this record type.
    pub fn key(&self) -> &str {
        &self.config.key
    }

    pub fn relations(&self) -> &Relations {
        &self.config.relations
    }

    pub fn options(&self) -> &EntityOptions {
        &self.config.options
    }

    pub fn id_attribute(&self) -> &str {
        &self.config.options.id_attribute
    }

    /// Dependency closure: this type plus every type reachable through
    /// relations.
    pub fn dependency_keys(&self) -> &BTreeSet<String> {
        &self.dependency_keys
    }

    /// A fresh memoized extractor over the dependency closure.
    pub fn extractor(&self) -> EntityExtractor {
        EntityExtractor::new(self.key(), self.dependency_keys.iter().cloned())
    }

    /// Reducer for this type's slice.
    pub fn reducer(&self) -> EntityReducer {
        EntityReducer::new(
            self.key(),
            self.config.relations.keys().cloned(),
            self.config.options.operations.iter().copied(),
        )
        .with_merger(self.merger.clone())
    }

    pub fn merge(&self, records: BTreeMap<RecordId, Record>) -> EntityAction {
        merge_entities(self.scoped(records))
    }

    pub fn update(&self, records: BTreeMap<RecordId, Record>) -> EntityAction {
        update_entities(self.scoped(records))
    }

    pub fn replace(&self, records: BTreeMap<RecordId, Record>) -> EntityAction {
        replace_entities(self.scoped(records))
    }

    pub fn reset(&self, records: BTreeMap<RecordId, Record>) -> EntityAction {
        reset_entities(self.scoped(records))
    }

    pub fn remove(&self, ids: Vec<RecordId>) -> EntityAction {
        remove_entities(BTreeMap::from([(self.key().to_string(), ids)]))
    }

    fn scoped(&self, records: BTreeMap<RecordId, Record>) -> NormalizedEntities {
        NormalizedEntities::from([(self.key().to_string(), records)])
    }
}
