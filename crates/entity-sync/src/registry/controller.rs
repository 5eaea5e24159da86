//! The entity registry: collects registrations, validates the relation
//! graph, and hands out reducers, extractors and normalization.
//!
//! # Examples
//!
//! ```
//! use entity_core::{has_many, has_one, Relations};
//! use entity_sync::EntityRegistry;
//! use serde_json::json;
//!
//! let mut registry = EntityRegistry::new();
//! registry
//!     .register("books", Relations::from([("author".to_string(), has_one("authors"))]), None)
//!     .unwrap()
//!     .register("authors", Relations::from([("books".to_string(), has_many("books"))]), None)
//!     .unwrap();
//! registry.init().unwrap();
//!
//! let books = registry.entity("books").unwrap();
//! assert_eq!(books.dependency_keys().len(), 2);
//!
//! let normalized = registry
//!     .normalize("books", &json!([{ "id": 1, "author": { "id": 7, "name": "A" } }]))
//!     .unwrap();
//! assert_eq!(normalized.result, json!([1]));
//! ```

use std::collections::BTreeMap;

use serde_json::Value;

use entity_core::config::SyncConfig;
use entity_core::errors::{ConfigurationError, EntityResult};
use entity_core::{EntityConfig, EntityOptions, EntityStore, Normalized, Normalizer, RecordId, Relations};

use super::entity::Entity;
use crate::diff::DiffMerger;
use crate::graph::{compile_relation_keys, RelationSchema};
use crate::normalize::TreeNormalizer;
use crate::reducer::{EntityReducer, EntityReducers};
use crate::tracing_setup::events;

/// Registry of record types.
///
/// Registration order is free: relations may name types registered later.
/// Targets are checked by [`init`](Self::init), which must run (again) after
/// the last registration before entities can be looked up.
#[derive(Debug, Default)]
pub struct EntityRegistry {
    config: SyncConfig,
    configs: BTreeMap<String, EntityConfig>,
    entities: BTreeMap<String, Entity>,
    schema: RelationSchema,
    initialized: bool,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SyncConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Register `key` with its relations. `None` options take the
    /// configured default id attribute and all five operations.
    /// Re-registering a key replaces the earlier declaration.
    pub fn register(
        &mut self,
        key: impl Into<String>,
        relations: Relations,
        options: Option<EntityOptions>,
    ) -> EntityResult<&mut Self> {
        let options = options.unwrap_or_else(|| {
            EntityOptions::default().with_id_attribute(self.config.default_id_attribute.clone())
        });
        self.register_entity(EntityConfig {
            key: key.into(),
            relations,
            options,
        })
    }

    pub fn register_entity(&mut self, config: EntityConfig) -> EntityResult<&mut Self> {
        if config.key.trim().is_empty() {
            return Err(ConfigurationError::EmptyKey.into());
        }
        events::entity_registered(&config.key, config.relations.len());
        self.configs.insert(config.key.clone(), config);
        self.initialized = false;
        Ok(self)
    }

    /// Validate every relation and compile each type's dependency closure.
    pub fn init(&mut self) -> EntityResult<()> {
        let schema = RelationSchema::from_configs(self.configs.values());
        schema.validate()?;

        let merger = self.merger();
        let mut entities = BTreeMap::new();
        for (key, config) in &self.configs {
            let dependency_keys = compile_relation_keys(&schema, key)?;
            entities.insert(
                key.clone(),
                Entity::new(config.clone(), dependency_keys, merger.clone()),
            );
        }

        self.schema = schema;
        self.entities = entities;
        self.initialized = true;
        events::registry_initialized(self.entities.len());
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Handle for `key`. Requires [`init`](Self::init).
    pub fn entity(&self, key: &str) -> EntityResult<&Entity> {
        if !self.initialized {
            return Err(ConfigurationError::NotInitialized.into());
        }
        self.entities.get(key).ok_or_else(|| {
            ConfigurationError::UnknownEntity {
                key: key.to_string(),
            }
            .into()
        })
    }

    /// Validated relation schema; empty before the first `init`.
    pub fn schema(&self) -> &RelationSchema {
        &self.schema
    }

    /// Registration of `key`, initialized or not.
    pub fn config(&self, key: &str) -> Option<&EntityConfig> {
        self.configs.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.configs.keys().map(String::as_str)
    }

    pub fn sync_config(&self) -> &SyncConfig {
        &self.config
    }

    /// Diff gate honouring every registered id attribute.
    pub fn merger(&self) -> DiffMerger {
        self.configs.values().fold(DiffMerger::new(&self.config), |merger, config| {
            merger.with_id_attribute(config.key.clone(), config.options.id_attribute.clone())
        })
    }

    /// One reducer per registered type. Does not require `init`.
    pub fn all_reducers(&self) -> EntityReducers {
        let merger = self.merger();
        self.configs
            .values()
            .map(|config| {
                EntityReducer::new(
                    config.key.clone(),
                    config.relations.keys().cloned(),
                    config.options.operations.iter().copied(),
                )
                .with_merger(merger.clone())
            })
            .collect()
    }

    pub fn normalizer(&self) -> TreeNormalizer {
        TreeNormalizer::new(self.configs.values().cloned())
    }

    pub fn normalize(&self, key: &str, data: &Value) -> EntityResult<Normalized> {
        self.normalizer().normalize(key, data)
    }

    pub fn denormalize(
        &self,
        key: &str,
        store: &EntityStore,
        ids: Option<&[RecordId]>,
    ) -> EntityResult<Value> {
        self.normalizer().denormalize(key, store, ids)
    }
}
