//! Nested ⇄ flat conversion driven by relation declarations.
//!
//! `has_one` fields holding an object are replaced by that object's id;
//! `has_many` fields holding an array have each object element replaced by
//! its id. Values that are already ids are left alone. Denormalization
//! walks the same declarations in reverse and stops at the first record
//! already on the current path, leaving its id in place.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;

use entity_core::errors::{ConfigurationError, EntityResult, RecordError};
use entity_core::{
    Cardinality, EntityConfig, EntityStore, NormalizedEntities, Normalized, Normalizer, RecordId,
};

/// Normalizer over a fixed set of entity registrations.
#[derive(Debug, Clone, Default)]
pub struct TreeNormalizer {
    configs: BTreeMap<String, EntityConfig>,
}

impl TreeNormalizer {
    pub fn new(configs: impl IntoIterator<Item = EntityConfig>) -> Self {
        Self {
            configs: configs
                .into_iter()
                .map(|config| (config.key.clone(), config))
                .collect(),
        }
    }

    fn config(&self, key: &str) -> EntityResult<&EntityConfig> {
        self.configs.get(key).ok_or_else(|| {
            ConfigurationError::UnknownEntity {
                key: key.to_string(),
            }
            .into()
        })
    }

    /// Flatten one record into `entities`, returning its id value.
    fn normalize_record(
        &self,
        key: &str,
        raw: &Value,
        entities: &mut NormalizedEntities,
    ) -> EntityResult<Value> {
        let config = self.config(key)?;
        let mut record = match &config.options.process_strategy {
            Some(strategy) => strategy.apply(raw.clone()),
            None => raw.clone(),
        };
        let id_attribute = config.options.id_attribute.as_str();

        let Value::Object(fields) = &mut record else {
            return Err(RecordError::NotAnObject {
                entity: key.to_string(),
                id: "<unknown>".to_string(),
            }
            .into());
        };

        let missing_id = || RecordError::MissingIdAttribute {
            entity: key.to_string(),
            id_attribute: id_attribute.to_string(),
        };
        let id_value = fields.get(id_attribute).cloned().ok_or_else(missing_id)?;
        let id = RecordId::from_value(&id_value).ok_or_else(missing_id)?;

        for (field, relation) in &config.relations {
            let Some(nested) = fields.get_mut(field) else {
                continue;
            };
            match relation.cardinality {
                Cardinality::One => {
                    if nested.is_object() {
                        let reference = self.normalize_record(&relation.target, nested, entities)?;
                        *nested = reference;
                    }
                }
                Cardinality::Many => {
                    if let Value::Array(items) = nested {
                        for item in items.iter_mut() {
                            if item.is_object() {
                                let reference =
                                    self.normalize_record(&relation.target, item, entities)?;
                                *item = reference;
                            }
                        }
                    }
                }
            }
        }

        let table = entities.entry(key.to_string()).or_default();
        match table.get_mut(&id) {
            Some(Value::Object(existing)) => {
                if let Value::Object(fields) = record {
                    existing.extend(fields);
                }
            }
            _ => {
                table.insert(id, record);
            }
        }
        Ok(id_value)
    }

    fn denormalize_record(
        &self,
        key: &str,
        id: &RecordId,
        store: &EntityStore,
        path: &mut BTreeSet<(String, RecordId)>,
    ) -> Option<Value> {
        let record = store.record(key, id)?;
        let config = self.configs.get(key)?;
        let visit = (key.to_string(), id.clone());
        if !path.insert(visit.clone()) {
            return None;
        }

        let mut out = record.as_ref().clone();
        if let Value::Object(fields) = &mut out {
            for (field, relation) in &config.relations {
                let Some(value) = fields.get_mut(field) else {
                    continue;
                };
                match relation.cardinality {
                    Cardinality::One => {
                        if let Some(nested) = self.expand(&relation.target, value, store, path) {
                            *value = nested;
                        }
                    }
                    Cardinality::Many => {
                        if let Value::Array(items) = value {
                            for item in items.iter_mut() {
                                if let Some(nested) = self.expand(&relation.target, item, store, path)
                                {
                                    *item = nested;
                                }
                            }
                        }
                    }
                }
            }
        }

        path.remove(&visit);
        Some(out)
    }

    fn expand(
        &self,
        target: &str,
        reference: &Value,
        store: &EntityStore,
        path: &mut BTreeSet<(String, RecordId)>,
    ) -> Option<Value> {
        let id = RecordId::from_value(reference)?;
        self.denormalize_record(target, &id, store, path)
    }
}

impl Normalizer for TreeNormalizer {
    fn normalize(&self, key: &str, data: &Value) -> EntityResult<Normalized> {
        self.config(key)?;
        let mut entities = NormalizedEntities::new();
        let result = match data {
            Value::Array(items) => Value::Array(
                items
                    .iter()
                    .map(|item| self.normalize_record(key, item, &mut entities))
                    .collect::<EntityResult<Vec<_>>>()?,
            ),
            single => self.normalize_record(key, single, &mut entities)?,
        };
        Ok(Normalized { entities, result })
    }

    fn denormalize(
        &self,
        key: &str,
        store: &EntityStore,
        ids: Option<&[RecordId]>,
    ) -> EntityResult<Value> {
        self.config(key)?;
        let Some(table) = store.slice(key) else {
            return Ok(Value::Array(Vec::new()));
        };
        let ids: Vec<RecordId> = match ids {
            Some(ids) => ids.to_vec(),
            None => table.keys().cloned().collect(),
        };

        let mut out = Vec::with_capacity(ids.len());
        for id in &ids {
            let mut path = BTreeSet::new();
            if let Some(record) = self.denormalize_record(key, id, store, &mut path) {
                out.push(record);
            }
        }
        Ok(Value::Array(out))
    }
}
