//! Relation declarations and per-entity registration options.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use super::Operation;
use crate::constants::DEFAULT_ID_ATTRIBUTE;

/// How many target records a relation field refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cardinality {
    One,
    Many,
}

/// A directed edge from one record type to another.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Relation {
    /// Key of the target record type.
    pub target: String,
    pub cardinality: Cardinality,
}

/// One-to-one edge towards `target`.
pub fn has_one(target: impl Into<String>) -> Relation {
    Relation {
        target: target.into(),
        cardinality: Cardinality::One,
    }
}

/// One-to-many edge towards `target`.
pub fn has_many(target: impl Into<String>) -> Relation {
    Relation {
        target: target.into(),
        cardinality: Cardinality::Many,
    }
}

/// Relation declarations of a record type, keyed by field name.
pub type Relations = BTreeMap<String, Relation>;

/// Transform applied to a raw record before it is normalized.
#[derive(Clone)]
pub struct ProcessStrategy(Arc<dyn Fn(Value) -> Value + Send + Sync>);

impl ProcessStrategy {
    pub fn new(f: impl Fn(Value) -> Value + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn apply(&self, raw: Value) -> Value {
        (self.0)(raw)
    }
}

impl fmt::Debug for ProcessStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ProcessStrategy(..)")
    }
}

/// Options recognised at registration.
#[derive(Debug, Clone)]
pub struct EntityOptions {
    /// Attribute holding the record id. Default: "id".
    pub id_attribute: String,
    /// Optional pre-processing of raw input records.
    pub process_strategy: Option<ProcessStrategy>,
    /// Operations the entity's reducer responds to. Default: all five.
    pub operations: Vec<Operation>,
}

impl EntityOptions {
    pub fn with_id_attribute(mut self, id_attribute: impl Into<String>) -> Self {
        self.id_attribute = id_attribute.into();
        self
    }

    pub fn with_process_strategy(
        mut self,
        f: impl Fn(Value) -> Value + Send + Sync + 'static,
    ) -> Self {
        self.process_strategy = Some(ProcessStrategy::new(f));
        self
    }

    pub fn with_operations(mut self, operations: impl IntoIterator<Item = Operation>) -> Self {
        self.operations = operations.into_iter().collect();
        self
    }
}

impl Default for EntityOptions {
    fn default() -> Self {
        Self {
            id_attribute: DEFAULT_ID_ATTRIBUTE.to_string(),
            process_strategy: None,
            operations: Operation::ALL.to_vec(),
        }
    }
}

/// One record type as registered: its key, relations and options.
#[derive(Debug, Clone)]
pub struct EntityConfig {
    pub key: String,
    pub relations: Relations,
    pub options: EntityOptions,
}

impl EntityConfig {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            relations: Relations::new(),
            options: EntityOptions::default(),
        }
    }

    pub fn relation(mut self, field: impl Into<String>, relation: Relation) -> Self {
        self.relations.insert(field.into(), relation);
        self
    }

    pub fn options(mut self, options: EntityOptions) -> Self {
        self.options = options;
        self
    }
}
