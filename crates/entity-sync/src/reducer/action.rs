//! Entity actions and their plain-record wire form.
//!
//! On the wire an action is `{ "type": "MERGE_ENTITIES", "entities": {...} }`.
//! In Rust it is a closed sum type; types this engine does not own land in
//! [`EntityAction::Other`] and leave every reducer's state untouched.
//!
//! # Examples
//!
//! ```
//! use entity_sync::{create_action, EntityAction};
//! use entity_core::Operation;
//! use serde_json::json;
//!
//! let action = EntityAction::from_value(&json!({
//!     "type": "REMOVE_ENTITIES",
//!     "entities": { "books": [1, 2] }
//! })).unwrap();
//! assert_eq!(action.operation(), Some(Operation::Remove));
//!
//! let generic = create_action("SET_VALUE", json!(2), Some(json!({ "x": 4 }).as_object().unwrap()));
//! assert_eq!(generic, json!({ "type": "SET_VALUE", "payload": 2, "x": 4 }));
//! ```

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use entity_core::errors::{EntityResult, RecordError};
use entity_core::models::store::{entities_from_value, entities_to_value};
use entity_core::{NormalizedEntities, Operation, RecordId};

/// A write against the entity store.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityAction {
    Merge { entities: NormalizedEntities },
    Update { entities: NormalizedEntities },
    Replace { entities: NormalizedEntities },
    Reset { entities: NormalizedEntities },
    Remove { ids: BTreeMap<String, Vec<RecordId>> },
    /// An action owned by some other part of the host.
    Other { action_type: String },
}

impl EntityAction {
    pub fn operation(&self) -> Option<Operation> {
        match self {
            EntityAction::Merge { .. } => Some(Operation::Merge),
            EntityAction::Update { .. } => Some(Operation::Update),
            EntityAction::Replace { .. } => Some(Operation::Replace),
            EntityAction::Reset { .. } => Some(Operation::Reset),
            EntityAction::Remove { .. } => Some(Operation::Remove),
            EntityAction::Other { .. } => None,
        }
    }

    pub fn action_type(&self) -> &str {
        match self {
            EntityAction::Other { action_type } => action_type,
            _ => self
                .operation()
                .map(Operation::action_type)
                .unwrap_or_default(),
        }
    }

    /// Whether the payload names record type `key`.
    pub fn touches(&self, key: &str) -> bool {
        match self {
            EntityAction::Merge { entities }
            | EntityAction::Update { entities }
            | EntityAction::Replace { entities }
            | EntityAction::Reset { entities } => entities.contains_key(key),
            EntityAction::Remove { ids } => ids.contains_key(key),
            EntityAction::Other { .. } => false,
        }
    }

    /// Parse the plain-record form. Unknown `type`s become `Other`.
    pub fn from_value(value: &Value) -> EntityResult<Self> {
        let action_type = value
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| RecordError::InvalidPayload {
                reason: "action requires a string `type`".to_string(),
            })?;

        let Ok(operation) = action_type.parse::<Operation>() else {
            return Ok(EntityAction::Other {
                action_type: action_type.to_string(),
            });
        };

        let entities = value
            .get("entities")
            .ok_or_else(|| RecordError::InvalidPayload {
                reason: format!("{action_type} requires `entities`"),
            })?;

        Ok(match operation {
            Operation::Merge => merge_entities(entities_from_value(entities)?),
            Operation::Update => update_entities(entities_from_value(entities)?),
            Operation::Replace => replace_entities(entities_from_value(entities)?),
            Operation::Reset => reset_entities(entities_from_value(entities)?),
            Operation::Remove => remove_entities(remove_ids_from_value(entities)?),
        })
    }

    pub fn to_value(&self) -> Value {
        let mut out = Map::new();
        out.insert("type".to_string(), Value::String(self.action_type().to_string()));
        match self {
            EntityAction::Merge { entities }
            | EntityAction::Update { entities }
            | EntityAction::Replace { entities }
            | EntityAction::Reset { entities } => {
                out.insert("entities".to_string(), entities_to_value(entities));
            }
            EntityAction::Remove { ids } => {
                let ids: Map<String, Value> = ids
                    .iter()
                    .map(|(key, ids)| {
                        let ids = ids
                            .iter()
                            .map(|id| Value::String(id.to_string()))
                            .collect();
                        (key.clone(), Value::Array(ids))
                    })
                    .collect();
                out.insert("entities".to_string(), Value::Object(ids));
            }
            EntityAction::Other { .. } => {}
        }
        Value::Object(out)
    }
}

/// Remove payloads name ids either as an array or as the keys of an
/// id-keyed map.
fn remove_ids_from_value(value: &Value) -> EntityResult<BTreeMap<String, Vec<RecordId>>> {
    let types = value.as_object().ok_or_else(|| RecordError::InvalidPayload {
        reason: "entities must be an object keyed by record type".to_string(),
    })?;

    let mut out = BTreeMap::new();
    for (key, ids) in types {
        let ids = match ids {
            Value::Array(items) => items
                .iter()
                .map(|item| {
                    RecordId::from_value(item).ok_or_else(|| RecordError::InvalidPayload {
                        reason: format!("entities.{key} contains a non-id value: {item}"),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?,
            Value::Object(records) => records.keys().map(|id| RecordId::from(id.as_str())).collect(),
            other => {
                return Err(RecordError::InvalidPayload {
                    reason: format!("entities.{key} must be an array or object, got {other}"),
                }
                .into())
            }
        };
        out.insert(key.clone(), ids);
    }
    Ok(out)
}

pub fn merge_entities(entities: NormalizedEntities) -> EntityAction {
    EntityAction::Merge { entities }
}

pub fn update_entities(entities: NormalizedEntities) -> EntityAction {
    EntityAction::Update { entities }
}

pub fn replace_entities(entities: NormalizedEntities) -> EntityAction {
    EntityAction::Replace { entities }
}

pub fn reset_entities(entities: NormalizedEntities) -> EntityAction {
    EntityAction::Reset { entities }
}

pub fn remove_entities(ids: BTreeMap<String, Vec<RecordId>>) -> EntityAction {
    EntityAction::Remove { ids }
}

/// Generic action constructor: `{ type, payload, ...extra }`.
///
/// `extra` is applied last, so its keys override `type` and `payload` when
/// they collide.
pub fn create_action(action_type: &str, payload: Value, extra: Option<&Map<String, Value>>) -> Value {
    let mut action = Map::new();
    action.insert("type".to_string(), Value::String(action_type.to_string()));
    action.insert("payload".to_string(), payload);
    if let Some(extra) = extra {
        for (key, value) in extra {
            action.insert(key.clone(), value.clone());
        }
    }
    Value::Object(action)
}
