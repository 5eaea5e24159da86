//! Record identifiers.
//!
//! Ids arrive either as JSON strings or integer numbers, and become object
//! keys once normalized. Both spellings name the same record.
//!
//! ```
//! use entity_core::RecordId;
//! use serde_json::json;
//!
//! assert_eq!(RecordId::from_value(&json!(7)), Some(RecordId::from("7")));
//! assert_eq!(RecordId::from_value(&json!("7")), Some(RecordId::from(7u64)));
//! assert_eq!(RecordId::from_value(&json!(7.0)), Some(RecordId::from(7)));
//! assert_eq!(RecordId::from_value(&json!(null)), None);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// Identifier of a record within its record type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Read an id out of an attribute value. Strings and numbers qualify;
    /// anything else (null, bool, nested values) does not. A whole float
    /// such as `1.0` names the same record as `1`.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Self(s.clone())),
            Value::Number(n) => Some(Self(number_key(n))),
            _ => None,
        }
    }

    /// Id of `record` under `id_attribute`, if present and usable.
    pub fn of_record(record: &Value, id_attribute: &str) -> Option<Self> {
        record.get(id_attribute).and_then(Self::from_value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn number_key(n: &Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string();
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
            (f as i64).to_string()
        }
        _ => n.to_string(),
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u64> for RecordId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl From<i32> for RecordId {
    fn from(id: i32) -> Self {
        Self(id.to_string())
    }
}
