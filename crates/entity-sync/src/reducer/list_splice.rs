//! Splice helpers for relations kept as ordered lists of embedded objects
//! rather than id references.
//!
//! ```
//! use entity_sync::{remove_object_in_slice, replace_object_in_slice};
//! use serde_json::json;
//!
//! let list = vec![json!({"id": 9}), json!({"id": 10}), json!({"id": 11})];
//!
//! let removed = remove_object_in_slice(&json!(10), &list);
//! assert_eq!(removed, vec![json!({"id": 9}), json!({"id": 11})]);
//!
//! let replaced = replace_object_in_slice(&json!({"type": "place", "id": 10}), &list);
//! assert_eq!(replaced[1], json!({"type": "place", "id": 10}));
//! ```

use serde_json::Value;

use entity_core::constants::DEFAULT_ID_ATTRIBUTE;

use crate::diff::structurally_equal;

/// Copy of `list` without the first element whose `id` equals `id`.
pub fn remove_object_in_slice(id: &Value, list: &[Value]) -> Vec<Value> {
    remove_object_in_slice_by(DEFAULT_ID_ATTRIBUTE, id, list)
}

/// Copy of `list` with the first element sharing `replacement`'s `id`
/// swapped for `replacement`.
pub fn replace_object_in_slice(replacement: &Value, list: &[Value]) -> Vec<Value> {
    replace_object_in_slice_by(DEFAULT_ID_ATTRIBUTE, replacement, list)
}

pub fn remove_object_in_slice_by(id_attribute: &str, id: &Value, list: &[Value]) -> Vec<Value> {
    let mut out = list.to_vec();
    if let Some(index) = position_of(id_attribute, id, list) {
        out.remove(index);
    }
    out
}

pub fn replace_object_in_slice_by(
    id_attribute: &str,
    replacement: &Value,
    list: &[Value],
) -> Vec<Value> {
    let mut out = list.to_vec();
    let Some(id) = replacement.get(id_attribute) else {
        return out;
    };
    if let Some(index) = position_of(id_attribute, id, list) {
        out[index] = replacement.clone();
    }
    out
}

fn position_of(id_attribute: &str, id: &Value, list: &[Value]) -> Option<usize> {
    list.iter().position(|item| {
        item.get(id_attribute)
            .is_some_and(|candidate| structurally_equal(candidate, id))
    })
}
