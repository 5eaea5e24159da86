use serde_json::Value;

use crate::errors::EntityResult;
use crate::models::{EntityStore, NormalizedEntities, RecordId};

/// Output of a normalization pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    /// Every record found in the input, flattened by type and id.
    pub entities: NormalizedEntities,
    /// The root id, or an array of root ids for array input.
    pub result: Value,
}

/// Converts between nested object graphs and the flat by-type, by-id shape.
///
/// The sync engine only ever consumes the flat shape; hosts plug in
/// whichever normalizer matches their relation declarations.
pub trait Normalizer {
    /// Flatten `data` (a record or an array of records) of type `key`.
    fn normalize(&self, key: &str, data: &Value) -> EntityResult<Normalized>;

    /// Rebuild nested records of type `key` from `store`. `ids` restricts
    /// and orders the output; `None` yields every record of the slice.
    fn denormalize(
        &self,
        key: &str,
        store: &EntityStore,
        ids: Option<&[RecordId]>,
    ) -> EntityResult<Value>;
}
