/// Per-record anomalies. During a diff pass these are absorbed and the
/// record skipped; at the normalization boundary they are returned.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("record of '{entity}' is missing id attribute '{id_attribute}'")]
    MissingIdAttribute { entity: String, id_attribute: String },

    #[error("record {id} of '{entity}' is not a JSON object")]
    NotAnObject { entity: String, id: String },

    #[error("invalid payload: {reason}")]
    InvalidPayload { reason: String },
}
