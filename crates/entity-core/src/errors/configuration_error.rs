/// Errors in the static entity declarations. Fatal to the affected
/// record type's setup; retrying does not help.
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("relation {entity}.{field} targets unregistered entity '{target}'")]
    UnknownRelationTarget {
        entity: String,
        field: String,
        target: String,
    },

    #[error("entity '{key}' is not registered")]
    UnknownEntity { key: String },

    #[error("entity registry used before init()")]
    NotInitialized,

    #[error("entity key must not be empty")]
    EmptyKey,
}
