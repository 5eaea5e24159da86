//! Error handling for entity-sync.
//! One error enum per concern, `thiserror` only.

pub mod config_error;
pub mod configuration_error;
pub mod record_error;

pub use config_error::ConfigError;
pub use configuration_error::ConfigurationError;
pub use record_error::RecordError;

/// Top-level error aggregating every subsystem error via `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum EntityError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("record error: {0}")]
    Record(#[from] RecordError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

pub type EntityResult<T> = Result<T, EntityError>;
