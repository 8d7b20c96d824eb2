//! Error types for the serialization engine.

use serde_json::Value;
use thiserror::Error;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors produced while building or flattening objects.
///
/// All variants are terminal: they describe the input data or the
/// registration, never a transient condition, so retrying cannot help.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A mandatory field is missing from the raw data, or an abstract
    /// field's discriminator is absent (reported with target type
    /// `"abstract"`).
    #[error("serialized object of type `{target_type}` is incomplete: missing `{missing_field}`")]
    IncompleteObject {
        target_type: String,
        missing_field: String,
        raw_data: Value,
    },

    /// A discriminator value has no registered implementation.
    #[error("unknown type implementation `{discriminator}`")]
    UnknownType {
        discriminator: String,
        raw_data: Value,
    },

    /// An array-registered field was given a non-sequence value.
    #[error("serialized data for field `{field}` is not an array")]
    NotAnArray { field: String, raw_data: Value },

    /// A registration or call-site mistake, not bad input data.
    #[error("configuration error: {0}")]
    Configuration(String),
}
