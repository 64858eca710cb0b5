//! Mapping configuration error types

use thiserror::Error;

/// Errors raised while decoding, encoding or addressing a mapping configuration
#[derive(Error, Debug)]
pub enum MappingError {
    /// The configuration document could not be decoded or encoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// No entity mapping matches the given reference
    #[error("Entity mapping not found: {0}")]
    EntityNotFound(String),

    /// An entity reference could not be parsed
    #[error("Invalid entity reference: {0}")]
    InvalidEntityRef(String),

    /// The persisted metadata blob is not in the expected shape
    #[error("Invalid metadata: {0}")]
    InvalidMetadata(String),
}

impl MappingError {
    /// Check if this error was caused by caller input
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            MappingError::Serialization(_)
                | MappingError::EntityNotFound(_)
                | MappingError::InvalidEntityRef(_)
                | MappingError::InvalidMetadata(_)
        )
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, MappingError::EntityNotFound(_))
    }

    /// Get error code for reports
    pub fn error_code(&self) -> &'static str {
        match self {
            MappingError::Serialization(_) => "SERIALIZATION_ERROR",
            MappingError::EntityNotFound(_) => "ENTITY_NOT_FOUND",
            MappingError::InvalidEntityRef(_) => "INVALID_ENTITY_REF",
            MappingError::InvalidMetadata(_) => "INVALID_METADATA",
        }
    }
}
