//! Query surface errors
//!
//! Wraps every failure a materialization can hit: translation, storage,
//! and (de)serialization of entities.

use thiserror::Error;

use crate::storage::StorageError;
use crate::translator::TranslateError;

/// Result type for query surface operations
pub type QueryResult<T> = Result<T, QueryError>;

/// Query surface errors
#[derive(Debug, Error)]
pub enum QueryError {
    // ==================
    // Translation
    // ==================
    /// Predicate rejected by the translator
    #[error("{0}")]
    Translate(#[from] TranslateError),

    /// Expression does not describe a query over a known element type
    #[error("Unknown element type: {0}")]
    UnknownElementType(String),

    // ==================
    // Execution
    // ==================
    /// Document store failure
    #[error("{0}")]
    Storage(#[from] StorageError),

    /// Stored document does not deserialize into the entity
    #[error("Document does not deserialize: {0}")]
    Deserialize(#[source] serde_json::Error),

    /// Entity does not serialize into a document
    #[error("Entity does not serialize: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl QueryError {
    /// Returns the string error code
    pub fn code(&self) -> &'static str {
        match self {
            QueryError::Translate(e) => e.code(),
            QueryError::UnknownElementType(_) => "AERO_QUERY_UNKNOWN_ELEMENT_TYPE",
            QueryError::Storage(e) => e.code().code(),
            QueryError::Deserialize(_) => "AERO_QUERY_DESERIALIZE_FAILED",
            QueryError::Serialize(_) => "AERO_QUERY_SERIALIZE_FAILED",
        }
    }

    /// True when the predicate itself was rejected
    pub fn is_translation(&self) -> bool {
        matches!(self, QueryError::Translate(_) | QueryError::UnknownElementType(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_pass_through() {
        let err = QueryError::from(TranslateError::NotSupported("All".into()));
        assert_eq!(err.code(), "AERO_QUERY_NOT_SUPPORTED");
        assert!(err.is_translation());

        let err = QueryError::from(StorageError::poisoned("find"));
        assert_eq!(err.code(), "AERO_STORAGE_POISONED");
        assert!(!err.is_translation());
    }

    #[test]
    fn test_display_is_transparent_for_translation() {
        let err = QueryError::from(TranslateError::PropertyNotMapped("Supplier.Phone".into()));
        assert_eq!(err.to_string(), "Property 'Supplier.Phone' is not mapped");
    }
}
