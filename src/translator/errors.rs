//! Translator error types
//!
//! Error codes:
//! - AERO_QUERY_PROPERTY_NOT_MAPPED
//! - AERO_QUERY_UNSUPPORTED_EXPRESSION
//! - AERO_QUERY_UNSUPPORTED_METHOD
//! - AERO_QUERY_MALFORMED_TREE
//! - AERO_QUERY_NOT_SUPPORTED
//!
//! All of them reject the predicate. They describe programming errors in
//! the code that built the tree and are never retried.

use thiserror::Error;

/// Result type for translation
pub type TranslateResult<T> = Result<T, TranslateError>;

/// Translation failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslateError {
    /// A member path segment has no mapping entry
    #[error("Property '{0}' is not mapped")]
    PropertyNotMapped(String),

    /// A node kind reached a position with no case for it
    #[error("Unsupported expression: {0}")]
    UnsupportedExpression(String),

    /// A method call name or shape is not recognized
    #[error("Unsupported method: {0}")]
    UnsupportedMethod(String),

    /// The tree violates structural assumptions (unbound parameter, bad arity)
    #[error("Malformed predicate tree: {0}")]
    MalformedTree(String),

    /// A recognized form that is intentionally not implemented
    #[error("Not supported: {0}")]
    NotSupported(String),
}

impl TranslateError {
    /// Returns the string error code
    pub fn code(&self) -> &'static str {
        match self {
            TranslateError::PropertyNotMapped(_) => "AERO_QUERY_PROPERTY_NOT_MAPPED",
            TranslateError::UnsupportedExpression(_) => "AERO_QUERY_UNSUPPORTED_EXPRESSION",
            TranslateError::UnsupportedMethod(_) => "AERO_QUERY_UNSUPPORTED_METHOD",
            TranslateError::MalformedTree(_) => "AERO_QUERY_MALFORMED_TREE",
            TranslateError::NotSupported(_) => "AERO_QUERY_NOT_SUPPORTED",
        }
    }

    pub(crate) fn unbound(name: &str) -> Self {
        TranslateError::MalformedTree(format!("parameter '{}' is not bound", name))
    }

    pub(crate) fn missing_argument(method: &str, index: usize) -> Self {
        TranslateError::MalformedTree(format!("{} is missing argument {}", method, index))
    }
}
