//! Storage error types
//!
//! Error codes:
//! - AERO_STORAGE_WRITE_FAILED (ERROR severity)
//! - AERO_STORAGE_INVALID_DOCUMENT (ERROR severity)
//! - AERO_STORAGE_POISONED (FATAL severity)

use std::fmt;

/// Severity levels for storage errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Operation fails, the store stays usable
    Error,
    /// The store can no longer be trusted
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Storage-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageErrorCode {
    /// Document write failed
    AeroStorageWriteFailed,
    /// Document cannot be stored (not an object, missing or unusable `_id`)
    AeroStorageInvalidDocument,
    /// A writer panicked while holding the document map
    AeroStoragePoisoned,
}

impl StorageErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            StorageErrorCode::AeroStorageWriteFailed => "AERO_STORAGE_WRITE_FAILED",
            StorageErrorCode::AeroStorageInvalidDocument => "AERO_STORAGE_INVALID_DOCUMENT",
            StorageErrorCode::AeroStoragePoisoned => "AERO_STORAGE_POISONED",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            StorageErrorCode::AeroStoragePoisoned => Severity::Fatal,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for StorageErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Storage error with context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageError {
    code: StorageErrorCode,
    message: String,
    /// Optional details about the error context
    details: Option<String>,
}

impl StorageError {
    pub fn write_failed(message: impl Into<String>) -> Self {
        Self {
            code: StorageErrorCode::AeroStorageWriteFailed,
            message: message.into(),
            details: None,
        }
    }

    /// Rejected document, with the offending value in the details
    pub fn invalid_document(reason: impl Into<String>, document: &serde_json::Value) -> Self {
        let mut rendered = document.to_string();
        if rendered.len() > 120 {
            let cut = (0..=120).rev().find(|i| rendered.is_char_boundary(*i)).unwrap_or(0);
            rendered.truncate(cut);
            rendered.push_str("...");
        }
        Self {
            code: StorageErrorCode::AeroStorageInvalidDocument,
            message: reason.into(),
            details: Some(format!("document: {}", rendered)),
        }
    }

    /// Lock poisoning while performing `operation`
    pub fn poisoned(operation: &str) -> Self {
        Self {
            code: StorageErrorCode::AeroStoragePoisoned,
            message: "document map lock poisoned".to_string(),
            details: Some(format!("operation: {}", operation)),
        }
    }

    pub fn code(&self) -> StorageErrorCode {
        self.code
    }

    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }

    /// Returns whether the store must be abandoned
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.code.severity(),
            self.code.code(),
            self.message
        )?;
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for StorageError {}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
