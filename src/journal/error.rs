//! Journal error types
//!
//! Defines the errors raised while ingesting, validating and storing entries.

use thiserror::Error;

/// A journal entry violates a data-model invariant
///
/// Always names the offending entry so callers can report it back.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid entry '{entry_id}' ({field}): {message}")]
pub struct ValidationError {
    /// Id of the offending entry (empty when the entry had none)
    pub entry_id: String,
    /// Field path, e.g. `date` or `symptoms[2].severity`
    pub field: String,
    /// What is wrong with the field
    pub message: String,
}

impl ValidationError {
    pub fn new(
        entry_id: impl Into<String>,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            entry_id: entry_id.into(),
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Errors that can occur in the entry store
#[derive(Error, Debug)]
pub enum JournalError {
    /// I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Entry failed validation
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Requested entry does not exist
    #[error("Entry not found: {0}")]
    EntryNotFound(String),

    /// An entry with the same id is already stored
    #[error("Duplicate entry id: {0}")]
    DuplicateEntry(String),

    /// CSV import failed before any row could be read
    #[error("CSV error: {0}")]
    Csv(String),
}

impl From<serde_json::Error> for JournalError {
    fn from(err: serde_json::Error) -> Self {
        JournalError::Serialization(err.to_string())
    }
}

impl From<csv::Error> for JournalError {
    fn from(err: csv::Error) -> Self {
        JournalError::Csv(err.to_string())
    }
}

/// Result type alias for journal operations
pub type JournalResult<T> = Result<T, JournalError>;
