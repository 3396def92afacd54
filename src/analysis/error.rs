//! Analysis error types

use thiserror::Error;

use crate::journal::ValidationError;

/// Errors that can occur when invoking the analysis engine
///
/// Running out of data is not an error: symptoms or pairs without enough
/// points are simply left out of the results.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// An input entry violates a data-model invariant
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// An invocation parameter or threshold is invalid
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Result type alias for analysis operations
pub type AnalysisResult<T> = Result<T, AnalysisError>;
