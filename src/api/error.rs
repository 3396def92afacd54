//! API Error Types
//!
//! Defines error types for the API layer and implements conversion
//! to HTTP responses with appropriate status codes.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::analysis::AnalysisError;
use crate::journal::{JournalError, ValidationError};

/// API error types
#[derive(Error, Debug)]
pub enum ApiError {
    /// An entry violates a data-model invariant
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Body is not valid JSON or does not have the request's shape
    #[error("Invalid request body: {}", .0.body_text())]
    InvalidBody(#[from] JsonRejection),

    /// Request parameter out of range
    #[error("{0}")]
    Configuration(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Resource already exists
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Journal storage error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<JournalError> for ApiError {
    fn from(err: JournalError) -> Self {
        match err {
            JournalError::Validation(e) => ApiError::Validation(e),
            JournalError::EntryNotFound(id) => ApiError::NotFound(format!("entry '{}'", id)),
            JournalError::DuplicateEntry(id) => {
                ApiError::Conflict(format!("entry '{}' already exists", id))
            }
            other => ApiError::Storage(other.to_string()),
        }
    }
}

impl From<AnalysisError> for ApiError {
    fn from(err: AnalysisError) -> Self {
        match err {
            AnalysisError::Validation(e) => ApiError::Validation(e),
            AnalysisError::Configuration(msg) => ApiError::Configuration(msg),
        }
    }
}

/// Error response body
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: ErrorBody,
    pub request_id: String,
}

/// Error details
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ApiError {
    /// HTTP status and machine-readable code
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ApiError::InvalidBody(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE")
            }
            ApiError::InvalidBody(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ApiError::Configuration(_) => (StatusCode::BAD_REQUEST, "CONFIGURATION_ERROR"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            ApiError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            ApiError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let request_id = uuid::Uuid::new_v4().to_string();

        // Client errors log at warn
        if status.is_server_error() {
            tracing::error!(
                request_id = %request_id,
                error_code = %code,
                error_message = %self,
                "API error occurred"
            );
        } else {
            tracing::warn!(
                request_id = %request_id,
                error_code = %code,
                error_message = %self,
                "Request rejected"
            );
        }

        let (entry_id, field) = match &self {
            ApiError::Validation(e) => (Some(e.entry_id.clone()), Some(e.field.clone())),
            _ => (None, None),
        };

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message: self.to_string(),
                entry_id,
                field,
            },
            request_id,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_journal_errors_map_to_status() {
        let not_found: ApiError = JournalError::EntryNotFound("e1".to_string()).into();
        assert_eq!(not_found.status_and_code().0, StatusCode::NOT_FOUND);

        let duplicate: ApiError = JournalError::DuplicateEntry("e1".to_string()).into();
        assert_eq!(duplicate.status_and_code().0, StatusCode::CONFLICT);

        let invalid: ApiError =
            JournalError::Validation(ValidationError::new("e1", "mood", "out of range")).into();
        assert_eq!(invalid.status_and_code(), (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"));
    }

    #[test]
    fn test_analysis_errors_map_to_status() {
        let err: ApiError = AnalysisError::Configuration("bad".to_string()).into();
        assert_eq!(
            err.status_and_code(),
            (StatusCode::BAD_REQUEST, "CONFIGURATION_ERROR")
        );
    }
}
