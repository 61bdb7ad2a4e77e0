//! API error types and response formatting.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::media::MediaError;

/// API error type that converts to appropriate HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Missing or malformed client input.
    #[error("{0}")]
    Validation(String),

    /// Request body exceeds the configured upload limit.
    #[error("{0}")]
    PayloadTooLarge(String),

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// The media backend failed to accept an upload.
    #[error("storage error: {0}")]
    Storage(String),

    /// Record layer failure other than validation or a missing record.
    #[error(transparent)]
    Core(bulletin_core::Error),
}

impl From<bulletin_core::Error> for ApiError {
    fn from(err: bulletin_core::Error) -> Self {
        match err {
            bulletin_core::Error::Validation(msg) => Self::Validation(msg),
            bulletin_core::Error::NotFound(id) => Self::NotFound(id),
            other => Self::Core(other),
        }
    }
}

impl From<MediaError> for ApiError {
    fn from(err: MediaError) -> Self {
        match err {
            MediaError::MissingImage => Self::Validation(err.to_string()),
            other => Self::Storage(other.to_string()),
        }
    }
}

/// JSON error response body.
#[derive(Debug, Clone, Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match &self {
            Self::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::PayloadTooLarge(msg) => (StatusCode::PAYLOAD_TOO_LARGE, msg.clone()),
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "News not found".to_string()),
            Self::Storage(msg) => {
                tracing::error!(error = %msg, "media storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to store media".to_string(),
                )
            }
            Self::Core(err) => {
                tracing::error!(error = %err, "database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorResponse { error })).into_response()
    }
}
