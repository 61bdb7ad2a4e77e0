//! Error types for preview responses.
//!
//! Preview consumers are crawlers and browsers following a shared link, so
//! failures are short plain-text bodies rather than JSON.

use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};

/// Preview error type.
#[derive(Debug, thiserror::Error)]
pub enum PreviewError {
    /// No record exists for the requested id.
    #[error("not found: {0}")]
    NotFound(String),

    /// The record could not be loaded or rendered.
    #[error("render error: {0}")]
    Render(String),
}

impl From<bulletin_core::Error> for PreviewError {
    fn from(err: bulletin_core::Error) -> Self {
        match err {
            bulletin_core::Error::NotFound(id) => Self::NotFound(id),
            other => Self::Render(other.to_string()),
        }
    }
}

impl IntoResponse for PreviewError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::NotFound(id) => {
                metrics::counter!("preview_not_found_total").increment(1);
                tracing::debug!(id = %id, "preview requested for unknown news");
                (StatusCode::NOT_FOUND, "News not found")
            }
            Self::Render(err) => {
                tracing::error!(error = %err, "failed to generate preview");
                (StatusCode::INTERNAL_SERVER_ERROR, "Error generating preview")
            }
        };

        (
            status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            body,
        )
            .into_response()
    }
}
