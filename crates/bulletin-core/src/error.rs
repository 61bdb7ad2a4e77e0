//! Error types for the Bulletin record layer.

use thiserror::Error;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while validating or persisting news records.
#[derive(Error, Debug)]
pub enum Error {
    /// A required field is missing or empty.
    #[error("{0}")]
    Validation(String),

    /// No record exists for the given identifier (or the identifier is malformed).
    #[error("news not found: {0}")]
    NotFound(String),

    /// SQLite error.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The database was written by a newer build.
    #[error(
        "unsupported schema version {found} (this build supports {supported})",
        supported = crate::schema::SCHEMA_VERSION
    )]
    UnsupportedSchema { found: i32 },
}

impl Error {
    /// Shorthand for a validation failure with a human-readable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
