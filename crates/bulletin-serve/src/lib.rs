//! Bulletin Serve - HTTP API for publishing news.
//!
//! This crate provides the REST API behind the news frontend: records are
//! created from multipart uploads, listed and fetched as JSON, and shared
//! through link preview pages rendered by `bulletin-preview`.
//!
//! # Architecture
//!
//! - **AppState**: Shared application state (record store, media backend, configuration)
//! - **Media**: Local-disk or S3 storage for uploaded images and videos
//! - **Routes**: Endpoint handlers, mounted under `/news` and `/api/news`

mod error;
pub mod media;
mod routes;
mod state;

pub use self::error::ApiError;
pub use self::media::MediaBackend;
pub use self::routes::router;
pub use self::state::{AppState, Config, MediaConfig};
