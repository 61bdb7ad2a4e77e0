//! Core types and storage for the Bulletin news service.
//!
//! This crate provides:
//! - The [`NewsRecord`] model and its [`NewsId`]
//! - Normalization of legacy document exports ([`legacy`])
//! - The SQLite-backed [`NewsStore`]
//! - Prometheus metrics helpers
//! - Shared error types

mod error;
pub mod legacy;
pub mod metrics;
mod model;
pub mod schema;
mod store;

pub use error::{Error, Result};
pub use legacy::{LegacyNewsDocument, parse_legacy_export};
pub use model::{NewNews, NewsId, NewsRecord, validate_text_fields};
pub use store::NewsStore;
