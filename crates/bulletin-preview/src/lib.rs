//! Bulletin Preview - Open Graph and Twitter card pages for news records.
//!
//! When a news link is shared on a social platform, the platform's crawler
//! fetches a preview page for it. This crate renders that page from a
//! [`NewsRecord`](bulletin_core::NewsRecord): a static HTML document whose
//! `<head>` carries the link-unfurl metadata and which sends human visitors
//! straight on to the article on the frontend.
//!
//! # Architecture
//!
//! - **Resolve**: Turns stored media references into absolute URLs
//! - **Render**: Generates HTML with Open Graph tags using maud (compile-time templates)
//! - **Response**: Wraps rendered pages with security headers and an ETag
//!
//! # Security
//!
//! - All dynamic content is HTML-escaped by maud
//! - Media URLs are validated (HTTPS/HTTP only) before use in attributes
//! - Strict Content-Security-Policy: no JavaScript execution
//! - X-Frame-Options: DENY prevents clickjacking

pub mod config;
pub mod error;
pub mod render;
pub mod resolve;
pub mod response;

pub use config::PreviewConfig;
pub use error::PreviewError;
pub use render::render_preview;
pub use response::{placeholder_response, preview_response};
