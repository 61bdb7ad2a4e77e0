//! Resolution of stored media references and page URLs to absolute URLs.
//!
//! Depending on the media backend a record was created with, its references
//! are either host-relative (`/uploads/...`) or already absolute
//! (`https://media-host/...`). Resolution leaves absolute URLs untouched, so
//! resolving twice never double-prefixes.

use bulletin_core::NewsId;

use crate::config::PreviewConfig;

/// Resolve a stored media reference against the API base URL.
///
/// - `scheme:...` references are returned unchanged
/// - protocol-relative `//host/...` references get an `https:` scheme
/// - anything else is joined onto `base_url` with exactly one `/`
pub fn resolve_media_url(reference: &str, base_url: &str) -> String {
    let reference = reference.trim();
    if reference.starts_with("//") {
        return format!("https:{reference}");
    }
    if has_scheme(reference) {
        return reference.to_string();
    }
    join_url(base_url, reference)
}

/// Absolute preview image for an optional reference, falling back to the
/// configured default when the reference is missing, blank or not http(s).
pub fn resolve_image_url(reference: Option<&str>, config: &PreviewConfig) -> String {
    resolve_optional(reference, config).unwrap_or_else(|| config.default_image_url.clone())
}

/// Absolute video URL, or `None` when the record has no usable video.
pub fn resolve_video_url(reference: Option<&str>, config: &PreviewConfig) -> Option<String> {
    resolve_optional(reference, config)
}

fn resolve_optional(reference: Option<&str>, config: &PreviewConfig) -> Option<String> {
    reference
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(|r| resolve_media_url(r, &config.api_base_url))
        .filter(|url| is_safe_url(url))
}

/// Canonical user-facing URL of a record.
pub fn page_url(id: &NewsId, config: &PreviewConfig) -> String {
    join_url(&config.frontend_base_url, id.as_str())
}

/// Check if a URL is safe to use in `src` or `href` attributes.
pub fn is_safe_url(url: &str) -> bool {
    url.starts_with("https://") || url.starts_with("http://")
}

/// True when `reference` begins with an RFC 3986 scheme followed by `:`.
fn has_scheme(reference: &str) -> bool {
    let Some((scheme, _)) = reference.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
