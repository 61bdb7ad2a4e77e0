//! HTTP responses for rendered previews.

use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use bulletin_core::NewsRecord;

use crate::config::PreviewConfig;
use crate::render::components::{CSP_HEADER, PLACEHOLDER_SVG};
use crate::render::render_preview;

/// Render a record's preview page and wrap it in an HTML response.
pub fn preview_response(record: &NewsRecord, config: &PreviewConfig) -> Response {
    let html = render_preview(record, config).into_string();
    metrics::counter!("preview_rendered_total").increment(1);
    tracing::debug!(id = %record.id, bytes = html.len(), "rendered preview");
    build_response(html)
}

/// Build an HTTP response with HTML content and security headers.
fn build_response(html: String) -> Response {
    let mut headers = HeaderMap::new();

    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/html; charset=utf-8"),
    );

    // Security headers
    headers.insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static(CSP_HEADER),
    );
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));

    headers.insert(header::ETAG, etag_for(&html));

    (StatusCode::OK, headers, html).into_response()
}

/// Strong ETag (xxHash of the body).
fn etag_for(body: &str) -> HeaderValue {
    let hash = xxhash_rust::xxh3::xxh3_64(body.as_bytes());
    let etag = format!("\"{}\"", hex_fmt::HexFmt(&hash.to_be_bytes()));
    // Quoted hex is always a valid header value.
    HeaderValue::from_str(&etag).unwrap_or_else(|_| HeaderValue::from_static("\"0\""))
}

/// Serve the built-in placeholder image.
pub fn placeholder_response() -> Response {
    (
        [
            (header::CONTENT_TYPE, "image/svg+xml"),
            (header::CACHE_CONTROL, "public, max-age=86400"),
        ],
        PLACEHOLDER_SVG,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bulletin_core::NewsId;
    use chrono::DateTime;

    fn record() -> NewsRecord {
        let ts = DateTime::from_timestamp(1_704_067_200, 0).unwrap();
        NewsRecord {
            id: NewsId::parse("64b7f0c2a1d3e4f5a6b7c8d9").unwrap(),
            title: "Breaking".to_string(),
            description: "Something happened".to_string(),
            image_url: None,
            video_url: None,
            created_at: ts,
            updated_at: ts,
        }
    }

    #[test]
    fn preview_headers() {
        let config = PreviewConfig::new("http://localhost:5000", "http://localhost:3000/news");
        let response = preview_response(&record(), &config);
        assert_eq!(response.status(), StatusCode::OK);

        let headers = response.headers();
        assert_eq!(headers[header::CONTENT_TYPE], "text/html; charset=utf-8");
        assert_eq!(headers[header::CONTENT_SECURITY_POLICY], CSP_HEADER);
        assert_eq!(headers[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
        assert_eq!(headers[header::X_FRAME_OPTIONS], "DENY");
        assert!(headers.contains_key(header::ETAG));
    }

    #[test]
    fn etag_is_stable_and_content_sensitive() {
        assert_eq!(etag_for("<p>a</p>"), etag_for("<p>a</p>"));
        assert_ne!(etag_for("<p>a</p>"), etag_for("<p>b</p>"));

        let etag = etag_for("x");
        let etag = etag.to_str().unwrap();
        assert!(etag.starts_with('"') && etag.ends_with('"'));
        assert_eq!(etag.len(), 18);
    }

    #[test]
    fn placeholder_is_svg() {
        let response = placeholder_response();
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/svg+xml");
    }
}
