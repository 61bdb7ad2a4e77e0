//! API route definitions.

mod health;
mod news;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use bulletin_preview::config::PLACEHOLDER_PATH;
use bulletin_preview::placeholder_response;
use tower_http::services::ServeDir;

use crate::media::{MediaBackend, UPLOADS_ROUTE};
use crate::state::AppState;

/// Build the complete API router.
///
/// # Route Structure
///
/// News routes are mounted under both `/news` and `/api/news`:
/// - `POST /news` - Create a record (multipart form)
/// - `GET /news` - All records, newest first
/// - `GET /news/{id}` - One record (JSON)
/// - `GET /news/{id}/preview` - Link preview page (HTML)
/// - `GET /news/share/{id}` - Link preview page (HTML)
///
/// Plus:
/// - `GET /health` - Health check
/// - `GET /robots.txt` - Crawler instructions
/// - `GET /placeholder.svg` - Default preview image
/// - `GET /uploads/*` - Uploaded media (local backend only)
pub fn router(state: AppState) -> Router {
    let news = Router::new()
        .route("/", get(news::list).post(news::create))
        .route("/share/{id}", get(news::preview))
        .route("/{id}", get(news::get))
        .route("/{id}/preview", get(news::preview));

    let mut app = Router::new()
        .route("/health", get(health::health_check))
        .route("/robots.txt", get(robots_txt))
        .route(PLACEHOLDER_PATH, get(placeholder))
        .nest("/news", news.clone())
        .nest("/api/news", news);

    if let MediaBackend::Local(local) = &state.media {
        app = app.nest_service(UPLOADS_ROUTE, ServeDir::new(local.dir()));
    }

    app.layer(DefaultBodyLimit::max(state.config.max_upload_bytes))
        .with_state(state)
}

/// Serve robots.txt allowing all crawlers.
///
/// Link unfurlers must be able to fetch preview pages.
async fn robots_txt() -> impl IntoResponse {
    (
        [("content-type", "text/plain; charset=utf-8")],
        "User-agent: *\nAllow: /\n",
    )
}

async fn placeholder() -> Response {
    placeholder_response()
}
