//! HTML rendering for news link previews.
//!
//! A preview page carries Open Graph and Twitter card tags for link
//! unfurling crawlers and immediately redirects browsers to the article on
//! the frontend. The body is a static card for clients that ignore the
//! redirect.
//!
//! All rendering uses [maud](https://maud.lambda.xyz/) for compile-time HTML
//! generation with automatic escaping of every dynamic value.

pub mod components;

use bulletin_core::NewsRecord;
use maud::{Markup, html};

use self::components::{
    OpenGraphData, continue_link, format_timestamp, page_shell, truncate, video_block,
};
use crate::config::PreviewConfig;
use crate::resolve::{page_url, resolve_image_url, resolve_video_url};

/// Descriptions longer than this many characters are truncated in meta tags.
pub const DESCRIPTION_LIMIT: usize = 150;

/// Everything a preview page needs, resolved from one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewMeta {
    /// Record title, unescaped.
    pub title: String,
    /// Description as used in meta tags (truncated to [`DESCRIPTION_LIMIT`]).
    pub description: String,
    /// Absolute image URL (the configured default when the record has none).
    pub image_url: String,
    /// Absolute video URL, if the record has one.
    pub video_url: Option<String>,
    /// Canonical frontend URL of the record.
    pub page_url: String,
    /// Publication date for display.
    pub published_display: String,
    /// Publication time as RFC 3339.
    pub published_iso: String,
}

impl PreviewMeta {
    /// Resolve the preview fields of a record.
    pub fn from_record(record: &NewsRecord, config: &PreviewConfig) -> Self {
        let (published_display, published_iso) = format_timestamp(&record.created_at);
        Self {
            title: record.title.clone(),
            description: truncate(&record.description, DESCRIPTION_LIMIT),
            image_url: resolve_image_url(record.image_url.as_deref(), config),
            video_url: resolve_video_url(record.video_url.as_deref(), config),
            page_url: page_url(&record.id, config),
            published_display,
            published_iso,
        }
    }
}

/// Render the preview page for a record.
///
/// Pure function of the record and configuration: the same inputs always
/// produce the same bytes.
pub fn render_preview(record: &NewsRecord, config: &PreviewConfig) -> Markup {
    let meta = PreviewMeta::from_record(record, config);

    let og = OpenGraphData {
        title: &meta.title,
        description: &meta.description,
        og_type: "article",
        image: &meta.image_url,
        video: meta.video_url.as_deref(),
        published_time: Some(&meta.published_iso),
        twitter_card_type: "summary_large_image",
    };

    let body = html! {
        article class="card" {
            img class="card-image" src=(meta.image_url) alt=(meta.title);
            h1 class="card-title" { (meta.title) }
            time class="card-time" datetime=(meta.published_iso) { (meta.published_display) }
            p class="card-description" { (record.description) }
            @if let Some(video) = meta.video_url.as_deref() {
                (video_block(video, &meta.image_url))
            }
        }
        (continue_link(&meta.page_url))
    };

    page_shell(&meta.page_url, og, true, body, &config.site_name)
}
