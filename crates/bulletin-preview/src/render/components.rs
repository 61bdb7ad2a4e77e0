//! Shared HTML components for preview pages.
//!
//! These are maud functions that return `Markup` fragments. All dynamic
//! values pass through maud's escaping, so record text can never break out
//! of an attribute or element.

use chrono::{DateTime, Utc};
use maud::{Markup, PreEscaped, html};

/// Inline CSS for the fallback card shown to clients that ignore the redirect.
pub const PAGE_CSS: &str = r#"
*{margin:0;padding:0;box-sizing:border-box}
:root{--bg:#fafafa;--fg:#111;--fg2:#555;--fg3:#999;--accent:#c2410c;--border:rgba(0,0,0,.08)}
body{font-family:Inter,-apple-system,BlinkMacSystemFont,"Segoe UI",Roboto,sans-serif;line-height:1.6;color:var(--fg);background:var(--bg);min-height:100vh;display:flex;flex-direction:column;align-items:center;padding:1.5rem 1rem}
main{max-width:680px;width:100%;flex:1}
a{color:var(--accent);text-decoration:none}
a:hover{text-decoration:underline}
img,video{max-width:100%;height:auto;display:block}
.card{padding:1.5rem;border:1px solid var(--border);border-radius:10px;background:#fff}
.card-image{width:100%;max-height:320px;object-fit:cover;border-radius:8px;margin-bottom:1rem}
.card-title{font-size:1.5rem;font-weight:700;line-height:1.3;letter-spacing:-.01em;margin-bottom:.5rem}
.card-time{font-size:.8rem;color:var(--fg3)}
.card-description{color:var(--fg2);margin:.75rem 0;white-space:pre-wrap;word-break:break-word}
.card-video{margin:.75rem 0;border-radius:8px;overflow:hidden;background:#000}
.actions{margin-top:1.25rem;display:flex;justify-content:center}
.continue-link{display:inline-block;padding:.55rem 1.1rem;background:var(--accent);color:#fff;border-radius:6px;font-size:.9rem;font-weight:500}
.continue-link:hover{text-decoration:none;opacity:.9}
@media(prefers-color-scheme:dark){
:root{--bg:#0a0a0f;--fg:#e5e5e5;--fg2:#a0a0a0;--fg3:#666;--accent:#fb923c;--border:rgba(255,255,255,.1)}
.card{background:#111118}
}
"#;

/// Content-Security-Policy header value.
///
/// No scripts at all; images and video may come from any http(s) host since
/// media lives either on this API or on a remote media host.
pub const CSP_HEADER: &str = "default-src 'none'; style-src 'unsafe-inline'; img-src https: http: data:; media-src https: http:; form-action 'none'; frame-ancestors 'none'";

/// Built-in placeholder used as the default preview image.
pub const PLACEHOLDER_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="1200" height="630" viewBox="0 0 1200 630"><rect width="1200" height="630" fill="#111"/><rect x="450" y="190" width="300" height="220" rx="16" fill="none" stroke="#555" stroke-width="12"/><circle cx="530" cy="260" r="28" fill="#555"/><path d="M470 390l90-90 60 60 50-40 70 70z" fill="#555"/></svg>"##;

/// File extensions that a `<video>` element can play directly.
const VIDEO_EXTENSIONS: &[&str] = &[".mp4", ".webm", ".mov", ".m4v", ".ogv"];

/// Open Graph metadata for a page.
pub struct OpenGraphData<'a> {
    /// OG title.
    pub title: &'a str,
    /// OG description (already truncated).
    pub description: &'a str,
    /// OG type ("article").
    pub og_type: &'a str,
    /// Absolute image URL.
    pub image: &'a str,
    /// Absolute video URL, if any.
    pub video: Option<&'a str>,
    /// RFC 3339 publication time.
    pub published_time: Option<&'a str>,
    /// Twitter card type ("summary", "summary_large_image").
    pub twitter_card_type: &'a str,
}

/// Render the full HTML page shell with `<head>`, OG tags, and body content.
///
/// When `redirect` is set, browsers are sent on to `canonical_url`
/// immediately; crawlers that only read `<head>` still see every tag.
pub fn page_shell(
    canonical_url: &str,
    og: OpenGraphData<'_>,
    redirect: bool,
    body_content: Markup,
    site_name: &str,
) -> Markup {
    html! {
        (maud::DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (og.title) }
                meta name="description" content=(og.description);
                link rel="canonical" href=(canonical_url);

                // Open Graph
                meta property="og:type" content=(og.og_type);
                meta property="og:title" content=(og.title);
                meta property="og:description" content=(og.description);
                meta property="og:image" content=(og.image);
                meta property="og:url" content=(canonical_url);
                meta property="og:site_name" content=(site_name);
                @if let Some(published) = og.published_time {
                    meta property="article:published_time" content=(published);
                }
                @if let Some(video) = og.video {
                    meta property="og:video" content=(video);
                    meta property="og:video:url" content=(video);
                    @if video.starts_with("https://") {
                        meta property="og:video:secure_url" content=(video);
                    }
                }

                // Twitter Card
                meta name="twitter:card" content=(og.twitter_card_type);
                meta name="twitter:title" content=(og.title);
                meta name="twitter:description" content=(og.description);
                meta name="twitter:image" content=(og.image);
                @if let Some(video) = og.video {
                    meta name="twitter:player:stream" content=(video);
                }

                @if redirect {
                    meta http-equiv="refresh" content={ "0; url=" (canonical_url) };
                }

                style { (PreEscaped(PAGE_CSS)) }
            }
            body {
                main { (body_content) }
            }
        }
    }
}

/// Render the video part of the fallback card.
///
/// Direct video files get an inline player; anything else (a hosted video
/// page, for instance) becomes a plain link.
pub fn video_block(video_url: &str, poster: &str) -> Markup {
    html! {
        @if is_video_file(video_url) {
            div class="card-video" {
                video controls="" preload="metadata" poster=(poster) {
                    source src=(video_url);
                }
            }
        } @else {
            p { a href=(video_url) rel="noopener" { "Watch video" } }
        }
    }
}

/// "Continue reading" button pointing at the canonical page.
pub fn continue_link(url: &str) -> Markup {
    html! {
        div class="actions" {
            a class="continue-link" href=(url) { "Continue reading" }
        }
    }
}

fn is_video_file(url: &str) -> bool {
    let lower = url.to_lowercase();
    let path = lower.split(['?', '#']).next().unwrap_or(&lower);
    VIDEO_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

/// Truncate to at most `max_chars` characters, ending in "..." when cut.
///
/// Counts characters rather than bytes, so multi-byte text is never split.
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{kept}...")
}

/// Format a timestamp as ("Mon DD, YYYY", RFC 3339).
pub fn format_timestamp(ts: &DateTime<Utc>) -> (String, String) {
    let display = ts.format("%b %d, %Y").to_string();
    let iso = ts.to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
    (display, iso)
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- truncate() tests --

    #[test]
    fn truncate_short_unchanged() {
        assert_eq!(truncate("hello", 150), "hello");
    }

    #[test]
    fn truncate_exact_limit_unchanged() {
        let s = "a".repeat(150);
        assert_eq!(truncate(&s, 150), s);
    }

    #[test]
    fn truncate_one_over_limit() {
        let s = "a".repeat(151);
        let out = truncate(&s, 150);
        assert_eq!(out, format!("{}...", "a".repeat(147)));
        assert_eq!(out.chars().count(), 150);
    }

    #[test]
    fn truncate_counts_characters_not_bytes() {
        let s = "é".repeat(150);
        assert_eq!(truncate(&s, 150), s);

        let long = "日本".repeat(100);
        let out = truncate(&long, 150);
        assert_eq!(out.chars().count(), 150);
        assert!(out.ends_with("..."));
    }

    #[test]
    fn truncate_emoji() {
        let s = "🎉".repeat(200);
        let out = truncate(&s, 150);
        assert!(out.starts_with(&"🎉".repeat(147)));
        assert!(out.ends_with("..."));
    }

    #[test]
    fn truncate_empty() {
        assert_eq!(truncate("", 150), "");
    }

    // -- is_video_file() tests --

    #[test]
    fn video_file_detection() {
        assert!(is_video_file("https://cdn.example.com/v.mp4"));
        assert!(is_video_file("https://cdn.example.com/V.WEBM?token=1"));
        assert!(!is_video_file("https://www.youtube.com/watch?v=abc"));
        assert!(!is_video_file("https://cdn.example.com/a.jpg"));
    }

    // -- video_block() tests --

    #[test]
    fn video_block_inline_player() {
        let html = video_block("https://cdn.example.com/v.mp4", "https://cdn.example.com/p.jpg")
            .into_string();
        assert!(html.contains("<video"));
        assert!(html.contains(r#"src="https://cdn.example.com/v.mp4""#));
        assert!(html.contains(r#"poster="https://cdn.example.com/p.jpg""#));
    }

    #[test]
    fn video_block_link_for_hosted_video() {
        let html = video_block("https://youtu.be/abc", "p").into_string();
        assert!(!html.contains("<video"));
        assert!(html.contains(r#"href="https://youtu.be/abc""#));
    }

    // -- format_timestamp() tests --

    #[test]
    fn format_timestamp_values() {
        let ts = DateTime::from_timestamp(1_704_067_200, 0).unwrap();
        let (display, iso) = format_timestamp(&ts);
        assert_eq!(display, "Jan 01, 2024");
        assert_eq!(iso, "2024-01-01T00:00:00Z");
    }

    // -- page_shell() tests --

    fn og<'a>(title: &'a str, video: Option<&'a str>) -> OpenGraphData<'a> {
        OpenGraphData {
            title,
            description: "desc",
            og_type: "article",
            image: "https://api.example.com/a.jpg",
            video,
            published_time: None,
            twitter_card_type: "summary_large_image",
        }
    }

    #[test]
    fn page_shell_redirect_toggle() {
        let with = page_shell("https://example.com/news/1", og("t", None), true, html! {}, "News")
            .into_string();
        assert!(with.contains(r#"<meta http-equiv="refresh" content="0; url=https://example.com/news/1">"#));

        let without =
            page_shell("https://example.com/news/1", og("t", None), false, html! {}, "News")
                .into_string();
        assert!(!without.contains("http-equiv"));
    }

    #[test]
    fn page_shell_video_tags_only_with_video() {
        let html = page_shell("u", og("t", None), false, html! {}, "News").into_string();
        assert!(!html.contains("og:video"));

        let html = page_shell(
            "u",
            og("t", Some("https://cdn.example.com/v.mp4")),
            false,
            html! {},
            "News",
        )
        .into_string();
        assert!(html.contains(r#"<meta property="og:video" content="https://cdn.example.com/v.mp4">"#));
        assert!(html.contains("og:video:secure_url"));
        assert!(html.contains("twitter:player:stream"));
    }

    #[test]
    fn page_shell_escapes_title() {
        let html = page_shell("u", og(r#"a"><script>x</script>"#, None), false, html! {}, "News")
            .into_string();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&quot;&gt;&lt;script&gt;"));
    }
}
