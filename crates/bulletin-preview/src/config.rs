//! Static configuration consumed by the preview renderer.

/// File name of the built-in placeholder image served by the API.
pub const PLACEHOLDER_PATH: &str = "/placeholder.svg";

/// Preview renderer configuration.
///
/// Built once at process start and shared read-only by every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewConfig {
    /// Public base URL of this API (e.g., "https://api.example.com").
    /// Host-relative media references are joined onto it.
    pub api_base_url: String,

    /// Base URL of the user-facing article pages (e.g., "https://example.com/news").
    /// The canonical page URL of a record is `{frontend_base_url}/{id}`.
    pub frontend_base_url: String,

    /// Image used in previews of records without one.
    pub default_image_url: String,

    /// Site name shown in `og:site_name`.
    pub site_name: String,
}

impl PreviewConfig {
    /// Create a configuration with the placeholder image and default site name.
    ///
    /// Trailing slashes are stripped from both base URLs.
    pub fn new(api_base_url: impl Into<String>, frontend_base_url: impl Into<String>) -> Self {
        let api_base_url = strip_trailing_slash(api_base_url.into());
        let frontend_base_url = strip_trailing_slash(frontend_base_url.into());
        let default_image_url = format!("{api_base_url}{PLACEHOLDER_PATH}");

        Self {
            api_base_url,
            frontend_base_url,
            default_image_url,
            site_name: "News".to_string(),
        }
    }

    /// Override the default image.
    pub fn with_default_image(mut self, url: impl Into<String>) -> Self {
        self.default_image_url = url.into();
        self
    }

    /// Override the site name.
    pub fn with_site_name(mut self, name: impl Into<String>) -> Self {
        self.site_name = name.into();
        self
    }
}

fn strip_trailing_slash(url: String) -> String {
    url.trim_end_matches('/').to_string()
}
