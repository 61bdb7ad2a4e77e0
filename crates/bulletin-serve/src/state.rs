//! Application state and configuration.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use bulletin_core::NewsStore;
use bulletin_preview::PreviewConfig;

use crate::media::MediaBackend;

/// Default request body limit (25 MiB).
const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Where uploaded media is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaConfig {
    /// Files under a local directory, served back at `/uploads`.
    Local {
        /// Upload directory.
        dir: PathBuf,
    },
    /// Objects in an S3 (or S3-compatible) bucket.
    S3 {
        /// Bucket name.
        bucket: String,
        /// Key prefix, e.g. "news/".
        prefix: String,
        /// Public base URL objects are reachable under.
        public_url: String,
        /// Custom endpoint for S3-compatible hosts.
        endpoint: Option<String>,
    },
}

/// Application configuration loaded from environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (e.g., "0.0.0.0:5000").
    pub bind_addr: String,

    /// Path to the SQLite news database.
    pub db_path: PathBuf,

    /// Maximum accepted request body size in bytes.
    pub max_upload_bytes: usize,

    /// Port for the Prometheus exporter; no exporter when unset.
    pub metrics_port: Option<u16>,

    /// Media backend selection.
    pub media: MediaConfig,

    /// URLs and branding used by the preview renderer.
    pub preview: Arc<PreviewConfig>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required environment variables:
    /// - None for the local media backend
    /// - `MEDIA_S3_BUCKET` and `MEDIA_S3_PUBLIC_URL` when `MEDIA_BACKEND=s3`
    ///
    /// Optional environment variables:
    /// - `NEWS_BIND_ADDR`: Server bind address (default: "0.0.0.0:5000")
    /// - `NEWS_DB_PATH`: SQLite database path (default: "news.db")
    /// - `NEWS_API_BASE_URL`: Public URL of this API (default: "http://localhost:5000")
    /// - `NEWS_FRONTEND_BASE_URL`: Article page base (default: "http://localhost:3000/news")
    /// - `NEWS_DEFAULT_IMAGE_URL`: Preview image for records without one
    /// - `NEWS_SITE_NAME`: Site name in previews (default: "News")
    /// - `NEWS_MAX_UPLOAD_BYTES`: Request body limit (default: 25 MiB)
    /// - `NEWS_METRICS_PORT`: Prometheus exporter port
    /// - `MEDIA_BACKEND`: "local" or "s3" (default: "local")
    /// - `MEDIA_LOCAL_DIR`: Upload directory (default: "uploads")
    /// - `MEDIA_S3_PREFIX`: Key prefix (default: "news/")
    /// - `MEDIA_S3_ENDPOINT`: Custom S3 endpoint
    pub fn from_env() -> anyhow::Result<Self> {
        let bind_addr =
            std::env::var("NEWS_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:5000".to_string());

        let db_path = PathBuf::from(
            std::env::var("NEWS_DB_PATH").unwrap_or_else(|_| "news.db".to_string()),
        );

        let api_base_url = std::env::var("NEWS_API_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:5000".to_string());
        let frontend_base_url = std::env::var("NEWS_FRONTEND_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:3000/news".to_string());

        let mut preview = PreviewConfig::new(api_base_url, frontend_base_url);
        if let Some(url) = non_empty_var("NEWS_DEFAULT_IMAGE_URL") {
            preview = preview.with_default_image(url);
        }
        if let Some(name) = non_empty_var("NEWS_SITE_NAME") {
            preview = preview.with_site_name(name);
        }

        let max_upload_bytes = match non_empty_var("NEWS_MAX_UPLOAD_BYTES") {
            Some(value) => value
                .parse()
                .with_context(|| format!("NEWS_MAX_UPLOAD_BYTES is not a number: {value}"))?,
            None => DEFAULT_MAX_UPLOAD_BYTES,
        };

        let metrics_port = non_empty_var("NEWS_METRICS_PORT")
            .map(|value| {
                value
                    .parse::<u16>()
                    .with_context(|| format!("NEWS_METRICS_PORT is not a port: {value}"))
            })
            .transpose()?;

        let media = media_from_env()?;

        tracing::info!(
            bind_addr = %bind_addr,
            db_path = %db_path.display(),
            api_base_url = %preview.api_base_url,
            frontend_base_url = %preview.frontend_base_url,
            max_upload_bytes,
            media = ?media,
            "configuration loaded"
        );

        Ok(Self {
            bind_addr,
            db_path,
            max_upload_bytes,
            metrics_port,
            media,
            preview: Arc::new(preview),
        })
    }
}

fn media_from_env() -> anyhow::Result<MediaConfig> {
    let backend = std::env::var("MEDIA_BACKEND").unwrap_or_else(|_| "local".to_string());

    match backend.trim().to_ascii_lowercase().as_str() {
        "" | "local" => {
            let dir = std::env::var("MEDIA_LOCAL_DIR").unwrap_or_else(|_| "uploads".to_string());
            Ok(MediaConfig::Local {
                dir: PathBuf::from(dir),
            })
        }
        "s3" => {
            let bucket = non_empty_var("MEDIA_S3_BUCKET").ok_or_else(|| {
                anyhow::anyhow!("MEDIA_S3_BUCKET is required when MEDIA_BACKEND=s3")
            })?;
            let public_url = non_empty_var("MEDIA_S3_PUBLIC_URL").ok_or_else(|| {
                anyhow::anyhow!("MEDIA_S3_PUBLIC_URL is required when MEDIA_BACKEND=s3")
            })?;
            let prefix = std::env::var("MEDIA_S3_PREFIX").unwrap_or_else(|_| "news/".to_string());
            Ok(MediaConfig::S3 {
                bucket,
                prefix,
                public_url: public_url.trim_end_matches('/').to_string(),
                endpoint: non_empty_var("MEDIA_S3_ENDPOINT"),
            })
        }
        other => anyhow::bail!("unknown MEDIA_BACKEND {other:?} (expected \"local\" or \"s3\")"),
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Shared application state available to all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// News record store.
    pub store: NewsStore,

    /// Media backend for uploads.
    pub media: MediaBackend,

    /// Application configuration.
    pub config: Arc<Config>,
}

impl AppState {
    /// Open the store and media backend described by the configuration.
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = NewsStore::open(&config.db_path)
            .with_context(|| format!("failed to open {}", config.db_path.display()))?;
        let media = MediaBackend::from_config(&config.media).await;

        tracing::info!(
            records = store.count()?,
            media_backend = media.name(),
            "application state initialized"
        );

        Ok(Self::from_parts(config, store, media))
    }

    /// Assemble state from already-constructed parts.
    pub fn from_parts(config: Config, store: NewsStore, media: MediaBackend) -> Self {
        Self {
            store,
            media,
            config: Arc::new(config),
        }
    }
}
