//! Media ingestion: storing uploaded images and videos.
//!
//! Records never hold media bytes, only a reference. The local backend
//! yields host-relative `/uploads/<name>` paths; the S3 backend yields
//! absolute public URLs. The preview renderer resolves either form.

mod local;
mod s3;

use std::sync::atomic::{AtomicU64, Ordering};

use bytes::Bytes;

pub use self::local::{LocalMediaStore, UPLOADS_ROUTE};
pub use self::s3::S3MediaStore;
use crate::state::MediaConfig;

/// Longest sanitized original name kept in a stored name.
const MAX_NAME_CHARS: usize = 100;

/// Disambiguates uploads landing in the same millisecond.
static UPLOAD_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Media ingestion error.
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    /// The request carried no image.
    #[error("Image is required")]
    MissingImage,

    /// Writing to the upload directory failed.
    #[error("failed to store {name}: {source}")]
    Local {
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// The remote media host rejected the upload.
    #[error("failed to upload {key}: {message}")]
    Remote { key: String, message: String },
}

/// One uploaded file part.
#[derive(Debug, Clone)]
pub struct MediaUpload {
    /// Client-supplied file name.
    pub file_name: String,
    /// Client-supplied content type.
    pub content_type: Option<String>,
    pub data: Bytes,
}

/// Media parts of a creation request.
#[derive(Debug, Clone, Default)]
pub struct MediaForm {
    pub image: Option<MediaUpload>,
    pub video: Option<MediaUpload>,
    /// Pre-existing video URL, stored verbatim.
    pub video_url: Option<String>,
}

/// References produced by [`MediaBackend::ingest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredMedia {
    pub image_url: String,
    pub video_url: Option<String>,
}

/// Storage backend for uploaded media.
#[derive(Clone)]
pub enum MediaBackend {
    Local(LocalMediaStore),
    S3(S3MediaStore),
}

impl MediaBackend {
    /// Build the backend selected by configuration.
    pub async fn from_config(config: &MediaConfig) -> Self {
        match config {
            MediaConfig::Local { dir } => Self::Local(LocalMediaStore::new(dir.clone())),
            MediaConfig::S3 {
                bucket,
                prefix,
                public_url,
                endpoint,
            } => Self::S3(
                S3MediaStore::connect(bucket, prefix, public_url, endpoint.as_deref()).await,
            ),
        }
    }

    /// Backend name, used as a metrics label.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Local(_) => "local",
            Self::S3(_) => "s3",
        }
    }

    /// Durably store one upload and return its reference.
    pub async fn store(&self, upload: &MediaUpload) -> Result<String, MediaError> {
        let name = stored_name(&upload.file_name);
        let reference = match self {
            Self::Local(local) => local.store(&name, &upload.data).await?,
            Self::S3(remote) => remote.store(&name, upload).await?,
        };

        metrics::counter!("media_stored_total", "backend" => self.name()).increment(1);
        metrics::counter!("media_stored_bytes_total").increment(upload.data.len() as u64);
        tracing::info!(
            reference = %reference,
            bytes = upload.data.len(),
            backend = self.name(),
            "media stored"
        );

        Ok(reference)
    }

    /// Delete previously stored media. Failures are logged, not returned.
    pub async fn remove(&self, reference: &str) {
        match self {
            Self::Local(local) => local.remove(reference).await,
            Self::S3(remote) => remote.remove(reference).await,
        }
    }

    /// Store the media parts of a creation request.
    ///
    /// The image is required. A video file part takes precedence over a
    /// video URL. If the video fails to store, the image is removed again.
    pub async fn ingest(&self, form: MediaForm) -> Result<StoredMedia, MediaError> {
        let image = form
            .image
            .filter(|upload| !upload.data.is_empty())
            .ok_or(MediaError::MissingImage)?;
        let image_url = self.store(&image).await?;

        let video_url = match form.video.filter(|upload| !upload.data.is_empty()) {
            Some(video) => match self.store(&video).await {
                Ok(reference) => Some(reference),
                Err(err) => {
                    self.remove(&image_url).await;
                    return Err(err);
                }
            },
            None => form
                .video_url
                .map(|url| url.trim().to_string())
                .filter(|url| !url.is_empty()),
        };

        Ok(StoredMedia {
            image_url,
            video_url,
        })
    }
}

/// Collision-free stored name: `<unix-millis>-<counter>-<sanitized name>`.
pub fn stored_name(original: &str) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let seq = UPLOAD_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{millis}-{seq}-{}", sanitize_file_name(original))
}

/// Reduce a client file name to `[A-Za-z0-9._-]`.
///
/// Path components are dropped, other characters become `-`, leading dots
/// are stripped and an empty result becomes `upload`.
pub fn sanitize_file_name(original: &str) -> String {
    let base = original.rsplit(['/', '\\']).next().unwrap_or(original);
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '-'
            }
        })
        .take(MAX_NAME_CHARS)
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}
