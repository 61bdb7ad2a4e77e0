//! S3 media backend.
//!
//! Credentials come from the AWS SDK default chain (environment, profile,
//! instance role). A custom endpoint switches to path-style addressing for
//! S3-compatible hosts such as MinIO or R2.

use aws_sdk_s3::Client as S3Client;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;

use super::{MediaError, MediaUpload};

/// Uploads objects to a bucket and hands out their public URLs.
#[derive(Debug, Clone)]
pub struct S3MediaStore {
    client: S3Client,
    bucket: String,
    prefix: String,
    public_url: String,
}

impl S3MediaStore {
    /// Load AWS configuration and build the client.
    pub async fn connect(
        bucket: &str,
        prefix: &str,
        public_url: &str,
        endpoint: Option<&str>,
    ) -> Self {
        let shared = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let mut builder = aws_sdk_s3::config::Builder::from(&shared);
        if let Some(endpoint) = endpoint {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        tracing::info!(bucket = %bucket, prefix = %prefix, endpoint = ?endpoint, "S3 media backend ready");

        Self::from_client(S3Client::from_conf(builder.build()), bucket, prefix, public_url)
    }

    /// Wrap an already configured client.
    pub fn from_client(client: S3Client, bucket: &str, prefix: &str, public_url: &str) -> Self {
        Self {
            client,
            bucket: bucket.to_string(),
            prefix: prefix.to_string(),
            public_url: public_url.trim_end_matches('/').to_string(),
        }
    }

    pub(super) async fn store(&self, name: &str, upload: &MediaUpload) -> Result<String, MediaError> {
        let key = format!("{}{name}", self.prefix);

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(upload.data.clone()))
            .set_content_type(upload.content_type.clone())
            .send()
            .await
            .map_err(|e| MediaError::Remote {
                key: key.clone(),
                message: DisplayErrorContext(&e).to_string(),
            })?;

        Ok(object_url(&self.public_url, &key))
    }

    pub(super) async fn remove(&self, reference: &str) {
        let Some(key) = key_from_url(&self.public_url, reference) else {
            tracing::warn!(reference = %reference, "not an object in this bucket, nothing removed");
            return;
        };

        let result = self
            .client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await;
        if let Err(e) = result {
            tracing::warn!(key = %key, error = %DisplayErrorContext(&e), "failed to delete object");
        }
    }
}

fn object_url(public_url: &str, key: &str) -> String {
    format!("{public_url}/{key}")
}

fn key_from_url<'a>(public_url: &str, reference: &'a str) -> Option<&'a str> {
    reference
        .strip_prefix(public_url)
        .and_then(|rest| rest.strip_prefix('/'))
        .filter(|key| !key.is_empty())
}
