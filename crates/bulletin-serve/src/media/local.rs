//! Local-disk media backend.

use std::path::{Path, PathBuf};

use super::MediaError;

/// Route the upload directory is served under.
pub const UPLOADS_ROUTE: &str = "/uploads";

/// Writes uploads into a directory that the API serves statically.
#[derive(Debug, Clone)]
pub struct LocalMediaStore {
    dir: PathBuf,
}

impl LocalMediaStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Upload directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub(super) async fn store(&self, name: &str, data: &[u8]) -> Result<String, MediaError> {
        let to_err = |source| MediaError::Local {
            name: name.to_string(),
            source,
        };

        tokio::fs::create_dir_all(&self.dir).await.map_err(to_err)?;
        tokio::fs::write(self.dir.join(name), data)
            .await
            .map_err(to_err)?;

        Ok(format!("{UPLOADS_ROUTE}/{name}"))
    }

    pub(super) async fn remove(&self, reference: &str) {
        let Some(name) = reference
            .strip_prefix(UPLOADS_ROUTE)
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|name| !name.is_empty() && !name.contains(['/', '\\']))
        else {
            tracing::warn!(reference = %reference, "not a local upload, nothing removed");
            return;
        };

        if let Err(e) = tokio::fs::remove_file(self.dir.join(name)).await {
            tracing::warn!(reference = %reference, error = %e, "failed to remove upload");
        }
    }
}
