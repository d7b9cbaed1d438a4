//! Local-filesystem [`AssetStore`].
//!
//! Files are written to a configured directory under a random 32-hex-char
//! name and exposed as `<public_prefix>/<name>.<ext>`, which the static file
//! layer serves.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use super::{check_poster_upload, AssetStore, PosterUpload, DEFAULT_PUBLIC_PREFIX};
use crate::error::CoreError;

#[derive(Debug, Clone)]
pub struct LocalAssetStore {
    root: PathBuf,
    public_prefix: String,
}

impl LocalAssetStore {
    /// Store files under `root`, issuing references with `public_prefix`
    /// (a trailing `/` is ignored).
    pub fn new(root: impl Into<PathBuf>, public_prefix: impl Into<String>) -> Self {
        let public_prefix = public_prefix.into();
        let trimmed = public_prefix.trim_end_matches('/');
        Self {
            root: root.into(),
            public_prefix: if trimmed.is_empty() {
                DEFAULT_PUBLIC_PREFIX.to_string()
            } else {
                trimmed.to_string()
            },
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn public_prefix(&self) -> &str {
        &self.public_prefix
    }

    /// Map an issued reference back to its file path.
    ///
    /// Returns `None` for references this store did not issue, including any
    /// that try to escape the root directory.
    pub fn local_path(&self, poster_ref: &str) -> Option<PathBuf> {
        let name = poster_ref
            .strip_prefix(self.public_prefix.as_str())?
            .strip_prefix('/')?;
        let is_plain_name = !name.is_empty()
            && !name.starts_with('.')
            && !name.contains(['/', '\\'])
            && name != "..";
        is_plain_name.then(|| self.root.join(name))
    }
}

#[async_trait]
impl AssetStore for LocalAssetStore {
    async fn store(&self, upload: PosterUpload) -> Result<String, CoreError> {
        let ext = check_poster_upload(&upload)?;

        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| CoreError::Storage(format!("Failed to create upload directory: {e}")))?;

        let name = format!("{}.{ext}", Uuid::new_v4().simple());
        let path = self.root.join(&name);

        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|e| CoreError::Storage(format!("Failed to create poster file: {e}")))?;
        file.write_all(&upload.bytes)
            .await
            .map_err(|e| CoreError::Storage(format!("Failed to write poster file: {e}")))?;
        file.flush()
            .await
            .map_err(|e| CoreError::Storage(format!("Failed to write poster file: {e}")))?;

        tracing::debug!(path = %path.display(), size = upload.bytes.len(), "Stored poster");
        Ok(format!("{}/{name}", self.public_prefix))
    }

    async fn remove(&self, poster_ref: &str) -> Result<bool, CoreError> {
        let Some(path) = self.local_path(poster_ref) else {
            return Ok(false);
        };

        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "Removed poster");
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(CoreError::Storage(format!(
                "Failed to remove poster file: {e}"
            ))),
        }
    }
}
