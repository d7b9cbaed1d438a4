//! In-process [`AssetStore`] for tests and tooling.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{check_poster_upload, AssetStore, PosterUpload, DEFAULT_PUBLIC_PREFIX};
use crate::error::CoreError;

/// Keeps poster bytes in a map keyed by their issued reference.
#[derive(Debug, Default)]
pub struct MemoryAssetStore {
    files: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryAssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn contains(&self, poster_ref: &str) -> bool {
        self.files.read().await.contains_key(poster_ref)
    }

    pub async fn len(&self) -> usize {
        self.files.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.files.read().await.is_empty()
    }
}

#[async_trait]
impl AssetStore for MemoryAssetStore {
    async fn store(&self, upload: PosterUpload) -> Result<String, CoreError> {
        let ext = check_poster_upload(&upload)?;
        let poster_ref = format!("{DEFAULT_PUBLIC_PREFIX}/{}.{ext}", Uuid::new_v4().simple());
        self.files
            .write()
            .await
            .insert(poster_ref.clone(), upload.bytes);
        Ok(poster_ref)
    }

    async fn remove(&self, poster_ref: &str) -> Result<bool, CoreError> {
        Ok(self.files.write().await.remove(poster_ref).is_some())
    }
}
