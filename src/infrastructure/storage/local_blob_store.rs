use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use object_store::local::LocalFileSystem;
use object_store::path::Path as StorePath;
use object_store::{ObjectStore, PutPayload};
use reqwest::Url;

use crate::application::ports::{BlobStore, BlobStoreError};
use crate::domain::BlobName;

/// Filesystem-backed blob store for offline development.
///
/// Its "signed" URLs are plain `file://` URLs; expiry is not enforced.
pub struct LocalBlobStore {
    inner: Arc<LocalFileSystem>,
    base_path: PathBuf,
}

impl LocalBlobStore {
    pub fn new(base_path: PathBuf) -> Result<Self, BlobStoreError> {
        std::fs::create_dir_all(&base_path)
            .map_err(|e| BlobStoreError::Configuration(e.to_string()))?;
        let base_path = base_path
            .canonicalize()
            .map_err(|e| BlobStoreError::Configuration(e.to_string()))?;
        let fs = LocalFileSystem::new_with_prefix(&base_path)
            .map_err(|e| BlobStoreError::Configuration(e.to_string()))?;
        Ok(Self {
            inner: Arc::new(fs),
            base_path,
        })
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn upload(&self, name: &BlobName, data: Bytes) -> Result<(), BlobStoreError> {
        let store_path = StorePath::from(name.as_str());
        self.inner
            .put(&store_path, PutPayload::from(data))
            .await
            .map_err(|e| BlobStoreError::UploadFailed(e.to_string()))?;
        Ok(())
    }

    async fn signed_read_url(
        &self,
        name: &BlobName,
        _expires_in: Duration,
    ) -> Result<Url, BlobStoreError> {
        let store_path = StorePath::from(name.as_str());
        self.inner
            .head(&store_path)
            .await
            .map_err(|e| BlobStoreError::SigningFailed(e.to_string()))?;

        Url::from_file_path(self.base_path.join(name.as_str())).map_err(|_| {
            BlobStoreError::SigningFailed(format!("not an absolute path: {}", name))
        })
    }

    async fn delete(&self, name: &BlobName) -> Result<(), BlobStoreError> {
        let store_path = StorePath::from(name.as_str());
        match self.inner.delete(&store_path).await {
            Ok(()) | Err(object_store::Error::NotFound { .. }) => Ok(()),
            Err(e) => Err(BlobStoreError::DeleteFailed(e.to_string())),
        }
    }
}
