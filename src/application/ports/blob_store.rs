use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Url;

use crate::domain::BlobName;

/// Remote container holding the converted audio while the speech service reads it.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Uploads `data`, overwriting any blob of the same name.
    async fn upload(&self, name: &BlobName, data: Bytes) -> Result<(), BlobStoreError>;

    /// A read-only URL scoped to this single blob, valid for `expires_in`.
    async fn signed_read_url(
        &self,
        name: &BlobName,
        expires_in: Duration,
    ) -> Result<Url, BlobStoreError>;

    /// Deleting a blob that does not exist succeeds.
    async fn delete(&self, name: &BlobName) -> Result<(), BlobStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum BlobStoreError {
    #[error("blob store configuration: {0}")]
    Configuration(String),
    #[error("upload failed: {0}")]
    UploadFailed(String),
    #[error("signing failed: {0}")]
    SigningFailed(String),
    #[error("delete failed: {0}")]
    DeleteFailed(String),
}
