use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use object_store::azure::{MicrosoftAzure, MicrosoftAzureBuilder};
use object_store::path::Path as StorePath;
use object_store::signer::Signer;
use object_store::{ObjectStore, PutPayload};
use reqwest::{Method, Url};

use crate::application::ports::{BlobStore, BlobStoreError};
use crate::domain::{BlobName, StorageConnectionString};

pub const DEFAULT_CONTAINER: &str = "audio-files";

pub struct AzureBlobStore {
    inner: Arc<MicrosoftAzure>,
    container: String,
}

impl AzureBlobStore {
    pub fn new(account: &str, access_key: &str, container: &str) -> Result<Self, BlobStoreError> {
        let store = MicrosoftAzureBuilder::new()
            .with_account(account)
            .with_access_key(access_key)
            .with_container_name(container)
            .build()
            .map_err(|e| BlobStoreError::Configuration(e.to_string()))?;

        Ok(Self {
            inner: Arc::new(store),
            container: container.to_string(),
        })
    }

    pub fn from_connection_string(
        connection_string: &str,
        container: &str,
    ) -> Result<Self, BlobStoreError> {
        let parsed = StorageConnectionString::parse(connection_string)
            .map_err(|e| BlobStoreError::Configuration(e.to_string()))?;

        match parsed {
            StorageConnectionString::Account {
                account_name,
                account_key,
            } => Self::new(&account_name, &account_key, container),
            StorageConnectionString::DevelopmentStorage => {
                let store = MicrosoftAzureBuilder::new()
                    .with_use_emulator(true)
                    .with_container_name(container)
                    .build()
                    .map_err(|e| BlobStoreError::Configuration(e.to_string()))?;
                Ok(Self {
                    inner: Arc::new(store),
                    container: container.to_string(),
                })
            }
        }
    }
}

#[async_trait]
impl BlobStore for AzureBlobStore {
    async fn upload(&self, name: &BlobName, data: Bytes) -> Result<(), BlobStoreError> {
        let store_path = StorePath::from(name.as_str());
        self.inner
            .put(&store_path, PutPayload::from(data))
            .await
            .map_err(|e| BlobStoreError::UploadFailed(e.to_string()))?;

        tracing::info!(container = %self.container, blob = %name, "Blob uploaded");
        Ok(())
    }

    async fn signed_read_url(
        &self,
        name: &BlobName,
        expires_in: Duration,
    ) -> Result<Url, BlobStoreError> {
        let store_path = StorePath::from(name.as_str());
        // A GET-only signature yields a read-only SAS scoped to this blob.
        self.inner
            .signed_url(Method::GET, &store_path, expires_in)
            .await
            .map_err(|e| BlobStoreError::SigningFailed(e.to_string()))
    }

    async fn delete(&self, name: &BlobName) -> Result<(), BlobStoreError> {
        let store_path = StorePath::from(name.as_str());
        match self.inner.delete(&store_path).await {
            Ok(()) => {
                tracing::debug!(blob = %name, "Blob deleted");
                Ok(())
            }
            Err(object_store::Error::NotFound { .. }) => Ok(()),
            Err(e) => Err(BlobStoreError::DeleteFailed(e.to_string())),
        }
    }
}
