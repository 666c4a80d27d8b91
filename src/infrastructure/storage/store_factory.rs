use std::path::PathBuf;
use std::sync::Arc;

use crate::application::ports::{BlobStore, BlobStoreError};
use crate::presentation::config::{StorageProviderSetting, StorageSettings};

use super::azure_blob_store::AzureBlobStore;
use super::local_blob_store::LocalBlobStore;

pub struct BlobStoreFactory;

impl BlobStoreFactory {
    pub fn create(settings: &StorageSettings) -> Result<Arc<dyn BlobStore>, BlobStoreError> {
        match settings.provider {
            StorageProviderSetting::Local => {
                let path = PathBuf::from(&settings.local_path);
                let store = LocalBlobStore::new(path)?;
                Ok(Arc::new(store))
            }
            StorageProviderSetting::Azure => {
                let connection_string =
                    settings.connection_string.as_deref().ok_or_else(|| {
                        BlobStoreError::Configuration(
                            "AZURE_STORAGE_CONNECTION_STRING required".into(),
                        )
                    })?;
                let store =
                    AzureBlobStore::from_connection_string(connection_string, &settings.container)?;
                Ok(Arc::new(store))
            }
        }
    }
}
