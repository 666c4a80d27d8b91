mod azure_blob_store;
mod local_blob_store;
mod store_factory;

pub use azure_blob_store::{AzureBlobStore, DEFAULT_CONTAINER};
pub use local_blob_store::LocalBlobStore;
pub use store_factory::BlobStoreFactory;
