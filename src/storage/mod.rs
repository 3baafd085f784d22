//! Storage module for blob backends
//!
//! Snapshots are stored as JSON objects keyed `<store>/<key>.json`. Supports
//! MinIO, Cloudflare R2, Backblaze B2 and AWS S3, plus a process-local
//! in-memory backend for development and tests.

mod memory;
mod s3_client;
mod types;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{StorageConfig, StorageProvider};
use crate::error::StorageError;

pub use memory::MemoryBlobStore;
pub use s3_client::S3Client;
pub use types::*;

/// Blob storage backend
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Short backend name for logging
    fn backend(&self) -> &'static str;

    /// Write an object, replacing any previous value under `key`
    async fn put(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<ObjectMetadata, StorageError>;
}

/// Build the backend selected by the configuration
pub async fn connect(config: &StorageConfig) -> Result<Arc<dyn BlobStore>, StorageError> {
    let store: Arc<dyn BlobStore> = match config.provider {
        StorageProvider::Memory => Arc::new(MemoryBlobStore::new()),
        StorageProvider::Minio | StorageProvider::R2 | StorageProvider::S3 | StorageProvider::B2 => {
            Arc::new(S3Client::new(config).await?)
        }
    };

    tracing::info!(backend = store.backend(), "Blob store ready");
    Ok(store)
}
