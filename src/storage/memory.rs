//! In-memory blob store

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::error::StorageError;

use super::types::{ObjectMetadata, StorageObject};
use super::BlobStore;

/// Process-local blob store
#[derive(Clone, Default)]
pub struct MemoryBlobStore {
    objects: Arc<RwLock<HashMap<String, StorageObject>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored objects
    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }

    /// Stored object under `key`, if any
    pub async fn get(&self, key: &str) -> Option<StorageObject> {
        self.objects.read().await.get(key).cloned()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn put(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<ObjectMetadata, StorageError> {
        let metadata = ObjectMetadata {
            key: key.to_string(),
            size: data.len() as i64,
            last_modified: Some(Utc::now()),
            content_type: Some(content_type.to_string()),
            etag: None,
        };

        let mut objects = self.objects.write().await;
        objects.insert(
            key.to_string(),
            StorageObject {
                metadata: metadata.clone(),
                data,
            },
        );

        Ok(metadata)
    }
}
