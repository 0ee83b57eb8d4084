//! In-memory asset store - fallback when no storage endpoint is configured.
//! Assets are lost on process restart.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use cideacc_core::ports::{AssetStore, AssetUpload, ProgressFn, StorageError, object_key};

struct StoredObject {
    bytes: Vec<u8>,
    content_type: String,
}

/// Asset store keeping objects in a HashMap behind an async RwLock.
#[derive(Default)]
pub struct InMemoryAssetStore {
    objects: RwLock<HashMap<String, StoredObject>>,
}

impl InMemoryAssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an asset is still present. Test hook.
    pub async fn contains(&self, url: &str) -> bool {
        self.objects.read().await.contains_key(url)
    }

    pub async fn object_count(&self) -> usize {
        self.objects.read().await.len()
    }
}

#[async_trait]
impl AssetStore for InMemoryAssetStore {
    async fn upload(
        &self,
        file: &AssetUpload,
        namespace: &str,
        progress: Option<&ProgressFn>,
    ) -> Result<String, StorageError> {
        let url = format!("memory://{}", object_key(namespace, &file.file_name));
        self.objects.write().await.insert(
            url.clone(),
            StoredObject {
                bytes: file.bytes.clone(),
                content_type: file.content_type.clone(),
            },
        );
        // In-memory writes complete in one step.
        if let Some(callback) = progress {
            callback(100);
        }
        Ok(url)
    }

    async fn remove(&self, url: &str) -> Result<(), StorageError> {
        // Deleting an absent asset succeeds silently.
        self.objects.write().await.remove(url);
        Ok(())
    }
}
