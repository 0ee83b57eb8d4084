//! HTTP object storage client.
//!
//! Talks to an S3-style endpoint with plain PUT/DELETE requests. Uploads are
//! single-shot (not resumable), so progress is reported once at completion.

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;

use cideacc_core::ports::{AssetStore, AssetUpload, ProgressFn, StorageError, object_key};

/// Storage endpoint configuration.
#[derive(Debug, Clone)]
pub struct HttpStorageConfig {
    /// Endpoint uploads are PUT against, e.g. `https://storage.internal/cideacc`.
    pub endpoint: String,
    /// Base of the public URLs handed out for uploaded assets. Often the same
    /// as `endpoint`, but may point at a CDN.
    pub public_base_url: String,
}

/// Asset store over an HTTP object storage endpoint.
pub struct HttpAssetStore {
    client: reqwest::Client,
    config: HttpStorageConfig,
}

impl HttpAssetStore {
    pub fn new(config: HttpStorageConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Map a public URL back to the object key it was minted from.
    fn key_for(&self, url: &str) -> Option<String> {
        url.strip_prefix(self.config.public_base_url.trim_end_matches('/'))
            .map(|rest| rest.trim_start_matches('/').to_string())
    }

    fn object_url(&self, key: &str) -> String {
        format!("{}/{}", self.config.endpoint.trim_end_matches('/'), key)
    }
}

#[async_trait]
impl AssetStore for HttpAssetStore {
    async fn upload(
        &self,
        file: &AssetUpload,
        namespace: &str,
        progress: Option<&ProgressFn>,
    ) -> Result<String, StorageError> {
        let key = object_key(namespace, &file.file_name);

        let response = self
            .client
            .put(self.object_url(&key))
            .header(CONTENT_TYPE, &file.content_type)
            .body(file.bytes.clone())
            .send()
            .await
            .map_err(|e| StorageError::Upload(e.to_string()))?;

        if !response.status().is_success() {
            return Err(StorageError::Upload(format!(
                "storage endpoint returned {}",
                response.status()
            )));
        }

        if let Some(callback) = progress {
            callback(100);
        }

        tracing::debug!(%key, size = file.bytes.len(), "asset uploaded");
        Ok(format!(
            "{}/{}",
            self.config.public_base_url.trim_end_matches('/'),
            key
        ))
    }

    async fn remove(&self, url: &str) -> Result<(), StorageError> {
        let Some(key) = self.key_for(url) else {
            return Err(StorageError::Backend(format!(
                "url does not belong to the managed bucket: {url}"
            )));
        };

        let response = self
            .client
            .delete(self.object_url(&key))
            .send()
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        // An already-absent object deletes silently.
        if response.status().is_success() || response.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }

        Err(StorageError::Backend(format!(
            "delete returned {}",
            response.status()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> HttpAssetStore {
        HttpAssetStore::new(HttpStorageConfig {
            endpoint: "https://storage.internal/cideacc/".to_string(),
            public_base_url: "https://assets.cideacc.org".to_string(),
        })
    }

    #[test]
    fn key_roundtrip_through_public_url() {
        let store = store();
        let key = store
            .key_for("https://assets.cideacc.org/posts/1700000000000_cover.png")
            .unwrap();
        assert_eq!(key, "posts/1700000000000_cover.png");
    }

    #[test]
    fn foreign_urls_are_rejected() {
        let store = store();
        assert!(store.key_for("https://elsewhere.example/file.png").is_none());
    }

    #[test]
    fn object_url_normalizes_slashes() {
        let store = store();
        assert_eq!(
            store.object_url("posts/a.png"),
            "https://storage.internal/cideacc/posts/a.png"
        );
    }
}
