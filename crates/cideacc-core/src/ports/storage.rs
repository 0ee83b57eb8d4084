//! Object storage port - binary assets live outside the record store.

use async_trait::async_trait;

/// Upload progress callback. Invoked with monotonically non-decreasing
/// percentages from 0 to 100; non-resumable transports may report a single
/// 100 once the transfer completes.
pub type ProgressFn = dyn Fn(u8) + Send + Sync;

/// Storage namespaces. Each asset kind gets its own prefix so a reconciliation
/// sweep can reason about ownership from the key alone.
pub mod namespaces {
    pub const POST_IMAGES: &str = "posts";
    pub const STUDY_PDFS: &str = "studies/pdfs";
    pub const STUDY_THUMBNAILS: &str = "studies/thumbnails";
}

/// A binary file handed to the publish workflow.
#[derive(Debug, Clone)]
pub struct AssetUpload {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub content_type: String,
}

/// Build the object key for an upload: namespace, a millisecond timestamp as
/// collision disambiguator, and the original filename.
///
/// Concurrent uploads of differently-named files never collide; same-named
/// files uploaded in the same millisecond are accepted as out of scope.
pub fn object_key(namespace: &str, file_name: &str) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    format!("{namespace}/{millis}_{file_name}")
}

/// Object storage abstraction.
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Store a file under the given namespace and return a durable, publicly
    /// resolvable URL for it.
    async fn upload(
        &self,
        file: &AssetUpload,
        namespace: &str,
        progress: Option<&ProgressFn>,
    ) -> Result<String, StorageError>;

    /// Delete the asset behind a previously returned URL.
    ///
    /// Deleting an already-absent asset must succeed silently; implementations
    /// never surface not-found from this method.
    async fn remove(&self, url: &str) -> Result<(), StorageError>;
}

/// Storage operation errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    Upload(String),

    #[error("Asset not found")]
    NotFound,

    #[error("Storage backend error: {0}")]
    Backend(String),
}
