//! Object storage seam used to publish dog pictures.
//!
//! Implementations live in `teckel-cloud` (S3 and local filesystem); tests
//! plug in their own.

use async_trait::async_trait;

use crate::error::CoreError;

/// Cache lifetime attached to published pictures.
pub const DEFAULT_CACHE_CONTROL: &str = "max-age=3600";

/// Per-upload options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOptions {
    /// Overwrite an existing object under the same key instead of failing.
    pub overwrite: bool,
    /// `Content-Type` stored with the object.
    pub content_type: String,
    /// `Cache-Control` stored with the object.
    pub cache_control: String,
}

impl UploadOptions {
    /// Upsert semantics with the default cache lifetime.
    pub fn upsert(content_type: &str) -> Self {
        Self {
            overwrite: true,
            content_type: content_type.to_string(),
            cache_control: DEFAULT_CACHE_CONTROL.to_string(),
        }
    }
}

/// Why an upload failed. All variants are infrastructure failures.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The backend could not be reached or the connection broke.
    #[error("Storage network error: {0}")]
    Network(String),

    /// The backend refused the credentials or the operation.
    #[error("Storage permission denied: {0}")]
    Permission(String),

    /// Quota or disk space exhausted.
    #[error("Storage quota exceeded: {0}")]
    Quota(String),

    /// `overwrite` was false and the key already exists.
    #[error("Object already exists: {0}")]
    AlreadyExists(String),

    /// Anything else reported by the backend.
    #[error("Storage backend error: {0}")]
    Backend(String),
}

impl From<StorageError> for CoreError {
    fn from(err: StorageError) -> Self {
        CoreError::Transport(err.to_string())
    }
}

/// Durable, publicly readable object storage.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store `bytes` under `bucket/key`.
    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        options: &UploadOptions,
    ) -> Result<(), StorageError>;

    /// Public URL under which `bucket/key` resolves once uploaded.
    fn public_url(&self, bucket: &str, key: &str) -> String;
}
