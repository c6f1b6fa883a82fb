//! Filesystem-backed object storage.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use teckel_core::storage::{ObjectStorage, StorageError, UploadOptions};
use tokio::io::AsyncWriteExt;

/// Stores objects as `<root>/<bucket>/<key>`.
///
/// `Content-Type` and `Cache-Control` are not persisted; the static file
/// service derives them when serving.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root: PathBuf,
    public_base_url: String,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>, public_base_url: Option<String>) -> Self {
        let public_base_url = public_base_url
            .unwrap_or_else(|| crate::config::DEFAULT_LOCAL_PUBLIC_BASE_URL.to_string());
        Self {
            root: root.into(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve `bucket/key` below the root, refusing anything that could
    /// escape it.
    fn object_path(&self, bucket: &str, key: &str) -> Result<PathBuf, StorageError> {
        let relative = Path::new(bucket).join(key);
        let safe = !bucket.is_empty()
            && !key.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !safe {
            return Err(StorageError::Backend(format!("invalid object key {bucket}/{key}")));
        }
        Ok(self.root.join(relative))
    }
}

fn map_io(err: std::io::Error, key: &str) -> StorageError {
    match err.kind() {
        ErrorKind::AlreadyExists => StorageError::AlreadyExists(key.to_string()),
        ErrorKind::PermissionDenied => StorageError::Permission(err.to_string()),
        _ => StorageError::Backend(err.to_string()),
    }
}

#[async_trait]
impl ObjectStorage for LocalStorage {
    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        options: &UploadOptions,
    ) -> Result<(), StorageError> {
        let path = self.object_path(bucket, key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| map_io(e, key))?;
        }

        let mut open = tokio::fs::OpenOptions::new();
        open.write(true);
        if options.overwrite {
            open.create(true).truncate(true);
        } else {
            open.create_new(true);
        }
        let mut file = open.open(&path).await.map_err(|e| map_io(e, key))?;
        file.write_all(&bytes).await.map_err(|e| map_io(e, key))?;
        file.flush().await.map_err(|e| map_io(e, key))?;

        tracing::debug!(path = %path.display(), size = bytes.len(), "Stored object on disk");
        Ok(())
    }

    fn public_url(&self, bucket: &str, key: &str) -> String {
        format!("{}/{bucket}/{key}", self.public_base_url)
    }
}
