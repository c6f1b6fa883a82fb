//! Object storage backends for published dog pictures.
//!
//! - [`LocalStorage`] writes below a directory served by the API under `/media`.
//! - [`S3Storage`] puts objects into an S3-compatible bucket.
//!
//! [`build_storage`] picks one from [`StorageConfig`].

pub mod config;
pub mod local;
pub mod s3;

use std::sync::Arc;

use teckel_core::storage::ObjectStorage;

pub use config::{StorageBackend, StorageConfig};
pub use local::LocalStorage;
pub use s3::S3Storage;

/// Construct the configured object storage backend.
pub async fn build_storage(config: &StorageConfig) -> Arc<dyn ObjectStorage> {
    match config.backend {
        StorageBackend::Local => {
            tracing::info!(root = %config.local_root.display(), "Using local object storage");
            Arc::new(LocalStorage::new(
                config.local_root.clone(),
                config.public_base_url.clone(),
            ))
        }
        StorageBackend::S3 => {
            tracing::info!(bucket = %config.bucket, "Using S3 object storage");
            Arc::new(S3Storage::from_config(config).await)
        }
    }
}
