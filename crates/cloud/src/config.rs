use std::path::PathBuf;

/// Which [`teckel_core::storage::ObjectStorage`] implementation to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Local,
    S3,
}

impl StorageBackend {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "local" => Some(Self::Local),
            "s3" => Some(Self::S3),
            _ => None,
        }
    }
}

/// Object storage configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Bucket that receives dog pictures.
    pub bucket: String,
    /// Directory holding `<bucket>/<key>` files for the local backend.
    pub local_root: PathBuf,
    /// Base URL under which published objects are reachable. For S3 an unset
    /// variable falls back to the virtual-hosted bucket URL.
    pub public_base_url: Option<String>,
    pub s3_region: Option<String>,
    /// Custom endpoint for S3-compatible services (MinIO, R2...).
    pub s3_endpoint: Option<String>,
}

/// Public base URL of the local backend when none is configured.
pub const DEFAULT_LOCAL_PUBLIC_BASE_URL: &str = "http://localhost:3000/media";

impl StorageConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var                   | Default                        |
    /// |---------------------------|--------------------------------|
    /// | `STORAGE_BACKEND`         | `local` (`s3` alternative)     |
    /// | `STORAGE_BUCKET`          | `royal-teckel-homes`           |
    /// | `STORAGE_LOCAL_ROOT`      | `storage`                      |
    /// | `STORAGE_PUBLIC_BASE_URL` | `http://localhost:3000/media` for `local` |
    /// | `S3_REGION`               | AWS config chain               |
    /// | `S3_ENDPOINT`             | AWS default endpoint           |
    pub fn from_env() -> Self {
        let backend = std::env::var("STORAGE_BACKEND")
            .map(|v| StorageBackend::parse(&v).expect("STORAGE_BACKEND must be `local` or `s3`"))
            .unwrap_or(StorageBackend::Local);

        let public_base_url = std::env::var("STORAGE_PUBLIC_BASE_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .or_else(|| {
                (backend == StorageBackend::Local).then(|| DEFAULT_LOCAL_PUBLIC_BASE_URL.to_string())
            });

        Self {
            backend,
            bucket: std::env::var("STORAGE_BUCKET")
                .unwrap_or_else(|_| "royal-teckel-homes".into()),
            local_root: std::env::var("STORAGE_LOCAL_ROOT")
                .unwrap_or_else(|_| "storage".into())
                .into(),
            public_base_url,
            s3_region: std::env::var("S3_REGION").ok(),
            s3_endpoint: std::env::var("S3_ENDPOINT").ok(),
        }
    }
}
