pub mod local;
pub mod memory;
pub mod s3;

pub use local::LocalStorage;
pub use memory::InMemoryStorage;
pub use s3::S3Storage;

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

use crate::config::StorageConfig;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Object storage for uploaded assets.
///
/// Keys are chosen by the caller (`collection-<id>/<file name>`); every backend
/// returns the durable URL the object can be fetched from.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Store `data` under `key`, replacing any existing object, and return its public URL
    async fn upload(&self, data: Bytes, key: &str, content_type: &str) -> StorageResult<String>;

    /// Remove the object at `key`. Deleting a missing object is not an error.
    async fn delete(&self, key: &str) -> StorageResult<()>;

    fn backend_name(&self) -> &'static str;
}

/// Build the backend selected in configuration
pub async fn from_config(config: &StorageConfig) -> StorageResult<Arc<dyn Storage>> {
    let storage: Arc<dyn Storage> = match config {
        StorageConfig::S3 {
            bucket,
            region,
            endpoint_url,
            public_base_url,
        } => Arc::new(S3Storage::new(
            bucket.clone(),
            region.clone(),
            endpoint_url.clone(),
            public_base_url.clone(),
        )?),
        StorageConfig::Local {
            root,
            public_base_url,
        } => Arc::new(LocalStorage::new(root, public_base_url.clone()).await?),
    };

    tracing::info!(backend = storage.backend_name(), "Object storage initialized");
    Ok(storage)
}

/// Join a base URL and a key without doubling the slash
pub(crate) fn join_url(base: &str, key: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), key.trim_start_matches('/'))
}

/// Reject keys that could escape a bucket prefix or a storage directory
pub(crate) fn validate_key(key: &str) -> StorageResult<()> {
    if key.is_empty() || key.starts_with('/') || key.split('/').any(|part| part == "..") {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    Ok(())
}
