use async_trait::async_trait;
use bytes::Bytes;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::storage::{join_url, validate_key, Storage, StorageError, StorageResult};

const MEMORY_BASE_URL: &str = "memory://objects";

/// In-memory object store for tests
#[derive(Clone, Default)]
pub struct InMemoryStorage {
    inner: Arc<Mutex<InMemoryStorageInner>>,
}

#[derive(Default)]
struct InMemoryStorageInner {
    objects: HashMap<String, StoredObject>,
    fail_all_uploads: bool,
    failing_keys: HashSet<String>,
    uploads: usize,
    deleted: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub data: Bytes,
    pub content_type: String,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every upload fail
    pub async fn fail_all_uploads(&self) {
        self.inner.lock().await.fail_all_uploads = true;
    }

    /// Make uploads to this exact key fail
    pub async fn fail_upload(&self, key: &str) {
        self.inner.lock().await.failing_keys.insert(key.to_string());
    }

    pub async fn get(&self, key: &str) -> Option<StoredObject> {
        self.inner.lock().await.objects.get(key).cloned()
    }

    pub async fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.inner.lock().await.objects.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Upload attempts, including failed ones
    pub async fn upload_count(&self) -> usize {
        self.inner.lock().await.uploads
    }

    /// Keys passed to `delete`, in call order
    pub async fn deleted_keys(&self) -> Vec<String> {
        self.inner.lock().await.deleted.clone()
    }
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn upload(&self, data: Bytes, key: &str, content_type: &str) -> StorageResult<String> {
        validate_key(key)?;

        let mut inner = self.inner.lock().await;
        inner.uploads += 1;

        if inner.fail_all_uploads || inner.failing_keys.contains(key) {
            return Err(StorageError::UploadFailed(format!("injected failure for {}", key)));
        }

        inner.objects.insert(
            key.to_string(),
            StoredObject {
                data,
                content_type: content_type.to_string(),
            },
        );
        Ok(join_url(MEMORY_BASE_URL, key))
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        validate_key(key)?;

        let mut inner = self.inner.lock().await;
        inner.objects.remove(key);
        inner.deleted.push(key.to_string());
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
