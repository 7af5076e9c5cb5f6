use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use crate::domain::{models::StorageKey, ports::outbound::ObjectStorage, StorageError};

const PUBLIC_BASE_URL: &str = "https://avatars.test";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Object storage backed by a HashMap, with switchable faults.
#[derive(Clone)]
pub struct InMemoryObjectStorage {
    objects: Arc<RwLock<HashMap<StorageKey, StoredObject>>>,
    configured: bool,
    fail_puts: Arc<AtomicBool>,
    fail_deletes: Arc<AtomicBool>,
    fail_urls: Arc<AtomicBool>,
}

impl Default for InMemoryObjectStorage {
    fn default() -> Self {
        Self {
            objects: Arc::default(),
            configured: true,
            fail_puts: Arc::default(),
            fail_deletes: Arc::default(),
            fail_urls: Arc::default(),
        }
    }
}

#[allow(dead_code)]
impl InMemoryObjectStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage that reports missing bucket/credentials.
    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Self::default()
        }
    }

    pub fn fail_puts(&self, fail: bool) {
        self.fail_puts.store(fail, Ordering::SeqCst);
    }

    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    pub fn fail_urls(&self, fail: bool) {
        self.fail_urls.store(fail, Ordering::SeqCst);
    }

    /// Insert an object directly, bypassing fault injection.
    pub fn insert(&self, key: StorageKey, bytes: Vec<u8>, content_type: &str) {
        self.objects.write().unwrap().insert(
            key,
            StoredObject {
                bytes,
                content_type: content_type.to_string(),
            },
        );
    }

    pub fn get(&self, key: &StorageKey) -> Option<StoredObject> {
        self.objects.read().unwrap().get(key).cloned()
    }

    pub fn contains(&self, key: &StorageKey) -> bool {
        self.objects.read().unwrap().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.objects.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.read().unwrap().is_empty()
    }
}

#[async_trait]
impl ObjectStorage for InMemoryObjectStorage {
    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn put(
        &self,
        key: &StorageKey,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        if self.fail_puts.load(Ordering::SeqCst) {
            return Err(StorageError::Request("simulated put failure".to_string()));
        }

        self.insert(key.clone(), bytes, content_type);
        Ok(())
    }

    async fn delete(&self, key: &StorageKey) -> Result<(), StorageError> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(StorageError::Request("simulated delete failure".to_string()));
        }

        self.objects.write().unwrap().remove(key);
        Ok(())
    }

    fn url_for(&self, key: &StorageKey) -> Result<String, StorageError> {
        if self.fail_urls.load(Ordering::SeqCst) {
            return Err(StorageError::InvalidUrl(key.to_string()));
        }

        Ok(format!("{PUBLIC_BASE_URL}/{key}"))
    }
}
