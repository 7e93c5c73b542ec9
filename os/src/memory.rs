//! In-memory ObjectStore backend
//!
//! Used for tests and for the `memory` storage backend. Keeps write and
//! delete counters and can be told to fault on specific keys, so callers can
//! check how many round trips an operation really made.

use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::traits::key_matches;
use super::{ObjectStore, ObjectStoreError, ObjectStoreResult};

#[derive(Debug, Clone)]
struct StoredObject {
    body: Vec<u8>,
    content_type: String,
}

/// ObjectStore backed by a sorted map
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: RwLock<BTreeMap<String, StoredObject>>,
    faults: RwLock<HashSet<String>>,
    put_count: AtomicUsize,
    delete_count: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        debug!("MemoryStore::new: called");
        Self::default()
    }

    /// Make every operation touching `key` fail with a backend fault
    pub async fn fail_on(&self, key: impl Into<String>) {
        let key = key.into();
        debug!(%key, "MemoryStore::fail_on: called");
        self.faults.write().await.insert(key);
    }

    /// Stop faulting on `key`
    pub async fn heal(&self, key: &str) {
        debug!(%key, "MemoryStore::heal: called");
        self.faults.write().await.remove(key);
    }

    /// Number of successful `put` calls so far
    pub fn put_count(&self) -> usize {
        self.put_count.load(Ordering::SeqCst)
    }

    /// Number of objects actually removed so far
    pub fn delete_count(&self) -> usize {
        self.delete_count.load(Ordering::SeqCst)
    }

    /// Content type recorded for `key`, if present
    pub async fn content_type(&self, key: &str) -> Option<String> {
        self.objects.read().await.get(key).map(|o| o.content_type.clone())
    }

    /// Snapshot of all keys, sorted
    pub async fn keys(&self) -> Vec<String> {
        self.objects.read().await.keys().cloned().collect()
    }

    async fn check_fault(&self, key: &str) -> ObjectStoreResult<()> {
        if self.faults.read().await.contains(key) {
            debug!(%key, "MemoryStore::check_fault: injected fault");
            return Err(ObjectStoreError::Backend {
                key: key.to_string(),
                message: "injected fault".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn put(&self, key: &str, body: Vec<u8>, content_type: &str) -> ObjectStoreResult<()> {
        debug!(%key, len = body.len(), "MemoryStore::put: called");
        self.check_fault(key).await?;
        self.objects.write().await.insert(
            key.to_string(),
            StoredObject {
                body,
                content_type: content_type.to_string(),
            },
        );
        self.put_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn get(&self, key: &str) -> ObjectStoreResult<Vec<u8>> {
        debug!(%key, "MemoryStore::get: called");
        self.check_fault(key).await?;
        self.objects
            .read()
            .await
            .get(key)
            .map(|o| o.body.clone())
            .ok_or_else(|| ObjectStoreError::NotFound { key: key.to_string() })
    }

    async fn head(&self, key: &str) -> ObjectStoreResult<bool> {
        debug!(%key, "MemoryStore::head: called");
        self.check_fault(key).await?;
        Ok(self.objects.read().await.contains_key(key))
    }

    async fn delete(&self, key: &str) -> ObjectStoreResult<()> {
        debug!(%key, "MemoryStore::delete: called");
        self.check_fault(key).await?;
        if self.objects.write().await.remove(key).is_some() {
            self.delete_count.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }

    async fn delete_many(&self, keys: &[String]) -> ObjectStoreResult<()> {
        debug!(count = keys.len(), "MemoryStore::delete_many: called");
        let mut failed = Vec::new();
        for key in keys {
            if let Err(e) = self.delete(key).await {
                debug!(%key, error = %e, "MemoryStore::delete_many: key failed");
                failed.push(key.clone());
            }
        }

        if failed.is_empty() {
            Ok(())
        } else {
            Err(ObjectStoreError::PartialDelete { failed })
        }
    }

    async fn list(&self, prefix: &str, delimiter: Option<char>) -> ObjectStoreResult<Vec<String>> {
        debug!(%prefix, ?delimiter, "MemoryStore::list: called");
        self.check_fault(prefix).await?;
        Ok(self
            .objects
            .read()
            .await
            .keys()
            .filter(|k| key_matches(k, prefix, delimiter))
            .cloned()
            .collect())
    }
}
