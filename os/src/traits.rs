//! ObjectStore trait definition

use async_trait::async_trait;

use super::ObjectStoreResult;

/// A single flat-namespace container of objects
///
/// Every call is an independent round trip. Nothing here is transactional:
/// a `head` followed by a `put` can interleave with another caller.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Create or overwrite an object
    async fn put(&self, key: &str, body: Vec<u8>, content_type: &str) -> ObjectStoreResult<()>;

    /// Read an object body, `NotFound` if absent
    async fn get(&self, key: &str) -> ObjectStoreResult<Vec<u8>>;

    /// Existence check; absence is `Ok(false)`
    async fn head(&self, key: &str) -> ObjectStoreResult<bool>;

    /// Delete an object; deleting an absent key succeeds
    async fn delete(&self, key: &str) -> ObjectStoreResult<()>;

    /// Delete a batch of objects in one request
    ///
    /// Keys that could be deleted stay deleted. If any key failed the whole
    /// call reports `PartialDelete` naming the failed keys.
    async fn delete_many(&self, keys: &[String]) -> ObjectStoreResult<()>;

    /// List full keys under `prefix`
    ///
    /// With a delimiter, keys that contain it again after the prefix are
    /// left out (they belong to a deeper "folder"). Order is unspecified.
    async fn list(&self, prefix: &str, delimiter: Option<char>) -> ObjectStoreResult<Vec<String>>;
}

/// Shared prefix/delimiter filter used by backends
pub(crate) fn key_matches(key: &str, prefix: &str, delimiter: Option<char>) -> bool {
    match key.strip_prefix(prefix) {
        Some(rest) => match delimiter {
            Some(d) => !rest.contains(d),
            None => true,
        },
        None => false,
    }
}
