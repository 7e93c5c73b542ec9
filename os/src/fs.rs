//! Filesystem ObjectStore backend
//!
//! A directory is the bucket; a key maps to a relative file path below it.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, info};

use super::traits::key_matches;
use super::{ObjectStore, ObjectStoreError, ObjectStoreResult};

/// ObjectStore backed by a directory tree
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    /// Open or create a bucket directory at the given path
    pub async fn open(path: impl AsRef<Path>) -> ObjectStoreResult<Self> {
        let root = path.as_ref().to_path_buf();
        debug!(root = %root.display(), "FsStore::open: called");
        fs::create_dir_all(&root).await?;
        info!(root = %root.display(), "Opened filesystem object store");
        Ok(Self { root })
    }

    /// Bucket directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn object_path(&self, key: &str) -> ObjectStoreResult<PathBuf> {
        let valid = !key.is_empty()
            && !key.starts_with('/')
            && key.split('/').all(|part| !part.is_empty() && part != "." && part != "..");
        if !valid {
            debug!(%key, "FsStore::object_path: rejected key");
            return Err(ObjectStoreError::InvalidKey { key: key.to_string() });
        }
        Ok(self.root.join(key))
    }

    /// Directory that can contain keys starting with `prefix`
    fn listing_dir(&self, prefix: &str) -> PathBuf {
        match prefix.rfind('/') {
            Some(idx) => self.root.join(&prefix[..idx]),
            None => self.root.clone(),
        }
    }

    fn key_for(&self, path: &Path) -> Option<String> {
        let rel = path.strip_prefix(&self.root).ok()?;
        let parts: Vec<&str> = rel.components().filter_map(|c| c.as_os_str().to_str()).collect();
        Some(parts.join("/"))
    }
}

#[async_trait]
impl ObjectStore for FsStore {
    async fn put(&self, key: &str, body: Vec<u8>, content_type: &str) -> ObjectStoreResult<()> {
        debug!(%key, len = body.len(), %content_type, "FsStore::put: called");
        let path = self.object_path(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&path, body).await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> ObjectStoreResult<Vec<u8>> {
        debug!(%key, "FsStore::get: called");
        let path = self.object_path(key)?;
        match fs::read(&path).await {
            Ok(body) => Ok(body),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(ObjectStoreError::NotFound { key: key.to_string() }),
            Err(e) => Err(e.into()),
        }
    }

    async fn head(&self, key: &str) -> ObjectStoreResult<bool> {
        debug!(%key, "FsStore::head: called");
        let path = self.object_path(key)?;
        match fs::metadata(&path).await {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, key: &str) -> ObjectStoreResult<()> {
        debug!(%key, "FsStore::delete: called");
        let path = self.object_path(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete_many(&self, keys: &[String]) -> ObjectStoreResult<()> {
        debug!(count = keys.len(), "FsStore::delete_many: called");
        let mut failed = Vec::new();
        for key in keys {
            if let Err(e) = self.delete(key).await {
                debug!(%key, error = %e, "FsStore::delete_many: key failed");
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
        debug!(%prefix, ?delimiter, "FsStore::list: called");
        let mut keys = Vec::new();
        let mut pending = vec![self.listing_dir(prefix)];

        while let Some(dir) = pending.pop() {
            let mut entries = match fs::read_dir(&dir).await {
                Ok(entries) => entries,
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            };

            while let Some(entry) = entries.next_entry().await? {
                let file_type = entry.file_type().await?;
                let path = entry.path();
                if file_type.is_dir() {
                    // Deeper folders can only match when no delimiter stops the walk
                    if delimiter.is_none() {
                        pending.push(path);
                    }
                } else if let Some(key) = self.key_for(&path)
                    && key_matches(&key, prefix, delimiter)
                {
                    keys.push(key);
                }
            }
        }

        debug!(count = keys.len(), "FsStore::list: done");
        Ok(keys)
    }
}
