//! Per-chat roster markers

use std::sync::Arc;

use objectstore::{JSON_CONTENT_TYPE, ObjectStore};
use tracing::{debug, info};

use crate::error::{ServiceError, ServiceResult};
use crate::keyspace;
use crate::model::{Chat, ChatKey, RosterChange};

/// Membership is the existence of `{type}/{id}/@{username}`; the body is empty
#[derive(Clone)]
pub struct RosterStore {
    store: Arc<dyn ObjectStore>,
}

impl RosterStore {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Usernames registered for a chat, in backend order
    pub async fn list(&self, chat: &Chat) -> ServiceResult<Vec<String>> {
        let folder = keyspace::chat_folder(&chat.key);
        debug!(%folder, "RosterStore::list: called");

        let keys = self
            .store
            .list(&folder, Some(keyspace::DELIMITER))
            .await
            .map_err(|e| {
                ServiceError::storage(
                    format!("Failed to list the duty roster for {}.", chat.display_name()),
                    e,
                )
            })?;

        let users: Vec<String> = keys
            .iter()
            .filter_map(|key| keyspace::username_from_roster_key(&chat.key, key))
            .collect();
        debug!(count = users.len(), "RosterStore::list: done");
        Ok(users)
    }

    /// Reject names whose marker a folder listing would never return
    fn check_username(username: &str) -> ServiceResult<()> {
        match keyspace::username_problem(username) {
            Some(reason) => {
                debug!(%username, reason, "RosterStore::check_username: rejected");
                Err(ServiceError::InvalidUsername {
                    username: username.to_string(),
                    reason,
                })
            }
            None => Ok(()),
        }
    }

    /// Existence check for one roster entry
    pub async fn exists(&self, chat: &ChatKey, username: &str) -> ServiceResult<bool> {
        Self::check_username(username)?;
        let key = keyspace::roster_key(chat, username);
        debug!(%key, "RosterStore::exists: called");
        self.store
            .head(&key)
            .await
            .map_err(|e| ServiceError::storage(format!("Failed to check user {key}."), e))
    }

    /// Create the marker unless it already exists
    pub async fn add(&self, chat: &ChatKey, username: &str) -> ServiceResult<RosterChange> {
        debug!(chat = %chat, %username, "RosterStore::add: called");
        if self.exists(chat, username).await? {
            return Ok(RosterChange::NoOp);
        }

        let key = keyspace::roster_key(chat, username);
        self.store
            .put(&key, Vec::new(), JSON_CONTENT_TYPE)
            .await
            .map_err(|e| ServiceError::storage(format!("Failed to register user @{username}."), e))?;

        info!(%key, "Registered roster entry");
        Ok(RosterChange::Applied)
    }

    /// Delete the marker if it exists
    pub async fn remove(&self, chat: &ChatKey, username: &str) -> ServiceResult<RosterChange> {
        debug!(chat = %chat, %username, "RosterStore::remove: called");
        if !self.exists(chat, username).await? {
            return Ok(RosterChange::NoOp);
        }

        let key = keyspace::roster_key(chat, username);
        self.store
            .delete(&key)
            .await
            .map_err(|e| ServiceError::storage(format!("Failed to remove user @{username}."), e))?;

        info!(%key, "Removed roster entry");
        Ok(RosterChange::Applied)
    }

    /// Delete the given roster entries plus the settings document in one batch
    ///
    /// A batch that only partly succeeded is still one `Storage` error; the
    /// source names the keys that were left behind.
    pub async fn clear_all(&self, chat: &Chat, users: &[String]) -> ServiceResult<()> {
        debug!(chat = %chat.key, count = users.len(), "RosterStore::clear_all: called");

        let mut keys: Vec<String> = users.iter().map(|u| keyspace::roster_key(&chat.key, u)).collect();
        keys.push(keyspace::properties_key(&chat.key));

        self.store.delete_many(&keys).await.map_err(|e| {
            ServiceError::storage(
                format!("Failed to clear storage for \"{}\".", chat.display_name()),
                e,
            )
        })?;

        info!(chat = %chat.key, deleted = keys.len(), "Cleared chat storage");
        Ok(())
    }
}
