//! Scheduling markers under `trigger/`

use std::sync::Arc;

use objectstore::{JSON_CONTENT_TYPE, ObjectStore};
use tracing::{debug, info, warn};

use crate::error::{ServiceError, ServiceResult};
use crate::keyspace;
use crate::model::{Chat, ChatKey, Trigger};

use super::json_body;

/// Triggers live outside the chat folders, keyed `trigger/{type}@{id}`
#[derive(Clone)]
pub struct TriggerStore {
    store: Arc<dyn ObjectStore>,
    default_hour: u8,
}

impl TriggerStore {
    pub fn new(store: Arc<dyn ObjectStore>, default_hour: u8) -> Self {
        Self { store, default_hour }
    }

    /// Write the trigger document, overwriting any existing one
    pub async fn enable(&self, chat: &Chat) -> ServiceResult<Trigger> {
        let key = keyspace::trigger_key(&chat.key);
        debug!(%key, hour = self.default_hour, "TriggerStore::enable: called");

        let trigger = Trigger {
            time: self.default_hour,
        };
        let message = format!("Failed to create trigger for \"{}\".", chat.display_name());
        let body = json_body(&trigger).map_err(|e| ServiceError::parse(message.clone(), e))?;
        self.store
            .put(&key, body, JSON_CONTENT_TYPE)
            .await
            .map_err(|e| ServiceError::storage(message, e))?;

        info!(%key, hour = trigger.time, "Trigger enabled");
        Ok(trigger)
    }

    /// Delete the trigger document; an absent trigger is not an error
    pub async fn disable(&self, chat: &Chat) -> ServiceResult<()> {
        let key = keyspace::trigger_key(&chat.key);
        debug!(%key, "TriggerStore::disable: called");

        self.store.delete(&key).await.map_err(|e| {
            ServiceError::storage(
                format!("Failed to delete trigger for \"{}\".", chat.display_name()),
                e,
            )
        })?;

        info!(%key, "Trigger disabled");
        Ok(())
    }

    /// Read the trigger document, `None` if the chat has no trigger
    pub async fn get(&self, chat: &ChatKey) -> ServiceResult<Option<Trigger>> {
        let key = keyspace::trigger_key(chat);
        debug!(%key, "TriggerStore::get: called");

        let body = match self.store.get(&key).await {
            Ok(body) => body,
            Err(e) if e.is_not_found() => return Ok(None),
            Err(e) => return Err(ServiceError::storage(format!("Failed to read trigger {key}."), e)),
        };

        // existence is what enables a chat; an unreadable body falls back to the default hour
        match serde_json::from_slice(&body) {
            Ok(trigger) => Ok(Some(trigger)),
            Err(e) => {
                warn!(%key, error = %e, hour = self.default_hour, "Unreadable trigger body, using default hour");
                Ok(Some(Trigger {
                    time: self.default_hour,
                }))
            }
        }
    }

    /// Every chat that currently has a trigger
    pub async fn list_enabled_chats(&self) -> ServiceResult<Vec<ChatKey>> {
        let folder = keyspace::trigger_folder();
        debug!(%folder, "TriggerStore::list_enabled_chats: called");

        let keys = self
            .store
            .list(&folder, Some(keyspace::DELIMITER))
            .await
            .map_err(|e| ServiceError::storage("Failed to list triggers.", e))?;

        let mut chats = Vec::with_capacity(keys.len());
        for key in keys {
            match keyspace::chat_from_trigger_key(&key) {
                Some(chat) => chats.push(chat),
                None => warn!(%key, "Skipping malformed trigger key"),
            }
        }
        Ok(chats)
    }
}
