//! Per-chat settings document

use std::sync::Arc;

use objectstore::{JSON_CONTENT_TYPE, ObjectStore};
use tracing::{debug, info};

use crate::error::{ServiceError, ServiceResult};
use crate::keyspace;
use crate::model::{Chat, ChatKey, InitStatus, Properties};

use super::json_body;

/// Reads and writes `{type}/{id}/properties.json`
#[derive(Clone)]
pub struct PropertiesStore {
    store: Arc<dyn ObjectStore>,
}

impl PropertiesStore {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Read and parse the settings document
    pub async fn get(&self, chat: &ChatKey) -> ServiceResult<Properties> {
        let key = keyspace::properties_key(chat);
        debug!(%key, "PropertiesStore::get: called");

        let body = self
            .store
            .get(&key)
            .await
            .map_err(|e| ServiceError::from_read(format!("Failed to read settings for chat {key}."), e))?;

        serde_json::from_slice(&body).map_err(|e| ServiceError::parse("Failed to parse settings.", e))
    }

    /// Overwrite the settings document wholesale (last write wins)
    pub async fn update(&self, chat: &ChatKey, properties: Properties) -> ServiceResult<Properties> {
        let key = keyspace::properties_key(chat);
        debug!(%key, ?properties, "PropertiesStore::update: called");

        let message = format!("Failed to update settings for {}.", chat.id);
        let body = json_body(&properties).map_err(|e| ServiceError::parse(message.clone(), e))?;
        self.store
            .put(&key, body, JSON_CONTENT_TYPE)
            .await
            .map_err(|e| ServiceError::storage(message, e))?;

        Ok(properties)
    }

    /// Write `defaults` only if no settings document exists yet
    ///
    /// Uses `head` rather than a full read.
    pub async fn initialize_if_absent(&self, chat: &Chat, defaults: Properties) -> ServiceResult<InitStatus> {
        let key = keyspace::properties_key(&chat.key);
        let chat_name = chat.display_name();
        debug!(%key, %chat_name, "PropertiesStore::initialize_if_absent: called");

        let exists = self
            .store
            .head(&key)
            .await
            .map_err(|e| ServiceError::storage(format!("Failed to check storage for \"{chat_name}\"."), e))?;

        if exists {
            debug!(%key, "PropertiesStore::initialize_if_absent: already exists");
            return Ok(InitStatus::AlreadyExists { chat_name });
        }

        let message = format!("Failed to create storage for \"{chat_name}\".");
        let body = json_body(&defaults).map_err(|e| ServiceError::parse(message.clone(), e))?;
        self.store
            .put(&key, body, JSON_CONTENT_TYPE)
            .await
            .map_err(|e| ServiceError::storage(message, e))?;

        info!(%key, "Created chat storage");
        Ok(InitStatus::Created { chat_name })
    }

    /// Read-modify-write of `countPeople`
    ///
    /// Decrementing an already-zero counter is a no-op and issues no write.
    pub async fn adjust_count_people(&self, chat: &ChatKey, delta: i64) -> ServiceResult<Properties> {
        debug!(chat = %chat, delta, "PropertiesStore::adjust_count_people: called");
        let mut properties = self.get(chat).await?;

        let current = i64::from(properties.count_people);
        let next = (current + delta).clamp(0, i64::from(u32::MAX));
        if next == current {
            debug!(chat = %chat, current, "PropertiesStore::adjust_count_people: unchanged");
            return Ok(properties);
        }

        properties.count_people = next as u32;
        self.update(chat, properties).await
    }
}
