//! ChatService - the operations a chat transport calls
//!
//! Composes the typed stores and the duty selector. Composite operations are
//! sequential round trips with no rollback: when a later step fails, the
//! effects of the earlier steps stay in place and the error is returned as is.

use std::sync::Arc;

use eyre::Context;
use objectstore::{FsStore, MemoryStore, ObjectStore};
use tracing::{debug, info};

use crate::config::{Config, StorageBackend, StorageConfig};
use crate::error::ServiceResult;
use crate::model::{
    Chat, ChatKey, ChatStatus, DEFAULT_DUTY_COUNT, DEFAULT_TRIGGER_HOUR, InitStatus, Properties, RegStatus,
    RosterChange, TriggerStatus, UnregStatus,
};
use crate::selector::{Selection, select_duty};
use crate::store::{PropertiesStore, RosterStore, TriggerStore};

/// Defaults applied when creating documents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceSettings {
    pub default_duty_count: u32,
    pub trigger_hour: u8,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            default_duty_count: DEFAULT_DUTY_COUNT,
            trigger_hour: DEFAULT_TRIGGER_HOUR,
        }
    }
}

impl From<&Config> for ServiceSettings {
    fn from(config: &Config) -> Self {
        Self {
            default_duty_count: config.roster.default_duty_count,
            trigger_hour: config.trigger.default_hour,
        }
    }
}

/// Open the object store named by the storage config
pub async fn open_object_store(config: &StorageConfig) -> eyre::Result<Arc<dyn ObjectStore>> {
    debug!(backend = ?config.backend, "open_object_store: called");
    match config.backend {
        StorageBackend::Memory => Ok(Arc::new(MemoryStore::new())),
        StorageBackend::Fs => {
            let path = config.bucket_path();
            let store = FsStore::open(&path)
                .await
                .context(format!("Failed to open object store at {}", path.display()))?;
            Ok(Arc::new(store))
        }
    }
}

/// Facade over the per-chat stores
#[derive(Clone)]
pub struct ChatService {
    properties: PropertiesStore,
    roster: RosterStore,
    triggers: TriggerStore,
    settings: ServiceSettings,
}

impl ChatService {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self::with_settings(store, ServiceSettings::default())
    }

    pub fn with_settings(store: Arc<dyn ObjectStore>, settings: ServiceSettings) -> Self {
        debug!(?settings, "ChatService::with_settings: called");
        Self {
            properties: PropertiesStore::new(store.clone()),
            roster: RosterStore::new(store.clone()),
            triggers: TriggerStore::new(store, settings.trigger_hour),
            settings,
        }
    }

    /// Build a service from configuration, opening the configured backend
    pub async fn from_config(config: &Config) -> eyre::Result<Self> {
        let store = open_object_store(&config.storage).await?;
        Ok(Self::with_settings(store, ServiceSettings::from(config)))
    }

    /// Create the settings document if the chat has none yet
    pub async fn init(&self, chat: &Chat) -> ServiceResult<InitStatus> {
        debug!(chat = %chat.key, "ChatService::init: called");
        self.properties
            .initialize_if_absent(chat, Properties::with_duty_count(self.settings.default_duty_count))
            .await
    }

    /// `clear` followed by `init`; a failed clear stops before init
    pub async fn reset(&self, chat: &Chat) -> ServiceResult<InitStatus> {
        debug!(chat = %chat.key, "ChatService::reset: called");
        self.clear(chat).await?;
        self.init(chat).await
    }

    /// Delete the roster and settings in one batch, then turn the trigger off
    pub async fn clear(&self, chat: &Chat) -> ServiceResult<TriggerStatus> {
        debug!(chat = %chat.key, "ChatService::clear: called");
        let users = self.roster.list(chat).await?;
        self.roster.clear_all(chat, &users).await?;
        self.trigger_off(chat).await
    }

    /// Overwrite `dutyCount`, keeping the other fields
    pub async fn set_duty_count(&self, chat: &Chat, duty_count: u32) -> ServiceResult<u32> {
        debug!(chat = %chat.key, duty_count, "ChatService::set_duty_count: called");
        let mut properties = self.properties.get(&chat.key).await?;
        properties.duty_count = duty_count;
        let properties = self.properties.update(&chat.key, properties).await?;
        info!(chat = %chat.key, duty_count = properties.duty_count, "Duty count set");
        Ok(properties.duty_count)
    }

    /// Register a user, then bump `countPeople`
    pub async fn reg(&self, chat: &Chat, username: &str) -> ServiceResult<RegStatus> {
        debug!(chat = %chat.key, %username, "ChatService::reg: called");
        let username = username.to_string();
        match self.roster.add(&chat.key, &username).await? {
            RosterChange::NoOp => Ok(RegStatus::AlreadyPresent { username }),
            RosterChange::Applied => {
                let properties = self.properties.adjust_count_people(&chat.key, 1).await?;
                Ok(RegStatus::Added {
                    username,
                    count_people: properties.count_people,
                })
            }
        }
    }

    /// Unregister a user, then lower `countPeople` (never below zero)
    pub async fn unreg(&self, chat: &Chat, username: &str) -> ServiceResult<UnregStatus> {
        debug!(chat = %chat.key, %username, "ChatService::unreg: called");
        let username = username.to_string();
        match self.roster.remove(&chat.key, &username).await? {
            RosterChange::NoOp => Ok(UnregStatus::AlreadyAbsent { username }),
            RosterChange::Applied => {
                let properties = self.properties.adjust_count_people(&chat.key, -1).await?;
                Ok(UnregStatus::Removed {
                    username,
                    count_people: properties.count_people,
                })
            }
        }
    }

    /// Compute today's duty set and persist it as `lastDuty` when it changed
    pub async fn duty(&self, chat: &Chat) -> ServiceResult<Vec<String>> {
        debug!(chat = %chat.key, "ChatService::duty: called");
        let roster = self.roster.list(chat).await?;
        let properties = self.properties.get(&chat.key).await?;

        let selection = select_duty(
            &roster,
            &properties.last_duty,
            properties.duty_count,
            &mut rand::rng(),
        );

        match selection {
            Selection::Unchanged(users) => Ok(users),
            Selection::Rotated(users) => {
                let updated = self
                    .properties
                    .update(
                        &chat.key,
                        Properties {
                            last_duty: users,
                            ..properties
                        },
                    )
                    .await?;
                info!(chat = %chat.key, duty = ?updated.last_duty, "Duty rotated");
                Ok(updated.last_duty)
            }
        }
    }

    /// Registered usernames, sorted
    pub async fn list(&self, chat: &Chat) -> ServiceResult<Vec<String>> {
        debug!(chat = %chat.key, "ChatService::list: called");
        let mut users = self.roster.list(chat).await?;
        users.sort();
        Ok(users)
    }

    /// Set `countPeople` to the live roster size, repairing counter drift
    pub async fn recount(&self, chat: &Chat) -> ServiceResult<u32> {
        debug!(chat = %chat.key, "ChatService::recount: called");
        let roster = self.roster.list(chat).await?;
        let mut properties = self.properties.get(&chat.key).await?;

        let live = u32::try_from(roster.len()).unwrap_or(u32::MAX);
        if properties.count_people != live {
            info!(chat = %chat.key, stored = properties.count_people, live, "Repairing people counter");
            properties.count_people = live;
            self.properties.update(&chat.key, properties).await?;
        }
        Ok(live)
    }

    /// Settings, roster and trigger of one chat
    pub async fn status(&self, chat: &Chat) -> ServiceResult<ChatStatus> {
        debug!(chat = %chat.key, "ChatService::status: called");
        let properties = self.properties.get(&chat.key).await?;
        let roster = self.list(chat).await?;
        let trigger = self.triggers.get(&chat.key).await?;
        Ok(ChatStatus {
            properties,
            roster,
            trigger,
        })
    }

    pub async fn trigger_on(&self, chat: &Chat) -> ServiceResult<TriggerStatus> {
        debug!(chat = %chat.key, "ChatService::trigger_on: called");
        let trigger = self.triggers.enable(chat).await?;
        Ok(TriggerStatus::Enabled {
            chat_name: chat.display_name(),
            hour: trigger.time,
        })
    }

    pub async fn trigger_off(&self, chat: &Chat) -> ServiceResult<TriggerStatus> {
        debug!(chat = %chat.key, "ChatService::trigger_off: called");
        self.triggers.disable(chat).await?;
        Ok(TriggerStatus::Disabled {
            chat_name: chat.display_name(),
        })
    }

    /// Chats with an active trigger, for whatever fires the daily rotation
    pub async fn list_chats(&self) -> ServiceResult<Vec<ChatKey>> {
        debug!("ChatService::list_chats: called");
        self.triggers.list_enabled_chats().await
    }
}
