//! Domain types: chats, per-chat properties, triggers and operation outcomes

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default number of people put on duty per rotation
pub const DEFAULT_DUTY_COUNT: u32 = 1;

/// Default hour of day a trigger fires at
pub const DEFAULT_TRIGGER_HOUR: u8 = 9;

/// Stable identity of a chat; the input to every key derivation
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChatKey {
    #[serde(rename = "type")]
    pub chat_type: String,
    pub id: String,
}

impl ChatKey {
    pub fn new(chat_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            chat_type: chat_type.into(),
            id: id.into(),
        }
    }
}

impl fmt::Display for ChatKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.chat_type, self.id)
    }
}

/// A chat as seen by the transport: identity plus optional display fields
///
/// Never persisted itself. `username` and `title` only feed messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chat {
    pub key: ChatKey,
    pub username: Option<String>,
    pub title: Option<String>,
}

impl Chat {
    pub fn new(chat_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            key: ChatKey::new(chat_type, id),
            username: None,
            title: None,
        }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Human-readable name: username, else title, else the key
    pub fn display_name(&self) -> String {
        self.username
            .clone()
            .or_else(|| self.title.clone())
            .unwrap_or_else(|| self.key.to_string())
    }
}

impl From<ChatKey> for Chat {
    fn from(key: ChatKey) -> Self {
        Self {
            key,
            username: None,
            title: None,
        }
    }
}

/// Per-chat settings document (`properties.json`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Properties {
    /// How many distinct users one rotation selects
    pub duty_count: u32,
    /// Registered participants, maintained by increment/decrement
    pub count_people: u32,
    /// Users selected by the previous rotation
    pub last_duty: Vec<String>,
}

impl Properties {
    pub fn with_duty_count(duty_count: u32) -> Self {
        Self {
            duty_count,
            ..Self::default()
        }
    }
}

impl Default for Properties {
    fn default() -> Self {
        Self {
            duty_count: DEFAULT_DUTY_COUNT,
            count_people: 0,
            last_duty: Vec::new(),
        }
    }
}

/// Scheduling marker; its existence enables the daily rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trigger {
    /// Hour of day (0-23)
    pub time: u8,
}

impl Default for Trigger {
    fn default() -> Self {
        Self {
            time: DEFAULT_TRIGGER_HOUR,
        }
    }
}

/// Whether a check-then-act roster step changed anything
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterChange {
    Applied,
    NoOp,
}

/// Outcome of `init`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitStatus {
    Created { chat_name: String },
    AlreadyExists { chat_name: String },
}

impl fmt::Display for InitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitStatus::Created { chat_name } => {
                write!(f, "Storage for \"{chat_name}\" created, participants can register.")
            }
            InitStatus::AlreadyExists { chat_name } => write!(f, "Storage for \"{chat_name}\" already exists."),
        }
    }
}

/// Outcome of `reg`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegStatus {
    Added { username: String, count_people: u32 },
    AlreadyPresent { username: String },
}

impl fmt::Display for RegStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegStatus::Added { username, count_people } => write!(
                f,
                "@{username} added to the duty roster.\nPeople on duty roster: {count_people}"
            ),
            RegStatus::AlreadyPresent { username } => write!(f, "User @{username} is already registered."),
        }
    }
}

/// Outcome of `unreg`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnregStatus {
    Removed { username: String, count_people: u32 },
    AlreadyAbsent { username: String },
}

impl fmt::Display for UnregStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnregStatus::Removed { username, count_people } => write!(
                f,
                "@{username} removed from the duty roster.\nPeople on duty roster: {count_people}"
            ),
            UnregStatus::AlreadyAbsent { username } => write!(f, "User @{username} is already removed."),
        }
    }
}

/// Outcome of `triggerOn` / `triggerOff` (and of `clear`, which ends with `triggerOff`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerStatus {
    Enabled { chat_name: String, hour: u8 },
    Disabled { chat_name: String },
}

impl fmt::Display for TriggerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriggerStatus::Enabled { chat_name, .. } => write!(f, "Trigger for \"{chat_name}\" created."),
            TriggerStatus::Disabled { chat_name } => write!(f, "Trigger for \"{chat_name}\" removed."),
        }
    }
}

/// Snapshot of a chat's persisted state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatStatus {
    pub properties: Properties,
    pub roster: Vec<String>,
    pub trigger: Option<Trigger>,
}
