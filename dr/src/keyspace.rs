//! Object key derivation
//!
//! ```text
//! {type}/{id}/properties.json   per-chat settings
//! {type}/{id}/@{username}       roster entry (empty body)
//! trigger/{type}@{id}           scheduling marker
//! ```

use crate::model::ChatKey;

/// Object name of the settings document inside a chat folder
pub const PROPERTIES_NAME: &str = "properties.json";

/// Folder holding trigger markers for all chats
pub const TRIGGER_FOLDER: &str = "trigger";

/// Folder delimiter used for listing
pub const DELIMITER: char = '/';

/// `{type}/{id}`
pub fn chat_prefix(chat: &ChatKey) -> String {
    format!("{}/{}", chat.chat_type, chat.id)
}

/// `{type}/{id}/` - listing prefix for a chat folder
pub fn chat_folder(chat: &ChatKey) -> String {
    format!("{}/", chat_prefix(chat))
}

pub fn properties_key(chat: &ChatKey) -> String {
    format!("{}/{}", chat_prefix(chat), PROPERTIES_NAME)
}

pub fn roster_key(chat: &ChatKey, username: &str) -> String {
    format!("{}/@{}", chat_prefix(chat), username)
}

pub fn trigger_key(chat: &ChatKey) -> String {
    format!("{}/{}@{}", TRIGGER_FOLDER, chat.chat_type, chat.id)
}

/// `trigger/` - listing prefix for all triggers
pub fn trigger_folder() -> String {
    format!("{}/", TRIGGER_FOLDER)
}

/// Why `username` cannot be a roster entry, `None` if it can
///
/// Entries must come back out of a delimited folder listing, so the name must
/// be non-empty and stay inside the chat folder.
pub fn username_problem(username: &str) -> Option<&'static str> {
    if username.is_empty() {
        Some("must not be empty")
    } else if username.contains(DELIMITER) {
        Some("must not contain '/'")
    } else {
        None
    }
}

/// Username of a roster entry key, `None` for any other object in the folder
pub fn username_from_roster_key(chat: &ChatKey, key: &str) -> Option<String> {
    key.strip_prefix(&chat_folder(chat))?
        .strip_prefix('@')
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}

/// Chat identity encoded in a trigger key, `None` if malformed
pub fn chat_from_trigger_key(key: &str) -> Option<ChatKey> {
    let suffix = key.strip_prefix(&trigger_folder())?;
    let (chat_type, id) = suffix.split_once('@')?;
    if chat_type.is_empty() || id.is_empty() {
        return None;
    }
    Some(ChatKey::new(chat_type, id))
}
