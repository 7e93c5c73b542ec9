//! CLI command definitions and subcommands

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

use crate::model::Chat;

/// DutyRoster - per-chat duty rotation
#[derive(Parser, Debug)]
#[command(
    name = "dr",
    author,
    version,
    about = "Per-chat duty rotation backed by an object store"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(flatten)]
    pub chat: ChatArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Chat the command applies to
#[derive(Args, Debug, Clone)]
pub struct ChatArgs {
    /// Chat type (private, group, supergroup, channel)
    #[arg(long = "chat-type", global = true, default_value = "private")]
    pub chat_type: String,

    /// Chat identifier
    #[arg(long = "chat-id", global = true, allow_hyphen_values = true)]
    pub chat_id: Option<String>,

    /// Chat username, used in messages
    #[arg(long = "chat-username", global = true)]
    pub chat_username: Option<String>,

    /// Chat title, used in messages when there is no username
    #[arg(long = "chat-title", global = true)]
    pub chat_title: Option<String>,
}

impl ChatArgs {
    /// Build the chat, `None` if no chat id was given
    pub fn to_chat(&self) -> Option<Chat> {
        let id = self.chat_id.as_ref()?;
        let mut chat = Chat::new(self.chat_type.clone(), id.clone());
        chat.username = self.chat_username.clone();
        chat.title = self.chat_title.clone();
        Some(chat)
    }
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the chat's storage if missing
    Init,

    /// Clear the chat, then initialize it again
    Reset,

    /// Delete roster, settings and trigger of the chat
    Clear,

    /// Set how many people are on duty per rotation
    SetDutyCount {
        /// Number of people
        count: u32,
    },

    /// Register a participant
    Reg {
        /// Username, with or without a leading @
        username: String,
    },

    /// Unregister a participant
    Unreg {
        /// Username, with or without a leading @
        username: String,
    },

    /// Pick today's duty
    Duty,

    /// List registered participants
    List,

    /// Recompute the people counter from the roster
    Recount,

    /// Show settings, roster and trigger
    Status,

    /// Enable the daily trigger
    TriggerOn,

    /// Disable the daily trigger
    TriggerOff,

    /// List chats with an enabled trigger
    ListChats,
}

impl Command {
    /// Whether the command needs `--chat-id`
    pub fn needs_chat(&self) -> bool {
        !matches!(self, Command::ListChats)
    }
}

/// Log file the binary writes to
pub fn get_log_path() -> PathBuf {
    debug!("get_log_path: called");
    get_log_dir().join("dutyroster.log")
}

/// Directory holding the log file
pub fn get_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("dutyroster")
        .join("logs")
}

/// Generate the after_help text from the platform's data directory
pub fn generate_after_help() -> String {
    debug!("generate_after_help: called");
    format!("Logs are written to: {}", get_log_path().display())
}

/// Strip one leading `@` from a username argument
pub fn normalize_username(username: &str) -> &str {
    username.strip_prefix('@').unwrap_or(username)
}
