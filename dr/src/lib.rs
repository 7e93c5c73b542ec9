//! DutyRoster - per-chat duty rotation state in a flat object store
//!
//! Every chat gets a small settings document, one empty marker object per
//! registered participant, and optionally a trigger marker that tells a
//! scheduler to run the rotation daily. There is no database: state is a set
//! of individual objects in one bucket.
//!
//! # Layout
//!
//! ```text
//! {bucket}/
//! ├── {type}/{id}/properties.json   {"dutyCount", "countPeople", "lastDuty"}
//! ├── {type}/{id}/@{username}       roster entry, empty body
//! └── trigger/{type}@{id}           {"time": 9}
//! ```
//!
//! # Modules
//!
//! - [`keyspace`] - object key derivation
//! - [`store`] - typed stores for settings, roster and triggers
//! - [`selector`] - no-immediate-repeat duty selection
//! - [`service`] - the operations a chat transport calls
//! - [`config`] - configuration types and loading
//! - [`cli`] - command-line interface
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use dutyroster::{Chat, ChatService};
//! use objectstore::MemoryStore;
//!
//! let service = ChatService::new(Arc::new(MemoryStore::new()));
//! let chat = Chat::new("group", "-100").with_title("Team");
//! service.init(&chat).await?;
//! service.reg(&chat, "alice").await?;
//! let on_duty = service.duty(&chat).await?;
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod keyspace;
pub mod model;
pub mod selector;
pub mod service;
pub mod store;

pub use config::{Config, StorageBackend, StorageConfig};
pub use error::{ServiceError, ServiceResult};
pub use model::{
    Chat, ChatKey, ChatStatus, InitStatus, Properties, RegStatus, RosterChange, Trigger, TriggerStatus, UnregStatus,
};
pub use selector::{Selection, select_duty};
pub use service::{ChatService, ServiceSettings, open_object_store};
pub use store::{PropertiesStore, RosterStore, TriggerStore};
