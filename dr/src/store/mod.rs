//! Typed stores over the raw object store
//!
//! Each store owns one kind of object (settings, roster markers, triggers)
//! and turns backend failures into [`ServiceError`](crate::ServiceError).

mod properties;
mod roster;
mod trigger;

pub use properties::PropertiesStore;
pub use roster::RosterStore;
pub use trigger::TriggerStore;

use serde::Serialize;

/// Pretty-printed JSON body, two-space indent
pub(crate) fn json_body<T: Serialize>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec_pretty(value)
}
