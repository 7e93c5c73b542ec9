//! ObjectStore - flat key-value object storage
//!
//! A minimal bucket-style contract (put/get/head/delete/delete_many/list) so
//! that state can be kept as individual objects in any backend: a cloud
//! object store, an embedded KV store, or a plain directory.
//!
//! # Layout
//!
//! ```text
//! {bucket}/
//! ├── private/42/properties.json
//! ├── private/42/@alice
//! └── trigger/private@42
//! ```
//!
//! # Example
//!
//! ```ignore
//! use objectstore::{MemoryStore, ObjectStore};
//!
//! let store = MemoryStore::new();
//! store.put("a/b.json", b"{}".to_vec(), "application/json").await?;
//! assert!(store.head("a/b.json").await?);
//! let keys = store.list("a/", Some('/')).await?;
//! ```

mod error;
mod fs;
mod memory;
mod traits;

pub use error::{ObjectStoreError, ObjectStoreResult};
pub use fs::FsStore;
pub use memory::MemoryStore;
pub use traits::ObjectStore;

/// Content type used for JSON documents
pub const JSON_CONTENT_TYPE: &str = "application/json";
