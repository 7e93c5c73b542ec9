//! Object store error types

use thiserror::Error;

/// Errors reported by an object store backend
#[derive(Debug, Error)]
pub enum ObjectStoreError {
    #[error("Object not found: {key}")]
    NotFound { key: String },

    #[error("Invalid object key: {key}")]
    InvalidKey { key: String },

    #[error("Batch delete failed for {} of the requested keys: {}", .failed.len(), .failed.join(", "))]
    PartialDelete { failed: Vec<String> },

    #[error("Backend fault on {key}: {message}")]
    Backend { key: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ObjectStoreError {
    /// Check if this error means the object does not exist
    pub fn is_not_found(&self) -> bool {
        match self {
            ObjectStoreError::NotFound { .. } => true,
            ObjectStoreError::Io(e) => e.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

/// Result alias for object store operations
pub type ObjectStoreResult<T> = Result<T, ObjectStoreError>;
