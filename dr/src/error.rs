//! Service error types

use objectstore::ObjectStoreError;
use thiserror::Error;

/// Errors returned by the stores and the chat service
///
/// Every variant carries an operation-specific message for the end user and
/// the underlying error as its source.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{message}")]
    NotFound {
        message: String,
        #[source]
        source: ObjectStoreError,
    },

    #[error("{message}")]
    Parse {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{message}")]
    Storage {
        message: String,
        #[source]
        source: ObjectStoreError,
    },

    #[error("Invalid username \"{username}\": {reason}.")]
    InvalidUsername { username: String, reason: &'static str },
}

impl ServiceError {
    /// Backend fault that is never reported as `NotFound`
    pub fn storage(message: impl Into<String>, source: ObjectStoreError) -> Self {
        ServiceError::Storage {
            message: message.into(),
            source,
        }
    }

    /// Backend fault on a read that requires the object to exist
    pub fn from_read(message: impl Into<String>, source: ObjectStoreError) -> Self {
        let message = message.into();
        if source.is_not_found() {
            ServiceError::NotFound { message, source }
        } else {
            ServiceError::Storage { message, source }
        }
    }

    pub fn parse(message: impl Into<String>, source: serde_json::Error) -> Self {
        ServiceError::Parse {
            message: message.into(),
            source,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ServiceError::NotFound { .. })
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, ServiceError::Parse { .. })
    }

    pub fn is_storage(&self) -> bool {
        matches!(self, ServiceError::Storage { .. })
    }

    pub fn is_invalid_username(&self) -> bool {
        matches!(self, ServiceError::InvalidUsername { .. })
    }
}

/// Result alias for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;
