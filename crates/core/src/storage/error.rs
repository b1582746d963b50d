//! Storage error types.

use opendal::ErrorKind;
use thiserror::Error;

use crate::staging::StagingError;

/// Storage operation errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Object not found in storage.
    #[error("object not found: {key}")]
    NotFound {
        /// Storage key that was not found.
        key: String,
    },

    /// Transient failure: network error, throttling, service error.
    #[error("object store unavailable for '{key}': {reason}")]
    Unavailable {
        /// Key being operated on; empty for bucket-wide operations.
        key: String,
        /// Backend error detail.
        reason: String,
    },

    /// Permanent failure: invalid bucket or key, missing permissions.
    #[error("object store rejected '{key}': {reason}")]
    Rejected {
        /// Key being operated on; empty for bucket-wide operations.
        key: String,
        /// Backend error detail.
        reason: String,
    },

    /// Storage provider configuration error.
    #[error("storage configuration error: {0}")]
    Configuration(String),

    /// The staged artifact could not be read for upload.
    #[error(transparent)]
    Artifact(#[from] StagingError),
}

impl StorageError {
    /// Create a not found error.
    #[must_use]
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    /// Create a configuration error.
    #[must_use]
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Classify an OpenDAL error raised while operating on `key`.
    #[must_use]
    pub fn from_opendal(key: &str, err: opendal::Error) -> Self {
        let key = key.to_string();
        if err.is_temporary() {
            return Self::Unavailable {
                key,
                reason: err.to_string(),
            };
        }

        match err.kind() {
            ErrorKind::NotFound => Self::NotFound { key },
            ErrorKind::PermissionDenied
            | ErrorKind::ConfigInvalid
            | ErrorKind::Unsupported
            | ErrorKind::IsADirectory
            | ErrorKind::NotADirectory
            | ErrorKind::AlreadyExists
            | ErrorKind::IsSameFile
            | ErrorKind::ConditionNotMatch
            | ErrorKind::RangeNotSatisfied => Self::Rejected {
                key,
                reason: err.to_string(),
            },
            _ => Self::Unavailable {
                key,
                reason: err.to_string(),
            },
        }
    }
}
