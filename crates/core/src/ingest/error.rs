//! Ingestion error taxonomy.

use svault_shared::AppError;
use thiserror::Error;

use crate::catalog::CatalogError;
use crate::staging::StagingError;
use crate::storage::{StorageError, StoredObject};

/// Every way an ingestion, lookup or listing can fail.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The request itself is unacceptable.
    #[error("invalid upload: {0}")]
    Validation(String),

    /// Local staging I/O failed.
    #[error("staging I/O failure: {0}")]
    Io(#[from] StagingError),

    /// Transient store failure; the caller may retry.
    #[error("object store unavailable for '{key}': {reason}")]
    StoreUnavailable {
        /// Key being operated on; empty for bucket-wide operations.
        key: String,
        /// Backend error detail.
        reason: String,
    },

    /// Permanent store failure; retrying with the same inputs will fail again.
    #[error("object store rejected '{key}': {reason}")]
    StoreRejected {
        /// Key being operated on; empty for bucket-wide operations.
        key: String,
        /// Backend error detail.
        reason: String,
    },

    /// Catalog persistence failed.
    #[error("catalog unavailable: {reason}{}", orphan_suffix(.orphan.as_ref()))]
    CatalogUnavailable {
        /// Catalog error detail.
        reason: String,
        /// Object uploaded before the catalog failed, now without a record.
        orphan: Option<StoredObject>,
    },

    /// Lookup miss.
    #[error("not found: {0}")]
    NotFound(String),
}

fn orphan_suffix(orphan: Option<&StoredObject>) -> String {
    orphan.map_or_else(String::new, |o| {
        format!(" (object {}/{} has no catalog record)", o.bucket, o.key)
    })
}

impl IngestError {
    /// Create a validation error.
    #[must_use]
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a not found error.
    #[must_use]
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    /// Classify a failure of the upload step.
    ///
    /// A missing bucket surfaces from the backend as "not found"; on upload
    /// that is a permanent rejection rather than a lookup miss.
    #[must_use]
    pub fn from_upload(err: StorageError) -> Self {
        match err {
            StorageError::NotFound { key } => Self::StoreRejected {
                key,
                reason: "bucket or key path does not exist".to_string(),
            },
            other => other.into(),
        }
    }

    /// Object left behind by a catalog failure, if any.
    #[must_use]
    pub fn orphan(&self) -> Option<&StoredObject> {
        match self {
            Self::CatalogUnavailable { orphan, .. } => orphan.as_ref(),
            _ => None,
        }
    }
}

impl From<StorageError> for IngestError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound { key } => Self::NotFound(key),
            StorageError::Unavailable { key, reason } => Self::StoreUnavailable { key, reason },
            StorageError::Rejected { key, reason } => Self::StoreRejected { key, reason },
            StorageError::Configuration(reason) => Self::StoreRejected {
                key: String::new(),
                reason,
            },
            StorageError::Artifact(e) => Self::Io(e),
        }
    }
}

impl From<CatalogError> for IngestError {
    fn from(err: CatalogError) -> Self {
        Self::CatalogUnavailable {
            reason: err.to_string(),
            orphan: None,
        }
    }
}

impl From<IngestError> for AppError {
    fn from(err: IngestError) -> Self {
        let message = err.to_string();
        match err {
            IngestError::Validation(_) => Self::Validation(message),
            IngestError::Io(_) => Self::StagingIo(message),
            IngestError::StoreUnavailable { .. } => Self::StoreUnavailable(message),
            IngestError::StoreRejected { .. } => Self::StoreRejected(message),
            IngestError::CatalogUnavailable { .. } => Self::CatalogUnavailable(message),
            IngestError::NotFound(_) => Self::NotFound(message),
        }
    }
}
