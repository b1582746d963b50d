//! Catalog record types.

use chrono::{DateTime, Utc};
use serde::Serialize;
use svault_shared::FileId;

/// A catalogued upload. Immutable once inserted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRecord {
    /// Generated identifier.
    pub id: FileId,
    /// Caller-supplied filename.
    pub filename: String,
    /// Bucket holding the object.
    pub bucket: String,
    /// Object key in the bucket.
    pub key: String,
    /// When the object reached the store.
    pub uploaded_at: DateTime<Utc>,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
}

/// Input for inserting a catalog record.
#[derive(Debug, Clone)]
pub struct NewFileRecord {
    /// Caller-supplied filename.
    pub filename: String,
    /// Bucket holding the object.
    pub bucket: String,
    /// Object key in the bucket.
    pub key: String,
    /// When the object reached the store.
    pub uploaded_at: DateTime<Utc>,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
}
