//! Catalog repository trait.

use std::future::Future;

use svault_shared::FileId;

use super::error::CatalogError;
use super::types::{FileRecord, NewFileRecord};

/// Repository trait for file record persistence.
///
/// This trait is implemented by the db crate to provide actual database operations.
pub trait FileCatalog: Send + Sync {
    /// Insert a record, generating its id.
    fn insert(
        &self,
        record: NewFileRecord,
    ) -> impl Future<Output = Result<FileRecord, CatalogError>> + Send;

    /// Find a record by id.
    fn get_by_id(
        &self,
        id: FileId,
    ) -> impl Future<Output = Result<Option<FileRecord>, CatalogError>> + Send;

    /// List every record. Ordering is unspecified.
    fn list_all(&self) -> impl Future<Output = Result<Vec<FileRecord>, CatalogError>> + Send;
}
