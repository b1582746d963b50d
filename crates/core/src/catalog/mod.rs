//! Metadata catalog port.
//!
//! The catalog maps a generated [`FileId`](svault_shared::FileId) to the
//! filename and storage location of an uploaded file. The pipeline only needs
//! insert, lookup by id and a full listing; the db crate provides the
//! persistent implementation.

mod error;
mod repository;
mod types;

pub use error::CatalogError;
pub use repository::FileCatalog;
pub use types::{FileRecord, NewFileRecord};
