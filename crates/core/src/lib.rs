//! Core ingestion logic for Svault.
//!
//! This crate contains the pipeline with ZERO web or database dependencies.
//! Persistence is reached through the [`catalog::FileCatalog`] port, object
//! storage through [`storage::ObjectStoreClient`].
//!
//! # Modules
//!
//! - `staging` - Scratch files for uploads in flight
//! - `storage` - Object store client (OpenDAL)
//! - `catalog` - Metadata catalog port and record types
//! - `ingest` - Stage, upload, catalogue orchestration
//! - `reconcile` - Store objects with no catalog record

pub mod catalog;
pub mod ingest;
pub mod reconcile;
pub mod staging;
pub mod storage;

#[cfg(test)]
pub(crate) mod test_support;
