//! Staging area for uploads awaiting transfer to the object store.
//!
//! Inbound bytes are written to a scratch directory before the object store
//! client streams them out. Every staged file is owned by a
//! [`StagedArtifact`] and deleted on all exit paths.

mod area;
mod error;

pub use area::{StagedArtifact, StagingArea};
pub use error::StagingError;
