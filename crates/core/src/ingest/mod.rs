//! Ingestion pipeline.
//!
//! Turns an inbound upload into a durable, catalogued file:
//!
//! ```text
//! Received ──stage──▶ Staged ──upload──▶ Uploaded ──insert──▶ Cataloged
//!     │                  │                   │
//!     ▼                  ▼                   ▼
//! StagingFailed     UploadFailed       CatalogFailed
//!                 (artifact released)  (artifact released,
//!                                       object orphaned)
//! ```
//!
//! Nothing is retried here. A failure after a successful upload leaves the
//! object in the store without a catalog record; see [`crate::reconcile`].

mod error;
mod pipeline;
mod types;

pub use error::IngestError;
pub use pipeline::IngestionPipeline;
pub use types::{IngestState, UploadRequest};
