//! Ingestion pipeline implementation.

use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use svault_shared::FileId;
use tracing::{debug, error, info, instrument, warn};

use super::error::IngestError;
use super::types::{IngestState, UploadRequest};
use crate::catalog::{FileCatalog, FileRecord, NewFileRecord};
use crate::reconcile;
use crate::staging::StagingArea;
use crate::storage::{ObjectStoreClient, StorageConfig, StoredObject};

/// Orchestrates staging, upload and cataloguing of inbound files.
///
/// Holds no locks and keeps no per-request state: concurrent calls are
/// independent. Two concurrent uploads of the same filename race; the last
/// upload's bytes win in the store and each call inserts its own record.
pub struct IngestionPipeline<S: ObjectStoreClient, C: FileCatalog> {
    staging: StagingArea,
    store: Arc<S>,
    catalog: Arc<C>,
    max_file_size: u64,
}

impl<S: ObjectStoreClient, C: FileCatalog> IngestionPipeline<S, C> {
    /// Create a new pipeline over explicit dependencies.
    #[must_use]
    pub fn new(staging: StagingArea, store: Arc<S>, catalog: Arc<C>) -> Self {
        Self {
            staging,
            store,
            catalog,
            max_file_size: StorageConfig::DEFAULT_MAX_FILE_SIZE,
        }
    }

    /// Set maximum accepted upload size in bytes.
    #[must_use]
    pub fn with_max_file_size(mut self, size: u64) -> Self {
        self.max_file_size = size;
        self
    }

    /// Maximum accepted upload size in bytes.
    #[must_use]
    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    /// Stage, upload and catalogue one file.
    ///
    /// The staged artifact is released on every exit path, including when the
    /// returned future is dropped mid-flight. The object key is the filename in
    /// the store's normalized form and the record carries that same key, so
    /// re-ingesting a name overwrites the stored object while inserting a
    /// new, independent record.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The filename is empty or names no file, or the content exceeds the
    ///   size limit
    /// - Staging fails (nothing persisted)
    /// - The upload fails (nothing catalogued)
    /// - The catalog insert fails (the uploaded object is left orphaned and
    ///   reported in the error)
    #[instrument(skip(self, request), fields(filename = %request.filename, size = request.content.len()))]
    pub async fn ingest(&self, request: UploadRequest) -> Result<FileRecord, IngestError> {
        debug!(state = %IngestState::Received, "Ingestion started");
        request.validate(self.max_file_size)?;
        let UploadRequest { filename, content } = request;

        let artifact = match self.staging.stage(&filename, &content).await {
            Ok(artifact) => artifact,
            Err(e) => {
                warn!(state = %IngestState::StagingFailed, error = %e, "Staging failed");
                return Err(e.into());
            }
        };
        drop(content);
        debug!(state = %IngestState::Staged, path = %artifact.path().display(), "File staged");

        let uploaded = self.store.upload(&artifact, &filename).await;
        if let Err(e) = artifact.unstage().await {
            warn!(error = %e, "Failed to delete staged file");
        }

        let stored = match uploaded {
            Ok(stored) => stored,
            Err(e) => {
                let err = IngestError::from_upload(e);
                warn!(state = %IngestState::UploadFailed, error = %err, "Upload failed");
                return Err(err);
            }
        };
        debug!(state = %IngestState::Uploaded, bucket = %stored.bucket, key = %stored.key, "File uploaded");

        let uploaded_at = stored.uploaded_at.unwrap_or_else(Utc::now);
        let new_record = NewFileRecord {
            filename,
            bucket: stored.bucket.clone(),
            key: stored.key.clone(),
            uploaded_at,
            created_at: uploaded_at,
        };

        match self.catalog.insert(new_record).await {
            Ok(record) => {
                info!(
                    state = %IngestState::Cataloged,
                    id = %record.id,
                    bucket = %record.bucket,
                    key = %record.key,
                    "File ingested"
                );
                Ok(record)
            }
            Err(e) => {
                error!(
                    state = %IngestState::CatalogFailed,
                    bucket = %stored.bucket,
                    key = %stored.key,
                    error = %e,
                    "Catalog insert failed; object has no catalog record"
                );
                Err(IngestError::CatalogUnavailable {
                    reason: e.to_string(),
                    orphan: Some(stored),
                })
            }
        }
    }

    /// Get a catalogued file by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the record does not exist or the catalog fails.
    pub async fn get_by_id(&self, id: FileId) -> Result<FileRecord, IngestError> {
        self.catalog
            .get_by_id(id)
            .await?
            .ok_or_else(|| IngestError::not_found(format!("file {id}")))
    }

    /// List every catalogued file.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog fails.
    pub async fn list_records(&self) -> Result<Vec<FileRecord>, IngestError> {
        Ok(self.catalog.list_all().await?)
    }

    /// List every object currently in the store.
    ///
    /// # Errors
    ///
    /// Returns an error if any page fetch fails; partial results are discarded.
    pub async fn list_objects(&self) -> Result<Vec<StoredObject>, IngestError> {
        Ok(self.store.list_all().await?)
    }

    /// Fetch a catalogued file's record and current content.
    ///
    /// # Errors
    ///
    /// Returns an error if the record or the object does not exist, or the
    /// catalog or store fails.
    pub async fn download(&self, id: FileId) -> Result<(FileRecord, Bytes), IngestError> {
        let record = self.get_by_id(id).await?;
        let content = self.store.read(&record.key).await?;
        Ok((record, content))
    }

    /// Objects in the store that no catalog record references.
    ///
    /// # Errors
    ///
    /// Returns an error if listing the store or the catalog fails.
    pub async fn orphans(&self) -> Result<Vec<StoredObject>, IngestError> {
        reconcile::find_orphans(self.store.as_ref(), self.catalog.as_ref()).await
    }
}
