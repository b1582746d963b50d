//! In-process doubles for pipeline tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use svault_shared::FileId;

use crate::catalog::{CatalogError, FileCatalog, FileRecord, NewFileRecord};
use crate::staging::StagedArtifact;
use crate::storage::{
    ObjectStoreClient, StorageConfig, StorageError, StorageProvider, StorageService, StoredObject,
};

/// Storage service over the in-memory provider, bucket `media`.
pub(crate) fn memory_store() -> Arc<StorageService> {
    Arc::new(
        StorageService::from_config(StorageConfig::new(StorageProvider::memory("media")))
            .expect("memory provider"),
    )
}

/// Catalog held in a vector; optionally refuses every insert.
#[derive(Default)]
pub(crate) struct MemoryCatalog {
    records: Mutex<Vec<FileRecord>>,
    fail_inserts: bool,
}

impl MemoryCatalog {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn failing() -> Self {
        Self {
            fail_inserts: true,
            ..Self::default()
        }
    }

    pub(crate) fn records(&self) -> Vec<FileRecord> {
        self.records.lock().expect("lock").clone()
    }
}

impl FileCatalog for MemoryCatalog {
    async fn insert(&self, record: NewFileRecord) -> Result<FileRecord, CatalogError> {
        if self.fail_inserts {
            return Err(CatalogError::unavailable("connection refused"));
        }
        let record = FileRecord {
            id: FileId::new(),
            filename: record.filename,
            bucket: record.bucket,
            key: record.key,
            uploaded_at: record.uploaded_at,
            created_at: record.created_at,
        };
        self.records.lock().expect("lock").push(record.clone());
        Ok(record)
    }

    async fn get_by_id(&self, id: FileId) -> Result<Option<FileRecord>, CatalogError> {
        Ok(self
            .records
            .lock()
            .expect("lock")
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    async fn list_all(&self) -> Result<Vec<FileRecord>, CatalogError> {
        Ok(self.records())
    }
}

/// Store whose every operation fails with a fixed error class.
pub(crate) struct FailingStore {
    transient: bool,
    saw_staged_file: AtomicBool,
}

impl FailingStore {
    pub(crate) fn unavailable() -> Self {
        Self {
            transient: true,
            saw_staged_file: AtomicBool::new(false),
        }
    }

    pub(crate) fn rejected() -> Self {
        Self {
            transient: false,
            saw_staged_file: AtomicBool::new(false),
        }
    }

    /// Whether the artifact was on disk when upload was attempted.
    pub(crate) fn saw_staged_file(&self) -> bool {
        self.saw_staged_file.load(Ordering::SeqCst)
    }

    fn error(&self, key: &str) -> StorageError {
        if self.transient {
            StorageError::Unavailable {
                key: key.to_string(),
                reason: "service unavailable".to_string(),
            }
        } else {
            StorageError::Rejected {
                key: key.to_string(),
                reason: "access denied".to_string(),
            }
        }
    }
}

impl ObjectStoreClient for FailingStore {
    fn bucket(&self) -> &str {
        "media"
    }

    async fn upload(&self, artifact: &StagedArtifact, key: &str) -> Result<StoredObject, StorageError> {
        self.saw_staged_file
            .store(artifact.path().exists(), Ordering::SeqCst);
        Err(self.error(key))
    }

    async fn list_all(&self) -> Result<Vec<StoredObject>, StorageError> {
        Err(self.error(""))
    }

    async fn read(&self, key: &str) -> Result<Bytes, StorageError> {
        Err(self.error(key))
    }
}

/// Store whose upload never completes.
pub(crate) struct StallingStore;

impl ObjectStoreClient for StallingStore {
    fn bucket(&self) -> &str {
        "media"
    }

    async fn upload(&self, _artifact: &StagedArtifact, _key: &str) -> Result<StoredObject, StorageError> {
        std::future::pending().await
    }

    async fn list_all(&self) -> Result<Vec<StoredObject>, StorageError> {
        Ok(Vec::new())
    }

    async fn read(&self, key: &str) -> Result<Bytes, StorageError> {
        Err(StorageError::not_found(key))
    }
}
