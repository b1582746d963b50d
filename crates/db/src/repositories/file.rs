//! File repository for database operations.
//!
//! Implements the metadata catalog using SeaORM.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};
use svault_core::catalog::{CatalogError, FileCatalog, FileRecord, NewFileRecord};
use svault_shared::FileId;
use tracing::instrument;

use crate::entities::files;

/// File repository implementation.
#[derive(Debug, Clone)]
pub struct FileRepository {
    db: DatabaseConnection,
}

impl FileRepository {
    /// Create a new file repository.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl FileCatalog for FileRepository {
    #[instrument(skip(self, record), fields(bucket = %record.bucket, key = %record.key))]
    async fn insert(&self, record: NewFileRecord) -> Result<FileRecord, CatalogError> {
        let active_model = files::ActiveModel {
            id: Set(FileId::new().into_inner()),
            filename: Set(record.filename),
            bucket: Set(record.bucket),
            key: Set(record.key),
            uploaded_at: Set(record.uploaded_at.into()),
            created_at: Set(record.created_at.into()),
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| CatalogError::unavailable(e.to_string()))?;

        Ok(to_domain(model))
    }

    async fn get_by_id(&self, id: FileId) -> Result<Option<FileRecord>, CatalogError> {
        let model = files::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(|e| CatalogError::unavailable(e.to_string()))?;

        Ok(model.map(to_domain))
    }

    async fn list_all(&self) -> Result<Vec<FileRecord>, CatalogError> {
        let models = files::Entity::find()
            .order_by_asc(files::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| CatalogError::unavailable(e.to_string()))?;

        Ok(models.into_iter().map(to_domain).collect())
    }
}

/// Convert database model to domain record.
fn to_domain(model: files::Model) -> FileRecord {
    FileRecord {
        id: FileId::from_uuid(model.id),
        filename: model.filename,
        bucket: model.bucket,
        key: model.key,
        uploaded_at: model.uploaded_at.with_timezone(&Utc),
        created_at: model.created_at.with_timezone(&Utc),
    }
}
