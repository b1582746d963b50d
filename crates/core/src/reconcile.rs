//! Store/catalog drift detection.
//!
//! A catalog failure after a successful upload leaves an object with no
//! record. Nothing is deleted automatically; this module only reports such
//! objects so an operator can decide what to do with them.

use std::collections::HashSet;

use tracing::{info, instrument};

use crate::catalog::FileCatalog;
use crate::ingest::IngestError;
use crate::storage::{ObjectStoreClient, StoredObject};

/// Objects in `store` that no record in `catalog` references.
///
/// # Errors
///
/// Returns an error if listing either side fails.
#[instrument(skip_all, fields(bucket = %store.bucket()))]
pub async fn find_orphans<S, C>(store: &S, catalog: &C) -> Result<Vec<StoredObject>, IngestError>
where
    S: ObjectStoreClient,
    C: FileCatalog,
{
    let (objects, records) = futures::try_join!(
        async { store.list_all().await.map_err(IngestError::from) },
        async { catalog.list_all().await.map_err(IngestError::from) },
    )?;

    let referenced: HashSet<(&str, &str)> = records
        .iter()
        .map(|r| (r.bucket.as_str(), r.key.as_str()))
        .collect();

    let orphans: Vec<StoredObject> = objects
        .into_iter()
        .filter(|o| !referenced.contains(&(o.bucket.as_str(), o.key.as_str())))
        .collect();

    info!(count = orphans.len(), "Orphan scan complete");
    Ok(orphans)
}
