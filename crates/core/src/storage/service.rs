//! Storage service implementation using Apache OpenDAL.

use std::future::Future;

use bytes::Bytes;
use chrono::{DateTime, NaiveDateTime, Utc};
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use opendal::layers::TimeoutLayer;
use opendal::{Entry, Operator, services};
use serde::Serialize;
use tokio_util::io::ReaderStream;
use tracing::{debug, info, instrument};

use super::config::{StorageConfig, StorageProvider};
use super::error::StorageError;
use crate::staging::{StagedArtifact, StagingError};

/// Chunk size used when streaming a staged artifact to the store.
const UPLOAD_CHUNK_SIZE: usize = 64 * 1024;

/// A durable object in the bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredObject {
    /// Bucket holding the object.
    pub bucket: String,
    /// Object key.
    pub key: String,
    /// Object size in bytes, when the backend reports it.
    pub size: Option<u64>,
    /// When the object was written, when known.
    pub uploaded_at: Option<DateTime<Utc>>,
}

/// Object store operations the ingestion pipeline depends on.
///
/// Implemented by [`StorageService`]; tests substitute failing stores.
pub trait ObjectStoreClient: Send + Sync {
    /// Bucket every object is written to.
    fn bucket(&self) -> &str;

    /// Stream a staged artifact to the store under `key`, overwriting any
    /// existing object with that key.
    fn upload(
        &self,
        artifact: &StagedArtifact,
        key: &str,
    ) -> impl Future<Output = Result<StoredObject, StorageError>> + Send;

    /// Enumerate every object in the bucket. Fails as a whole if any page
    /// fetch fails.
    fn list_all(&self) -> impl Future<Output = Result<Vec<StoredObject>, StorageError>> + Send;

    /// Read an object's full content.
    fn read(&self, key: &str) -> impl Future<Output = Result<Bytes, StorageError>> + Send;
}

/// Storage service backed by an OpenDAL operator.
pub struct StorageService {
    operator: Operator,
    config: StorageConfig,
}

impl StorageService {
    /// Create a new storage service from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage provider cannot be initialized.
    pub fn from_config(config: StorageConfig) -> Result<Self, StorageError> {
        let operator = Self::create_operator(&config.provider)?.layer(
            TimeoutLayer::new()
                .with_timeout(config.timeout)
                .with_io_timeout(config.io_timeout),
        );
        Ok(Self { operator, config })
    }

    /// Create OpenDAL operator from provider config.
    fn create_operator(provider: &StorageProvider) -> Result<Operator, StorageError> {
        match provider {
            StorageProvider::S3 {
                bucket,
                region,
                endpoint,
                access_key_id,
                secret_access_key,
            } => {
                let mut builder = services::S3::default().bucket(bucket).region(region);
                if let Some(endpoint) = endpoint {
                    builder = builder.endpoint(endpoint);
                }
                if let (Some(key_id), Some(secret)) = (access_key_id, secret_access_key) {
                    builder = builder.access_key_id(key_id).secret_access_key(secret);
                }

                Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish()
                    .pipe(Ok)
            }
            StorageProvider::LocalFs { root } => {
                let builder = services::Fs::default().root(
                    root.to_str()
                        .ok_or_else(|| StorageError::configuration("invalid path"))?,
                );

                Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish()
                    .pipe(Ok)
            }
            StorageProvider::Memory { .. } => Operator::new(services::Memory::default())
                .map_err(|e| StorageError::configuration(e.to_string()))?
                .finish()
                .pipe(Ok),
        }
    }

    /// Lazily enumerate every object in the bucket.
    ///
    /// Pages are fetched by the backend lister as the stream is polled. The
    /// stream is finite; call again to restart from the beginning.
    pub fn objects(&self) -> BoxStream<'_, Result<StoredObject, StorageError>> {
        let bucket = self.bucket().to_string();

        stream::once(async move { self.operator.lister_with("").recursive(true).await })
            .map_err(|e| StorageError::from_opendal("", e))
            .map_ok(|lister| lister.map_err(|e| StorageError::from_opendal("", e)))
            .try_flatten()
            .try_filter_map(move |entry| {
                let object = to_stored_object(&bucket, &entry);
                async move { Ok(object) }
            })
            .boxed()
    }

    /// Get the storage provider name.
    #[must_use]
    pub fn provider_name(&self) -> &'static str {
        self.config.provider.name()
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    async fn stream_artifact(
        &self,
        artifact: &StagedArtifact,
        key: &str,
    ) -> Result<(), StorageError> {
        let file = tokio::fs::File::open(artifact.path())
            .await
            .map_err(|source| StagingError::Read {
                path: artifact.path().to_path_buf(),
                source,
            })?;

        let mut writer = self
            .operator
            .writer(key)
            .await
            .map_err(|e| StorageError::from_opendal(key, e))?;

        let mut chunks = ReaderStream::with_capacity(file, UPLOAD_CHUNK_SIZE);
        while let Some(chunk) = chunks.next().await {
            let result = match chunk {
                Ok(chunk) => writer
                    .write(chunk)
                    .await
                    .map_err(|e| StorageError::from_opendal(key, e)),
                Err(source) => Err(StorageError::Artifact(StagingError::Read {
                    path: artifact.path().to_path_buf(),
                    source,
                })),
            };
            if let Err(e) = result {
                if let Err(abort_err) = writer.abort().await {
                    debug!(key = %key, error = %abort_err, "Failed to abort partial upload");
                }
                return Err(e);
            }
        }

        writer
            .close()
            .await
            .map_err(|e| StorageError::from_opendal(key, e))?;
        Ok(())
    }
}

impl ObjectStoreClient for StorageService {
    fn bucket(&self) -> &str {
        self.config.provider.bucket()
    }

    #[instrument(skip(self, artifact), fields(bucket = %self.bucket(), key = %key, size = artifact.size()))]
    async fn upload(&self, artifact: &StagedArtifact, key: &str) -> Result<StoredObject, StorageError> {
        let key = object_key(key).ok_or_else(|| StorageError::Rejected {
            key: key.to_string(),
            reason: "key does not name a file".to_string(),
        })?;
        info!(stored_key = %key, "Uploading file to object store");
        self.stream_artifact(artifact, &key).await?;

        Ok(StoredObject {
            bucket: self.bucket().to_string(),
            key,
            size: Some(artifact.size()),
            uploaded_at: Some(Utc::now()),
        })
    }

    #[instrument(skip(self), fields(bucket = %self.bucket()))]
    async fn list_all(&self) -> Result<Vec<StoredObject>, StorageError> {
        let objects: Vec<StoredObject> = self.objects().try_collect().await?;
        debug!(count = objects.len(), "Listed objects");
        Ok(objects)
    }

    #[instrument(skip(self), fields(bucket = %self.bucket(), key = %key))]
    async fn read(&self, key: &str) -> Result<Bytes, StorageError> {
        let buffer = self
            .operator
            .read(key)
            .await
            .map_err(|e| StorageError::from_opendal(key, e))?;
        Ok(buffer.to_bytes())
    }
}

/// Key a file named `name` is stored and listed under.
///
/// The backend trims surrounding whitespace, drops leading slashes and
/// collapses repeated separators. Returns `None` when nothing is left or the
/// name addresses a directory.
#[must_use]
pub fn object_key(name: &str) -> Option<String> {
    let trimmed = name.trim();
    if trimmed.ends_with('/') {
        return None;
    }

    let key = trimmed
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/");
    (!key.is_empty()).then_some(key)
}

/// Convert a listing entry into a stored object, skipping directories.
fn to_stored_object(bucket: &str, entry: &Entry) -> Option<StoredObject> {
    let meta = entry.metadata();
    if meta.is_dir() {
        return None;
    }

    Some(StoredObject {
        bucket: bucket.to_string(),
        key: entry.path().to_string(),
        size: Some(meta.content_length()),
        uploaded_at: meta
            .last_modified()
            .and_then(|ts| parse_timestamp(&ts.to_string())),
    })
}

/// Parse a backend timestamp rendered either as RFC 3339 or as
/// `YYYY-MM-DD HH:MM:SS[.f] UTC`.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw.trim_end_matches(" UTC"), "%Y-%m-%d %H:%M:%S%.f")
                .ok()
                .map(|naive| naive.and_utc())
        })
}

/// Extension trait for pipe operator.
trait Pipe: Sized {
    fn pipe<F, R>(self, f: F) -> R
    where
        F: FnOnce(Self) -> R,
    {
        f(self)
    }
}

impl<T> Pipe for T {}
