//! Storage configuration types.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use svault_shared::StorageSettings;

use super::error::StorageError;

/// Storage provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StorageProvider {
    /// S3-compatible storage: AWS S3, MinIO, Cloudflare R2.
    S3 {
        /// S3 bucket name.
        bucket: String,
        /// AWS region.
        region: String,
        /// Custom endpoint URL; AWS when unset.
        endpoint: Option<String>,
        /// Access key ID; ambient credentials when unset.
        access_key_id: Option<String>,
        /// Secret access key; ambient credentials when unset.
        secret_access_key: Option<String>,
    },
    /// Local filesystem (development only)
    LocalFs {
        /// Root directory path.
        root: PathBuf,
    },
    /// In-process memory (tests only)
    Memory {
        /// Name reported as the bucket.
        bucket: String,
    },
}

impl StorageProvider {
    /// Create an S3 provider that authenticates with ambient credentials.
    #[must_use]
    pub fn s3(bucket: impl Into<String>, region: impl Into<String>) -> Self {
        Self::S3 {
            bucket: bucket.into(),
            region: region.into(),
            endpoint: None,
            access_key_id: None,
            secret_access_key: None,
        }
    }

    /// Create local filesystem provider (development only).
    #[must_use]
    pub fn local_fs(root: impl Into<PathBuf>) -> Self {
        Self::LocalFs { root: root.into() }
    }

    /// Create in-memory provider.
    #[must_use]
    pub fn memory(bucket: impl Into<String>) -> Self {
        Self::Memory {
            bucket: bucket.into(),
        }
    }

    /// Get the provider name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::S3 { .. } => "s3",
            Self::LocalFs { .. } => "fs",
            Self::Memory { .. } => "memory",
        }
    }

    /// Get the bucket name.
    #[must_use]
    pub fn bucket(&self) -> &str {
        match self {
            Self::S3 { bucket, .. } | Self::Memory { bucket } => bucket,
            Self::LocalFs { root } => root.to_str().unwrap_or("local"),
        }
    }
}

/// Storage service configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Storage provider configuration.
    pub provider: StorageProvider,
    /// Maximum file size in bytes.
    pub max_file_size: u64,
    /// Deadline for a whole store operation.
    pub timeout: Duration,
    /// Deadline for a single read or write chunk.
    pub io_timeout: Duration,
}

impl StorageConfig {
    /// Default max file size: 10MB.
    pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;
    /// Default operation timeout: 60 seconds.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
    /// Default chunk timeout: 10 seconds.
    pub const DEFAULT_IO_TIMEOUT: Duration = Duration::from_secs(10);

    /// Create a new storage config with default settings.
    #[must_use]
    pub fn new(provider: StorageProvider) -> Self {
        Self {
            provider,
            max_file_size: Self::DEFAULT_MAX_FILE_SIZE,
            timeout: Self::DEFAULT_TIMEOUT,
            io_timeout: Self::DEFAULT_IO_TIMEOUT,
        }
    }

    /// Build a config from the raw application settings.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown provider or a missing `fs` root.
    pub fn from_settings(settings: &StorageSettings) -> Result<Self, StorageError> {
        let provider = match settings.provider.as_str() {
            "s3" => StorageProvider::S3 {
                bucket: settings.bucket.clone(),
                region: settings.region.clone(),
                endpoint: settings.endpoint.clone(),
                access_key_id: settings.access_key_id.clone(),
                secret_access_key: settings.secret_access_key.clone(),
            },
            "fs" => {
                let root = settings
                    .root
                    .clone()
                    .ok_or_else(|| StorageError::configuration("fs provider requires a root"))?;
                StorageProvider::local_fs(root)
            }
            "memory" => StorageProvider::memory(settings.bucket.clone()),
            other => {
                return Err(StorageError::configuration(format!(
                    "unknown storage provider '{other}'"
                )));
            }
        };

        Ok(Self::new(provider)
            .with_max_file_size(settings.max_file_size)
            .with_timeouts(
                Duration::from_secs(settings.timeout_secs),
                Duration::from_secs(settings.io_timeout_secs),
            ))
    }

    /// Set maximum file size.
    #[must_use]
    pub fn with_max_file_size(mut self, size: u64) -> Self {
        self.max_file_size = size;
        self
    }

    /// Set operation and chunk timeouts.
    #[must_use]
    pub fn with_timeouts(mut self, timeout: Duration, io_timeout: Duration) -> Self {
        self.timeout = timeout;
        self.io_timeout = io_timeout;
        self
    }
}
