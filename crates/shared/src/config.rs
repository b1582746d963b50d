//! Application configuration management.

use std::path::PathBuf;

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Object storage configuration.
    #[serde(default)]
    pub storage: StorageSettings,
    /// Local staging configuration.
    #[serde(default)]
    pub staging: StagingConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    #[serde(default = "default_database_url")]
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
        }
    }
}

fn default_database_url() -> String {
    "sqlite://svault.sqlite?mode=rwc".to_string()
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Raw object storage settings.
///
/// Turned into a concrete provider by `svault_core::storage::StorageConfig`.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    /// Backend kind: `s3`, `fs` or `memory`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Bucket every object is written to.
    #[serde(default = "default_bucket")]
    pub bucket: String,
    /// Bucket region.
    #[serde(default = "default_region")]
    pub region: String,
    /// Custom S3 endpoint (MinIO, R2). AWS is used when unset.
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Explicit access key. Ambient credentials are used when unset.
    #[serde(default)]
    pub access_key_id: Option<String>,
    /// Explicit secret key. Ambient credentials are used when unset.
    #[serde(default)]
    pub secret_access_key: Option<String>,
    /// Root directory for the `fs` provider.
    #[serde(default)]
    pub root: Option<PathBuf>,
    /// Maximum accepted upload size in bytes.
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
    /// Deadline in seconds for a whole store operation.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Deadline in seconds for a single read or write chunk.
    #[serde(default = "default_io_timeout_secs")]
    pub io_timeout_secs: u64,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            bucket: default_bucket(),
            region: default_region(),
            endpoint: None,
            access_key_id: None,
            secret_access_key: None,
            root: None,
            max_file_size: default_max_file_size(),
            timeout_secs: default_timeout_secs(),
            io_timeout_secs: default_io_timeout_secs(),
        }
    }
}

fn default_provider() -> String {
    "s3".to_string()
}

fn default_bucket() -> String {
    "fullerzz-media".to_string()
}

fn default_region() -> String {
    "us-west-1".to_string()
}

fn default_max_file_size() -> u64 {
    10 * 1024 * 1024 // 10MB
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_io_timeout_secs() -> u64 {
    10
}

/// Local staging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StagingConfig {
    /// Scratch directory for uploads awaiting transfer to the object store.
    #[serde(default = "default_staging_dir")]
    pub dir: PathBuf,
}

impl Default for StagingConfig {
    fn default() -> Self {
        Self {
            dir: default_staging_dir(),
        }
    }
}

fn default_staging_dir() -> PathBuf {
    PathBuf::from("./uploads")
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("SVAULT").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.storage.provider, "s3");
        assert_eq!(config.storage.bucket, "fullerzz-media");
        assert_eq!(config.storage.region, "us-west-1");
        assert_eq!(config.storage.max_file_size, 10 * 1024 * 1024);
        assert_eq!(config.storage.timeout_secs, 60);
        assert_eq!(config.storage.io_timeout_secs, 10);
        assert_eq!(config.staging.dir, PathBuf::from("./uploads"));
        assert!(config.storage.access_key_id.is_none());
    }

    #[test]
    fn test_load_without_sources_uses_defaults() {
        temp_env::with_vars_unset(
            ["SVAULT__SERVER__PORT", "SVAULT__STORAGE__BUCKET"],
            || {
                let config = AppConfig::load().expect("config should load");
                assert_eq!(config.database.max_connections, 10);
                assert_eq!(config.database.min_connections, 1);
            },
        );
    }

    #[test]
    fn test_load_from_environment() {
        temp_env::with_vars(
            [
                ("SVAULT__SERVER__PORT", Some("9090")),
                ("SVAULT__STORAGE__PROVIDER", Some("memory")),
                ("SVAULT__STORAGE__BUCKET", Some("media-test")),
                ("SVAULT__STAGING__DIR", Some("/tmp/svault-staging")),
                ("SVAULT__STORAGE__TIMEOUT_SECS", Some("30")),
            ],
            || {
                let config = AppConfig::load().expect("config should load");
                assert_eq!(config.server.port, 9090);
                assert_eq!(config.storage.provider, "memory");
                assert_eq!(config.storage.bucket, "media-test");
                assert_eq!(config.staging.dir, PathBuf::from("/tmp/svault-staging"));
                assert_eq!(config.storage.timeout_secs, 30);
                assert_eq!(config.storage.io_timeout_secs, 10);
            },
        );
    }
}
