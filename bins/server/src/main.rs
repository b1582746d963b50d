//! Svault API Server
//!
//! Main entry point for the Svault ingestion service.

use std::sync::Arc;

use anyhow::Context;
use sea_orm_migration::MigratorTrait;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use svault_api::{AppState, create_router};
use svault_core::ingest::IngestionPipeline;
use svault_core::staging::StagingArea;
use svault_core::storage::{StorageConfig, StorageService};
use svault_db::{FileRepository, connect, migration::Migrator};
use svault_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    "svault=debug,svault_api=debug,svault_core=debug,svault_db=debug,tower_http=debug"
                        .into()
                }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Connect to catalog database and bring the schema up to date
    let db = connect(&config.database).await?;
    Migrator::up(&db, None).await?;
    info!("Connected to catalog database");

    // Prepare staging directory
    let staging = StagingArea::new(&config.staging.dir);
    staging.prepare().await?;
    info!(dir = %staging.dir().display(), "Staging area ready");

    // Create storage service
    let storage_config = StorageConfig::from_settings(&config.storage)?;
    let storage = StorageService::from_config(storage_config)?;
    info!(
        provider = storage.provider_name(),
        bucket = %config.storage.bucket,
        "Object store configured"
    );
    let max_file_size = storage.config().max_file_size;

    // Create application state
    let repository = FileRepository::new(db.clone());
    let pipeline = IngestionPipeline::new(staging, Arc::new(storage), Arc::new(repository))
        .with_max_file_size(max_file_size);
    let state = AppState {
        pipeline: Arc::new(pipeline),
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await?;
    info!("Catalog connection closed");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
