//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST API routes for upload, listing and download
//! - Error rendering for the ingestion error taxonomy

pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use svault_core::ingest::IngestionPipeline;
use svault_core::storage::StorageService;
use svault_db::FileRepository;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Multipart framing allowance on top of the file size limit.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Ingestion pipeline over the production store and catalog.
pub type Pipeline = IngestionPipeline<StorageService, FileRepository>;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Ingestion pipeline.
    pub pipeline: Arc<Pipeline>,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    let body_limit = usize::try_from(state.pipeline.max_file_size())
        .unwrap_or(usize::MAX)
        .saturating_add(MULTIPART_OVERHEAD);

    Router::new()
        .merge(routes::api_routes())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
