//! Media upload, listing and download routes.

use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State},
    http::{HeaderValue, StatusCode, Uri, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use svault_core::catalog::FileRecord;
use svault_core::ingest::{IngestError, UploadRequest};
use svault_core::storage::StoredObject;
use svault_shared::{AppError, FileId};
use tracing::info;

use crate::AppState;
use crate::error::ApiError;

/// Creates the media routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/media", get(list_media))
        .route("/media/upload", post(upload_media))
        .route("/media/orphans", get(list_orphans))
        .route("/media/{id}", get(get_media))
        .route("/media/{id}/content", get(download_media))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Which side of the system a listing reads from.
#[derive(Debug, Default, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ListSource {
    /// Objects present in the bucket.
    #[default]
    Store,
    /// Records in the metadata catalog.
    Catalog,
}

/// Query parameters for `GET /media`.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Listing source; the store when omitted.
    #[serde(default)]
    pub source: ListSource,
}

/// Response for a successful upload.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    /// Human-readable outcome.
    pub result: &'static str,
    /// The catalog record created for the upload.
    pub file: FileRecord,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST `/media/upload`
/// Ingest the first file part of a multipart form.
async fn upload_media(
    State(state): State<AppState>,
    uri: Uri,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), ApiError> {
    let request = read_file_part(&mut multipart)
        .await
        .map_err(|e| ApiError::new(e, &uri))?;

    let record = state
        .pipeline
        .ingest(request)
        .await
        .map_err(|e| ApiError::new(e, &uri))?;

    info!(id = %record.id, filename = %record.filename, "Upload accepted");
    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            result: "File uploaded successfully",
            file: record,
        }),
    ))
}

/// GET `/media`
/// List stored objects, or catalog records with `?source=catalog`.
async fn list_media(
    State(state): State<AppState>,
    uri: Uri,
    Query(query): Query<ListQuery>,
) -> Result<Response, ApiError> {
    let response = match query.source {
        ListSource::Store => Json(
            state
                .pipeline
                .list_objects()
                .await
                .map_err(|e| ApiError::new(e, &uri))?,
        )
        .into_response(),
        ListSource::Catalog => Json(
            state
                .pipeline
                .list_records()
                .await
                .map_err(|e| ApiError::new(e, &uri))?,
        )
        .into_response(),
    };
    Ok(response)
}

/// GET `/media/{id}`
async fn get_media(
    State(state): State<AppState>,
    uri: Uri,
    Path(id): Path<String>,
) -> Result<Json<FileRecord>, ApiError> {
    let id = parse_id(&id).map_err(|e| ApiError::new(e, &uri))?;
    let record = state
        .pipeline
        .get_by_id(id)
        .await
        .map_err(|e| ApiError::new(e, &uri))?;
    Ok(Json(record))
}

/// GET `/media/{id}/content`
/// Stream the stored bytes of a catalogued file.
async fn download_media(
    State(state): State<AppState>,
    uri: Uri,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id = parse_id(&id).map_err(|e| ApiError::new(e, &uri))?;
    let (record, content) = state
        .pipeline
        .download(id)
        .await
        .map_err(|e| ApiError::new(e, &uri))?;

    let mut response = content.into_response();
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/octet-stream"),
    );
    if let Some(disposition) = content_disposition(&record.filename) {
        headers.insert(header::CONTENT_DISPOSITION, disposition);
    }
    Ok(response)
}

/// GET `/media/orphans`
/// Objects in the bucket with no catalog record.
async fn list_orphans(
    State(state): State<AppState>,
    uri: Uri,
) -> Result<Json<Vec<StoredObject>>, ApiError> {
    let orphans = state
        .pipeline
        .orphans()
        .await
        .map_err(|e| ApiError::new(e, &uri))?;
    Ok(Json(orphans))
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Pull the first part carrying a filename out of the form.
async fn read_file_part(multipart: &mut Multipart) -> Result<UploadRequest, IngestError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| IngestError::validation(e.body_text()))?
    {
        let Some(filename) = field.file_name().map(ToString::to_string) else {
            continue;
        };
        let content = field
            .bytes()
            .await
            .map_err(|e| IngestError::validation(e.body_text()))?;
        return Ok(UploadRequest::new(filename, content));
    }

    Err(IngestError::validation("multipart form has no file part"))
}

fn parse_id(raw: &str) -> Result<FileId, AppError> {
    raw.parse()
        .map_err(|_| AppError::Validation(format!("invalid file id '{raw}'")))
}

fn content_disposition(filename: &str) -> Option<HeaderValue> {
    let escaped: String = filename
        .chars()
        .filter(|c| !c.is_control())
        .map(|c| if c == '"' { '\'' } else { c })
        .collect();
    HeaderValue::from_str(&format!("attachment; filename=\"{escaped}\"")).ok()
}


/// Router-level tests over the in-memory store and an in-memory SQLite catalog.
#[cfg(test)]
mod integration_tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use sea_orm::Database;
    use sea_orm_migration::MigratorTrait;
    use std::sync::Arc;
    use svault_core::ingest::IngestionPipeline;
    use svault_core::staging::StagingArea;
    use svault_core::storage::{StorageConfig, StorageProvider, StorageService};
    use svault_db::{FileRepository, migration::Migrator};
    use tower::ServiceExt;

    const BOUNDARY: &str = "svault-test-boundary";

    async fn create_test_app(max_file_size: u64) -> (Router, tempfile::TempDir) {
        let staging_dir = tempfile::tempdir().expect("tempdir");

        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to open database");
        Migrator::up(&db, None).await.expect("Failed to migrate");

        let store = StorageService::from_config(StorageConfig::new(StorageProvider::memory(
            "fullerzz-media",
        )))
        .expect("should create service");

        let pipeline = IngestionPipeline::new(
            StagingArea::new(staging_dir.path()),
            Arc::new(store),
            Arc::new(FileRepository::new(db)),
        )
        .with_max_file_size(max_file_size);

        let state = AppState {
            pipeline: Arc::new(pipeline),
        };
        (crate::create_router(state), staging_dir)
    }

    fn multipart_request(filename: &str, content: &str) -> Request<Body> {
        let body = format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n\
             {content}\r\n\
             --{BOUNDARY}--\r\n"
        );
        Request::builder()
            .method("POST")
            .uri("/media/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .expect("request")
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .expect("request")
    }

    async fn json_body(response: Response) -> serde_json::Value {
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body")
            .to_bytes();
        serde_json::from_slice(&bytes).expect("json")
    }

    #[tokio::test]
    async fn test_index_and_health() {
        let (app, _dir) = create_test_app(1024).await;

        let response = app.clone().oneshot(get("/")).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.expect("body").to_bytes();
        assert_eq!(body.as_ref(), b"Hello, world!");

        let response = app.oneshot(get("/health")).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "healthy");
    }

    #[tokio::test]
    async fn test_upload_then_fetch_and_download() {
        let (app, dir) = create_test_app(1024).await;

        let response = app
            .clone()
            .oneshot(multipart_request("report.txt", "hello"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = json_body(response).await;
        assert_eq!(body["result"], "File uploaded successfully");
        assert_eq!(body["file"]["filename"], "report.txt");
        assert_eq!(body["file"]["key"], "report.txt");
        assert_eq!(body["file"]["bucket"], "fullerzz-media");
        let id = body["file"]["id"].as_str().expect("id").to_string();

        let response = app
            .clone()
            .oneshot(get(&format!("/media/{id}")))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["id"], id.as_str());

        let response = app
            .oneshot(get(&format!("/media/{id}/content")))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/octet-stream"
        );
        let bytes = response.into_body().collect().await.expect("body").to_bytes();
        assert_eq!(bytes.as_ref(), b"hello");

        assert_eq!(std::fs::read_dir(dir.path()).expect("dir").count(), 0);
    }

    #[tokio::test]
    async fn test_listing_sources() {
        let (app, _dir) = create_test_app(1024).await;

        for _ in 0..2 {
            let response = app
                .clone()
                .oneshot(multipart_request("same.txt", "data"))
                .await
                .expect("response");
            assert_eq!(response.status(), StatusCode::CREATED);
        }

        let response = app.clone().oneshot(get("/media")).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let objects = json_body(response).await;
        assert_eq!(objects.as_array().map(Vec::len), Some(1));
        assert_eq!(objects[0]["key"], "same.txt");

        let response = app
            .clone()
            .oneshot(get("/media?source=catalog"))
            .await
            .expect("response");
        let records = json_body(response).await;
        assert_eq!(records.as_array().map(Vec::len), Some(2));

        let response = app.oneshot(get("/media/orphans")).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_unknown_id_is_404_with_path() {
        let (app, _dir) = create_test_app(1024).await;
        let uri = format!("/media/{}", FileId::new());

        let response = app.oneshot(get(&uri)).await.expect("response");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = json_body(response).await;
        assert_eq!(body["error"], "NOT_FOUND");
        assert_eq!(body["path"], uri.as_str());
    }

    #[tokio::test]
    async fn test_malformed_id_is_400() {
        let (app, _dir) = create_test_app(1024).await;

        let response = app.oneshot(get("/media/not-a-uuid")).await.expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_oversize_upload_is_rejected() {
        let (app, _dir) = create_test_app(4).await;

        let response = app
            .clone()
            .oneshot(multipart_request("big.txt", "12345"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"], "VALIDATION_ERROR");

        let response = app
            .oneshot(get("/media?source=catalog"))
            .await
            .expect("response");
        assert_eq!(json_body(response).await, serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_form_without_file_part_is_400() {
        let (app, _dir) = create_test_app(1024).await;
        let body = format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"note\"\r\n\r\n\
             just text\r\n\
             --{BOUNDARY}--\r\n"
        );
        let request = Request::builder()
            .method("POST")
            .uri("/media/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .expect("request");

        let response = app.oneshot(request).await.expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
