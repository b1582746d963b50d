//! HTTP rendering of application errors.

use axum::{
    Json,
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
};
use serde_json::json;
use svault_shared::AppError;
use tracing::error;

/// An [`AppError`] bound to the request path it occurred on.
#[derive(Debug)]
pub struct ApiError {
    error: AppError,
    path: String,
}

impl ApiError {
    /// Attach the request path to an error.
    pub fn new(error: impl Into<AppError>, uri: &Uri) -> Self {
        Self {
            error: error.into(),
            path: uri.path().to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.error.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            error!(path = %self.path, error = %self.error, "Request failed");
        }

        (
            status,
            Json(json!({
                "error": self.error.error_code(),
                "message": self.error.to_string(),
                "path": self.path,
            })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[tokio::test]
    async fn test_renders_code_message_and_path() {
        let uri: Uri = "/media/abc?x=1".parse().expect("uri");
        let response = ApiError::new(AppError::NotFound("file abc".to_string()), &uri).into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = response.into_body().collect().await.expect("body").to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(json["error"], "NOT_FOUND");
        assert_eq!(json["path"], "/media/abc");
        assert!(json["message"].as_str().unwrap_or_default().contains("file abc"));
    }

    #[tokio::test]
    async fn test_store_outage_is_503() {
        let uri: Uri = "/media/upload".parse().expect("uri");
        let response =
            ApiError::new(AppError::StoreUnavailable("throttled".to_string()), &uri).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
