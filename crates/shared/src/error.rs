//! Application-wide error types.
//!
//! Every failure the ingestion service can surface over HTTP maps onto one of
//! these variants. Store and catalog failures stay distinct so an operator can
//! tell a retryable outage from a rejected request from an orphaned object.

use thiserror::Error;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation error.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Local staging I/O failed.
    #[error("Staging I/O failure: {0}")]
    StagingIo(String),

    /// Object store is temporarily unavailable; the caller may retry.
    #[error("Object store unavailable: {0}")]
    StoreUnavailable(String),

    /// Object store permanently rejected the request.
    #[error("Object store rejected request: {0}")]
    StoreRejected(String),

    /// Catalog persistence failed.
    #[error("Catalog unavailable: {0}")]
    CatalogUnavailable(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::Validation(_) => 400,
            Self::StoreRejected(_) => 502,
            Self::StoreUnavailable(_) => 503,
            Self::StagingIo(_) | Self::CatalogUnavailable(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::StagingIo(_) => "STAGING_IO_FAILURE",
            Self::StoreUnavailable(_) => "STORE_UNAVAILABLE",
            Self::StoreRejected(_) => "STORE_REJECTED",
            Self::CatalogUnavailable(_) => "CATALOG_UNAVAILABLE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(AppError::NotFound(String::new()), 404, "NOT_FOUND")]
    #[case(AppError::Validation(String::new()), 400, "VALIDATION_ERROR")]
    #[case(AppError::StagingIo(String::new()), 500, "STAGING_IO_FAILURE")]
    #[case(AppError::StoreUnavailable(String::new()), 503, "STORE_UNAVAILABLE")]
    #[case(AppError::StoreRejected(String::new()), 502, "STORE_REJECTED")]
    #[case(AppError::CatalogUnavailable(String::new()), 500, "CATALOG_UNAVAILABLE")]
    fn test_status_and_error_code(
        #[case] err: AppError,
        #[case] status: u16,
        #[case] code: &str,
    ) {
        assert_eq!(err.status_code(), status);
        assert_eq!(err.error_code(), code);
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            AppError::NotFound("msg".into()).to_string(),
            "Not found: msg"
        );
        assert_eq!(
            AppError::StagingIo("msg".into()).to_string(),
            "Staging I/O failure: msg"
        );
        assert_eq!(
            AppError::CatalogUnavailable("msg".into()).to_string(),
            "Catalog unavailable: msg"
        );
    }
}
