//! Ingestion request and state types.

use std::fmt;

use bytes::Bytes;

use super::error::IngestError;
use crate::storage::object_key;

/// One inbound upload.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// Caller-supplied filename; also the object key.
    pub filename: String,
    /// File content.
    pub content: Bytes,
}

impl UploadRequest {
    /// Create an upload request.
    #[must_use]
    pub fn new(filename: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
        }
    }

    /// Reject empty filenames, names that address no file in the store, and
    /// content above `max_size` bytes.
    ///
    /// # Errors
    ///
    /// Returns a validation error describing the violated limit.
    pub fn validate(&self, max_size: u64) -> Result<(), IngestError> {
        if self.filename.trim().is_empty() {
            return Err(IngestError::validation("filename must not be empty"));
        }
        if object_key(&self.filename).is_none() {
            return Err(IngestError::validation(format!(
                "filename '{}' does not name a file",
                self.filename
            )));
        }

        let size = self.content.len() as u64;
        if size > max_size {
            return Err(IngestError::validation(format!(
                "file size {size} bytes exceeds maximum allowed {max_size} bytes"
            )));
        }
        Ok(())
    }
}

/// Progress of a single ingestion call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestState {
    /// Request accepted.
    Received,
    /// Content written to the staging area.
    Staged,
    /// Object written to the store.
    Uploaded,
    /// Record inserted into the catalog.
    Cataloged,
    /// Staging failed; nothing persisted.
    StagingFailed,
    /// Upload failed; staged artifact released.
    UploadFailed,
    /// Catalog insert failed; object orphaned in the store.
    CatalogFailed,
}

impl IngestState {
    /// Stable lowercase name used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::Staged => "staged",
            Self::Uploaded => "uploaded",
            Self::Cataloged => "cataloged",
            Self::StagingFailed => "staging_failed",
            Self::UploadFailed => "upload_failed",
            Self::CatalogFailed => "catalog_failed",
        }
    }
}

impl fmt::Display for IngestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_limit() {
        let request = UploadRequest::new("a.txt", vec![0u8; 10]);
        assert!(request.validate(10).is_ok());
    }

    #[test]
    fn test_validate_rejects_oversize() {
        let request = UploadRequest::new("a.txt", vec![0u8; 11]);
        let err = request.validate(10).unwrap_err();
        assert!(matches!(err, IngestError::Validation(ref msg) if msg.contains("11 bytes")));
    }

    #[test]
    fn test_validate_rejects_blank_filename() {
        for name in ["", "   "] {
            let err = UploadRequest::new(name, "x").validate(10).unwrap_err();
            assert!(matches!(err, IngestError::Validation(_)));
        }
    }

    #[test]
    fn test_empty_content_is_valid() {
        assert!(UploadRequest::new("empty.txt", Bytes::new()).validate(10).is_ok());
    }

    #[test]
    fn test_validate_rejects_directory_names() {
        for name in ["/", "//", "reports/"] {
            let err = UploadRequest::new(name, "x").validate(10).unwrap_err();
            assert!(matches!(err, IngestError::Validation(_)), "accepted {name:?}");
        }
    }

    #[test]
    fn test_state_display() {
        assert_eq!(IngestState::UploadFailed.to_string(), "upload_failed");
        assert_eq!(IngestState::Cataloged.to_string(), "cataloged");
    }
}
