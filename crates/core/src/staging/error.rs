//! Staging error types.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Local staging I/O errors.
#[derive(Debug, Error)]
pub enum StagingError {
    /// Staging directory could not be created.
    #[error("cannot prepare staging directory {}: {source}", .path.display())]
    Directory {
        /// Directory path.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Writing the staged file failed (unwritable directory, disk full).
    #[error("cannot write staged file {}: {source}", .path.display())]
    Write {
        /// Staged file path.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Reading the staged file back failed.
    #[error("cannot read staged file {}: {source}", .path.display())]
    Read {
        /// Staged file path.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Removing the staged file failed, typically because it no longer exists.
    #[error("cannot remove staged file {}: {source}", .path.display())]
    Remove {
        /// Staged file path.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
}

impl StagingError {
    /// Path the failing operation touched.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Directory { path, .. }
            | Self::Write { path, .. }
            | Self::Read { path, .. }
            | Self::Remove { path, .. } => path,
        }
    }
}
