//! Staging area implementation.

use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use super::error::StagingError;

/// Scratch directory holding uploads between receipt and transfer to the store.
#[derive(Debug, Clone)]
pub struct StagingArea {
    dir: PathBuf,
}

impl StagingArea {
    /// Create a staging area rooted at `dir`. The directory is not touched
    /// until [`StagingArea::prepare`] or the first [`StagingArea::stage`].
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Root directory of the staging area.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the staging directory if missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub async fn prepare(&self) -> Result<(), StagingError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| StagingError::Directory {
                path: self.dir.clone(),
                source,
            })
    }

    /// Location a file named `filename` is staged at.
    ///
    /// Deterministic in `filename`: two concurrent uploads of the same name
    /// share a path.
    #[must_use]
    pub fn path_for(&self, filename: &str) -> PathBuf {
        self.dir.join(staged_file_name(filename))
    }

    /// Write `content` to a fresh file derived from `filename`.
    ///
    /// The returned artifact removes the file when dropped, so a failed or
    /// cancelled write never leaves a partial file behind.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory is not writable or the disk is full.
    pub async fn stage(&self, filename: &str, content: &[u8]) -> Result<StagedArtifact, StagingError> {
        self.prepare().await?;

        let path = self.path_for(filename);
        debug!(path = %path.display(), size = content.len(), "Writing staged file");

        let mut file = tokio::fs::File::create(&path)
            .await
            .map_err(|source| StagingError::Write {
                path: path.clone(),
                source,
            })?;
        let mut artifact = StagedArtifact::new(path);

        file.write_all(content)
            .await
            .map_err(|source| artifact.write_error(source))?;
        file.flush()
            .await
            .map_err(|source| artifact.write_error(source))?;

        artifact.size = content.len() as u64;
        Ok(artifact)
    }
}

/// A staged file owned by one upload attempt.
///
/// Released exactly once: explicitly through [`StagedArtifact::unstage`], or
/// on drop for every other exit path (errors, early returns, cancellation).
#[derive(Debug)]
pub struct StagedArtifact {
    path: PathBuf,
    size: u64,
    released: bool,
}

impl StagedArtifact {
    fn new(path: PathBuf) -> Self {
        Self {
            path,
            size: 0,
            released: false,
        }
    }

    /// Path of the staged file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of bytes staged.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Delete the staged file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file could not be removed, e.g. it no longer
    /// exists. The artifact counts as released either way.
    pub async fn unstage(mut self) -> Result<(), StagingError> {
        let result = tokio::fs::remove_file(&self.path).await;
        self.released = true;
        result.map_err(|source| StagingError::Remove {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), "Deleted staged file");
        Ok(())
    }

    fn write_error(&self, source: std::io::Error) -> StagingError {
        StagingError::Write {
            path: self.path.clone(),
            source,
        }
    }
}

impl Drop for StagedArtifact {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        // Cleanup must not depend on the runtime still polling us.
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "Deleted staged file on drop"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %self.path.display(), error = %e, "Failed to delete staged file"),
        }
    }
}

/// Map a caller-supplied filename onto a single safe path component.
///
/// Only ASCII alphanumerics, dots, hyphens and underscores survive; names made
/// only of dots are neutralised so they cannot address a parent directory.
fn staged_file_name(filename: &str) -> String {
    let sanitized: String = filename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if sanitized.is_empty() || sanitized.chars().all(|c| c == '.') {
        format!("_{sanitized}")
    } else {
        sanitized
    }
}
