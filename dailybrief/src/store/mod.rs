//! Filesystem-backed, date-partitioned artifact storage.
//!
//! The store owns the layout under one root directory:
//!
//! ```text
//! research/hn_reddit_{date}.md
//! research/arxiv_{date}.md
//! reports/daily_report_{date}.md
//! trends/trends_{date}.md
//! podcasts/{date}/script.md
//! podcasts/{date}/audio.wav
//! ```
//!
//! Writes are atomic (temp file + rename) so concurrent writers to the same
//! `(RunDate, kind)` key can never leave a partially-written artifact behind;
//! last writer wins. Reads signal `NotFound` distinctly from `Io` so callers
//! can degrade gracefully instead of aborting.

use crate::core::{ArtifactKind, ArtifactRef, RunDate};
use crate::errors::StoreError;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Date-partitioned artifact storage rooted at a single directory.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    /// Creates a store rooted at `root`. Directories are created lazily on
    /// first write.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the store root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the absolute path an artifact lives at.
    #[must_use]
    pub fn path_for(&self, run_date: RunDate, kind: ArtifactKind) -> PathBuf {
        self.root.join(kind.relative_path(run_date))
    }

    /// Writes an artifact, overwriting any existing content for the same
    /// `(RunDate, kind)` key.
    ///
    /// The content goes to a temp file in the final directory first and is
    /// renamed into place, so readers never observe a partial write.
    pub async fn write(
        &self,
        run_date: RunDate,
        kind: ArtifactKind,
        content: &[u8],
        placeholder: bool,
    ) -> Result<ArtifactRef, StoreError> {
        let path = self.path_for(run_date, kind);
        let dir = path
            .parent()
            .map_or_else(|| self.root.clone(), Path::to_path_buf);
        tokio::fs::create_dir_all(&dir).await?;

        let tmp = dir.join(format!(".tmp-{}", Uuid::new_v4()));
        let staged = async {
            tokio::fs::write(&tmp, content).await?;
            tokio::fs::rename(&tmp, &path).await
        }
        .await;
        if let Err(e) = staged {
            // Best effort; an orphaned temp file is skipped by readers anyway.
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(StoreError::Io(e));
        }

        tracing::debug!(
            kind = %kind,
            run_date = %run_date,
            path = %path.display(),
            placeholder,
            "artifact written"
        );
        Ok(ArtifactRef::new(run_date, kind, path, placeholder))
    }

    /// Reads an artifact's raw bytes.
    pub async fn read(&self, run_date: RunDate, kind: ArtifactKind) -> Result<Vec<u8>, StoreError> {
        let path = self.path_for(run_date, kind);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StoreError::NotFound { run_date, kind })
            }
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    /// Reads an artifact as UTF-8 text.
    pub async fn read_text(
        &self,
        run_date: RunDate,
        kind: ArtifactKind,
    ) -> Result<String, StoreError> {
        let bytes = self.read(run_date, kind).await?;
        String::from_utf8(bytes).map_err(|e| {
            StoreError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        })
    }

    /// Reads a file previously located by [`find_by_pattern`](Self::find_by_pattern).
    pub async fn read_text_at(&self, path: &Path) -> Result<String, StoreError> {
        Ok(tokio::fs::read_to_string(path).await?)
    }

    /// Returns true if the artifact exists.
    pub async fn exists(&self, run_date: RunDate, kind: ArtifactKind) -> bool {
        tokio::fs::try_exists(self.path_for(run_date, kind))
            .await
            .unwrap_or(false)
    }

    /// Scans a partition directory for files whose name contains every given
    /// substring, sorted by name for determinism.
    ///
    /// This is the fallback lookup for upstream artifacts that did not honor
    /// the exact naming convention. A missing directory yields an empty list,
    /// not an error.
    pub async fn find_by_pattern(
        &self,
        dir: &Path,
        substrings: &[String],
    ) -> Result<Vec<PathBuf>, StoreError> {
        let dir = self.root.join(dir);
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::Io(e)),
        };

        let mut matches = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name().to_string_lossy().to_string();
            if name.starts_with(".tmp-") {
                continue;
            }
            if substrings.iter().all(|s| name.contains(s.as_str())) {
                matches.push(entry.path());
            }
        }
        matches.sort();
        Ok(matches)
    }
}
