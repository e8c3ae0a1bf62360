//! A reference to an artifact written to the store.

use super::{ArtifactKind, RunDate};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Describes an artifact after a successful write.
///
/// Artifacts are never mutated after creation; a rerun for the same date
/// overwrites them in place under the same name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactRef {
    /// The run date partitioning this artifact.
    pub run_date: RunDate,

    /// The kind of document.
    pub kind: ArtifactKind,

    /// The absolute path the artifact was written to.
    pub path: PathBuf,

    /// Whether the content is a placeholder emitted by a degraded stage
    /// rather than genuine output.
    pub placeholder: bool,

    /// When the artifact was written (ISO 8601).
    pub created_at: String,
}

impl ArtifactRef {
    /// Creates a new artifact reference stamped with the current time.
    #[must_use]
    pub fn new(run_date: RunDate, kind: ArtifactKind, path: PathBuf, placeholder: bool) -> Self {
        Self {
            run_date,
            kind,
            path,
            placeholder,
            created_at: crate::utils::iso_timestamp(),
        }
    }
}
