//! Stage status and stage result types.

use super::{ArtifactRef, RunDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The outcome classification of one stage execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    /// Stage ran and produced genuine output.
    Ok,
    /// Stage ran but an upstream input was missing or an external capability
    /// failed recoverably, so it emitted a placeholder artifact.
    Degraded,
    /// Stage hit an unrecoverable error; the scheduler aborts the run.
    Failed,
}

impl StageStatus {
    /// Returns true if the status lets the pipeline progress.
    #[must_use]
    pub fn is_non_fatal(&self) -> bool {
        matches!(self, Self::Ok | Self::Degraded)
    }
}

impl fmt::Display for StageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => write!(f, "ok"),
            Self::Degraded => write!(f, "degraded"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// The recorded outcome of one stage execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageResult {
    /// The stage name.
    pub stage: String,

    /// The run date the stage executed under.
    pub run_date: RunDate,

    /// The outcome classification.
    pub status: StageStatus,

    /// The artifact produced, if any. `Failed` stages write nothing;
    /// `Degraded` stages write a placeholder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact: Option<ArtifactRef>,

    /// Free-text notes: missing inputs, fallback hits, failure reasons.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,

    /// Wall-clock execution time in milliseconds.
    pub duration_ms: f64,

    /// When the result was recorded (ISO 8601).
    pub created_at: String,
}

impl StageResult {
    /// Creates a successful result carrying its artifact.
    #[must_use]
    pub fn ok(stage: impl Into<String>, run_date: RunDate, artifact: ArtifactRef) -> Self {
        Self {
            stage: stage.into(),
            run_date,
            status: StageStatus::Ok,
            artifact: Some(artifact),
            notes: Vec::new(),
            duration_ms: 0.0,
            created_at: crate::utils::iso_timestamp(),
        }
    }

    /// Creates a degraded result carrying its placeholder artifact.
    #[must_use]
    pub fn degraded(stage: impl Into<String>, run_date: RunDate, artifact: ArtifactRef) -> Self {
        Self {
            status: StageStatus::Degraded,
            ..Self::ok(stage, run_date, artifact)
        }
    }

    /// Creates a failed result with the error recorded as a note.
    #[must_use]
    pub fn failed(stage: impl Into<String>, run_date: RunDate, error: impl Into<String>) -> Self {
        Self {
            stage: stage.into(),
            run_date,
            status: StageStatus::Failed,
            artifact: None,
            notes: vec![error.into()],
            duration_ms: 0.0,
            created_at: crate::utils::iso_timestamp(),
        }
    }

    /// Appends notes to the result.
    #[must_use]
    pub fn with_notes(mut self, notes: impl IntoIterator<Item = String>) -> Self {
        self.notes.extend(notes);
        self
    }

    /// Sets the execution duration.
    #[must_use]
    pub fn with_duration_ms(mut self, duration_ms: f64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    /// Returns true if the result lets the pipeline progress.
    #[must_use]
    pub fn is_non_fatal(&self) -> bool {
        self.status.is_non_fatal()
    }
}
