//! The pipeline run record and its state machine.

use super::{RunDate, StageResult, StageStatus};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The lifecycle of one pipeline run.
///
/// `Pending -> Running(stage) -> ... -> Completed | Aborted`. A run is
/// terminal once the last configured stage produced a result or a stage
/// halted it fatally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RunState {
    /// The run has not started yet.
    Pending,
    /// A stage is currently executing.
    Running {
        /// The executing stage name.
        stage: String,
    },
    /// Every configured stage produced a non-fatal result.
    Completed,
    /// A stage halted the run.
    Aborted {
        /// The stage that halted the run.
        stage: String,
        /// Why the run was halted.
        reason: String,
    },
}

impl RunState {
    /// Returns true if the run reached a terminal state.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Aborted { .. })
    }
}

/// The ordered record of one pipeline execution for a run date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineRun {
    /// Unique identifier for this execution.
    pub run_id: Uuid,

    /// The pipeline name.
    pub pipeline: String,

    /// The partition key for all artifacts of this run.
    pub run_date: RunDate,

    /// Current lifecycle state.
    pub state: RunState,

    /// Stage results in execution order.
    pub results: Vec<StageResult>,

    /// When the run started (ISO 8601).
    pub started_at: String,

    /// When the run reached a terminal state (ISO 8601).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<String>,
}

impl PipelineRun {
    /// Creates a pending run record.
    #[must_use]
    pub fn new(pipeline: impl Into<String>, run_date: RunDate) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            pipeline: pipeline.into(),
            run_date,
            state: RunState::Pending,
            results: Vec::new(),
            started_at: crate::utils::iso_timestamp(),
            finished_at: None,
        }
    }

    /// Marks a stage as running.
    pub fn start_stage(&mut self, stage: impl Into<String>) {
        self.state = RunState::Running {
            stage: stage.into(),
        };
    }

    /// Records a stage result.
    pub fn push_result(&mut self, result: StageResult) {
        self.results.push(result);
    }

    /// Transitions to `Completed`.
    pub fn complete(&mut self) {
        self.state = RunState::Completed;
        self.finished_at = Some(crate::utils::iso_timestamp());
    }

    /// Transitions to `Aborted`, recording which stage halted the run.
    pub fn abort(&mut self, stage: impl Into<String>, reason: impl Into<String>) {
        self.state = RunState::Aborted {
            stage: stage.into(),
            reason: reason.into(),
        };
        self.finished_at = Some(crate::utils::iso_timestamp());
    }

    /// Returns the stages that completed degraded, for the completion report.
    #[must_use]
    pub fn degraded_stages(&self) -> Vec<&StageResult> {
        self.results
            .iter()
            .filter(|r| r.status == StageStatus::Degraded)
            .collect()
    }

    /// Returns the result for a stage, if it executed.
    #[must_use]
    pub fn result_for(&self, stage: &str) -> Option<&StageResult> {
        self.results.iter().find(|r| r.stage == stage)
    }

    /// Returns true if the run reached a terminal state.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }
}
