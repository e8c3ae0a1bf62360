//! Core domain model types for dailybrief.
//!
//! This module contains the fundamental types used throughout the pipeline:
//! - The run-date partition key
//! - Artifact kinds and their file-naming contract
//! - Stage status, stage results, and the pipeline run record

mod artifact;
mod kind;
mod result;
mod run;
mod run_date;

pub use artifact::ArtifactRef;
pub use kind::ArtifactKind;
pub use result::{StageResult, StageStatus};
pub use run::{PipelineRun, RunState};
pub use run_date::RunDate;
