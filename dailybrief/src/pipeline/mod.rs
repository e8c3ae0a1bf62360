//! Pipeline building and sequential scheduling.
//!
//! This module provides:
//! - The pipeline builder with startup-time validation
//! - The strictly sequential scheduler with its failure policy
//! - Cooperative between-stage cancellation

mod builder;
mod cancellation;
#[cfg(test)]
mod integration_tests;
mod scheduler;

pub use builder::{Pipeline, PipelineBuilder};
pub use cancellation::CancellationToken;
pub use scheduler::Scheduler;
