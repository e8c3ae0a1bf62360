//! Error types for the dailybrief pipeline.
//!
//! The taxonomy separates recoverable conditions (a missing artifact, a
//! capability that timed out) from fatal ones (storage faults, authentication
//! failures, malformed pipeline configuration) so callers can degrade a stage
//! instead of aborting a run, and abort a run instead of corrupting it.

use crate::core::{ArtifactKind, RunDate};
use thiserror::Error;

/// The main error type for dailybrief operations.
#[derive(Debug, Error)]
pub enum BriefError {
    /// Pipeline configuration was rejected at build time.
    #[error("{0}")]
    Configuration(#[from] ConfigurationError),

    /// An artifact store operation failed.
    #[error("{0}")]
    Store(#[from] StoreError),

    /// An external capability invocation failed.
    #[error("{0}")]
    Capability(#[from] CapabilityError),

    /// A ledger operation failed.
    #[error("{0}")]
    Ledger(#[from] LedgerError),

    /// A knowledge index operation failed.
    #[error("{0}")]
    Knowledge(#[from] KnowledgeError),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from the artifact store.
///
/// `NotFound` is recoverable: the stage executor falls back to a pattern scan
/// and then to an empty input. `Io` is not: every downstream stage depends on
/// storage integrity, so it escalates and aborts the run.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The expected artifact does not exist.
    #[error("artifact not found: {kind} for {run_date}")]
    NotFound {
        /// The run date of the missing artifact.
        run_date: RunDate,
        /// The kind of the missing artifact.
        kind: ArtifactKind,
    },

    /// A storage-layer fault (permissions, disk full, ...).
    #[error("storage error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Returns true if this is the recoverable missing-artifact case.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Errors from an external capability (fetch, generation, speech).
///
/// Only `Auth` is fatal to the run; timeouts and generic failures degrade the
/// owning stage to a placeholder artifact.
#[derive(Debug, Clone, Error)]
pub enum CapabilityError {
    /// The invocation exceeded its bounded timeout.
    #[error("capability timed out after {limit_secs}s")]
    Timeout {
        /// The timeout that was exceeded, in seconds.
        limit_secs: f64,
    },

    /// The capability errored or returned malformed output.
    #[error("capability failed: {reason}")]
    Failed {
        /// The reason for the failure.
        reason: String,
    },

    /// The capability rejected the caller's credentials.
    #[error("capability authentication failed: {reason}")]
    Auth {
        /// The reason for the rejection.
        reason: String,
    },
}

impl CapabilityError {
    /// Creates a generic failure.
    #[must_use]
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed {
            reason: reason.into(),
        }
    }

    /// Creates an authentication failure.
    #[must_use]
    pub fn auth(reason: impl Into<String>) -> Self {
        Self::Auth {
            reason: reason.into(),
        }
    }

    /// Returns true if the error is unrecoverable at stage level.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Auth { .. })
    }
}

impl From<anyhow::Error> for CapabilityError {
    fn from(err: anyhow::Error) -> Self {
        Self::Failed {
            reason: format!("{err:#}"),
        }
    }
}

/// Error raised when pipeline validation fails at build time.
///
/// Configuration errors are fatal at startup and never occur at runtime.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ConfigurationError {
    /// The error message.
    pub message: String,
    /// The stages involved in the error.
    pub stages: Vec<String>,
}

impl ConfigurationError {
    /// Creates a new configuration error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            stages: Vec::new(),
        }
    }

    /// Sets the stages involved.
    #[must_use]
    pub fn with_stages(mut self, stages: Vec<String>) -> Self {
        self.stages = stages;
        self
    }
}

/// Errors from the stage ledger.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// IO error while appending or reading rows.
    #[error("ledger IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A row could not be encoded or decoded.
    #[error("ledger serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors from the knowledge index.
///
/// Ingestion failures are non-fatal to the owning stage: the pipeline's value
/// is the artifact, not the index.
#[derive(Debug, Error)]
pub enum KnowledgeError {
    /// IO error while appending to the index log.
    #[error("knowledge IO error: {0}")]
    Io(#[from] std::io::Error),

    /// An entry could not be encoded or decoded.
    #[error("knowledge serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
