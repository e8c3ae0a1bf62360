//! # Dailybrief
//!
//! A deterministic daily AI-report pipeline.
//!
//! Dailybrief turns a morning news-gathering routine into an explicit staged
//! pipeline with file-based hand-off between stages:
//!
//! - **Artifact store**: date-partitioned, atomically written documents with a
//!   stable naming contract keyed by `(RunDate, kind)`
//! - **Knowledge index**: idempotent embedding-based ingestion of artifacts,
//!   searchable across runs
//! - **Stage executor**: reads declared upstream artifacts (with substring
//!   fallback), invokes an external capability under a timeout, and always
//!   writes its declared output, degrading to a placeholder on failure
//! - **Scheduler**: strictly sequential execution where degraded stages keep
//!   the run alive and storage faults abort it
//! - **Ledger**: append-only audit record of every stage result
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use dailybrief::prelude::*;
//!
//! let pipeline = PipelineBuilder::new("daily-ai-brief")
//!     .stage(Arc::new(ResearchStage::news(topic, fetchers)))
//!     .stage(Arc::new(ReportStage::new(generator)))
//!     .build()?;
//!
//! let run = Scheduler::new(pipeline, executor, ledger)
//!     .run(RunDate::today())
//!     .await;
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod capability;
pub mod config;
pub mod core;
pub mod errors;
pub mod knowledge;
pub mod ledger;
pub mod observability;
pub mod pipeline;
pub mod stages;
pub mod store;
pub mod testing;
pub mod utils;

#[cfg(feature = "fetchers")]
pub mod fetch;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::capability::{
        ContentFetcher, FetchedItem, SpeechSynthesizer, TextGenerator, VoiceParameters,
    };
    pub use crate::config::BriefConfig;
    pub use crate::core::{
        ArtifactKind, ArtifactRef, PipelineRun, RunDate, RunState, StageResult, StageStatus,
    };
    pub use crate::errors::{
        BriefError, CapabilityError, ConfigurationError, KnowledgeError, LedgerError, StoreError,
    };
    pub use crate::knowledge::{Embedder, HashEmbedder, KnowledgeEntry, KnowledgeIndex};
    pub use crate::ledger::{InMemoryLedger, JsonlLedger, Ledger, LedgerRow};
    pub use crate::pipeline::{CancellationToken, Pipeline, PipelineBuilder, Scheduler};
    pub use crate::stages::{
        AudioStage, Produced, ReportStage, ResearchStage, ScriptStage, Stage, StageContent,
        StageExecutor, StageInputs, TrendStage,
    };
    pub use crate::store::ArtifactStore;
    pub use crate::utils::iso_timestamp;
}
