//! Stage trait, stage inputs, and the execution contract.
//!
//! Stages are the units of pipeline work. Each declares the artifact kinds it
//! reads, the single kind it writes, and an async `produce` step that turns
//! gathered inputs into content. Everything around `produce` (input
//! gathering with fallback, timeouts, placeholder writing, knowledge
//! ingestion) is the executor's job, so stages stay pure with respect to the
//! side effects they declare.

mod executor;
mod podcast;
mod report;
mod research;
mod trends;

pub use executor::StageExecutor;
pub use podcast::{AudioStage, ScriptStage};
pub use report::ReportStage;
pub use research::ResearchStage;
pub use trends::TrendStage;

use crate::core::{ArtifactKind, RunDate};
use crate::errors::CapabilityError;
use crate::knowledge::KnowledgeIndex;
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt::Debug;

/// First line of every placeholder artifact, so downstream consumers never
/// have to infer emptiness from prose.
pub const PLACEHOLDER_MARKER: &str = "<!-- dailybrief:placeholder -->";

/// Returns true if artifact text is a placeholder emitted by a degraded stage.
#[must_use]
pub fn is_placeholder(text: &str) -> bool {
    text.starts_with(PLACEHOLDER_MARKER)
}

/// Builds the placeholder document written when a stage cannot produce
/// genuine output. Downstream stages depend on deterministic naming, so an
/// expected artifact is never silently skipped.
#[must_use]
pub fn placeholder_text(kind: ArtifactKind, run_date: RunDate, reason: &str) -> String {
    format!(
        "{PLACEHOLDER_MARKER}\n# {} - {run_date}\n\n_No content produced: {reason}_\n",
        kind.title()
    )
}

/// The upstream artifacts gathered for one stage execution.
#[derive(Debug, Clone)]
pub struct StageInputs {
    run_date: RunDate,
    texts: HashMap<ArtifactKind, String>,
    missing: Vec<ArtifactKind>,
}

impl StageInputs {
    /// Creates an empty input set for a run date.
    #[must_use]
    pub fn new(run_date: RunDate) -> Self {
        Self {
            run_date,
            texts: HashMap::new(),
            missing: Vec::new(),
        }
    }

    /// The run date the stage executes under.
    #[must_use]
    pub fn run_date(&self) -> RunDate {
        self.run_date
    }

    /// Records a gathered input.
    pub fn insert(&mut self, kind: ArtifactKind, text: String) {
        self.texts.insert(kind, text);
    }

    /// Records a declared input that could not be found anywhere.
    pub fn mark_missing(&mut self, kind: ArtifactKind) {
        self.missing.push(kind);
    }

    /// Returns a gathered input's text.
    #[must_use]
    pub fn text(&self, kind: ArtifactKind) -> Option<&str> {
        self.texts.get(&kind).map(String::as_str)
    }

    /// Returns a gathered input's text, or empty for a missing input.
    #[must_use]
    pub fn text_or_empty(&self, kind: ArtifactKind) -> &str {
        self.text(kind).unwrap_or("")
    }

    /// The declared inputs that were absent even after fallback lookup.
    #[must_use]
    pub fn missing(&self) -> &[ArtifactKind] {
        &self.missing
    }

    /// Returns true if every declared input was found.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// The body a stage produced for its output artifact.
#[derive(Debug, Clone)]
pub enum StageContent {
    /// Markdown/text content.
    Text(String),
    /// Raw bytes (audio).
    Binary(Vec<u8>),
}

impl StageContent {
    /// The bytes to write to the store.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Text(s) => s.as_bytes(),
            Self::Binary(b) => b,
        }
    }

    /// The content as text, if it is text.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Binary(_) => None,
        }
    }
}

/// What `produce` hands back: content plus an optional reason the stage
/// considers itself degraded (e.g. every source returned zero items).
#[derive(Debug, Clone)]
pub struct Produced {
    /// The output artifact body.
    pub content: StageContent,
    /// Set when the stage ran but could not produce genuine output.
    pub degradation: Option<String>,
}

impl Produced {
    /// Genuine text output.
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: StageContent::Text(content.into()),
            degradation: None,
        }
    }

    /// Genuine binary output.
    #[must_use]
    pub fn binary(bytes: Vec<u8>) -> Self {
        Self {
            content: StageContent::Binary(bytes),
            degradation: None,
        }
    }

    /// Output that should mark the stage degraded.
    #[must_use]
    pub fn degraded(content: StageContent, reason: impl Into<String>) -> Self {
        Self {
            content,
            degradation: Some(reason.into()),
        }
    }
}

/// A unit of pipeline work with declared input and output artifact kinds.
#[async_trait]
pub trait Stage: Send + Sync + Debug {
    /// The unique stage name.
    fn name(&self) -> &str;

    /// The artifact kinds this stage reads. Gathering (including fallback on
    /// missing files) is handled by the executor.
    fn reads(&self) -> &[ArtifactKind];

    /// The single artifact kind this stage writes.
    fn writes(&self) -> ArtifactKind;

    /// Turns gathered inputs into output content, invoking the stage's
    /// external capability. The knowledge handle is read-only historical
    /// context; only stages that declare a need for it (trend analysis)
    /// should search it.
    async fn produce(
        &self,
        inputs: &StageInputs,
        knowledge: &KnowledgeIndex,
    ) -> Result<Produced, CapabilityError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> RunDate {
        "2024-05-01".parse().unwrap()
    }

    #[test]
    fn test_placeholder_marker_round_trip() {
        let text = placeholder_text(ArtifactKind::Report, date(), "generator timed out");
        assert!(is_placeholder(&text));
        assert!(text.contains("Daily AI Report"));
        assert!(text.contains("generator timed out"));
        assert!(!is_placeholder("# Daily AI Report\n\nreal content"));
    }

    #[test]
    fn test_stage_inputs_tracking() {
        let mut inputs = StageInputs::new(date());
        inputs.insert(ArtifactKind::NewsResearch, "news".to_string());
        inputs.mark_missing(ArtifactKind::PaperResearch);

        assert_eq!(inputs.text(ArtifactKind::NewsResearch), Some("news"));
        assert_eq!(inputs.text_or_empty(ArtifactKind::PaperResearch), "");
        assert!(!inputs.is_complete());
        assert_eq!(inputs.missing(), &[ArtifactKind::PaperResearch]);
    }

    #[test]
    fn test_stage_content_accessors() {
        let text = StageContent::Text("hello".to_string());
        assert_eq!(text.as_text(), Some("hello"));
        assert_eq!(text.as_bytes(), b"hello");

        let binary = StageContent::Binary(vec![1, 2, 3]);
        assert_eq!(binary.as_text(), None);
        assert_eq!(binary.as_bytes(), &[1, 2, 3]);
    }
}
