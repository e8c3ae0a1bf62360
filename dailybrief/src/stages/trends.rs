//! The cross-run trend analysis stage.

use super::{Produced, Stage, StageInputs};
use crate::capability::TextGenerator;
use crate::core::ArtifactKind;
use crate::errors::CapabilityError;
use crate::knowledge::KnowledgeIndex;
use async_trait::async_trait;
use std::fmt::Write as _;
use std::sync::Arc;

const INSTRUCTIONS: &str = "Analyze long-term AI trends from the accumulated \
reports provided. Cover recurring themes, technology evolution, emerging \
directions, industry shifts, and likely implications. Use markdown section \
headings.";

const DEFAULT_TOP_K: usize = 8;

/// Synthesizes `trends_{date}.md` from today's report plus historical
/// context retrieved from the knowledge index.
///
/// This is the one stage that takes the read-only knowledge handle seriously:
/// it searches for semantically similar past entries instead of rereading old
/// files, so trend context survives artifact relocation.
#[derive(Debug)]
pub struct TrendStage {
    generator: Arc<dyn TextGenerator>,
    query: String,
    top_k: usize,
}

impl TrendStage {
    /// Creates the trend stage with the given retrieval query.
    #[must_use]
    pub fn new(generator: Arc<dyn TextGenerator>, query: impl Into<String>) -> Self {
        Self {
            generator,
            query: query.into(),
            top_k: DEFAULT_TOP_K,
        }
    }

    /// Sets how many historical entries to retrieve.
    #[must_use]
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k.max(1);
        self
    }
}

#[async_trait]
impl Stage for TrendStage {
    fn name(&self) -> &str {
        "trend_analysis"
    }

    fn reads(&self) -> &[ArtifactKind] {
        &[ArtifactKind::Report]
    }

    fn writes(&self) -> ArtifactKind {
        ArtifactKind::TrendAnalysis
    }

    async fn produce(
        &self,
        inputs: &StageInputs,
        knowledge: &KnowledgeIndex,
    ) -> Result<Produced, CapabilityError> {
        let hits = knowledge.search(&self.query, self.top_k);

        let mut history = String::new();
        for hit in &hits {
            let _ = writeln!(
                history,
                "- {} {} (similarity {:.2}): {}",
                hit.entry.run_date,
                hit.entry.kind,
                hit.score,
                hit.entry.excerpt.replace('\n', " ")
            );
        }
        if history.is_empty() {
            history.push_str("(knowledge base is empty)\n");
        }

        let context = format!(
            "Today's report:\n{}\n\nHistorical knowledge:\n{history}",
            inputs.text_or_empty(ArtifactKind::Report)
        );
        let analysis = self.generator.generate(&context, INSTRUCTIONS).await?;

        Ok(Produced::text(format!(
            "# AI Trend Analysis - {}\n\n{analysis}\n",
            inputs.run_date()
        )))
    }
}
