//! The daily report stage.

use super::{is_placeholder, Produced, Stage, StageInputs};
use crate::capability::TextGenerator;
use crate::core::ArtifactKind;
use crate::errors::CapabilityError;
use crate::knowledge::KnowledgeIndex;
use async_trait::async_trait;
use std::sync::Arc;

const INSTRUCTIONS: &str = "Write a brief overview of today's AI developments \
based on the industry news and research papers provided. Two or three \
sentences, no preamble.";

/// Synthesizes the two research notes into `daily_report_{date}.md`.
///
/// The news and paper sections are carried into the report verbatim so the
/// report's factual content never depends on generator fidelity; the
/// generator contributes only the summary section. Missing or placeholder
/// inputs become explicit "No news found." / "No papers found." notes.
#[derive(Debug)]
pub struct ReportStage {
    generator: Arc<dyn TextGenerator>,
}

impl ReportStage {
    /// Creates the report stage.
    #[must_use]
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    fn section(inputs: &StageInputs, kind: ArtifactKind, empty_note: &str) -> String {
        match inputs.text(kind) {
            Some(text) if !is_placeholder(text) => strip_title_line(text),
            _ => empty_note.to_string(),
        }
    }
}

#[async_trait]
impl Stage for ReportStage {
    fn name(&self) -> &str {
        "report"
    }

    fn reads(&self) -> &[ArtifactKind] {
        &[ArtifactKind::NewsResearch, ArtifactKind::PaperResearch]
    }

    fn writes(&self) -> ArtifactKind {
        ArtifactKind::Report
    }

    async fn produce(
        &self,
        inputs: &StageInputs,
        _knowledge: &KnowledgeIndex,
    ) -> Result<Produced, CapabilityError> {
        let news = Self::section(inputs, ArtifactKind::NewsResearch, "No news found.");
        let papers = Self::section(inputs, ArtifactKind::PaperResearch, "No papers found.");

        let context = format!("Industry news:\n{news}\n\nResearch papers:\n{papers}");
        let summary = self.generator.generate(&context, INSTRUCTIONS).await?;

        let report = format!(
            "# Daily AI Report - {date}\n\n\
             ## Industry News\n\n{news}\n\n\
             ## Research Papers\n\n{papers}\n\n\
             ## Summary\n\n{summary}\n",
            date = inputs.run_date()
        );
        Ok(Produced::text(report))
    }
}

/// Drops a leading `# ...` title so nested section content keeps a sane
/// heading hierarchy.
fn strip_title_line(text: &str) -> String {
    let trimmed = text.trim_start();
    if trimmed.starts_with("# ") {
        trimmed
            .split_once('\n')
            .map_or(String::new(), |(_, rest)| rest.trim_start().to_string())
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RunDate;
    use crate::knowledge::HashEmbedder;
    use crate::stages::placeholder_text;
    use crate::testing::StaticGenerator;

    fn knowledge() -> KnowledgeIndex {
        KnowledgeIndex::in_memory(Arc::new(HashEmbedder::new(16)))
    }

    fn date() -> RunDate {
        "2024-05-01".parse().unwrap()
    }

    fn stage() -> ReportStage {
        ReportStage::new(Arc::new(StaticGenerator::new("A quiet day in AI.")))
    }

    #[tokio::test]
    async fn test_report_carries_news_and_notes_missing_papers() {
        let mut inputs = StageInputs::new(date());
        inputs.insert(
            ArtifactKind::NewsResearch,
            "# AI News Research - 2024-05-01\n\n- [A](https://a) - one\n- [B](https://b) - two\n"
                .to_string(),
        );
        inputs.mark_missing(ArtifactKind::PaperResearch);

        let produced = stage().produce(&inputs, &knowledge()).await.unwrap();
        let text = produced.content.as_text().unwrap();

        assert!(text.starts_with("# Daily AI Report - 2024-05-01"));
        assert!(text.contains("- [A](https://a) - one"));
        assert!(text.contains("- [B](https://b) - two"));
        assert!(text.contains("No papers found."));
        assert!(text.contains("A quiet day in AI."));
    }

    #[tokio::test]
    async fn test_placeholder_input_treated_as_empty() {
        let mut inputs = StageInputs::new(date());
        inputs.insert(
            ArtifactKind::NewsResearch,
            "# AI News Research\n\n- [A](https://a)\n".to_string(),
        );
        inputs.insert(
            ArtifactKind::PaperResearch,
            placeholder_text(ArtifactKind::PaperResearch, date(), "no results"),
        );

        let produced = stage().produce(&inputs, &knowledge()).await.unwrap();
        let text = produced.content.as_text().unwrap();

        assert!(text.contains("No papers found."));
        assert!(!text.contains("dailybrief:placeholder"));
    }

    #[test]
    fn test_strip_title_line() {
        assert_eq!(strip_title_line("# Title\n\nbody"), "body");
        assert_eq!(strip_title_line("no title body"), "no title body");
    }
}
