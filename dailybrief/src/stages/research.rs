//! Research stages: gather news/forum posts and academic papers.

use super::{Produced, Stage, StageContent, StageInputs, PLACEHOLDER_MARKER};
use crate::capability::ContentFetcher;
use crate::core::ArtifactKind;
use crate::errors::CapabilityError;
use crate::knowledge::KnowledgeIndex;
use async_trait::async_trait;
use std::fmt::Write as _;
use std::sync::Arc;

/// A research stage pulls items for one topic from one or more content
/// fetchers and writes a markdown research note.
///
/// Two variants mirror the daily roster: a news/forum researcher writing
/// `hn_reddit_{date}.md` and an academic-paper researcher writing
/// `arxiv_{date}.md`. A fetcher that errors recoverably costs its section, not
/// the stage; if every source comes back empty the note is still written, as
/// an explicitly marked placeholder, and the stage reports degraded.
#[derive(Debug)]
pub struct ResearchStage {
    name: String,
    output: ArtifactKind,
    topic: String,
    fetchers: Vec<Arc<dyn ContentFetcher>>,
}

impl ResearchStage {
    /// The news/forum research variant.
    #[must_use]
    pub fn news(topic: impl Into<String>, fetchers: Vec<Arc<dyn ContentFetcher>>) -> Self {
        Self {
            name: "news_research".to_string(),
            output: ArtifactKind::NewsResearch,
            topic: topic.into(),
            fetchers,
        }
    }

    /// The academic-paper research variant.
    #[must_use]
    pub fn papers(topic: impl Into<String>, fetchers: Vec<Arc<dyn ContentFetcher>>) -> Self {
        Self {
            name: "paper_research".to_string(),
            output: ArtifactKind::PaperResearch,
            topic: topic.into(),
            fetchers,
        }
    }
}

#[async_trait]
impl Stage for ResearchStage {
    fn name(&self) -> &str {
        &self.name
    }

    fn reads(&self) -> &[ArtifactKind] {
        &[]
    }

    fn writes(&self) -> ArtifactKind {
        self.output
    }

    async fn produce(
        &self,
        inputs: &StageInputs,
        _knowledge: &KnowledgeIndex,
    ) -> Result<Produced, CapabilityError> {
        let mut body = String::new();
        let mut failures = Vec::new();
        let mut total_items = 0usize;

        for fetcher in &self.fetchers {
            let _ = writeln!(body, "# {} {}", fetcher.source(), section_label(self.output));
            match fetcher.fetch(&self.topic).await {
                Ok(items) => {
                    if items.is_empty() {
                        body.push_str("\nNo results found.\n\n");
                    } else {
                        total_items += items.len();
                        body.push('\n');
                        for item in &items {
                            body.push_str(&item.to_markdown());
                            body.push('\n');
                        }
                        body.push('\n');
                    }
                }
                Err(err) if err.is_fatal() => return Err(err),
                Err(err) => {
                    tracing::warn!(
                        stage = self.name,
                        source = fetcher.source(),
                        error = %err,
                        "source unavailable"
                    );
                    body.push_str("\n_Source unavailable._\n\n");
                    failures.push(format!("{}: {err}", fetcher.source()));
                }
            }
        }

        if total_items == 0 {
            // Always create the output file, even with no results.
            let text = format!(
                "{PLACEHOLDER_MARKER}\n# {} - {}\n\n{body}",
                self.output.title(),
                inputs.run_date()
            );
            let reason = if failures.is_empty() {
                "no results from any source".to_string()
            } else {
                format!("no results; failed sources: {}", failures.join("; "))
            };
            return Ok(Produced::degraded(StageContent::Text(text), reason));
        }

        let text = format!(
            "# {} - {}\n\n{body}",
            self.output.title(),
            inputs.run_date()
        );
        if failures.is_empty() {
            Ok(Produced::text(text))
        } else {
            Ok(Produced::degraded(
                StageContent::Text(text),
                format!("failed sources: {}", failures.join("; ")),
            ))
        }
    }
}

fn section_label(kind: ArtifactKind) -> &'static str {
    match kind {
        ArtifactKind::PaperResearch => "Papers",
        _ => "Stories",
    }
}
