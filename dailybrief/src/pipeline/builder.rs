//! Pipeline construction and startup-time validation.

use crate::core::ArtifactKind;
use crate::errors::ConfigurationError;
use crate::stages::Stage;
use std::collections::HashSet;
use std::sync::Arc;

/// A validated, ordered sequence of stages.
///
/// Ordering is a correctness requirement, not a performance choice: each
/// stage's declared inputs are earlier stages' outputs, and the builder
/// refuses any configuration where that does not hold, so dependency errors
/// are fatal at startup and never at runtime.
#[derive(Debug, Clone)]
pub struct Pipeline {
    name: String,
    stages: Vec<Arc<dyn Stage>>,
}

impl Pipeline {
    /// The pipeline name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The stages in execution order.
    #[must_use]
    pub fn stages(&self) -> &[Arc<dyn Stage>] {
        &self.stages
    }

    /// Stage names in execution order.
    #[must_use]
    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name()).collect()
    }
}

/// Builds a [`Pipeline`], validating the stage graph.
#[derive(Debug, Default)]
pub struct PipelineBuilder {
    name: String,
    stages: Vec<Arc<dyn Stage>>,
}

impl PipelineBuilder {
    /// Starts a builder for a named pipeline.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stages: Vec::new(),
        }
    }

    /// Appends a stage. Execution order is declaration order.
    #[must_use]
    pub fn stage(mut self, stage: Arc<dyn Stage>) -> Self {
        self.stages.push(stage);
        self
    }

    /// Validates and builds the pipeline.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] if the name is empty, the pipeline
    /// has no stages, a stage name or output kind is duplicated, or a stage
    /// reads a kind no earlier stage writes.
    pub fn build(self) -> Result<Pipeline, ConfigurationError> {
        if self.name.trim().is_empty() {
            return Err(ConfigurationError::new(
                "pipeline name cannot be empty or whitespace-only",
            ));
        }
        if self.stages.is_empty() {
            return Err(ConfigurationError::new(
                "pipeline must contain at least one stage",
            ));
        }

        let mut seen_names: HashSet<&str> = HashSet::new();
        let mut written: HashSet<ArtifactKind> = HashSet::new();

        for stage in &self.stages {
            if !seen_names.insert(stage.name()) {
                return Err(ConfigurationError::new(format!(
                    "duplicate stage name '{}'",
                    stage.name()
                ))
                .with_stages(vec![stage.name().to_string()]));
            }

            for &kind in stage.reads() {
                if !written.contains(&kind) {
                    return Err(ConfigurationError::new(format!(
                        "stage '{}' reads '{kind}' which no earlier stage writes",
                        stage.name()
                    ))
                    .with_stages(vec![stage.name().to_string()]));
                }
            }

            if !written.insert(stage.writes()) {
                return Err(ConfigurationError::new(format!(
                    "output kind '{}' is written by more than one stage",
                    stage.writes()
                ))
                .with_stages(vec![stage.name().to_string()]));
            }
        }

        Ok(Pipeline {
            name: self.name,
            stages: self.stages,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{EchoGenerator, EmptyFetcher, StaticSynthesizer};
    use crate::stages::{
        AudioStage, ReportStage, ResearchStage, ScriptStage, TrendStage,
    };

    fn daily_pipeline() -> PipelineBuilder {
        let generator = Arc::new(EchoGenerator);
        PipelineBuilder::new("daily-ai-brief")
            .stage(Arc::new(ResearchStage::news(
                "ai",
                vec![Arc::new(EmptyFetcher::new("HackerNews"))],
            )))
            .stage(Arc::new(ResearchStage::papers(
                "ml",
                vec![Arc::new(EmptyFetcher::new("arXiv"))],
            )))
            .stage(Arc::new(ReportStage::new(generator.clone())))
            .stage(Arc::new(TrendStage::new(generator.clone(), "ai trends")))
            .stage(Arc::new(ScriptStage::new(generator)))
            .stage(Arc::new(AudioStage::new(Arc::new(StaticSynthesizer::new(
                vec![0],
            )))))
    }

    #[test]
    fn test_valid_daily_pipeline_builds() {
        let pipeline = daily_pipeline().build().unwrap();
        assert_eq!(pipeline.name(), "daily-ai-brief");
        assert_eq!(
            pipeline.stage_names(),
            vec![
                "news_research",
                "paper_research",
                "report",
                "trend_analysis",
                "script",
                "audio"
            ]
        );
    }

    #[test]
    fn test_empty_pipeline_rejected() {
        assert!(PipelineBuilder::new("empty").build().is_err());
    }

    #[test]
    fn test_blank_name_rejected() {
        let err = PipelineBuilder::new("   ")
            .stage(Arc::new(ReportStage::new(Arc::new(EchoGenerator))))
            .build()
            .unwrap_err();
        assert!(err.message.contains("name"));
    }

    #[test]
    fn test_read_before_write_rejected() {
        // Report reads the research kinds, but nothing wrote them yet.
        let err = PipelineBuilder::new("out-of-order")
            .stage(Arc::new(ReportStage::new(Arc::new(EchoGenerator))))
            .build()
            .unwrap_err();
        assert!(err.message.contains("no earlier stage writes"));
        assert_eq!(err.stages, vec!["report".to_string()]);
    }

    #[test]
    fn test_duplicate_stage_name_rejected() {
        let err = PipelineBuilder::new("dupes")
            .stage(Arc::new(ResearchStage::news(
                "ai",
                vec![Arc::new(EmptyFetcher::new("HackerNews"))],
            )))
            .stage(Arc::new(ResearchStage::news(
                "ai",
                vec![Arc::new(EmptyFetcher::new("Reddit"))],
            )))
            .build()
            .unwrap_err();
        assert!(err.message.contains("duplicate stage name"));
    }
}
