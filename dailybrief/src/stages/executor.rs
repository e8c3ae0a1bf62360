//! The stage execution contract.

use super::{is_placeholder, placeholder_text, Produced, Stage, StageContent, StageInputs};
use crate::capability::with_timeout;
use crate::core::{RunDate, StageResult, StageStatus};
use crate::errors::StoreError;
use crate::knowledge::KnowledgeIndex;
use crate::store::ArtifactStore;
use std::sync::Arc;
use std::time::{Duration, Instant};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Runs a single stage under the pipeline's execution contract:
///
/// 1. gather declared inputs, falling back to a partition scan on a missing
///    exact name, and proceeding degraded with empty input if still absent;
/// 2. invoke the stage's capability under a bounded timeout, writing an
///    explicitly marked placeholder on recoverable failure; the expected
///    artifact is never silently skipped;
/// 3. write the declared output atomically and ingest text artifacts into the
///    knowledge index (ingestion failure is logged, never fatal);
/// 4. return a [`StageResult`].
///
/// Storage faults (`Io`) propagate as errors for the scheduler to abort on.
#[derive(Debug, Clone)]
pub struct StageExecutor {
    store: Arc<ArtifactStore>,
    knowledge: Arc<KnowledgeIndex>,
    timeout: Duration,
}

impl StageExecutor {
    /// Creates an executor with the default 120s capability timeout.
    #[must_use]
    pub fn new(store: Arc<ArtifactStore>, knowledge: Arc<KnowledgeIndex>) -> Self {
        Self {
            store,
            knowledge,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Sets the per-invocation capability timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The artifact store this executor writes to.
    #[must_use]
    pub fn store(&self) -> &Arc<ArtifactStore> {
        &self.store
    }

    /// The knowledge index this executor ingests into.
    #[must_use]
    pub fn knowledge(&self) -> &Arc<KnowledgeIndex> {
        &self.knowledge
    }

    /// Executes one stage for a run date.
    pub async fn execute(
        &self,
        stage: &dyn Stage,
        run_date: RunDate,
    ) -> Result<StageResult, StoreError> {
        let started = Instant::now();
        let mut notes = Vec::new();

        let inputs = self.gather_inputs(stage, run_date, &mut notes).await?;
        let mut degraded = !inputs.is_complete();

        let produced = with_timeout(self.timeout, stage.produce(&inputs, &self.knowledge)).await;
        let (content, capability_failed) = match produced {
            Ok(Produced {
                content,
                degradation,
            }) => {
                if let Some(reason) = degradation {
                    degraded = true;
                    notes.push(reason);
                }
                (content, false)
            }
            Err(err) if err.is_fatal() => {
                tracing::error!(stage = stage.name(), error = %err, "stage failed fatally");
                return Ok(StageResult::failed(stage.name(), run_date, err.to_string())
                    .with_notes(notes)
                    .with_duration_ms(elapsed_ms(started)));
            }
            Err(err) => {
                degraded = true;
                notes.push(format!("capability failure: {err}"));
                let text = placeholder_text(stage.writes(), run_date, &err.to_string());
                (StageContent::Text(text), true)
            }
        };

        let placeholder = capability_failed
            || content.as_text().is_some_and(is_placeholder);
        let kind = stage.writes();
        let artifact = self
            .store
            .write(run_date, kind, content.as_bytes(), placeholder)
            .await?;

        if kind.is_text() {
            if let Some(text) = content.as_text() {
                if let Err(err) = self.knowledge.ingest(run_date, kind, text, &artifact.path) {
                    tracing::warn!(
                        stage = stage.name(),
                        error = %err,
                        "knowledge ingestion failed; continuing"
                    );
                    notes.push(format!("knowledge ingestion failed: {err}"));
                }
            }
        }

        let result = if degraded {
            StageResult::degraded(stage.name(), run_date, artifact)
        } else {
            StageResult::ok(stage.name(), run_date, artifact)
        }
        .with_notes(notes)
        .with_duration_ms(elapsed_ms(started));

        tracing::info!(
            stage = stage.name(),
            run_date = %run_date,
            status = %result.status,
            duration_ms = result.duration_ms,
            "stage executed"
        );
        Ok(result)
    }

    /// Reads each declared input, with the substring fallback on a missing
    /// exact name. `Io` faults escalate; missing inputs degrade.
    async fn gather_inputs(
        &self,
        stage: &dyn Stage,
        run_date: RunDate,
        notes: &mut Vec<String>,
    ) -> Result<StageInputs, StoreError> {
        let mut inputs = StageInputs::new(run_date);

        for &kind in stage.reads() {
            match self.store.read_text(run_date, kind).await {
                Ok(text) => inputs.insert(kind, text),
                Err(StoreError::NotFound { .. }) => {
                    let hints = kind.fallback_hints(run_date);
                    let candidates = self
                        .store
                        .find_by_pattern(&kind.partition_dir(run_date), &hints)
                        .await?;

                    if let Some(path) = candidates.first() {
                        notes.push(format!(
                            "input {kind} resolved by fallback to {}",
                            path.display()
                        ));
                        inputs.insert(kind, self.store.read_text_at(path).await?);
                    } else {
                        notes.push(format!("input {kind} missing; proceeding with empty input"));
                        inputs.mark_missing(kind);
                    }
                }
                Err(err) => return Err(err),
            }
        }
        Ok(inputs)
    }
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}
