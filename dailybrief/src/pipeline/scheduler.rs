//! The sequential pipeline scheduler.

use super::{CancellationToken, Pipeline};
use crate::core::{PipelineRun, RunDate, StageResult};
use crate::ledger::{Ledger, LedgerRow};
use crate::stages::StageExecutor;
use std::sync::Arc;

/// Executes a pipeline's stages strictly in configured order for one run
/// date.
///
/// Failure policy: a `Degraded` stage never halts progression; downstream
/// stages must tolerate degraded upstream artifacts. A `Failed` stage or a
/// storage fault transitions the run to `Aborted`, recording which stage
/// halted it. A rerun for a date that already completed starts fresh and
/// overwrites artifacts; there is no checkpoint/resume.
///
/// Every stage result is appended to the ledger for audit; ledger faults are
/// logged and never affect control flow.
#[derive(Debug)]
pub struct Scheduler {
    pipeline: Pipeline,
    executor: StageExecutor,
    ledger: Arc<dyn Ledger>,
    cancellation: CancellationToken,
}

impl Scheduler {
    /// Creates a scheduler.
    #[must_use]
    pub fn new(pipeline: Pipeline, executor: StageExecutor, ledger: Arc<dyn Ledger>) -> Self {
        Self {
            pipeline,
            executor,
            ledger,
            cancellation: CancellationToken::new(),
        }
    }

    /// A handle that can abort the run between stages.
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    /// The pipeline this scheduler runs.
    #[must_use]
    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Runs the pipeline for one date and returns the terminal run record.
    pub async fn run(&self, run_date: RunDate) -> PipelineRun {
        let mut run = PipelineRun::new(self.pipeline.name(), run_date);
        tracing::info!(
            pipeline = self.pipeline.name(),
            run_id = %run.run_id,
            run_date = %run_date,
            stages = self.pipeline.stages().len(),
            "pipeline run started"
        );

        for stage in self.pipeline.stages() {
            if self.cancellation.is_cancelled() {
                run.abort(stage.name(), "cancelled before stage started");
                tracing::warn!(
                    run_id = %run.run_id,
                    stage = stage.name(),
                    "pipeline run cancelled"
                );
                return run;
            }

            run.start_stage(stage.name());
            match self.executor.execute(stage.as_ref(), run_date).await {
                Ok(result) => {
                    self.record(&run, &result);
                    let fatal = !result.is_non_fatal();
                    run.push_result(result);
                    if fatal {
                        run.abort(stage.name(), "stage failed");
                        tracing::error!(
                            run_id = %run.run_id,
                            stage = stage.name(),
                            "pipeline run aborted by failed stage"
                        );
                        return run;
                    }
                }
                Err(err) => {
                    // Storage integrity is gone; nothing downstream can run.
                    let result =
                        StageResult::failed(stage.name(), run_date, format!("storage: {err}"));
                    self.record(&run, &result);
                    run.push_result(result);
                    run.abort(stage.name(), format!("storage error: {err}"));
                    tracing::error!(
                        run_id = %run.run_id,
                        stage = stage.name(),
                        error = %err,
                        "pipeline run aborted by storage error"
                    );
                    return run;
                }
            }
        }

        run.complete();
        let degraded = run.degraded_stages();
        if degraded.is_empty() {
            tracing::info!(run_id = %run.run_id, run_date = %run_date, "pipeline run completed");
        } else {
            let summary: Vec<String> = degraded
                .iter()
                .map(|r| format!("{}: {}", r.stage, r.notes.join("; ")))
                .collect();
            tracing::warn!(
                run_id = %run.run_id,
                run_date = %run_date,
                degraded = ?summary,
                "pipeline run completed with degraded stages"
            );
        }
        run
    }

    fn record(&self, run: &PipelineRun, result: &StageResult) {
        if let Err(err) = self.ledger.append(LedgerRow::from_result(run.run_id, result)) {
            tracing::warn!(
                run_id = %run.run_id,
                stage = %result.stage,
                error = %err,
                "ledger append failed; continuing"
            );
        }
    }
}
