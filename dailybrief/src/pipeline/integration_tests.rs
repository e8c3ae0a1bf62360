//! End-to-end scheduler scenarios over a real temp-dir artifact store.

use super::{Pipeline, PipelineBuilder, Scheduler};
use crate::capability::{FetchedItem, TextGenerator};
use crate::core::{ArtifactKind, RunDate, RunState, StageStatus};
use crate::knowledge::{HashEmbedder, KnowledgeIndex};
use crate::ledger::{InMemoryLedger, Ledger};
use crate::stages::{
    is_placeholder, AudioStage, ReportStage, ResearchStage, ScriptStage, StageExecutor, TrendStage,
};
use crate::store::ArtifactStore;
use crate::testing::{
    EmptyFetcher, FailingFetcher, StaticFetcher, StaticGenerator, StaticSynthesizer,
};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

fn date() -> RunDate {
    "2024-05-01".parse().unwrap()
}

fn news_items() -> Vec<FetchedItem> {
    vec![
        FetchedItem::new("GPU glut", "https://example.com/a", "supply normalizes"),
        FetchedItem::new("Agents at work", "https://example.com/b", "pilot results"),
    ]
}

fn executor(root: &Path) -> (StageExecutor, Arc<KnowledgeIndex>) {
    let store = Arc::new(ArtifactStore::new(root));
    let knowledge = Arc::new(KnowledgeIndex::in_memory(Arc::new(HashEmbedder::new(64))));
    let exec =
        StageExecutor::new(store, knowledge.clone()).with_timeout(Duration::from_millis(500));
    (exec, knowledge)
}

/// The standard six-stage daily pipeline with pluggable script generator and
/// news/paper fetchers.
fn daily_pipeline(
    news: Arc<dyn crate::capability::ContentFetcher>,
    papers: Arc<dyn crate::capability::ContentFetcher>,
    script_generator: Arc<dyn TextGenerator>,
) -> Pipeline {
    let generator = Arc::new(StaticGenerator::new("A quiet day in AI."));
    match PipelineBuilder::new("daily-ai-brief")
        .stage(Arc::new(ResearchStage::news("ai", vec![news])))
        .stage(Arc::new(ResearchStage::papers("ml", vec![papers])))
        .stage(Arc::new(ReportStage::new(generator.clone())))
        .stage(Arc::new(TrendStage::new(generator, "recurring themes")))
        .stage(Arc::new(ScriptStage::new(script_generator)))
        .stage(Arc::new(AudioStage::new(Arc::new(StaticSynthesizer::new(
            vec![82, 73, 70, 70],
        )))))
        .build()
    {
        Ok(pipeline) => pipeline,
        Err(e) => panic!("pipeline must build: {e}"),
    }
}

fn happy_pipeline() -> Pipeline {
    daily_pipeline(
        Arc::new(StaticFetcher::new("HackerNews", news_items())),
        Arc::new(StaticFetcher::new(
            "arXiv",
            vec![FetchedItem::new(
                "Scaling Laws",
                "https://arxiv.org/abs/1",
                "we scale",
            )],
        )),
        Arc::new(StaticGenerator::new("Welcome to the daily brief.")),
    )
}

#[tokio::test]
async fn test_full_run_completes_and_writes_every_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let (exec, knowledge) = executor(dir.path());
    let store = exec.store().clone();

    let scheduler = Scheduler::new(happy_pipeline(), exec, Arc::new(InMemoryLedger::new()));
    let run = scheduler.run(date()).await;

    assert_eq!(run.state, RunState::Completed);
    assert_eq!(run.results.len(), 6);
    assert!(run.results.iter().all(|r| r.status == StageStatus::Ok));

    for kind in ArtifactKind::ALL {
        assert!(store.exists(date(), kind).await, "missing {kind}");
    }

    // Every text artifact was ingested; audio is not indexable.
    assert_eq!(knowledge.len(), 5);
    assert!(knowledge.entry(date(), ArtifactKind::Audio).is_none());
}

#[tokio::test]
async fn test_rerun_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let (exec, knowledge) = executor(dir.path());
    let store = exec.store().clone();

    let scheduler = Scheduler::new(happy_pipeline(), exec, Arc::new(InMemoryLedger::new()));
    let first = scheduler.run(date()).await;
    let second = scheduler.run(date()).await;

    assert_eq!(first.state, RunState::Completed);
    assert_eq!(second.state, RunState::Completed);
    assert_ne!(first.run_id, second.run_id);

    // Same names overwritten in place, single knowledge entry per key.
    let report = store.path_for(date(), ArtifactKind::Report);
    assert!(report.ends_with("reports/daily_report_2024-05-01.md"));
    assert_eq!(knowledge.len(), 5);
}

#[tokio::test]
async fn test_empty_paper_results_degrade_but_report_still_carries_news() {
    let dir = tempfile::tempdir().unwrap();
    let (exec, _) = executor(dir.path());
    let store = exec.store().clone();

    let pipeline = daily_pipeline(
        Arc::new(StaticFetcher::new("HackerNews", news_items())),
        Arc::new(EmptyFetcher::new("arXiv")),
        Arc::new(StaticGenerator::new("script")),
    );
    let scheduler = Scheduler::new(pipeline, exec, Arc::new(InMemoryLedger::new()));
    let run = scheduler.run(date()).await;

    assert_eq!(run.state, RunState::Completed);
    let papers = run.result_for("paper_research").unwrap();
    assert_eq!(papers.status, StageStatus::Degraded);

    let report = store.read_text(date(), ArtifactKind::Report).await.unwrap();
    assert!(report.contains("GPU glut"));
    assert!(report.contains("No papers found."));
}

#[tokio::test]
async fn test_script_timeout_degrades_and_audio_still_runs() {
    let dir = tempfile::tempdir().unwrap();
    let (exec, _) = executor(dir.path());
    let store = exec.store().clone();

    let pipeline = daily_pipeline(
        Arc::new(StaticFetcher::new("HackerNews", news_items())),
        Arc::new(StaticFetcher::new("arXiv", news_items())),
        Arc::new(crate::testing::SlowGenerator::new(Duration::from_secs(60))),
    );
    let scheduler = Scheduler::new(pipeline, exec, Arc::new(InMemoryLedger::new()));
    let run = scheduler.run(date()).await;

    assert_eq!(run.state, RunState::Completed);
    let script = run.result_for("script").unwrap();
    assert_eq!(script.status, StageStatus::Degraded);

    let text = store.read_text(date(), ArtifactKind::Script).await.unwrap();
    assert!(is_placeholder(&text));

    // Audio runs against the placeholder script rather than being skipped.
    let audio = run.result_for("audio").unwrap();
    assert_ne!(audio.status, StageStatus::Failed);
    assert!(store.exists(date(), ArtifactKind::Audio).await);
}

#[tokio::test]
async fn test_fatal_fetch_failure_aborts_before_downstream_stages() {
    let dir = tempfile::tempdir().unwrap();
    let (exec, _) = executor(dir.path());
    let store = exec.store().clone();

    let pipeline = daily_pipeline(
        Arc::new(FailingFetcher::fatal("HackerNews")),
        Arc::new(StaticFetcher::new("arXiv", news_items())),
        Arc::new(StaticGenerator::new("script")),
    );
    let scheduler = Scheduler::new(pipeline, exec, Arc::new(InMemoryLedger::new()));
    let run = scheduler.run(date()).await;

    match &run.state {
        RunState::Aborted { stage, .. } => assert_eq!(stage, "news_research"),
        other => panic!("expected Aborted, got {other:?}"),
    }
    assert_eq!(run.results.len(), 1);
    assert!(!store.exists(date(), ArtifactKind::Report).await);
}

#[tokio::test]
async fn test_storage_fault_aborts_with_zero_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("blocked");
    tokio::fs::write(&blocker, b"file, not a dir").await.unwrap();
    let (exec, _) = executor(&blocker);

    let scheduler = Scheduler::new(happy_pipeline(), exec, Arc::new(InMemoryLedger::new()));
    let run = scheduler.run(date()).await;

    match &run.state {
        RunState::Aborted { stage, reason } => {
            assert_eq!(stage, "news_research");
            assert!(reason.contains("storage"));
        }
        other => panic!("expected Aborted, got {other:?}"),
    }
}

#[tokio::test]
async fn test_cancellation_between_stages() {
    let dir = tempfile::tempdir().unwrap();
    let (exec, _) = executor(dir.path());

    let scheduler = Scheduler::new(happy_pipeline(), exec, Arc::new(InMemoryLedger::new()));
    scheduler.cancellation_token().cancel();
    let run = scheduler.run(date()).await;

    match &run.state {
        RunState::Aborted { stage, reason } => {
            assert_eq!(stage, "news_research");
            assert!(reason.contains("cancelled"));
        }
        other => panic!("expected Aborted, got {other:?}"),
    }
    assert!(run.results.is_empty());
}

#[tokio::test]
async fn test_every_stage_result_lands_in_the_ledger() {
    let dir = tempfile::tempdir().unwrap();
    let (exec, _) = executor(dir.path());

    let ledger = Arc::new(InMemoryLedger::new());
    let scheduler = Scheduler::new(happy_pipeline(), exec, ledger.clone());
    let run = scheduler.run(date()).await;

    assert_eq!(run.state, RunState::Completed);
    let rows = ledger.rows_in_range(date(), date()).unwrap();
    assert_eq!(rows.len(), 6);
    assert!(rows.iter().all(|r| r.run_id == run.run_id));
    assert_eq!(rows[0].stage, "news_research");
    assert_eq!(rows[5].stage, "audio");
}

#[tokio::test]
async fn test_trend_stage_sees_history_from_earlier_runs() {
    let dir = tempfile::tempdir().unwrap();
    let (exec, knowledge) = executor(dir.path());
    let store = exec.store().clone();

    // Seed yesterday's report into the index as an earlier run would have.
    let yesterday: RunDate = "2024-04-30".parse().unwrap();
    let artifact = store
        .write(
            yesterday,
            ArtifactKind::Report,
            b"# Daily AI Report - 2024-04-30\n\nAgents everywhere.",
            false,
        )
        .await
        .unwrap();
    knowledge
        .ingest(
            yesterday,
            ArtifactKind::Report,
            "Agents everywhere.",
            &artifact.path,
        )
        .unwrap();

    // Echo the trend context so the retrieved history is visible in the
    // artifact.
    let pipeline = match PipelineBuilder::new("daily-ai-brief")
        .stage(Arc::new(ResearchStage::news(
            "ai",
            vec![Arc::new(StaticFetcher::new("HackerNews", news_items()))],
        )))
        .stage(Arc::new(ResearchStage::papers(
            "ml",
            vec![Arc::new(StaticFetcher::new("arXiv", news_items()))],
        )))
        .stage(Arc::new(ReportStage::new(Arc::new(StaticGenerator::new(
            "summary",
        )))))
        .stage(Arc::new(TrendStage::new(
            Arc::new(crate::testing::EchoGenerator),
            "agents",
        )))
        .build()
    {
        Ok(pipeline) => pipeline,
        Err(e) => panic!("pipeline must build: {e}"),
    };

    let scheduler = Scheduler::new(pipeline, exec, Arc::new(InMemoryLedger::new()));
    let run = scheduler.run(date()).await;
    assert_eq!(run.state, RunState::Completed);

    let trends = store
        .read_text(date(), ArtifactKind::TrendAnalysis)
        .await
        .unwrap();
    assert!(trends.contains("2024-04-30"));
}
