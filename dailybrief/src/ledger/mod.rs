//! Append-only ledger of stage results.
//!
//! One row per `(RunDate, stage)` execution, queryable by date range. The
//! ledger exists for audit and cross-run trend queries only; nothing in the
//! pipeline's control flow depends on it, which is why append failures are
//! logged and swallowed by the scheduler.

use crate::core::{RunDate, StageResult, StageStatus};
use crate::errors::LedgerError;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::io::Write as _;
use std::path::PathBuf;
use uuid::Uuid;

/// One recorded stage outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerRow {
    /// The pipeline run this row belongs to.
    pub run_id: Uuid,
    /// The run date.
    pub run_date: RunDate,
    /// The stage name.
    pub stage: String,
    /// The stage outcome.
    pub status: StageStatus,
    /// Path of the artifact produced, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact_path: Option<PathBuf>,
    /// Whether the artifact was a placeholder.
    #[serde(default)]
    pub placeholder: bool,
    /// Stage notes (missing inputs, fallback hits, failure reasons).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
    /// When the row was recorded (ISO 8601).
    pub recorded_at: String,
}

impl LedgerRow {
    /// Builds a row from a stage result.
    #[must_use]
    pub fn from_result(run_id: Uuid, result: &StageResult) -> Self {
        Self {
            run_id,
            run_date: result.run_date,
            stage: result.stage.clone(),
            status: result.status,
            artifact_path: result.artifact.as_ref().map(|a| a.path.clone()),
            placeholder: result.artifact.as_ref().is_some_and(|a| a.placeholder),
            notes: result.notes.clone(),
            recorded_at: crate::utils::iso_timestamp(),
        }
    }
}

/// Append-only stage-result storage.
pub trait Ledger: Send + Sync + Debug {
    /// Appends a row. Rows are never updated or deleted.
    fn append(&self, row: LedgerRow) -> Result<(), LedgerError>;

    /// Returns rows whose run date falls in `[from, to]`, in append order.
    fn rows_in_range(&self, from: RunDate, to: RunDate) -> Result<Vec<LedgerRow>, LedgerError>;
}

/// Process-local ledger for tests and ephemeral runs.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    rows: RwLock<Vec<LedgerRow>>,
}

impl InMemoryLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of rows appended.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.read().len()
    }

    /// Returns true if nothing was appended.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.read().is_empty()
    }
}

impl Ledger for InMemoryLedger {
    fn append(&self, row: LedgerRow) -> Result<(), LedgerError> {
        self.rows.write().push(row);
        Ok(())
    }

    fn rows_in_range(&self, from: RunDate, to: RunDate) -> Result<Vec<LedgerRow>, LedgerError> {
        Ok(self
            .rows
            .read()
            .iter()
            .filter(|r| r.run_date >= from && r.run_date <= to)
            .cloned()
            .collect())
    }
}

/// File-backed ledger appending one JSON row per line.
#[derive(Debug)]
pub struct JsonlLedger {
    path: PathBuf,
}

impl JsonlLedger {
    /// Creates a ledger appending to `path`. The file is created on first
    /// append.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Ledger for JsonlLedger {
    fn append(&self, row: LedgerRow) -> Result<(), LedgerError> {
        let line = serde_json::to_string(&row)?;
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{line}")?;
        Ok(())
    }

    fn rows_in_range(&self, from: RunDate, to: RunDate) -> Result<Vec<LedgerRow>, LedgerError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(LedgerError::Io(e)),
        };

        let mut rows = Vec::new();
        for line in contents.lines().filter(|l| !l.trim().is_empty()) {
            let row: LedgerRow = serde_json::from_str(line)?;
            if row.run_date >= from && row.run_date <= to {
                rows.push(row);
            }
        }
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ArtifactKind, ArtifactRef};

    fn date(s: &str) -> RunDate {
        s.parse().unwrap()
    }

    fn row(run_date: &str, stage: &str) -> LedgerRow {
        let result = StageResult::ok(
            stage,
            date(run_date),
            ArtifactRef::new(
                date(run_date),
                ArtifactKind::Report,
                PathBuf::from("r.md"),
                false,
            ),
        );
        LedgerRow::from_result(Uuid::new_v4(), &result)
    }

    #[test]
    fn test_in_memory_range_query() {
        let ledger = InMemoryLedger::new();
        ledger.append(row("2024-04-29", "report")).unwrap();
        ledger.append(row("2024-05-01", "report")).unwrap();
        ledger.append(row("2024-05-03", "report")).unwrap();

        let rows = ledger
            .rows_in_range(date("2024-04-30"), date("2024-05-02"))
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].run_date, date("2024-05-01"));
    }

    #[test]
    fn test_jsonl_append_and_query() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = JsonlLedger::new(dir.path().join("ledger.jsonl"));

        ledger.append(row("2024-05-01", "news_research")).unwrap();
        ledger.append(row("2024-05-01", "report")).unwrap();
        ledger.append(row("2024-05-02", "report")).unwrap();

        let rows = ledger
            .rows_in_range(date("2024-05-01"), date("2024-05-01"))
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].stage, "news_research");
        assert_eq!(rows[1].stage, "report");
    }

    #[test]
    fn test_jsonl_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = JsonlLedger::new(dir.path().join("absent.jsonl"));
        let rows = ledger
            .rows_in_range(date("2024-01-01"), date("2024-12-31"))
            .unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_row_captures_placeholder_flag() {
        let result = StageResult::degraded(
            "script",
            date("2024-05-01"),
            ArtifactRef::new(
                date("2024-05-01"),
                ArtifactKind::Script,
                PathBuf::from("s.md"),
                true,
            ),
        );
        let row = LedgerRow::from_result(Uuid::new_v4(), &result);
        assert!(row.placeholder);
        assert_eq!(row.status, StageStatus::Degraded);
    }
}
