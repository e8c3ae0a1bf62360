//! The searchable knowledge index with idempotent ingestion.

use super::{cosine_similarity, Embedder};
use crate::core::{ArtifactKind, RunDate};
use crate::errors::KnowledgeError;
use dashmap::DashMap;
use hex::ToHex;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const EXCERPT_LEN: usize = 400;

/// An indexed representation of one artifact's text content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    /// The run date of the source artifact.
    pub run_date: RunDate,

    /// The kind of the source artifact.
    pub kind: ArtifactKind,

    /// Where the source artifact lives on disk.
    pub source_path: PathBuf,

    /// Leading excerpt of the indexed text, for display in trend context.
    pub excerpt: String,

    /// sha256 of the full indexed text.
    pub content_sha: String,

    /// The embedding vector.
    pub embedding: Vec<f32>,

    /// When the entry was (re)ingested (ISO 8601).
    pub created_at: String,
}

/// A search hit with its similarity score.
#[derive(Debug, Clone)]
pub struct ScoredEntry {
    /// The matched entry.
    pub entry: KnowledgeEntry,
    /// Cosine similarity against the query, higher is more similar.
    pub score: f32,
}

/// Content-addressed knowledge store over ingested artifacts.
///
/// Keyed by `(RunDate, kind)`: a rerun that overwrites an artifact in place
/// replaces its entry rather than duplicating it. Entries accumulate across
/// runs indefinitely; no operation deletes another run's entries.
#[derive(Debug)]
pub struct KnowledgeIndex {
    embedder: Arc<dyn Embedder>,
    entries: DashMap<(RunDate, ArtifactKind), KnowledgeEntry>,
    log: Option<Mutex<LogWriter>>,
}

#[derive(Debug)]
struct LogWriter {
    path: PathBuf,
}

impl LogWriter {
    fn append(&self, entry: &KnowledgeEntry) -> Result<(), KnowledgeError> {
        let line = serde_json::to_string(entry)?;
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{line}")?;
        Ok(())
    }
}

impl KnowledgeIndex {
    /// Creates an index with no durability; entries live for the process.
    #[must_use]
    pub fn in_memory(embedder: Arc<dyn Embedder>) -> Self {
        Self {
            embedder,
            entries: DashMap::new(),
            log: None,
        }
    }

    /// Creates an index backed by a JSONL append log.
    ///
    /// An existing log is replayed on load; later lines for the same
    /// `(RunDate, kind)` key win, which is how replacement survives the
    /// append-only file format.
    pub fn with_log(
        embedder: Arc<dyn Embedder>,
        path: impl Into<PathBuf>,
    ) -> Result<Self, KnowledgeError> {
        let path = path.into();
        let entries = DashMap::new();

        match std::fs::read_to_string(&path) {
            Ok(contents) => {
                for line in contents.lines().filter(|l| !l.trim().is_empty()) {
                    let entry: KnowledgeEntry = serde_json::from_str(line)?;
                    entries.insert((entry.run_date, entry.kind), entry);
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(KnowledgeError::Io(e)),
        }

        Ok(Self {
            embedder,
            entries,
            log: Some(Mutex::new(LogWriter { path })),
        })
    }

    /// Ingests an artifact's text, replacing any prior entry for the same
    /// `(RunDate, kind)` key.
    pub fn ingest(
        &self,
        run_date: RunDate,
        kind: ArtifactKind,
        text: &str,
        source_path: &Path,
    ) -> Result<KnowledgeEntry, KnowledgeError> {
        let entry = KnowledgeEntry {
            run_date,
            kind,
            source_path: source_path.to_path_buf(),
            excerpt: excerpt_of(text),
            content_sha: Sha256::digest(text.as_bytes()).encode_hex(),
            embedding: self.embedder.embed(text),
            created_at: crate::utils::iso_timestamp(),
        };

        if let Some(log) = &self.log {
            log.lock().append(&entry)?;
        }
        self.entries.insert((run_date, kind), entry.clone());

        tracing::debug!(run_date = %run_date, kind = %kind, "artifact ingested into knowledge index");
        Ok(entry)
    }

    /// Returns up to `k` entries ordered by similarity to the query, most
    /// similar first. Ties break on `(RunDate, kind)` for determinism.
    #[must_use]
    pub fn search(&self, query: &str, k: usize) -> Vec<ScoredEntry> {
        let query_vec = self.embedder.embed(query);
        let mut scored: Vec<ScoredEntry> = self
            .entries
            .iter()
            .map(|item| ScoredEntry {
                score: cosine_similarity(&query_vec, &item.value().embedding),
                entry: item.value().clone(),
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| (a.entry.run_date, a.entry.kind.to_string())
                    .cmp(&(b.entry.run_date, b.entry.kind.to_string())))
        });
        scored.truncate(k);
        scored
    }

    /// Returns the entry for a key, if ingested.
    #[must_use]
    pub fn entry(&self, run_date: RunDate, kind: ArtifactKind) -> Option<KnowledgeEntry> {
        self.entries.get(&(run_date, kind)).map(|e| e.clone())
    }

    /// Number of distinct `(RunDate, kind)` keys indexed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing has been ingested.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn excerpt_of(text: &str) -> String {
    if text.len() <= EXCERPT_LEN {
        return text.to_string();
    }
    let mut end = EXCERPT_LEN;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    text[..end].to_string()
}
