//! Embedding-based knowledge store over ingested artifacts.
//!
//! Every text artifact a stage writes is ingested here so later stages (trend
//! analysis in particular) can retrieve historical context semantically.
//! Entries are keyed by `(RunDate, kind)`: re-ingesting after a rerun replaces
//! the prior entry, and entries accumulate across runs with no eviction.

mod embedder;
mod index;

pub use embedder::{cosine_similarity, Embedder, HashEmbedder};
pub use index::{KnowledgeEntry, KnowledgeIndex, ScoredEntry};
