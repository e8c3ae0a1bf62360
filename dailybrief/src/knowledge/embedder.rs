//! Text embedding for the knowledge index.

use sha2::{Digest, Sha256};
use std::fmt::Debug;

/// Computes fixed-dimension embedding vectors for artifact text.
pub trait Embedder: Send + Sync + Debug {
    /// Embeds a text into a vector of [`dimensions`](Self::dimensions) length.
    fn embed(&self, text: &str) -> Vec<f32>;

    /// The fixed output dimensionality.
    fn dimensions(&self) -> usize;
}

/// Deterministic feature-hashing embedder.
///
/// Tokens are hashed into a fixed number of buckets with a sign bit, and the
/// result is L2-normalized. Not a learned model, but deterministic and
/// dependency-free: identical text always maps to the identical vector, which
/// is what the idempotent-ingestion contract needs. The default dimensionality
/// matches the 384-dim sentence embeddings the system originally ran with, so
/// a learned [`Embedder`] can be swapped in without a schema change.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dimensions: usize,
}

impl HashEmbedder {
    /// Creates an embedder with the given dimensionality.
    #[must_use]
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
        }
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(384)
    }
}

impl Embedder for HashEmbedder {
    fn embed(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimensions];

        for token in text
            .to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| t.len() > 1)
        {
            let digest = Sha256::digest(token.as_bytes());
            let mut hash_bytes = [0u8; 8];
            hash_bytes.copy_from_slice(&digest[..8]);
            let hash = u64::from_le_bytes(hash_bytes);

            let bucket = usize::try_from(hash % self.dimensions as u64).unwrap_or(0);
            let sign = if digest[8] & 1 == 0 { 1.0 } else { -1.0 };
            vector[bucket] += sign;
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }
        vector
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

/// Cosine similarity between two vectors of equal length.
///
/// Returns 0.0 for mismatched lengths or zero vectors.
#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|v| v * v).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}
