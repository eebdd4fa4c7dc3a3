//! Semantic embedder (C1).
//!
//! Maps text to a fixed-dimension unit-norm vector and exposes cosine
//! similarity, clamped to `[0, 1]` since only positive semantic
//! relatedness is meaningful for scoring.
//!
//! The default implementation is a deterministic, offline feature-hashing
//! embedding rather than a loaded neural model: this keeps the crate free
//! of a model-runtime dependency while satisfying every property the
//! contract requires (determinism, symmetry, similarity 1.0 on identical
//! input). `SemanticEmbedder` is a trait so a real sentence-transformer
//! binding can be substituted without touching the assessor.

use sha2::{Digest, Sha256};

/// Embedding dimensionality (D ≈ 384, matching common sentence-embedding models).
pub const EMBEDDING_DIM: usize = 384;

/// Strategy for mapping text to a semantic vector.
pub trait SemanticEmbedder {
    /// Embed `text` into a unit-norm vector of length `EMBEDDING_DIM`.
    /// Never panics; returns a zero vector if embedding cannot proceed.
    fn embed(&self, text: &str) -> Vec<f32>;

    /// Cosine similarity between two embeddings, clamped to `[0, 1]`.
    /// Negative cosines floor to 0.
    fn similarity(&self, a: &str, b: &str) -> f32 {
        let va = self.embed(a);
        let vb = self.embed(b);
        cosine_similarity(&va, &vb)
    }
}

/// Cosine similarity between two equal-length vectors, clamped to `[0, 1]`.
/// Returns 0.0 if either vector is zero-length or has zero norm.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a < 1e-9 || norm_b < 1e-9 {
        return 0.0;
    }
    (dot / (norm_a * norm_b)).clamp(0.0, 1.0)
}

/// Deterministic hashing-trick embedder: each token is SHA-256 hashed
/// into one of `EMBEDDING_DIM` buckets, accumulating `sqrt(term_frequency)`
/// (sublinear TF weighting), then the vector is L2-normalized.
#[derive(Debug, Default, Clone, Copy)]
pub struct HashingEmbedder;

impl HashingEmbedder {
    pub fn new() -> Self {
        Self
    }

    fn tokenize(text: &str) -> Vec<String> {
        text.to_lowercase()
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { ' ' })
            .collect::<String>()
            .split_whitespace()
            .map(|s| s.to_string())
            .collect()
    }

    fn bucket_for(token: &str) -> usize {
        let digest = Sha256::digest(token.as_bytes());
        let idx = u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]);
        (idx as usize) % EMBEDDING_DIM
    }
}

impl SemanticEmbedder for HashingEmbedder {
    fn embed(&self, text: &str) -> Vec<f32> {
        let tokens = Self::tokenize(text);
        if tokens.is_empty() {
            return vec![0.0; EMBEDDING_DIM];
        }

        let mut counts = vec![0u32; EMBEDDING_DIM];
        for token in &tokens {
            counts[Self::bucket_for(token)] += 1;
        }

        let mut vector: Vec<f32> = counts.iter().map(|&c| (c as f32).sqrt()).collect();
        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 1e-9 {
            for v in vector.iter_mut() {
                *v /= norm;
            }
        }
        vector
    }
}
