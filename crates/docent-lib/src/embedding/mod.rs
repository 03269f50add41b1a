pub mod embedder;

use crate::error::{RagError, Result};

/// Maps text to fixed-dimension vectors.
///
/// `&mut self` because local ONNX sessions need exclusive access while running.
pub trait EmbeddingProvider {
    /// Embed a batch of passages for indexing.
    fn embed_documents(&mut self, texts: &[&str]) -> Result<Vec<Vec<f32>>>;

    /// Embed a single search query.
    fn embed_query(&mut self, text: &str) -> Result<Vec<f32>> {
        self.embed_documents(&[text])?
            .into_iter()
            .next()
            .ok_or_else(|| RagError::Embedding("provider returned no vector".to_string()))
    }

    /// Length of every vector this provider produces.
    fn dimension(&self) -> usize;
}

/// Reject a batch whose shape does not match the request.
///
/// Called on every provider response so a misconfigured model surfaces as an
/// error instead of being truncated or padded downstream.
pub fn check_batch(vectors: &[Vec<f32>], expected_count: usize, dimension: usize) -> Result<()> {
    if vectors.len() != expected_count {
        return Err(RagError::Embedding(format!(
            "expected {expected_count} vectors, provider returned {}",
            vectors.len()
        )));
    }
    if let Some(bad) = vectors.iter().find(|v| v.len() != dimension) {
        return Err(RagError::DimensionMismatch {
            expected: dimension,
            actual: bad.len(),
        });
    }
    Ok(())
}
