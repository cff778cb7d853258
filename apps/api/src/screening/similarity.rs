//! Similarity Scorer: embedding cosine between a resume and a posting description.

use std::sync::Arc;

use crate::embedding::{cosine_similarity, Embedder, EmbeddingError};

/// Wraps the embedding oracle so resume and postings land in the same space.
#[derive(Clone)]
pub struct SimilarityScorer {
    embedder: Arc<dyn Embedder>,
}

impl SimilarityScorer {
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self { embedder }
    }

    pub async fn embed_resume(&self, resume_context: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.embedder.embed(resume_context).await
    }

    /// Scores a description against a precomputed resume embedding.
    ///
    /// Missing or blank text scores exactly 0.0 and never reaches the oracle.
    /// Oracle failures are returned unchanged; there is no retry.
    pub async fn score(
        &self,
        resume_embedding: &[f32],
        description: Option<&str>,
    ) -> Result<f64, EmbeddingError> {
        let Some(description) = description.filter(|d| !d.trim().is_empty()) else {
            return Ok(0.0);
        };
        let posting_embedding = self.embedder.embed(description).await?;
        cosine_similarity(resume_embedding, &posting_embedding)
    }
}
