//! In-memory embedding index.
//!
//! Holds one embedding vector per document chunk and answers similarity
//! queries by brute-force cosine over all stored vectors. Built once at
//! startup and shared read-only across request tasks, so no interior
//! locking is needed.
//!
//! The broad scope check (low threshold, unbounded results) and the
//! top-match lookup (high threshold, single result) are both
//! parameterizations of [`EmbeddingIndex::search`].

use anyhow::Result;

use crate::embedding::{cosine_similarity, Embedder};
use crate::models::{DocumentChunk, ScoredChunk};

#[derive(Debug)]
pub struct EmbeddingIndex {
    entries: Vec<(DocumentChunk, Vec<f32>)>,
}

impl EmbeddingIndex {
    /// Embed every chunk and store the pairs. Chunk order is preserved,
    /// which keeps tie-broken search results deterministic.
    pub async fn build(embedder: &dyn Embedder, chunks: Vec<DocumentChunk>) -> Result<Self> {
        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let vectors = embedder.embed(&texts).await?;

        if vectors.len() != chunks.len() {
            anyhow::bail!(
                "embedder returned {} vectors for {} chunks",
                vectors.len(),
                chunks.len()
            );
        }

        Ok(Self {
            entries: chunks.into_iter().zip(vectors).collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Embed the query and return chunks scoring at least `min_score`,
    /// sorted descending, truncated to `limit`.
    pub async fn search(
        &self,
        embedder: &dyn Embedder,
        query: &str,
        min_score: f32,
        limit: usize,
    ) -> Result<Vec<ScoredChunk>> {
        let vectors = embedder.embed(&[query.to_string()]).await?;
        let query_vec = vectors
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("empty embedding response for query"))?;
        Ok(self.search_vector(&query_vec, min_score, limit))
    }

    /// Score all entries against an already-embedded query vector.
    pub fn search_vector(&self, query_vec: &[f32], min_score: f32, limit: usize) -> Vec<ScoredChunk> {
        let mut results: Vec<ScoredChunk> = self
            .entries
            .iter()
            .map(|(chunk, vec)| ScoredChunk {
                chunk: chunk.clone(),
                score: cosine_similarity(query_vec, vec),
            })
            .filter(|sc| sc.score >= min_score)
            .collect();

        // Stable sort: equal scores keep chunk order.
        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(limit);
        results
    }
}
