//! Binary in-scope / out-of-scope gate.
//!
//! A query is in scope iff at least one indexed chunk clears the
//! configured scope threshold. No graded confidence is surfaced; the
//! caller either proceeds to generation or replies with the fallback.

use anyhow::Result;

use crate::embedding::Embedder;
use crate::index::EmbeddingIndex;

/// True iff any indexed chunk scores at least `threshold` against the
/// query. An empty query is not special-cased; it simply scores low
/// everywhere and classifies out of scope.
pub async fn is_in_scope(
    index: &EmbeddingIndex,
    embedder: &dyn Embedder,
    query: &str,
    threshold: f32,
) -> Result<bool> {
    let hits = index.search(embedder, query, threshold, usize::MAX).await?;
    Ok(!hits.is_empty())
}
