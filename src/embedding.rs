//! Embedding provider abstraction.
//!
//! Defines the [`Embedder`] trait and the [`OpenAiEmbedder`]
//! implementation calling `POST {api_base}/embeddings`. The trait seam
//! lets tests substitute a deterministic embedder so the retrieval
//! pipeline can run without a network.
//!
//! Also hosts [`cosine_similarity`], the metric used for both the scope
//! gate and top-match retrieval.

use anyhow::Result;
use async_trait::async_trait;

use crate::config::EmbeddingConfig;
use crate::provider::ProviderClient;

/// Trait for embedding backends.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a batch of texts, returning one vector per input in order.
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}

/// Embedding client for OpenAI-compatible APIs.
pub struct OpenAiEmbedder {
    client: ProviderClient,
    model: String,
    batch_size: usize,
}

impl OpenAiEmbedder {
    /// Create an embedder reading the API key from `OPENAI_API_KEY`.
    pub fn new(config: &EmbeddingConfig) -> Result<Self> {
        let client =
            ProviderClient::from_env(&config.api_base, config.timeout_secs, config.max_retries)?;
        Ok(Self {
            client,
            model: config.model.clone(),
            batch_size: config.batch_size,
        })
    }

    /// Create an embedder with an explicit API key (used by tests).
    pub fn with_api_key(config: &EmbeddingConfig, api_key: &str) -> Result<Self> {
        let client = ProviderClient::new(
            &config.api_base,
            api_key,
            config.timeout_secs,
            config.max_retries,
        )?;
        Ok(Self {
            client,
            model: config.model.clone(),
            batch_size: config.batch_size,
        })
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let body = serde_json::json!({
            "model": self.model,
            "input": texts,
        });
        let json = self.client.post_json("/embeddings", &body).await?;
        parse_embeddings_response(&json, texts.len())
    }
}

#[async_trait]
impl Embedder for OpenAiEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut out = Vec::with_capacity(texts.len());
        for batch in texts.chunks(self.batch_size.max(1)) {
            out.extend(self.embed_batch(batch).await?);
        }
        Ok(out)
    }
}

/// Parse the embeddings API response, restoring input order via the
/// `index` field.
fn parse_embeddings_response(json: &serde_json::Value, expected: usize) -> Result<Vec<Vec<f32>>> {
    let data = json
        .get("data")
        .and_then(|d| d.as_array())
        .ok_or_else(|| anyhow::anyhow!("Invalid embeddings response: missing data array"))?;

    if data.len() != expected {
        anyhow::bail!(
            "Invalid embeddings response: expected {} vectors, got {}",
            expected,
            data.len()
        );
    }

    let mut indexed = Vec::with_capacity(data.len());
    for (pos, item) in data.iter().enumerate() {
        let index = item
            .get("index")
            .and_then(|i| i.as_u64())
            .unwrap_or(pos as u64) as usize;
        let embedding = item
            .get("embedding")
            .and_then(|e| e.as_array())
            .ok_or_else(|| anyhow::anyhow!("Invalid embeddings response: missing embedding"))?;
        let vec: Vec<f32> = embedding
            .iter()
            .map(|v| v.as_f64().unwrap_or(0.0) as f32)
            .collect();
        indexed.push((index, vec));
    }

    indexed.sort_by_key(|(index, _)| *index);
    Ok(indexed.into_iter().map(|(_, vec)| vec).collect())
}

/// Compute cosine similarity between two embedding vectors.
///
/// Returns `0.0` for empty vectors or vectors of different lengths.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;

    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom < f32::EPSILON {
        return 0.0;
    }

    dot / denom
}
