//! Startup ingestion pipeline.
//!
//! Fetch → extract → chunk → embed → index, run once before the server
//! binds. Any failure here is fatal: serving with an empty index would
//! classify every query out of scope and the bot would never answer.

use std::time::Duration;

use crate::chunk::split_text;
use crate::config::Config;
use crate::embedding::Embedder;
use crate::error::IngestionError;
use crate::fetch::{extract_text, fetch_document};
use crate::index::EmbeddingIndex;

/// Fetch the configured FAQ page and build the embedding index.
pub async fn build_index(
    config: &Config,
    embedder: &dyn Embedder,
) -> Result<EmbeddingIndex, IngestionError> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.source.timeout_secs))
        .build()
        .map_err(|e| IngestionError::Fetch(e.into()))?;

    tracing::info!(url = %config.source.url, "fetching source document");
    let html = fetch_document(&client, &config.source.url)
        .await
        .map_err(IngestionError::Fetch)?;

    let text = extract_text(&html);
    if text.is_empty() {
        return Err(IngestionError::EmptyDocument);
    }

    let chunks = split_text(
        &text,
        config.chunking.max_chars,
        config.chunking.overlap_chars,
    );
    if chunks.is_empty() {
        return Err(IngestionError::EmptyDocument);
    }

    tracing::info!(
        chunks = chunks.len(),
        chars = text.len(),
        "embedding document chunks"
    );
    let index = EmbeddingIndex::build(embedder, chunks)
        .await
        .map_err(IngestionError::Embedding)?;

    tracing::info!(entries = index.len(), "embedding index ready");
    Ok(index)
}
