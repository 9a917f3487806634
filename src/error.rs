//! Error taxonomy for the FAQ pipeline.
//!
//! Two failure classes with different blast radii:
//!
//! - [`IngestionError`] — startup-fatal. The process must not start
//!   serving traffic without a populated index.
//! - [`GenerationError`] — per-request. The HTTP layer degrades to the
//!   configured fallback answer or a JSON error body; raw provider
//!   errors are never surfaced to the client.

use thiserror::Error;

/// Failures while building the embedding index at startup.
#[derive(Debug, Error)]
pub enum IngestionError {
    /// The source page could not be fetched or returned a non-success status.
    #[error("failed to fetch source document: {0:#}")]
    Fetch(anyhow::Error),

    /// The fetched page produced no indexable text.
    #[error("source document is empty after extraction")]
    EmptyDocument,

    /// The embedding provider failed while indexing chunks.
    #[error("failed to embed document chunks: {0:#}")]
    Embedding(anyhow::Error),
}

/// Failures while answering a single request.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The generative text service was unavailable or returned an error.
    #[error("generation service error: {0:#}")]
    Provider(anyhow::Error),

    /// Embedding or index lookup failed during retrieval.
    #[error("retrieval error: {0:#}")]
    Retrieval(anyhow::Error),
}
