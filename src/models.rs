//! Core data models used throughout FAQ Desk.
//!
//! These types represent the document chunks, search results, and chat
//! messages that flow through the retrieval and answering pipeline.

use serde::{Deserialize, Serialize};

/// A bounded segment of the source document, indexed independently
/// for retrieval.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentChunk {
    /// Chunk text. Never empty.
    pub text: String,
    /// Byte offset of the chunk's start within the extracted source text.
    pub offset: usize,
}

/// A chunk returned from the index with its similarity score.
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    pub chunk: DocumentChunk,
    /// Cosine similarity against the query embedding. Roughly [0, 1]
    /// for natural-language embeddings; 1.0 = identical direction.
    pub score: f32,
}

/// Who authored a chat message.
///
/// Serialized as `"human"` / `"ai"` to match the wire format the
/// client expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "human")]
    Human,
    #[serde(rename = "ai")]
    Assistant,
}

/// One turn fragment in the conversation log. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(rename = "type")]
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn human(content: impl Into<String>) -> Self {
        Self {
            role: Role::Human,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}
