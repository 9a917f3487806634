//! Context-bound answer generation.
//!
//! Two generator calls per answered turn at most: an optional
//! history-aware rewrite of the query into a standalone search query,
//! then the answer itself under a system instruction that confines the
//! model to the retrieved context. Scope enforcement proper happens
//! before this module runs; the instruction-level confinement here is a
//! second line of defense, and the fallback wording is configuration.

use anyhow::Result;
use async_trait::async_trait;

use crate::config::{GenerationConfig, RetrievalConfig};
use crate::embedding::Embedder;
use crate::error::GenerationError;
use crate::index::EmbeddingIndex;
use crate::models::{ChatMessage, Role};
use crate::provider::ProviderClient;

/// One message in a chat completion prompt.
#[derive(Debug, Clone)]
pub struct PromptMessage {
    pub role: String,
    pub content: String,
}

impl PromptMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Trait for generative text backends.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Run one chat completion and return the generated text.
    async fn complete(&self, messages: &[PromptMessage]) -> Result<String>;
}

/// Chat completion client for OpenAI-compatible APIs.
pub struct OpenAiGenerator {
    client: ProviderClient,
    model: String,
}

impl OpenAiGenerator {
    /// Create a generator reading the API key from `OPENAI_API_KEY`.
    pub fn new(config: &GenerationConfig) -> Result<Self> {
        let client =
            ProviderClient::from_env(&config.api_base, config.timeout_secs, config.max_retries)?;
        Ok(Self {
            client,
            model: config.model.clone(),
        })
    }

    /// Create a generator with an explicit API key (used by tests).
    pub fn with_api_key(config: &GenerationConfig, api_key: &str) -> Result<Self> {
        let client = ProviderClient::new(
            &config.api_base,
            api_key,
            config.timeout_secs,
            config.max_retries,
        )?;
        Ok(Self {
            client,
            model: config.model.clone(),
        })
    }
}

#[async_trait]
impl Generator for OpenAiGenerator {
    async fn complete(&self, messages: &[PromptMessage]) -> Result<String> {
        let body = serde_json::json!({
            "model": self.model,
            "temperature": 0,
            "messages": messages
                .iter()
                .map(|m| serde_json::json!({ "role": m.role, "content": m.content }))
                .collect::<Vec<_>>(),
        });
        let json = self.client.post_json("/chat/completions", &body).await?;
        json.get("choices")
            .and_then(|c| c.as_array())
            .and_then(|c| c.first())
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .map(|s| s.trim().to_string())
            .ok_or_else(|| anyhow::anyhow!("Invalid chat completion response: missing content"))
    }
}

/// Map log roles onto chat completion roles.
fn history_messages(history: &[ChatMessage]) -> Vec<PromptMessage> {
    history
        .iter()
        .map(|m| PromptMessage {
            role: match m.role {
                Role::Human => "user".to_string(),
                Role::Assistant => "assistant".to_string(),
            },
            content: m.content.clone(),
        })
        .collect()
}

/// Rewrite a follow-up query into a standalone search query using the
/// conversation so far. Skipped (returns the query as-is) when the log
/// holds nothing beyond the seed greeting, since there is no context to
/// resolve against.
pub async fn condense_query(
    generator: &dyn Generator,
    history: &[ChatMessage],
    query: &str,
) -> Result<String> {
    if history.len() <= 1 {
        return Ok(query.to_string());
    }

    let mut messages = history_messages(history);
    messages.push(PromptMessage::user(query));
    messages.push(PromptMessage::user(
        "Given the above conversation, generate a search query to look up \
         in order to get information relevant to the conversation",
    ));

    let condensed = generator.complete(&messages).await?;
    if condensed.is_empty() {
        return Ok(query.to_string());
    }
    Ok(condensed)
}

/// Build the answer prompt: strict context confinement, then the
/// conversation, then the current question.
fn answer_prompt(
    context: &str,
    fallback: &str,
    history: &[ChatMessage],
    query: &str,
) -> Vec<PromptMessage> {
    let system = format!(
        "Given the dataset provided and the below context:\n\n{context}\n\n\
         generate responses exclusively from the information within the dataset. \
         Ignore any external sources or internet data. \
         If the answer cannot be found, respond with \"{fallback}\"."
    );

    let mut messages = vec![PromptMessage::system(system)];
    messages.extend(history_messages(history));
    messages.push(PromptMessage::user(query));
    messages
}

/// Answer an in-scope query: condense, retrieve, generate.
///
/// Does not mutate the conversation log; the caller appends the turn.
pub async fn answer_question(
    generator: &dyn Generator,
    embedder: &dyn Embedder,
    index: &EmbeddingIndex,
    history: &[ChatMessage],
    query: &str,
    retrieval: &RetrievalConfig,
    generation: &GenerationConfig,
) -> Result<String, GenerationError> {
    let condensed = condense_query(generator, history, query)
        .await
        .map_err(GenerationError::Provider)?;

    let hits = index
        .search(
            embedder,
            &condensed,
            retrieval.scope_threshold,
            retrieval.context_limit,
        )
        .await
        .map_err(GenerationError::Retrieval)?;

    let context = hits
        .iter()
        .map(|sc| sc.chunk.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");

    let messages = answer_prompt(&context, &generation.fallback_message, history, query);
    generator
        .complete(&messages)
        .await
        .map_err(GenerationError::Provider)
}
