use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub source: SourceConfig,
    #[serde(default)]
    pub chunking: ChunkingConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    pub embedding: EmbeddingConfig,
    pub generation: GenerationConfig,
    pub server: ServerConfig,
    #[serde(default)]
    pub vocabulary: VocabularyConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SourceConfig {
    /// URL of the FAQ page ingested at startup.
    pub url: String,
    #[serde(default = "default_fetch_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_fetch_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChunkingConfig {
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,
    #[serde(default = "default_overlap_chars")]
    pub overlap_chars: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_chars: default_max_chars(),
            overlap_chars: default_overlap_chars(),
        }
    }
}

fn default_max_chars() -> usize {
    1000
}
fn default_overlap_chars() -> usize {
    200
}

#[derive(Debug, Deserialize, Clone)]
pub struct RetrievalConfig {
    /// Minimum similarity for a query to count as in-scope at all.
    #[serde(default = "default_scope_threshold")]
    pub scope_threshold: f32,
    /// Minimum similarity for the single chunk mined for follow-up questions.
    #[serde(default = "default_top_match_threshold")]
    pub top_match_threshold: f32,
    /// How many chunks are stuffed into the answer prompt.
    #[serde(default = "default_context_limit")]
    pub context_limit: usize,
    /// How many follow-up questions a turn may return.
    #[serde(default = "default_suggestion_count")]
    pub suggestion_count: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            scope_threshold: default_scope_threshold(),
            top_match_threshold: default_top_match_threshold(),
            context_limit: default_context_limit(),
            suggestion_count: default_suggestion_count(),
        }
    }
}

fn default_scope_threshold() -> f32 {
    0.6
}
fn default_top_match_threshold() -> f32 {
    0.7
}
fn default_context_limit() -> usize {
    4
}
fn default_suggestion_count() -> usize {
    3
}

#[derive(Debug, Deserialize, Clone)]
pub struct EmbeddingConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    pub model: String,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GenerationConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    pub model: String,
    /// Returned verbatim when the answer is not derivable from context.
    /// The source variants disagree on the wording, so it is config, not code.
    #[serde(default = "default_fallback_message")]
    pub fallback_message: String,
    /// Seed message the conversation log starts with.
    #[serde(default = "default_greeting")]
    pub greeting: String,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_base() -> String {
    "https://api.openai.com/v1".to_string()
}
fn default_batch_size() -> usize {
    64
}
fn default_max_retries() -> u32 {
    5
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_fallback_message() -> String {
    "Apologies, but that's outside my current area of expertise.".to_string()
}
fn default_greeting() -> String {
    "Hello, I am a bot. How can I help you?".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub bind: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct VocabularyConfig {
    /// Static word list served by the lexical suggestion endpoint.
    #[serde(default)]
    pub words: Vec<String>,
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    if config.source.url.is_empty() {
        anyhow::bail!("source.url must not be empty");
    }

    if config.chunking.max_chars == 0 {
        anyhow::bail!("chunking.max_chars must be > 0");
    }
    if config.chunking.overlap_chars >= config.chunking.max_chars {
        anyhow::bail!("chunking.overlap_chars must be < chunking.max_chars");
    }

    for (name, value) in [
        ("retrieval.scope_threshold", config.retrieval.scope_threshold),
        (
            "retrieval.top_match_threshold",
            config.retrieval.top_match_threshold,
        ),
    ] {
        if !(0.0..=1.0).contains(&value) {
            anyhow::bail!("{} must be in [0.0, 1.0]", name);
        }
    }

    if config.retrieval.context_limit == 0 {
        anyhow::bail!("retrieval.context_limit must be >= 1");
    }

    if config.embedding.model.is_empty() {
        anyhow::bail!("embedding.model must not be empty");
    }
    if config.generation.model.is_empty() {
        anyhow::bail!("generation.model must not be empty");
    }

    Ok(config)
}
