//! Shared fixtures: a deterministic keyword embedder, a scripted
//! generator, and a config builder, so pipeline tests run without any
//! network.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;

use faqdesk::config::Config;
use faqdesk::embedding::Embedder;
use faqdesk::generate::{Generator, PromptMessage};

pub const FAQ_DOCUMENT: &str = "Q: How do I enrol?\nA: Apply online.\nQ: What are the fees?\nA: See the fee schedule.";

/// Embeds text as presence flags for a fixed keyword set. Texts sharing
/// keywords score high; disjoint texts score zero. Deterministic.
pub struct KeywordEmbedder;

pub fn keyword_vec(text: &str) -> Vec<f32> {
    let lower = text.to_lowercase();
    ["enrol", "fee", "weather", "parking"]
        .iter()
        .map(|kw| if lower.contains(kw) { 1.0 } else { 0.0 })
        .collect()
}

#[async_trait]
impl Embedder for KeywordEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| keyword_vec(t)).collect())
    }
}

/// Returns a canned reply and counts invocations.
pub struct ScriptedGenerator {
    pub reply: String,
    pub calls: AtomicUsize,
    pub prompts: Mutex<Vec<Vec<PromptMessage>>>,
}

impl ScriptedGenerator {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Generator for ScriptedGenerator {
    async fn complete(&self, messages: &[PromptMessage]) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(messages.to_vec());
        Ok(self.reply.clone())
    }
}

/// Always errors, standing in for a provider outage.
pub struct FailingGenerator;

#[async_trait]
impl Generator for FailingGenerator {
    async fn complete(&self, _messages: &[PromptMessage]) -> Result<String> {
        Err(anyhow::anyhow!("provider unavailable"))
    }
}

pub fn test_config() -> Config {
    let toml = r#"
[source]
url = "https://example.com/faqs/"

[embedding]
model = "stub"

[generation]
model = "stub"
fallback_message = "Apologies, but that's outside my current area of expertise."
greeting = "Hello, I am a bot. How can I help you?"

[server]
bind = "127.0.0.1:0"

[vocabulary]
words = ["enrolment", "fees", "schedule", "deadline"]
"#;
    toml::from_str(toml).expect("test config must parse")
}
