//! Append-only conversation log.
//!
//! One process-wide log, seeded with an assistant greeting. A turn is
//! exactly one Human message followed by one Assistant message, and the
//! pair is appended under a single lock acquisition so concurrent
//! requests can never persist a half-turn or interleave histories.
//! Messages are never edited or truncated.

use tokio::sync::Mutex;

use crate::models::ChatMessage;

pub struct ConversationLog {
    messages: Mutex<Vec<ChatMessage>>,
}

impl ConversationLog {
    /// Create a log seeded with the configured greeting.
    pub fn new(greeting: &str) -> Self {
        Self {
            messages: Mutex::new(vec![ChatMessage::assistant(greeting)]),
        }
    }

    /// Read-only snapshot in insertion order.
    pub async fn snapshot(&self) -> Vec<ChatMessage> {
        self.messages.lock().await.clone()
    }

    /// Append one full turn and return the updated snapshot.
    pub async fn append_turn(&self, human: &str, assistant: &str) -> Vec<ChatMessage> {
        let mut messages = self.messages.lock().await;
        messages.push(ChatMessage::human(human));
        messages.push(ChatMessage::assistant(assistant));
        messages.clone()
    }
}
