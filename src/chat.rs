use chrono::NaiveTime;
use tracing::debug;

use crate::model::{ChatMessage, Participant};

/// Append-only team chat.
#[derive(Debug, Clone)]
pub struct ChatLog {
    messages: Vec<ChatMessage>,
    next_id: u64,
}

impl Default for ChatLog {
    fn default() -> Self {
        Self { messages: Vec::new(), next_id: 1 }
    }
}

impl ChatLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from existing history. New ids continue after the largest seeded id.
    pub fn with_history(messages: Vec<ChatMessage>) -> Self {
        let next_id = messages.iter().map(|m| m.id).max().map_or(1, |id| id + 1);
        Self { messages, next_id }
    }

    /// Append a message sent at local time `at`. Whitespace-only text is
    /// rejected and `None` is returned.
    pub fn send(&mut self, author: Participant, text: &str, at: NaiveTime) -> Option<&ChatMessage> {
        if text.trim().is_empty() {
            debug!("Ignoring empty chat message");
            return None;
        }

        let message = ChatMessage {
            id: self.next_id,
            author,
            text: text.to_string(),
            time: at.format("%H:%M").to_string(),
        };
        self.next_id += 1;
        debug!(id = message.id, author = %message.author, "Chat message appended");
        self.messages.push(message);
        self.messages.last()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
