//! # Conversation Store
//!
//! File: cli/src/bot/conversation.rs
//!
//! ## Overview
//!
//! An ordered, append-only log of [`Message`]s. Insertion order is display
//! order. The only other mutation is [`ConversationLog::clear`], which empties
//! the log but leaves the id counter where it is, so ids stay unique for the
//! whole lifetime of the log.
//!
use serde::{Deserialize, Serialize};

/// Who wrote a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

/// One turn of the conversation. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: u64,
    pub sender: Sender,
    pub text: String,
}

/// The ordered history of messages in one session.
#[derive(Debug, Default)]
pub struct ConversationLog {
    messages: Vec<Message>,
    next_id: u64,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message with the next unused id and returns a copy of it.
    ///
    /// `text` is stored as given; rejecting blank input is the caller's job.
    pub fn append(&mut self, sender: Sender, text: impl Into<String>) -> Message {
        let message = Message {
            id: self.next_id,
            sender,
            text: text.into(),
        };
        self.next_id += 1;
        self.messages.push(message.clone());
        message
    }

    /// Empties the log. The id counter is not reset.
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// All messages in insertion order.
    pub fn all(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The id the next appended message will receive.
    pub fn next_id(&self) -> u64 {
        self.next_id
    }
}
