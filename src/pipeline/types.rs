//! Records produced by the pipeline stages.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::export::{ChatId, ParsedMessage};

/// Token separating the messages of one burst inside a turn's text.
pub const BURST_TOKEN: &str = "[MSG_BREAK]";

/// [`BURST_TOKEN`] with the surrounding spaces used when joining.
pub const BURST_SEPARATOR: &str = " [MSG_BREAK] ";

/// Speaker role in a training record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A run of messages of one chat with no gap above the session threshold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub messages: Vec<ParsedMessage>,
}

impl Session {
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn start(&self) -> Option<NaiveDateTime> {
        self.messages.first().map(|m| m.timestamp)
    }
}

/// One logical utterance: consecutive same-sender messages of a burst.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub sender: String,
    pub role: Role,
    /// Timestamp of the first message.
    pub timestamp: NaiveDateTime,
    /// Timestamp of the last message.
    pub last_timestamp: NaiveDateTime,
    /// Texts of the constituent messages, in order.
    pub parts: Vec<String>,
}

impl Turn {
    pub fn from_message(message: &ParsedMessage, role: Role) -> Self {
        Self {
            sender: message.sender.clone(),
            role,
            timestamp: message.timestamp,
            last_timestamp: message.timestamp,
            parts: vec![message.text.clone()],
        }
    }

    /// Constituent texts joined with [`BURST_SEPARATOR`].
    pub fn text(&self) -> String {
        self.parts.join(BURST_SEPARATOR)
    }

    pub fn is_assistant(&self) -> bool {
        self.role == Role::Assistant
    }

    /// Split a joined turn text back into its messages.
    pub fn split(text: &str) -> Vec<&str> {
        text.split(BURST_SEPARATOR).collect()
    }
}

/// A role-tagged message in a context window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleMessage {
    pub role: Role,
    pub content: String,
}

impl From<&Turn> for RoleMessage {
    fn from(turn: &Turn) -> Self {
        Self {
            role: turn.role,
            content: turn.text(),
        }
    }
}

/// A (context → response) training pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
    /// Partner turns immediately before the response, burst-joined.
    pub context: String,
    /// The assistant turn.
    pub response: String,
    pub categories: Vec<String>,
    pub chat_id: ChatId,
    /// Timestamp of the response.
    pub timestamp: NaiveDateTime,
    /// Turns before the context run, oldest first.
    pub preceding_context: Vec<RoleMessage>,
    /// Number of partner turns in `context`.
    pub context_length: usize,
}
