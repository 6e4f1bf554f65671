//! ChatML conversation records.
//!
//! Each session produces one sliding-window record per assistant turn (the
//! reply plus up to `window` turns before it) and then one record holding the
//! whole session.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::config::{Config, PartnerConfig};
use crate::export::ChatId;
use crate::pipeline::{Role, Turn};

/// Speaker of a ChatML message, including the system prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

impl From<Role> for ChatRole {
    fn from(role: Role) -> Self {
        match role {
            Role::User => ChatRole::User,
            Role::Assistant => ChatRole::Assistant,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl From<&Turn> for ChatMessage {
    fn from(turn: &Turn) -> Self {
        Self {
            role: turn.role.into(),
            content: turn.text(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationMetadata {
    pub chat_id: ChatId,
    pub partner: String,
    pub timestamp: NaiveDateTime,
    /// Turns in the session after burst merging.
    pub session_length: usize,
    /// Prior turns included before the reply; absent on full-session records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_depth: Option<usize>,
    /// `"full_session"` on whole-session records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

/// One line of `conversations.jsonl`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub messages: Vec<ChatMessage>,
    pub metadata: ConversationMetadata,
}

impl Conversation {
    pub const FULL_SESSION: &'static str = "full_session";

    pub fn is_full_session(&self) -> bool {
        self.metadata.format.as_deref() == Some(Self::FULL_SESSION)
    }
}

/// Renders sessions of one chat as ChatML records.
pub struct ConversationBuilder {
    chat_id: ChatId,
    partner: String,
    system_prompt: String,
    window: usize,
    min_turns: usize,
}

impl ConversationBuilder {
    /// Builder for `chat_id`, with the system prompt rendered for its partner.
    pub fn new(config: &Config, chat_id: &ChatId) -> Self {
        let partner = config
            .identities
            .partners
            .iter()
            .find(|p| p.chat_id == chat_id.as_str());
        let (partner_name, relationship) = match partner {
            Some(PartnerConfig {
                display_name,
                relationship,
                sender,
                ..
            }) => {
                let name = if display_name.is_empty() {
                    sender
                } else {
                    display_name
                };
                (name.clone(), relationship.clone())
            }
            None => ("Unknown".to_string(), "unknown".to_string()),
        };

        let system_prompt = config
            .output
            .system_prompt
            .replace("{assistant_name}", &config.identities.assistant_name)
            .replace("{partner_name}", &partner_name)
            .replace("{relationship_type}", &relationship);

        Self {
            chat_id: chat_id.clone(),
            partner: partner_name,
            system_prompt,
            window: config.extraction.conversation_window,
            min_turns: config.segmentation.min_session_messages,
        }
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    fn system_message(&self) -> ChatMessage {
        ChatMessage {
            role: ChatRole::System,
            content: self.system_prompt.clone(),
        }
    }

    fn metadata(&self, timestamp: NaiveDateTime, session_length: usize) -> ConversationMetadata {
        ConversationMetadata {
            chat_id: self.chat_id.clone(),
            partner: self.partner.clone(),
            timestamp,
            session_length,
            context_depth: None,
            format: None,
        }
    }

    /// Records for one session's turns. Sessions with too few turns, or where
    /// only one side speaks, yield nothing.
    pub fn build(&self, turns: &[Turn]) -> Vec<Conversation> {
        let Some(first) = turns.first() else {
            return Vec::new();
        };
        if turns.len() < self.min_turns
            || !turns.iter().any(|t| t.role == Role::Assistant)
            || !turns.iter().any(|t| t.role == Role::User)
        {
            return Vec::new();
        }

        let mut records = Vec::new();

        for (i, turn) in turns.iter().enumerate() {
            if !turn.is_assistant() {
                continue;
            }
            let window = &turns[i.saturating_sub(self.window)..i];
            if !window.iter().any(|t| t.role == Role::User) {
                continue;
            }

            let mut messages = Vec::with_capacity(window.len() + 2);
            messages.push(self.system_message());
            messages.extend(window.iter().map(ChatMessage::from));
            messages.push(ChatMessage::from(turn));

            let mut metadata = self.metadata(turn.timestamp, turns.len());
            metadata.context_depth = Some(window.len());
            records.push(Conversation { messages, metadata });
        }

        let mut messages = Vec::with_capacity(turns.len() + 1);
        messages.push(self.system_message());
        messages.extend(turns.iter().map(ChatMessage::from));
        let mut metadata = self.metadata(first.timestamp, turns.len());
        metadata.format = Some(Conversation::FULL_SESSION.to_string());
        records.push(Conversation { messages, metadata });

        records
    }
}
