//! Sender to chat assignment.
//!
//! Each partner owns exactly one chat. The assistant identity takes part in
//! both, and the export gives no per-message signal of which conversation a
//! line came from, so its messages are assigned by position: lines up to
//! `shared_boundary_line` belong to the first partner's chat, later lines to
//! the second. Re-exporting with different line counts moves the boundary and
//! must be reflected in the config.

use crate::config::IdentityConfig;
use crate::export::ChatId;
use crate::pipeline::Role;

/// Resolves senders to chats and roles.
#[derive(Debug, Clone)]
pub struct IdentityResolver {
    assistant: String,
    partners: Vec<(String, ChatId)>,
    shared_boundary_line: usize,
    duplicate_region_start: Option<usize>,
}

impl IdentityResolver {
    pub fn new(config: &IdentityConfig) -> Self {
        Self {
            assistant: config.assistant.clone(),
            partners: config
                .partners
                .iter()
                .map(|p| (p.sender.clone(), ChatId::new(p.chat_id.clone())))
                .collect(),
            shared_boundary_line: config.shared_boundary_line,
            duplicate_region_start: config.duplicate_region_start,
        }
    }

    /// The sender name whose turns are assistant turns.
    pub fn assistant(&self) -> &str {
        &self.assistant
    }

    /// Which chat a message from `sender` on `line` belongs to.
    pub fn chat_for(&self, sender: &str, line: usize) -> ChatId {
        if let Some((_, chat)) = self.partners.iter().find(|(name, _)| name == sender) {
            return chat.clone();
        }
        if sender != self.assistant {
            return ChatId::unknown();
        }
        match self.partners.as_slice() {
            [] => ChatId::unknown(),
            [(_, only)] => only.clone(),
            [(_, first), (_, second), ..] => {
                if line <= self.shared_boundary_line {
                    first.clone()
                } else {
                    second.clone()
                }
            }
        }
    }

    /// Whether `line` lies in the re-exported region.
    pub fn in_duplicate_region(&self, line: usize) -> bool {
        self.duplicate_region_start
            .is_some_and(|start| line >= start)
    }

    pub fn role_of(&self, sender: &str) -> Role {
        if sender == self.assistant {
            Role::Assistant
        } else {
            Role::User
        }
    }
}
