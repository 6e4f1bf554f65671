//! Burst merging.
//!
//! People text in bursts: several short messages in a row that together form
//! one utterance. Consecutive messages from the same sender close together in
//! time are folded into a single [`Turn`].

use chrono::Duration;

use crate::export::{IdentityResolver, ParsedMessage};
use crate::pipeline::Turn;

/// Merges a session's messages into turns.
#[derive(Debug, Clone)]
pub struct BurstMerger<'r> {
    window: Duration,
    resolver: &'r IdentityResolver,
}

impl<'r> BurstMerger<'r> {
    /// Messages join the current turn while the sender is unchanged and the gap
    /// to the turn's last message is at most `window`.
    pub fn new(window: Duration, resolver: &'r IdentityResolver) -> Self {
        Self { window, resolver }
    }

    pub fn merge(&self, messages: &[ParsedMessage]) -> Vec<Turn> {
        let mut turns: Vec<Turn> = Vec::new();

        for message in messages {
            if let Some(turn) = turns.last_mut() {
                let same_sender = turn.sender == message.sender;
                let within_window = message.timestamp - turn.last_timestamp <= self.window;
                if same_sender && within_window {
                    turn.parts.push(message.text.clone());
                    turn.last_timestamp = message.timestamp;
                    continue;
                }
            }
            turns.push(Turn::from_message(
                message,
                self.resolver.role_of(&message.sender),
            ));
        }

        turns
    }
}
