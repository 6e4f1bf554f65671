//! Session segmentation by inactivity gap.

use chrono::Duration;

use crate::export::ParsedMessage;
use crate::pipeline::Session;

/// Splits one chat's time-ordered messages into sessions.
#[derive(Debug, Clone, Copy)]
pub struct Sessionizer {
    gap: Duration,
}

impl Sessionizer {
    /// A new session starts when two consecutive messages are more than `gap`
    /// apart. A gap of exactly `gap` stays in the same session.
    pub fn new(gap: Duration) -> Self {
        Self { gap }
    }

    pub fn split(&self, messages: Vec<ParsedMessage>) -> Vec<Session> {
        let mut sessions = Vec::new();
        let mut current: Vec<ParsedMessage> = Vec::new();

        for message in messages {
            if let Some(prev) = current.last() {
                if message.timestamp - prev.timestamp > self.gap {
                    sessions.push(Session {
                        messages: std::mem::take(&mut current),
                    });
                }
            }
            current.push(message);
        }

        if !current.is_empty() {
            sessions.push(Session { messages: current });
        }

        sessions
    }
}
