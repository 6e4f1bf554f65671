//! Chat export ingestion.
//!
//! Turns the raw text of a chat export into an ordered list of
//! [`ParsedMessage`]s. The export is line oriented:
//!
//! ```text
//! 1/1/24, 9:00 AM - Sender: first line of a message
//! a continuation line of the same message
//! 1/1/24, 9:01 AM - Messages and calls are end-to-end encrypted.
//! ```
//!
//! # Module Structure
//!
//! - [`reconstructor`] - Line classification and the message state machine
//! - [`timestamp`] - Date/time parsing with format fallbacks
//! - [`filter`] - Non-content message detection
//! - [`identity`] - Sender to chat assignment

pub mod filter;
pub mod identity;
pub mod reconstructor;
pub mod timestamp;

use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{CorpusError, Result};

pub use filter::is_non_content;
pub use identity::IdentityResolver;
pub use reconstructor::{LineKind, ReconstructStats, Reconstructor};
pub use timestamp::parse_timestamp;

/// Number of leading characters of a message used in its dedup key.
pub const DEDUP_PREFIX_CHARS: usize = 100;

/// One input line with its 1-based line number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawLine<'a> {
    pub number: usize,
    pub text: &'a str,
}

/// Split export content into numbered lines.
pub fn raw_lines(content: &str) -> impl Iterator<Item = RawLine<'_>> {
    content.lines().enumerate().map(|(i, text)| RawLine {
        number: i + 1,
        text,
    })
}

/// Read an export file into memory.
///
/// A missing file is reported as [`CorpusError::InputNotFound`] so callers can
/// abort before any output is written.
pub fn read_export(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| {
        if source.kind() == ErrorKind::NotFound {
            CorpusError::InputNotFound {
                path: path.to_path_buf(),
            }
        } else {
            CorpusError::ReadInput {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}

/// Identifier of one reconstructed conversation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatId(String);

impl ChatId {
    pub const UNKNOWN: &'static str = "unknown";

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Chat for senders that are not a configured identity.
    pub fn unknown() -> Self {
        Self(Self::UNKNOWN.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_unknown(&self) -> bool {
        self.0 == Self::UNKNOWN
    }
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A reconstructed chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedMessage {
    pub timestamp: NaiveDateTime,
    pub sender: String,
    /// Message text; continuation lines are joined with `\n`.
    pub text: String,
    pub chat_id: ChatId,
    pub line_number: usize,
    /// Whether the message came from the re-exported region of the input.
    pub in_duplicate_region: bool,
}

/// Identity of a message for cross-export deduplication.
pub type DedupKey = (NaiveDateTime, String, String);

impl ParsedMessage {
    /// `(timestamp, sender, first 100 characters of text)`.
    ///
    /// Two different long messages sharing a timestamp, sender and prefix
    /// collapse to one key.
    pub fn dedup_key(&self) -> DedupKey {
        (
            self.timestamp,
            self.sender.clone(),
            self.text.chars().take(DEDUP_PREFIX_CHARS).collect(),
        )
    }

    /// Sort key giving the canonical output order.
    pub fn order_key(&self) -> (NaiveDateTime, usize) {
        (self.timestamp, self.line_number)
    }

    /// Serializable form written to `parsed_messages.jsonl`.
    pub fn record(&self) -> MessageRecord<'_> {
        MessageRecord {
            timestamp: self.timestamp,
            sender: &self.sender,
            message: &self.text,
            chat_id: &self.chat_id,
            line_number: self.line_number,
        }
    }
}

/// One line of the parsed-messages output.
#[derive(Debug, Serialize)]
pub struct MessageRecord<'a> {
    pub timestamp: NaiveDateTime,
    pub sender: &'a str,
    pub message: &'a str,
    pub chat_id: &'a ChatId,
    pub line_number: usize,
}
