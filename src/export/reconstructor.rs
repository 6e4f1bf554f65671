//! Message reconstruction from raw export lines.
//!
//! Lines are classified into three kinds and fed through a two-state machine:
//!
//! | state \ line   | message header         | system notice     | continuation          |
//! |----------------|------------------------|-------------------|-----------------------|
//! | `Idle`         | open buffer            | discard           | discard (stray line)  |
//! | `Accumulating` | flush, open new buffer | flush, go `Idle`  | append to buffer      |
//!
//! Filtering happens at flush time so a message is judged on its complete
//! text, continuation lines included.

use regex::Regex;

use crate::error::{CorpusError, Result};
use crate::export::filter::is_non_content;
use crate::export::timestamp::parse_timestamp;
use crate::export::{IdentityResolver, ParsedMessage, RawLine};

/// `date, time - sender: text`
const MESSAGE_PATTERN: &str = r"^(\d{1,2}/\d{1,2}/\d{2,4}),\s(\d{1,2}:\d{2}(?:\s?[AaPp][Mm])?)\s-\s([^:]+?):\s(.*)$";

/// `date, time - text` (app notice, no sender)
const SYSTEM_PATTERN: &str = r"^(\d{1,2}/\d{1,2}/\d{2,4}),\s(\d{1,2}:\d{2}(?:\s?[AaPp][Mm])?)\s-\s(.+)$";

/// Classification of a single raw line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'l> {
    /// Start of a new message.
    Message {
        date: &'l str,
        time: &'l str,
        sender: &'l str,
        text: &'l str,
    },
    /// App-generated notice with a timestamp but no sender.
    System,
    /// Anything without a timestamp prefix.
    Continuation(&'l str),
}

/// Compiled line patterns.
#[derive(Debug, Clone)]
struct LinePatterns {
    message: Regex,
    system: Regex,
}

impl LinePatterns {
    fn new() -> Result<Self> {
        Ok(Self {
            message: Regex::new(MESSAGE_PATTERN).map_err(CorpusError::LinePattern)?,
            system: Regex::new(SYSTEM_PATTERN).map_err(CorpusError::LinePattern)?,
        })
    }

    fn classify<'l>(&self, line: &'l str) -> LineKind<'l> {
        if let Some(caps) = self.message.captures(line) {
            let group = |i| caps.get(i).map_or("", |m| m.as_str());
            return LineKind::Message {
                date: group(1),
                time: group(2),
                sender: group(3),
                text: group(4),
            };
        }
        if self.system.is_match(line) {
            return LineKind::System;
        }
        LineKind::Continuation(line)
    }
}

/// Counters collected while reconstructing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconstructStats {
    pub lines: usize,
    pub headers: usize,
    pub system_lines: usize,
    pub continuation_lines: usize,
    pub stray_lines: usize,
    pub unparseable_timestamps: usize,
    pub filtered: usize,
    pub emitted: usize,
}

/// Reconstructor state.
#[derive(Debug)]
enum State {
    Idle,
    Accumulating(ParsedMessage),
}

/// Reassembles messages from an export one line at a time.
pub struct Reconstructor<'r> {
    patterns: LinePatterns,
    resolver: &'r IdentityResolver,
    state: State,
    messages: Vec<ParsedMessage>,
    stats: ReconstructStats,
}

impl<'r> Reconstructor<'r> {
    pub fn new(resolver: &'r IdentityResolver) -> Result<Self> {
        Ok(Self {
            patterns: LinePatterns::new()?,
            resolver,
            state: State::Idle,
            messages: Vec::new(),
            stats: ReconstructStats::default(),
        })
    }

    /// Classify a line without feeding it.
    pub fn classify<'l>(&self, line: &'l str) -> LineKind<'l> {
        self.patterns.classify(line)
    }

    /// Whether a message is currently being accumulated.
    pub fn is_accumulating(&self) -> bool {
        matches!(self.state, State::Accumulating(_))
    }

    /// Feed the next line of the export.
    pub fn feed(&mut self, line: RawLine<'_>) {
        self.stats.lines += 1;
        let text = line.text.trim_end_matches(['\r', '\n']);

        match self.patterns.classify(text) {
            LineKind::Message {
                date,
                time,
                sender,
                text,
            } => {
                self.stats.headers += 1;
                self.flush();
                self.open(line.number, date, time, sender, text);
            }
            LineKind::System => {
                self.stats.system_lines += 1;
                self.flush();
            }
            LineKind::Continuation(text) => self.append(line.number, text),
        }
    }

    /// Feed every line of `content` and finish.
    pub fn run(mut self, content: &str) -> (Vec<ParsedMessage>, ReconstructStats) {
        for line in super::raw_lines(content) {
            self.feed(line);
        }
        self.finish()
    }

    /// Flush any open message and return everything emitted so far.
    pub fn finish(mut self) -> (Vec<ParsedMessage>, ReconstructStats) {
        self.flush();
        (self.messages, self.stats)
    }

    fn open(&mut self, number: usize, date: &str, time: &str, sender: &str, text: &str) {
        let Some(timestamp) = parse_timestamp(date, time) else {
            tracing::warn!(line = number, date, time, "unparseable timestamp, dropping message");
            self.stats.unparseable_timestamps += 1;
            return;
        };

        let sender = sender.trim();
        self.state = State::Accumulating(ParsedMessage {
            timestamp,
            sender: sender.to_string(),
            text: text.trim().to_string(),
            chat_id: self.resolver.chat_for(sender, number),
            line_number: number,
            in_duplicate_region: self.resolver.in_duplicate_region(number),
        });
    }

    fn append(&mut self, number: usize, text: &str) {
        match &mut self.state {
            State::Accumulating(message) => {
                self.stats.continuation_lines += 1;
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    message.text.push('\n');
                    message.text.push_str(trimmed);
                }
            }
            State::Idle => {
                if !text.trim().is_empty() {
                    tracing::trace!(line = number, "discarding stray line");
                }
                self.stats.stray_lines += 1;
            }
        }
    }

    fn flush(&mut self) {
        if let State::Accumulating(message) = std::mem::replace(&mut self.state, State::Idle) {
            if is_non_content(&message.text) {
                tracing::trace!(line = message.line_number, "filtered non-content message");
                self.stats.filtered += 1;
            } else {
                self.stats.emitted += 1;
                self.messages.push(message);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IdentityConfig;

    fn resolver() -> IdentityResolver {
        IdentityResolver::new(&IdentityConfig::default())
    }

    fn reconstruct(content: &str) -> (Vec<ParsedMessage>, ReconstructStats) {
        let resolver = resolver();
        Reconstructor::new(&resolver).unwrap().run(content)
    }

    #[test]
    fn classifies_message_header() {
        let resolver = resolver();
        let r = Reconstructor::new(&resolver).unwrap();
        assert_eq!(
            r.classify("1/1/24, 9:00 AM - Class Cr: hello: there"),
            LineKind::Message {
                date: "1/1/24",
                time: "9:00 AM",
                sender: "Class Cr",
                text: "hello: there",
            }
        );
    }

    #[test]
    fn classifies_system_and_continuation() {
        let resolver = resolver();
        let r = Reconstructor::new(&resolver).unwrap();
        assert_eq!(
            r.classify("1/1/24, 9:00 AM - Messages and calls are end-to-end encrypted."),
            LineKind::System
        );
        assert_eq!(r.classify("just words"), LineKind::Continuation("just words"));
    }

    #[test]
    fn header_without_text_is_a_system_line() {
        let resolver = resolver();
        let r = Reconstructor::new(&resolver).unwrap();
        assert_eq!(r.classify("1/1/24, 9:00 AM - Class Cr:"), LineKind::System);
    }

    #[test]
    fn three_headers_make_three_messages() {
        let (messages, _) = reconstruct(
            "1/1/24, 9:00 AM - A: Hi\n1/1/24, 9:00 AM - A: there\n1/1/24, 9:01 AM - B: hey",
        );
        let texts: Vec<_> = messages.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, ["Hi", "there", "hey"]);
        assert_eq!(messages[2].line_number, 3);
    }

    #[test]
    fn continuation_lines_join_with_newline() {
        let (messages, stats) = reconstruct(
            "1/1/24, 9:00 AM - A: first\n  second  \n\nthird\n1/1/24, 9:05 AM - B: next",
        );
        assert_eq!(messages[0].text, "first\nsecond\nthird");
        assert_eq!(messages[1].text, "next");
        assert_eq!(stats.continuation_lines, 3);
    }

    #[test]
    fn system_line_closes_message_and_drops_following_lines() {
        let (messages, stats) = reconstruct(
            "1/1/24, 9:00 AM - A: first\n1/1/24, 9:01 AM - You blocked this contact\norphan",
        );
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].text, "first");
        assert_eq!(stats.system_lines, 1);
        assert_eq!(stats.stray_lines, 1);
    }

    #[test]
    fn leading_stray_lines_are_discarded() {
        let (messages, stats) = reconstruct("preamble\n\n1/1/24, 9:00 AM - A: hi");
        assert_eq!(messages.len(), 1);
        assert_eq!(stats.stray_lines, 2);
    }

    #[test]
    fn filtering_waits_for_the_full_message() {
        let (messages, stats) = reconstruct(
            "1/1/24, 9:00 AM - A: see this\n<Media omitted>\n1/1/24, 9:01 AM - A: ok",
        );
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].text, "ok");
        assert_eq!(stats.filtered, 1);
    }

    #[test]
    fn bad_timestamp_drops_message_and_its_continuations() {
        let (messages, stats) = reconstruct(
            "13/45/24, 9:00 AM - A: broken\nstill broken\n1/1/24, 9:01 AM - A: fine",
        );
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].text, "fine");
        assert_eq!(stats.unparseable_timestamps, 1);
        assert_eq!(stats.stray_lines, 1);
    }

    #[test]
    fn crlf_line_endings() {
        let (messages, _) = reconstruct("1/1/24, 9:00 AM - A: hi\r\nmore\r\n");
        assert_eq!(messages[0].text, "hi\nmore");
    }

    #[test]
    fn chat_and_region_are_assigned_from_line_number() {
        let mut config = IdentityConfig::default();
        config.shared_boundary_line = 1;
        config.duplicate_region_start = Some(3);
        let resolver = IdentityResolver::new(&config);
        let (messages, _) = Reconstructor::new(&resolver).unwrap().run(
            "1/1/24, 9:00 AM - I Am All: a\n1/1/24, 9:01 AM - I Am All: b\n1/1/24, 9:02 AM - I Am All: c",
        );

        let chats: Vec<_> = messages.iter().map(|m| m.chat_id.as_str()).collect();
        assert_eq!(chats, ["class_cr", "shubhi", "shubhi"]);
        let dup: Vec<_> = messages.iter().map(|m| m.in_duplicate_region).collect();
        assert_eq!(dup, [false, false, true]);
    }

    #[test]
    fn sender_stops_at_first_colon() {
        let (messages, _) = reconstruct("1/1/24, 9:00 AM - A: time is 10:30: late");
        assert_eq!(messages[0].sender, "A");
        assert_eq!(messages[0].text, "time is 10:30: late");
    }
}
