//! Texting style profile of the assistant identity.
//!
//! Summarizes how the assistant writes: message lengths, emoji habits,
//! greetings, stock short replies, vocabulary, burst sizes and when they are
//! active, overall and per chat.
//!
//! # Module Structure
//!
//! - [`tally`] - First-seen-stable frequency counting and length statistics
//! - [`text`] - Emoji, greeting and word extraction

pub mod tally;
pub mod text;

use std::collections::{BTreeMap, HashMap};

use chrono::{Duration, Timelike};
use serde::Serialize;

use crate::config::{Config, SpellingPair};
use crate::error::Result;
use crate::export::{ChatId, ParsedMessage};

pub use tally::{percent, round_to, Distribution, Tally, TextCount};
pub use text::{emojis, is_emoji, TextPatterns};

const TOP_EMOJIS: usize = 30;
const EMOJI_SAMPLES: usize = 5;
const EMOJI_SAMPLE_MAX_CHARS: usize = 100;
const TOP_GREETINGS: usize = 10;
const TOP_SHORT_RESPONSES: usize = 50;
const SHORT_RESPONSE_MAX_WORDS: usize = 3;
const SHORT_RESPONSE_MAX_CHARS: usize = 20;
const TOP_WORDS: usize = 300;
const TOP_HOURS: usize = 5;
const MAX_BURST_BUCKET: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileMeta {
    pub assistant: String,
    pub assistant_name: String,
    /// All messages seen, any sender.
    pub total_messages: usize,
    pub total_messages_analyzed: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmojiStat {
    pub emoji: String,
    pub count: usize,
    /// Occurrences per 100 analyzed messages.
    pub frequency_pct: f64,
    /// Emoji-free texts of messages using the emoji.
    pub sample_contexts: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmojiProfile {
    pub total_messages: usize,
    pub messages_with_emojis: usize,
    pub emoji_usage_rate: f64,
    pub top_emojis: Vec<EmojiStat>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LengthBuckets {
    #[serde(rename = "1-10_chars")]
    pub up_to_10: usize,
    #[serde(rename = "11-30_chars")]
    pub up_to_30: usize,
    #[serde(rename = "31-60_chars")]
    pub up_to_60: usize,
    #[serde(rename = "61-100_chars")]
    pub up_to_100: usize,
    #[serde(rename = "100+_chars")]
    pub over_100: usize,
}

impl LengthBuckets {
    fn of(lengths: &[usize]) -> Self {
        let count = |lo: usize, hi: usize| lengths.iter().filter(|&&l| l >= lo && l <= hi).count();
        Self {
            up_to_10: count(0, 10),
            up_to_30: count(11, 30),
            up_to_60: count(31, 60),
            up_to_100: count(61, 100),
            over_100: count(101, usize::MAX),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LengthProfile {
    pub total_messages: usize,
    pub char_length: Distribution,
    pub word_count: Distribution,
    pub length_buckets: LengthBuckets,
}

/// A tracked personal spelling that the assistant actually uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpellingEntry {
    pub spelling: String,
    pub standard_form: String,
    pub assistant_count: usize,
    pub confirmed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Greetings {
    pub morning_greetings: Vec<TextCount>,
    pub night_closings: Vec<TextCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BurstProfile {
    pub total_bursts: usize,
    pub avg_burst_length: f64,
    pub max_burst_length: usize,
    /// Bursts per size, for sizes up to 10.
    pub burst_size_distribution: BTreeMap<usize, usize>,
    pub single_message_pct: f64,
    pub multi_message_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeProfile {
    /// Messages per hour of day, `"00:00"` to `"23:00"`.
    pub hourly_distribution: BTreeMap<String, usize>,
    /// Messages per weekday, most active first.
    pub daily_distribution: Vec<TextCount>,
    pub peak_hours: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatProfile {
    pub chat_id: ChatId,
    pub message_count: usize,
    pub message_lengths: Option<LengthProfile>,
    pub emoji_profile: EmojiProfile,
    pub greetings: Greetings,
    pub short_responses: Vec<TextCount>,
}

/// Contents of `style_profile.json`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyleProfile {
    pub meta: ProfileMeta,
    pub word_frequencies: Vec<TextCount>,
    pub spelling_map: Vec<SpellingEntry>,
    pub emoji_profile: EmojiProfile,
    pub message_lengths: Option<LengthProfile>,
    pub greetings_and_closings: Greetings,
    pub short_responses: Vec<TextCount>,
    pub burst_patterns: Option<BurstProfile>,
    pub time_patterns: TimeProfile,
    pub per_chat_breakdown: Vec<ChatProfile>,
}

/// Builds a [`StyleProfile`] from deduplicated messages.
pub struct StyleProfiler {
    assistant: String,
    assistant_name: String,
    burst_window: Duration,
    spelling_pairs: Vec<SpellingPair>,
    patterns: TextPatterns,
}

impl StyleProfiler {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            assistant: config.identities.assistant.clone(),
            assistant_name: config.identities.assistant_name.clone(),
            burst_window: config.segmentation.burst_window()?,
            spelling_pairs: config.style.spelling_pairs.clone(),
            patterns: TextPatterns::new()?,
        })
    }

    /// Profile the assistant's messages among `messages`, which should be in
    /// `(timestamp, line_number)` order.
    pub fn profile(&self, messages: &[ParsedMessage]) -> StyleProfile {
        let own: Vec<&ParsedMessage> = messages
            .iter()
            .filter(|m| m.sender == self.assistant)
            .collect();
        tracing::info!(
            total = messages.len(),
            analyzed = own.len(),
            "profiling style"
        );

        StyleProfile {
            meta: ProfileMeta {
                assistant: self.assistant.clone(),
                assistant_name: self.assistant_name.clone(),
                total_messages: messages.len(),
                total_messages_analyzed: own.len(),
            },
            word_frequencies: self.word_frequencies(&own),
            spelling_map: self.spelling_map(&own),
            emoji_profile: self.emoji_profile(&own),
            message_lengths: message_lengths(&own),
            greetings_and_closings: self.greetings(&own),
            short_responses: short_responses(&own),
            burst_patterns: self.burst_patterns(messages),
            time_patterns: time_patterns(&own),
            per_chat_breakdown: self.per_chat(&own),
        }
    }

    fn word_frequencies(&self, messages: &[&ParsedMessage]) -> Vec<TextCount> {
        let mut words = Tally::new();
        for message in messages {
            for word in self.patterns.words(&message.text) {
                words.add(word);
            }
        }
        words.ranked_texts(TOP_WORDS)
    }

    /// Configured spellings found among the assistant's words, in pair order.
    fn spelling_map(&self, messages: &[&ParsedMessage]) -> Vec<SpellingEntry> {
        let mut words = Tally::new();
        for message in messages {
            for word in self.patterns.latin_words(&message.text) {
                words.add(word);
            }
        }
        self.spelling_pairs
            .iter()
            .filter_map(|pair| {
                let count = words.get(&pair.spelling);
                (count > 0).then(|| SpellingEntry {
                    spelling: pair.spelling.clone(),
                    standard_form: pair.standard.clone(),
                    assistant_count: count,
                    confirmed: true,
                })
            })
            .collect()
    }

    fn emoji_profile(&self, messages: &[&ParsedMessage]) -> EmojiProfile {
        let mut counts: Tally<char> = Tally::new();
        let mut samples: HashMap<char, Vec<String>> = HashMap::new();
        let mut with_emoji = 0;

        for message in messages {
            let found = emojis(&message.text);
            if found.is_empty() {
                continue;
            }
            with_emoji += 1;
            let context = self.patterns.strip_emoji(&message.text);
            let usable = !context.is_empty() && context.chars().count() < EMOJI_SAMPLE_MAX_CHARS;
            for emoji in found {
                counts.add(emoji);
                let list = samples.entry(emoji).or_default();
                if usable && list.len() < EMOJI_SAMPLES {
                    list.push(context.clone());
                }
            }
        }

        let total = messages.len();
        let top_emojis = counts
            .most_common(TOP_EMOJIS)
            .into_iter()
            .map(|(emoji, count)| EmojiStat {
                emoji: emoji.to_string(),
                count,
                frequency_pct: percent(count, total, 2),
                sample_contexts: samples.remove(&emoji).unwrap_or_default(),
            })
            .collect();

        EmojiProfile {
            total_messages: total,
            messages_with_emojis: with_emoji,
            emoji_usage_rate: percent(with_emoji, total, 2),
            top_emojis,
        }
    }

    fn greetings(&self, messages: &[&ParsedMessage]) -> Greetings {
        let mut morning = Tally::new();
        let mut night = Tally::new();
        for message in messages {
            let text = message.text.trim();
            if self.patterns.is_morning_greeting(text) {
                morning.add(text.to_string());
            }
            if self.patterns.is_night_closing(text) {
                night.add(text.to_string());
            }
        }
        Greetings {
            morning_greetings: morning.ranked_texts(TOP_GREETINGS),
            night_closings: night.ranked_texts(TOP_GREETINGS),
        }
    }

    /// Sizes of the assistant's bursts: consecutive assistant messages of one
    /// chat, each within the burst window of the message before it.
    fn burst_patterns(&self, messages: &[ParsedMessage]) -> Option<BurstProfile> {
        let mut chats: Vec<(&ChatId, Vec<&ParsedMessage>)> = Vec::new();
        for message in messages {
            match chats.iter().position(|(id, _)| *id == &message.chat_id) {
                Some(i) => chats[i].1.push(message),
                None => chats.push((&message.chat_id, vec![message])),
            }
        }

        let mut sizes = Vec::new();
        for (_, chat) in &chats {
            let mut current = 0usize;
            for (i, message) in chat.iter().enumerate() {
                if message.sender != self.assistant {
                    if current > 0 {
                        sizes.push(current);
                    }
                    current = 0;
                    continue;
                }
                if current > 0 && message.timestamp - chat[i - 1].timestamp > self.burst_window {
                    sizes.push(current);
                    current = 0;
                }
                current += 1;
            }
            if current > 0 {
                sizes.push(current);
            }
        }

        let total = sizes.len();
        let max = sizes.iter().copied().max()?;
        let mut distribution = BTreeMap::new();
        for &size in &sizes {
            if size <= MAX_BURST_BUCKET {
                *distribution.entry(size).or_insert(0) += 1;
            }
        }
        let singles = sizes.iter().filter(|&&s| s == 1).count();

        Some(BurstProfile {
            total_bursts: total,
            avg_burst_length: round_to(sizes.iter().sum::<usize>() as f64 / total as f64, 2),
            max_burst_length: max,
            burst_size_distribution: distribution,
            single_message_pct: percent(singles, total, 1),
            multi_message_pct: percent(total - singles, total, 1),
        })
    }

    fn per_chat(&self, messages: &[&ParsedMessage]) -> Vec<ChatProfile> {
        let mut chats: Vec<(ChatId, Vec<&ParsedMessage>)> = Vec::new();
        for &message in messages {
            match chats.iter().position(|(id, _)| *id == message.chat_id) {
                Some(i) => chats[i].1.push(message),
                None => chats.push((message.chat_id.clone(), vec![message])),
            }
        }

        chats
            .into_iter()
            .map(|(chat_id, msgs)| ChatProfile {
                chat_id,
                message_count: msgs.len(),
                message_lengths: message_lengths(&msgs),
                emoji_profile: self.emoji_profile(&msgs),
                greetings: self.greetings(&msgs),
                short_responses: short_responses(&msgs),
            })
            .collect()
    }
}

fn message_lengths(messages: &[&ParsedMessage]) -> Option<LengthProfile> {
    let chars: Vec<usize> = messages.iter().map(|m| m.text.chars().count()).collect();
    let words: Vec<usize> = messages
        .iter()
        .map(|m| m.text.split_whitespace().count())
        .collect();

    Some(LengthProfile {
        total_messages: messages.len(),
        char_length: Distribution::of(&chars)?,
        word_count: Distribution::of(&words)?,
        length_buckets: LengthBuckets::of(&chars),
    })
}

fn short_responses(messages: &[&ParsedMessage]) -> Vec<TextCount> {
    let mut replies = Tally::new();
    for message in messages {
        let text = message.text.trim();
        if !text.is_empty()
            && text.split_whitespace().count() <= SHORT_RESPONSE_MAX_WORDS
            && text.chars().count() <= SHORT_RESPONSE_MAX_CHARS
        {
            replies.add(text.to_string());
        }
    }
    replies.ranked_texts(TOP_SHORT_RESPONSES)
}

fn time_patterns(messages: &[&ParsedMessage]) -> TimeProfile {
    let mut hours: Tally<u32> = Tally::new();
    let mut days: Tally<String> = Tally::new();
    for message in messages {
        hours.add(message.timestamp.hour());
        days.add(message.timestamp.format("%A").to_string());
    }

    let label = |h: u32| format!("{:02}:00", h);
    TimeProfile {
        hourly_distribution: (0..24).map(|h| (label(h), hours.get(&h))).collect(),
        daily_distribution: days.ranked_texts(7),
        peak_hours: hours
            .most_common(TOP_HOURS)
            .into_iter()
            .map(|(h, _)| label(h))
            .collect(),
    }
}
