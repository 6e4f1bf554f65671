//! Emoji and word extraction.

use regex::Regex;

use crate::error::{CorpusError, Result};

/// Symbols below the pictograph planes that are still counted as emoji.
const EXTRA_EMOJI: &str = "☺☠❤⭐✨🌟💫⚡🔥♥←→↓↑⬆⬇";

/// Emoji ranges, variation selectors, joiners and invisible spacing.
const EMOJI_RUN: &str = concat!(
    "[",
    r"\x{1F600}-\x{1F64F}",
    r"\x{1F300}-\x{1F5FF}",
    r"\x{1F680}-\x{1F6FF}",
    r"\x{1F1E0}-\x{1F1FF}",
    r"\x{2702}-\x{27B0}",
    r"\x{24C2}-\x{1F251}",
    r"\x{1F900}-\x{1F9FF}",
    r"\x{1FA00}-\x{1FA6F}",
    r"\x{1FA70}-\x{1FAFF}",
    r"\x{2600}-\x{26FF}",
    r"\x{FE00}-\x{FE0F}",
    r"\x{200B}-\x{200F}",
    r"\x{2028}-\x{202F}",
    r"\x{205F}-\x{2060}",
    r"\x{231A}-\x{231B}",
    r"\x{23E9}-\x{23F3}",
    r"\x{23F8}-\x{23FA}",
    "]+"
);

const URL: &str = r"https?://\S+";

const MORNING: &str = r"(?i)good\s*morning";
const NIGHT: &str = r"(?i)good\s*night";

/// Latin or Devanagari words, with an optional apostrophe suffix.
const WORD: &str = r"[A-Za-z\x{0900}-\x{097F}]+(?:'[A-Za-z]+)?";

const LATIN_WORD: &str = r"[A-Za-z]+";

/// Whether `c` counts as an emoji in the profile.
pub fn is_emoji(c: char) -> bool {
    c as u32 > 0x1F000 || EXTRA_EMOJI.contains(c)
}

/// Every emoji character of `text`, in order, repeats included.
pub fn emojis(text: &str) -> Vec<char> {
    text.chars().filter(|&c| is_emoji(c)).collect()
}

/// Compiled text patterns.
#[derive(Debug, Clone)]
pub struct TextPatterns {
    emoji_run: Regex,
    url: Regex,
    word: Regex,
    latin_word: Regex,
    morning: Regex,
    night: Regex,
}

impl TextPatterns {
    pub fn new() -> Result<Self> {
        let compile = |pattern: &str| Regex::new(pattern).map_err(CorpusError::TextPattern);
        Ok(Self {
            emoji_run: compile(EMOJI_RUN)?,
            url: compile(URL)?,
            word: compile(WORD)?,
            latin_word: compile(LATIN_WORD)?,
            morning: compile(MORNING)?,
            night: compile(NIGHT)?,
        })
    }

    /// `text` with emoji runs removed and trimmed.
    pub fn strip_emoji(&self, text: &str) -> String {
        self.emoji_run.replace_all(text, "").trim().to_string()
    }

    pub fn is_morning_greeting(&self, text: &str) -> bool {
        self.morning.is_match(text)
    }

    pub fn is_night_closing(&self, text: &str) -> bool {
        self.night.is_match(text)
    }

    /// Word tokens of `text`, ignoring emoji and links.
    pub fn words(&self, text: &str) -> Vec<String> {
        self.tokens(&self.word, text)
    }

    /// Runs of ASCII letters in `text`, ignoring emoji and links. Apostrophes
    /// and Devanagari split or drop tokens.
    pub fn latin_words(&self, text: &str) -> Vec<String> {
        self.tokens(&self.latin_word, text)
    }

    fn tokens(&self, pattern: &Regex, text: &str) -> Vec<String> {
        let without_emoji = self.emoji_run.replace_all(text, "");
        let cleaned = self.url.replace_all(&without_emoji, "");
        pattern
            .find_iter(&cleaned)
            .map(|m| m.as_str().to_string())
            .collect()
    }
}
