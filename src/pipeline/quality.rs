//! Example quality filter.

use std::collections::HashSet;

use crate::config::QualityConfig;
use crate::pipeline::{Example, Transform, BURST_TOKEN};

/// How many examples each rule dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QualityStats {
    pub too_short: usize,
    pub empty_context: usize,
    pub filler_only: usize,
}

impl QualityStats {
    pub fn total(&self) -> usize {
        self.too_short + self.empty_context + self.filler_only
    }
}

/// Drops examples that teach nothing.
///
/// An example is dropped when its response is shorter than the minimum once
/// burst tokens are removed, when its context is blank, or when its response
/// is made only of filler words and there is no preceding context to give the
/// acknowledgement meaning. Rules are checked in that order and each drop is
/// counted once.
#[derive(Debug)]
pub struct QualityFilter {
    min_response_chars: usize,
    filler_words: HashSet<String>,
    stats: QualityStats,
}

impl QualityFilter {
    pub fn new(config: &QualityConfig) -> Self {
        Self {
            min_response_chars: config.min_response_chars,
            filler_words: config
                .filler_words
                .iter()
                .map(|w| w.to_lowercase())
                .collect(),
            stats: QualityStats::default(),
        }
    }

    pub fn stats(&self) -> QualityStats {
        self.stats
    }

    fn is_filler_only(&self, response: &str) -> bool {
        let mut words = response.split_whitespace().peekable();
        words.peek().is_some() && words.all(|w| self.filler_words.contains(&w.to_lowercase()))
    }

    /// Check one example, recording the reason when it is rejected.
    pub fn accept(&mut self, example: &Example) -> bool {
        let stripped = example.response.replace(BURST_TOKEN, "");
        if stripped.trim().chars().count() < self.min_response_chars {
            self.stats.too_short += 1;
            return false;
        }
        if example.context.trim().is_empty() {
            self.stats.empty_context += 1;
            return false;
        }
        if example.preceding_context.is_empty() && self.is_filler_only(&stripped) {
            self.stats.filler_only += 1;
            return false;
        }
        true
    }
}

impl Transform<Example> for QualityFilter {
    fn transform(&mut self, examples: &mut Vec<Example>) {
        let before = self.stats.total();
        examples.retain(|example| self.accept(example));
        tracing::debug!(
            dropped = self.stats.total() - before,
            kept = examples.len(),
            "filtered examples"
        );
    }
}
