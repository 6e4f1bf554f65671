//! Example extraction from merged turns.

use crate::export::ChatId;
use crate::pipeline::{CategoryTagger, Example, RoleMessage, Turn, BURST_SEPARATOR};

/// Pairs assistant turns with the partner turns that prompted them.
pub struct ExampleExtractor<'t> {
    tagger: &'t CategoryTagger,
    preceding_window: usize,
}

impl<'t> ExampleExtractor<'t> {
    /// `preceding_window` bounds how many turns before the prompting run are
    /// kept as `preceding_context`.
    pub fn new(tagger: &'t CategoryTagger, preceding_window: usize) -> Self {
        Self {
            tagger,
            preceding_window,
        }
    }

    /// Extract one example per assistant turn that directly follows at least
    /// one partner turn.
    pub fn extract(&self, turns: &[Turn], chat_id: &ChatId) -> Vec<Example> {
        let mut examples = Vec::new();

        for (i, turn) in turns.iter().enumerate() {
            if !turn.is_assistant() {
                continue;
            }

            // Contiguous run of partner turns right before the reply
            let run_start = turns[..i]
                .iter()
                .rposition(Turn::is_assistant)
                .map_or(0, |pos| pos + 1);
            let run = &turns[run_start..i];
            if run.is_empty() {
                continue;
            }

            let window_start = run_start.saturating_sub(self.preceding_window);
            let preceding_context: Vec<RoleMessage> = turns[window_start..run_start]
                .iter()
                .map(RoleMessage::from)
                .collect();

            let context_texts: Vec<String> = run.iter().map(Turn::text).collect();
            let response = turn.text();
            let categories = self
                .tagger
                .tag(&format!("{} {}", context_texts.join(" "), response));

            examples.push(Example {
                context: context_texts.join(BURST_SEPARATOR),
                response,
                categories,
                chat_id: chat_id.clone(),
                timestamp: turn.timestamp,
                preceding_context,
                context_length: run.len(),
            });
        }

        examples
    }
}
