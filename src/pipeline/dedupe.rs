//! Duplicate-region reconciliation.
//!
//! Part of the export is a second capture of history that the primary capture
//! already contains, with a few messages only the second capture saw. This
//! transform drops the copies and keeps the extras, then restores one global
//! `(timestamp, line_number)` order.

use std::collections::HashSet;

use crate::export::{DedupKey, ParsedMessage};
use crate::pipeline::Transform;

/// Reconciles duplicate-region messages of one chat against its primary ones.
///
/// **Algorithm**:
/// 1. Collect the dedup keys of all primary (unflagged) messages
/// 2. Drop flagged messages whose key is already present
/// 3. Promote the remaining flagged messages to primary; a promoted key counts
///    as seen, so the second capture cannot contribute the same message twice
/// 4. Sort survivors by `(timestamp, line_number)`
///
/// Primary messages are never dropped, even when two of them share a key:
/// the export only has minute resolution, so a sender repeating "ha" within
/// the same minute is two real messages.
#[derive(Debug, Default)]
pub struct RegionDeduplicator {
    removed: usize,
    promoted: usize,
}

impl RegionDeduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flagged messages dropped as copies of primary ones.
    pub fn removed_count(&self) -> usize {
        self.removed
    }

    /// Flagged messages kept because only the second capture had them.
    pub fn promoted_count(&self) -> usize {
        self.promoted
    }
}

impl Transform<ParsedMessage> for RegionDeduplicator {
    fn transform(&mut self, messages: &mut Vec<ParsedMessage>) {
        let mut seen: HashSet<DedupKey> = messages
            .iter()
            .filter(|m| !m.in_duplicate_region)
            .map(ParsedMessage::dedup_key)
            .collect();

        let mut removed = 0;
        let mut promoted = 0;
        messages.retain_mut(|message| {
            if !message.in_duplicate_region {
                return true;
            }
            if !seen.insert(message.dedup_key()) {
                removed += 1;
                false
            } else {
                message.in_duplicate_region = false;
                promoted += 1;
                true
            }
        });

        messages.sort_by_key(ParsedMessage::order_key);

        self.removed += removed;
        self.promoted += promoted;
        tracing::debug!(removed, promoted, "reconciled duplicate region");
    }
}
