//! Pipeline orchestration.

use chrono::Duration;

use crate::config::Config;
use crate::error::Result;
use crate::export::{ChatId, IdentityResolver, ParsedMessage, ReconstructStats, Reconstructor};
use crate::pipeline::{
    BurstMerger, CategoryTagger, Conversation, ConversationBuilder, Example, ExampleExtractor,
    QualityFilter, QualityStats, RegionDeduplicator, Sessionizer, Transform, GENERAL,
};

/// Messages of one chat, in `(timestamp, line_number)` order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatGroup {
    pub chat_id: ChatId,
    pub messages: Vec<ParsedMessage>,
}

/// Per-chat counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatStats {
    pub chat_id: ChatId,
    pub messages: usize,
    pub sessions: usize,
    /// Sessions too small to mine for examples.
    pub sessions_skipped: usize,
    pub raw_examples: usize,
    pub examples: usize,
    pub conversations: usize,
}

impl ChatStats {
    fn new(chat_id: ChatId) -> Self {
        Self {
            chat_id,
            messages: 0,
            sessions: 0,
            sessions_skipped: 0,
            raw_examples: 0,
            examples: 0,
            conversations: 0,
        }
    }
}

/// Everything a run counted, for the summary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineStats {
    pub reconstruct: ReconstructStats,
    pub duplicates_removed: usize,
    pub duplicates_promoted: usize,
    /// Message count per sender, in order of first appearance.
    pub senders: Vec<(String, usize)>,
    /// Per-chat counters, in processing order.
    pub chats: Vec<ChatStats>,
    pub quality: QualityStats,
    /// Examples per category, most frequent first.
    pub categories: Vec<(String, usize)>,
}

impl PipelineStats {
    pub fn messages(&self) -> usize {
        self.senders.iter().map(|(_, n)| n).sum()
    }

    pub fn sessions(&self) -> usize {
        self.chats.iter().map(|c| c.sessions).sum()
    }

    pub fn sessions_skipped(&self) -> usize {
        self.chats.iter().map(|c| c.sessions_skipped).sum()
    }

    pub fn raw_examples(&self) -> usize {
        self.chats.iter().map(|c| c.raw_examples).sum()
    }

    pub fn examples(&self) -> usize {
        self.chats.iter().map(|c| c.examples).sum()
    }

    pub fn conversations(&self) -> usize {
        self.chats.iter().map(|c| c.conversations).sum()
    }
}

/// Result of a full run, ready to be written.
#[derive(Debug, Clone)]
pub struct CorpusOutput {
    /// Deduplicated messages of every chat, in `(timestamp, line_number)` order.
    pub messages: Vec<ParsedMessage>,
    pub examples: Vec<Example>,
    pub conversations: Vec<Conversation>,
    pub stats: PipelineStats,
}

/// The configured pipeline.
pub struct Pipeline {
    config: Config,
    resolver: IdentityResolver,
    tagger: CategoryTagger,
    session_gap: Duration,
    burst_window: Duration,
}

impl Pipeline {
    /// Fails when a configured category pattern does not compile or a
    /// segmentation window is out of range.
    pub fn new(config: Config) -> Result<Self> {
        let session_gap = config.segmentation.session_gap()?;
        let burst_window = config.segmentation.burst_window()?;
        let resolver = IdentityResolver::new(&config.identities);
        let tagger = CategoryTagger::with_custom(&config.tagging.custom)?;
        Ok(Self {
            config,
            resolver,
            tagger,
            session_gap,
            burst_window,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn resolver(&self) -> &IdentityResolver {
        &self.resolver
    }

    pub fn tagger(&self) -> &CategoryTagger {
        &self.tagger
    }

    /// Reassemble the messages of an export, in input order.
    pub fn reconstruct(&self, content: &str) -> Result<(Vec<ParsedMessage>, ReconstructStats)> {
        let (messages, stats) = Reconstructor::new(&self.resolver)?.run(content);
        tracing::info!(
            lines = stats.lines,
            messages = stats.emitted,
            filtered = stats.filtered,
            unparseable = stats.unparseable_timestamps,
            "reconstructed export"
        );
        Ok((messages, stats))
    }

    /// Group messages by chat and reconcile each chat's duplicate region.
    ///
    /// Groups come out in order of their first message in the time-sorted
    /// stream, so repeated runs process chats identically.
    pub fn deduplicate(
        &self,
        mut messages: Vec<ParsedMessage>,
        stats: &mut PipelineStats,
    ) -> Vec<ChatGroup> {
        messages.sort_by_key(ParsedMessage::order_key);

        let mut groups: Vec<ChatGroup> = Vec::new();
        for message in messages {
            match groups.iter().position(|g| g.chat_id == message.chat_id) {
                Some(i) => groups[i].messages.push(message),
                None => groups.push(ChatGroup {
                    chat_id: message.chat_id.clone(),
                    messages: vec![message],
                }),
            }
        }

        let mut dedupe = RegionDeduplicator::new();
        for group in &mut groups {
            dedupe.transform(&mut group.messages);
        }
        stats.duplicates_removed = dedupe.removed_count();
        stats.duplicates_promoted = dedupe.promoted_count();
        tracing::info!(
            chats = groups.len(),
            removed = stats.duplicates_removed,
            promoted = stats.duplicates_promoted,
            "deduplicated chats"
        );

        groups
    }

    /// Reconstruct and deduplicate only.
    pub fn parse(&self, content: &str) -> Result<(Vec<ParsedMessage>, PipelineStats)> {
        let (messages, reconstruct) = self.reconstruct(content)?;
        let mut stats = PipelineStats {
            reconstruct,
            ..PipelineStats::default()
        };

        let groups = self.deduplicate(messages, &mut stats);
        let mut messages: Vec<ParsedMessage> =
            groups.into_iter().flat_map(|g| g.messages).collect();
        messages.sort_by_key(ParsedMessage::order_key);

        stats.senders = count_senders(&messages);
        Ok((messages, stats))
    }

    /// Run every stage over an export's content.
    ///
    /// Nothing is written here; the caller persists [`CorpusOutput`] once the
    /// whole run has succeeded.
    pub fn run(&self, content: &str) -> Result<CorpusOutput> {
        let (messages, reconstruct) = self.reconstruct(content)?;
        let mut stats = PipelineStats {
            reconstruct,
            ..PipelineStats::default()
        };
        let groups = self.deduplicate(messages, &mut stats);

        let segmentation = &self.config.segmentation;
        let sessionizer = Sessionizer::new(self.session_gap);
        let merger = BurstMerger::new(self.burst_window, &self.resolver);
        let extractor =
            ExampleExtractor::new(&self.tagger, self.config.extraction.preceding_window);
        let mut quality = QualityFilter::new(&self.config.quality);

        let mut all_messages = Vec::new();
        let mut examples = Vec::new();
        let mut conversations = Vec::new();

        for ChatGroup { chat_id, messages } in groups {
            let builder = ConversationBuilder::new(&self.config, &chat_id);
            let mut chat = ChatStats::new(chat_id.clone());
            chat.messages = messages.len();

            let mut chat_examples = Vec::new();
            for session in sessionizer.split(messages) {
                chat.sessions += 1;
                let turns = merger.merge(&session.messages);

                let records = builder.build(&turns);
                chat.conversations += records.len();
                conversations.extend(records);

                if session.len() < segmentation.min_session_messages {
                    chat.sessions_skipped += 1;
                } else {
                    chat_examples.extend(extractor.extract(&turns, &chat_id));
                }
                all_messages.extend(session.messages);
            }

            chat.raw_examples = chat_examples.len();
            quality.transform(&mut chat_examples);
            chat.examples = chat_examples.len();
            tracing::info!(
                chat = %chat_id,
                sessions = chat.sessions,
                skipped = chat.sessions_skipped,
                raw_examples = chat.raw_examples,
                examples = chat.examples,
                conversations = chat.conversations,
                "processed chat"
            );

            examples.extend(chat_examples);
            stats.chats.push(chat);
        }

        all_messages.sort_by_key(ParsedMessage::order_key);
        stats.senders = count_senders(&all_messages);
        stats.quality = quality.stats();
        stats.categories = self.count_categories(&examples);

        Ok(CorpusOutput {
            messages: all_messages,
            examples,
            conversations,
            stats,
        })
    }

    /// Example count per category; ties keep category order.
    fn count_categories(&self, examples: &[Example]) -> Vec<(String, usize)> {
        let mut counts: Vec<(String, usize)> = self
            .tagger
            .names()
            .chain(std::iter::once(GENERAL))
            .map(|name| {
                let n = examples
                    .iter()
                    .filter(|e| e.categories.iter().any(|c| c == name))
                    .count();
                (name.to_string(), n)
            })
            .filter(|(_, n)| *n > 0)
            .collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts
    }
}

fn count_senders(messages: &[ParsedMessage]) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for message in messages {
        match counts.iter_mut().find(|(s, _)| *s == message.sender) {
            Some((_, n)) => *n += 1,
            None => counts.push((message.sender.clone(), 1)),
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{IdentityConfig, PartnerConfig};
    use crate::error::CorpusError;

    fn config() -> Config {
        let mut config = Config::default();
        config.identities = IdentityConfig {
            assistant: "Me".to_string(),
            assistant_name: "Me".to_string(),
            shared_boundary_line: 6,
            duplicate_region_start: Some(12),
            partners: vec![
                PartnerConfig {
                    sender: "Alice".to_string(),
                    chat_id: "alice".to_string(),
                    display_name: "Alice".to_string(),
                    relationship: "friend".to_string(),
                },
                PartnerConfig {
                    sender: "Bob".to_string(),
                    chat_id: "bob".to_string(),
                    display_name: "Bob".to_string(),
                    relationship: "friend".to_string(),
                },
            ],
        };
        config
    }

    const EXPORT: &str = "\
1/1/24, 9:00 AM - Alice: good morning
1/1/24, 9:01 AM - Me: Good morning 🌄
1/1/24, 9:01 AM - Me: uthi?
1/1/24, 9:02 AM - Alice: ha abhi
1/1/24, 9:03 AM - Me: aacha
1/1/24, 9:03 AM - Alice: <Media omitted>
2/1/24, 8:00 PM - Bob: kal movie chalte
2/1/24, 8:01 PM - Me: sorry yaar kal class h
2/1/24, 8:02 PM - Bob: hmm
2/1/24, 8:05 PM - Me: next week pakka
2/1/24, 11:30 PM - Bob: good night
2/1/24, 8:02 PM - Bob: hmm
2/1/24, 8:03 PM - Bob: only here
";

    #[test]
    fn out_of_range_window_is_an_error() {
        let mut config = config();
        config.segmentation.session_gap_secs = 10_000_000_000_000_000;
        let err = Pipeline::new(config).err().unwrap();
        assert!(matches!(err, CorpusError::OutOfRange { .. }));
    }

    #[test]
    fn groups_follow_first_appearance() {
        let pipeline = Pipeline::new(config()).unwrap();
        let out = pipeline.run(EXPORT).unwrap();
        let chats: Vec<_> = out.stats.chats.iter().map(|c| c.chat_id.as_str()).collect();
        assert_eq!(chats, ["alice", "bob"]);
    }

    #[test]
    fn duplicate_region_is_reconciled() {
        let pipeline = Pipeline::new(config()).unwrap();
        let out = pipeline.run(EXPORT).unwrap();
        assert_eq!(out.stats.duplicates_removed, 1);
        assert_eq!(out.stats.duplicates_promoted, 1);
        assert!(out.messages.iter().any(|m| m.text == "only here"));
        assert_eq!(out.messages.iter().filter(|m| m.text == "hmm").count(), 1);
    }

    #[test]
    fn output_messages_are_globally_ordered() {
        let out = Pipeline::new(config()).unwrap().run(EXPORT).unwrap();
        let keys: Vec<_> = out.messages.iter().map(ParsedMessage::order_key).collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
        // media placeholder is filtered during reconstruction
        assert_eq!(out.messages.len(), 11);
    }

    #[test]
    fn examples_and_sessions() {
        let out = Pipeline::new(config()).unwrap().run(EXPORT).unwrap();
        let bob = &out.stats.chats[1];
        // 11:30 PM is more than two hours after 8:05 PM
        assert_eq!(bob.sessions, 2);
        assert_eq!(bob.sessions_skipped, 1);

        let alice: Vec<_> = out
            .examples
            .iter()
            .filter(|e| e.chat_id.as_str() == "alice")
            .collect();
        assert_eq!(alice.len(), 2);
        assert_eq!(alice[0].response, "Good morning 🌄 [MSG_BREAK] uthi?");
        assert_eq!(alice[0].categories, ["greeting_morning"]);
        assert_eq!(alice[1].context, "ha abhi");
        assert_eq!(alice[1].preceding_context.len(), 2);
    }

    #[test]
    fn category_counts_are_sorted() {
        let out = Pipeline::new(config()).unwrap().run(EXPORT).unwrap();
        let counts: Vec<_> = out.stats.categories.iter().map(|(_, n)| *n).collect();
        assert!(counts.windows(2).all(|w| w[0] >= w[1]));
        let total: usize = counts.iter().sum();
        let labels: usize = out.examples.iter().map(|e| e.categories.len()).sum();
        assert_eq!(total, labels);
    }

    #[test]
    fn parse_matches_run_messages() {
        let pipeline = Pipeline::new(config()).unwrap();
        let (parsed, stats) = pipeline.parse(EXPORT).unwrap();
        let out = pipeline.run(EXPORT).unwrap();
        assert_eq!(parsed, out.messages);
        assert_eq!(stats.messages(), parsed.len());
        assert_eq!(stats.senders[0], ("Alice".to_string(), 2));
    }

    #[test]
    fn runs_are_identical() {
        let pipeline = Pipeline::new(config()).unwrap();
        let a = pipeline.run(EXPORT).unwrap();
        let b = pipeline.run(EXPORT).unwrap();
        assert_eq!(a.messages, b.messages);
        assert_eq!(a.examples, b.examples);
        assert_eq!(a.conversations, b.conversations);
    }

    #[test]
    fn invalid_custom_pattern_fails_construction() {
        let mut config = config();
        config
            .tagging
            .custom
            .push(crate::pipeline::CategoryRule::new("bad", &["[z-a]"]));
        assert!(Pipeline::new(config).is_err());
    }
}
