//! Corpus building pipeline.
//!
//! Reconstructed messages flow through a fixed sequence of stages:
//!
//! 1. [`RegionDeduplicator`] reconciles the re-exported region per chat
//! 2. [`Sessionizer`] cuts each chat at long silences
//! 3. [`BurstMerger`] folds same-sender bursts into turns
//! 4. [`ExampleExtractor`] pairs assistant turns with their prompts, tagged by
//!    [`CategoryTagger`]
//! 5. [`QualityFilter`] drops examples that teach nothing
//!
//! [`ConversationBuilder`] renders the same turns as ChatML records, and
//! [`Pipeline`] wires everything together from a [`crate::Config`].
//!
//! # Module Structure
//!
//! - [`types`] - Sessions, turns and examples
//! - [`dedupe`], [`session`], [`burst`] - Message-level stages
//! - [`categories`], [`extract`], [`quality`] - Example stages
//! - [`conversations`] - ChatML output
//! - [`runner`] - Orchestration and run statistics

pub mod burst;
pub mod categories;
pub mod conversations;
pub mod dedupe;
pub mod extract;
pub mod quality;
pub mod runner;
pub mod session;
pub mod types;

pub use burst::BurstMerger;
pub use categories::{builtin_rules, CategoryRule, CategoryTagger, GENERAL};
pub use conversations::{ChatMessage, ChatRole, Conversation, ConversationBuilder, ConversationMetadata};
pub use dedupe::RegionDeduplicator;
pub use extract::ExampleExtractor;
pub use quality::{QualityFilter, QualityStats};
pub use runner::{ChatGroup, ChatStats, CorpusOutput, Pipeline, PipelineStats};
pub use session::Sessionizer;
pub use types::{Example, Role, RoleMessage, Session, Turn, BURST_SEPARATOR, BURST_TOKEN};

/// A stage that rewrites a batch of records in place.
///
/// Stages keep their own counters, so callers read statistics from the stage
/// after running it.
pub trait Transform<T> {
    fn transform(&mut self, items: &mut Vec<T>);
}
