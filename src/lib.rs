//! chatcorpus - turn exported two-party chat logs into training data
//!
//! The library reconstructs messages from a line-oriented chat export,
//! reconciles overlapping re-exports, segments each chat into sessions and
//! bursts, and mines (context, response) examples and ChatML conversations
//! for the configured assistant identity.

pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod output;
pub mod pipeline;
pub mod style;

pub use config::Config;
pub use error::{CorpusError, Result};
pub use export::{ChatId, ParsedMessage};
pub use pipeline::{CorpusOutput, Example, Pipeline, PipelineStats};
pub use style::{StyleProfile, StyleProfiler};
