//! CLI definitions for chatcorpus
//!
//! This module is separate from main.rs so it can be used by xtask
//! for generating man pages.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Version string with git commit hash for dev builds
#[cfg(not(feature = "release"))]
pub const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), "-", env!("VERGEN_GIT_SHA"));

/// Version string for release builds
#[cfg(feature = "release")]
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Date the binary was built
pub const BUILD_DATE: &str = env!("CHATCORPUS_BUILD_DATE");

#[derive(Parser)]
#[command(name = "chatcorpus")]
#[command(version = VERSION)]
#[command(about = "Turn a chat export into a deduplicated, session-aware training corpus")]
#[command(long_about = "chatcorpus reads a plain-text chat export, reassembles its messages, \
removes the copies left by overlapping re-exports, splits each chat into sessions and \
bursts, and writes training examples and ChatML conversations as JSON Lines.

Identities, thresholds and output names come from the config file \
(see `chatcorpus config path`).")]
pub struct Cli {
    /// Use this config file instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase log output on stderr (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full pipeline and write messages, examples and conversations
    #[command(long_about = "Run the full pipeline over a chat export.

Writes three files into the output directory:
  parsed_messages.jsonl   every message, deduplicated and time-ordered
  example_bank.jsonl      context -> response pairs with categories
  conversations.jsonl     ChatML records for fine-tuning

Nothing is written unless the whole run succeeds.

EXAMPLES:
    chatcorpus build chat.txt
    chatcorpus build chat.txt -o data/")]
    Build {
        /// Chat export to read
        input: PathBuf,
        /// Directory for the output files
        #[arg(short, long, value_name = "DIR", default_value = ".")]
        output: PathBuf,
    },

    /// Reconstruct and deduplicate messages only
    #[command(long_about = "Reconstruct and deduplicate the messages of a chat export \
and write them as JSON Lines.

EXAMPLES:
    chatcorpus parse chat.txt
    chatcorpus parse chat.txt -o messages.jsonl")]
    Parse {
        /// Chat export to read
        input: PathBuf,
        /// Output file (defaults to the configured parsed file name)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Profile the assistant's texting style
    #[command(long_about = "Profile how the assistant identity writes: lengths, emoji, \
greetings, short replies, vocabulary, bursts and activity hours.

EXAMPLES:
    chatcorpus style chat.txt
    chatcorpus style chat.txt -o style.json")]
    Style {
        /// Chat export to read
        input: PathBuf,
        /// Output file (defaults to the configured style file name)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    #[command(long_about = "Print a completion script for the given shell.

EXAMPLES:
    chatcorpus completions bash > ~/.local/share/bash-completion/completions/chatcorpus
    chatcorpus completions zsh > ~/.zfunc/_chatcorpus")]
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration as TOML
    Show,
    /// Write the default configuration to the config path
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the config file path
    Path,
}
