//! Command handlers for the chatcorpus binary.

pub mod build;
pub mod completions;
pub mod config;
pub mod parse;
pub mod style;

use std::path::Path;

use anyhow::{Context, Result};

use chatcorpus::Config;

/// Load the config from `--config`, or the default location.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Config::load().context("Failed to load config"),
    }
}

/// Human readable file size.
pub fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}
