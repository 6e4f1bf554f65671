//! Style profile command

use std::path::{Path, PathBuf};

use anyhow::Result;

use chatcorpus::export::read_export;
use chatcorpus::output::write_json_pretty;
use chatcorpus::{Pipeline, StyleProfiler};

use super::{format_size, load_config};

/// Profile the assistant's messages in `input` and write the profile as JSON.
#[cfg(not(tarpaulin_include))]
pub fn handle(input: &Path, output: Option<&Path>, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let content = read_export(input)?;
    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(&config.output.style_file));

    let profiler = StyleProfiler::new(&config)?;
    let pipeline = Pipeline::new(config)?;
    let (messages, _) = pipeline.parse(&content)?;
    let profile = profiler.profile(&messages);
    let bytes = write_json_pretty(&output, &profile)?;

    println!(
        "Analyzed {} of {} messages",
        profile.meta.total_messages_analyzed, profile.meta.total_messages
    );
    let top: Vec<&str> = profile
        .word_frequencies
        .iter()
        .take(10)
        .map(|w| w.text.as_str())
        .collect();
    if !top.is_empty() {
        println!("Top words: {}", top.join(", "));
    }
    let emoji: Vec<&str> = profile
        .emoji_profile
        .top_emojis
        .iter()
        .take(5)
        .map(|e| e.emoji.as_str())
        .collect();
    if !emoji.is_empty() {
        println!("Top emoji: {}", emoji.join(" "));
    }
    if !profile.spelling_map.is_empty() {
        let spellings: Vec<String> = profile
            .spelling_map
            .iter()
            .take(5)
            .map(|e| format!("{} -> {}", e.spelling, e.standard_form))
            .collect();
        println!("Spellings: {}", spellings.join(", "));
    }
    if let Some(bursts) = &profile.burst_patterns {
        println!("Average burst: {} messages", bursts.avg_burst_length);
    }
    println!("{} ({})", output.display(), format_size(bytes));
    Ok(())
}
