//! Message reconstruction command

use std::path::{Path, PathBuf};

use anyhow::Result;

use chatcorpus::export::read_export;
use chatcorpus::output::write_jsonl;
use chatcorpus::{ParsedMessage, Pipeline};

use super::{format_size, load_config};

/// Write the deduplicated messages of `input` as JSON Lines.
#[cfg(not(tarpaulin_include))]
pub fn handle(input: &Path, output: Option<&Path>, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let content = read_export(input)?;
    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(&config.output.parsed_file));

    let pipeline = Pipeline::new(config)?;
    let (messages, stats) = pipeline.parse(&content)?;
    let bytes = write_jsonl(&output, messages.iter().map(ParsedMessage::record))?;

    println!("Messages: {}", messages.len());
    for (sender, count) in &stats.senders {
        println!("  {}: {}", sender, count);
    }
    println!(
        "Duplicate region: {} removed, {} promoted",
        stats.duplicates_removed, stats.duplicates_promoted
    );
    println!("{} ({})", output.display(), format_size(bytes));
    Ok(())
}
