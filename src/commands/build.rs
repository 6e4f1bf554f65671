//! Full pipeline command

use std::path::Path;

use anyhow::{Context, Result};

use chatcorpus::export::read_export;
use chatcorpus::output::write_jsonl;
use chatcorpus::{ParsedMessage, Pipeline, PipelineStats};

use super::{format_size, load_config};

/// Run the pipeline over `input` and write every output into `output_dir`.
#[cfg(not(tarpaulin_include))]
pub fn handle(input: &Path, output_dir: &Path, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let content = read_export(input)?;
    let pipeline = Pipeline::new(config).context("Invalid category configuration")?;
    let out = pipeline.run(&content)?;

    let names = &pipeline.config().output;
    let parsed_path = output_dir.join(&names.parsed_file);
    let examples_path = output_dir.join(&names.examples_file);
    let conversations_path = output_dir.join(&names.conversations_file);

    let written = [
        (
            parsed_path.as_path(),
            write_jsonl(&parsed_path, out.messages.iter().map(ParsedMessage::record))?,
        ),
        (
            examples_path.as_path(),
            write_jsonl(&examples_path, &out.examples)?,
        ),
        (
            conversations_path.as_path(),
            write_jsonl(&conversations_path, &out.conversations)?,
        ),
    ];

    print_summary(&out.stats);
    println!();
    for (path, bytes) in written {
        println!("  {} ({})", path.display(), format_size(bytes));
    }
    Ok(())
}

fn print_summary(stats: &PipelineStats) {
    println!("Messages: {}", stats.messages());
    for (sender, count) in &stats.senders {
        println!("  {}: {}", sender, count);
    }
    println!(
        "Duplicate region: {} removed, {} promoted",
        stats.duplicates_removed, stats.duplicates_promoted
    );
    if stats.reconstruct.unparseable_timestamps > 0 {
        println!(
            "Dropped {} message(s) with unparseable timestamps",
            stats.reconstruct.unparseable_timestamps
        );
    }

    println!();
    for chat in &stats.chats {
        println!("[{}]", chat.chat_id);
        println!("  Messages: {}", chat.messages);
        println!(
            "  Sessions: {} ({} too short for examples)",
            chat.sessions, chat.sessions_skipped
        );
        println!(
            "  Examples: {} of {} after quality filter",
            chat.examples, chat.raw_examples
        );
        println!("  Conversations: {}", chat.conversations);
    }

    println!();
    println!(
        "Quality filter dropped {}: {} too short, {} empty context, {} filler only",
        stats.quality.total(),
        stats.quality.too_short,
        stats.quality.empty_context,
        stats.quality.filler_only
    );
    println!("Categories:");
    for (category, count) in &stats.categories {
        println!("  {}: {}", category, count);
    }
    println!(
        "Total: {} sessions, {} examples, {} conversations",
        stats.sessions(),
        stats.examples(),
        stats.conversations()
    );
}
