//! End-to-end tests of the library pipeline on the sample export

use std::collections::HashSet;

use chatcorpus::pipeline::Turn;
use chatcorpus::{ParsedMessage, Pipeline};

use crate::helpers::{load_chat, load_config};

fn pipeline() -> Pipeline {
    Pipeline::new(load_config()).unwrap()
}

#[test]
fn reconstructs_every_content_message() {
    let out = pipeline().run(&load_chat()).unwrap();

    assert_eq!(out.messages.len(), 22);
    assert_eq!(out.stats.reconstruct.unparseable_timestamps, 1);
    assert_eq!(out.stats.reconstruct.filtered, 1);
    assert!(out.messages.iter().all(|m| !m.text.contains("Media omitted")));

    let multi_line = out
        .messages
        .iter()
        .find(|m| m.line_number == 3)
        .unwrap();
    assert_eq!(multi_line.text, "kya kar rhe ho\naaj college nhi aaye");
}

#[test]
fn assistant_messages_follow_the_boundary_line() {
    let out = pipeline().run(&load_chat()).unwrap();
    for message in out.messages.iter().filter(|m| m.sender == "I Am All") {
        let expected = if message.line_number <= 15 {
            "class_cr"
        } else {
            "shubhi"
        };
        assert_eq!(message.chat_id.as_str(), expected, "line {}", message.line_number);
    }
}

#[test]
fn duplicate_region_keeps_only_new_messages() {
    let out = pipeline().run(&load_chat()).unwrap();

    assert_eq!(out.stats.duplicates_removed, 3);
    assert_eq!(out.stats.duplicates_promoted, 1);
    assert!(out.messages.iter().all(|m| !m.in_duplicate_region));

    let promoted = out.messages.iter().find(|m| m.text == "miss you").unwrap();
    assert_eq!(promoted.line_number, 27);

    let keys: HashSet<_> = out.messages.iter().map(ParsedMessage::dedup_key).collect();
    assert_eq!(keys.len(), out.messages.len());
}

#[test]
fn messages_are_time_ordered() {
    let out = pipeline().run(&load_chat()).unwrap();
    assert!(out
        .messages
        .windows(2)
        .all(|w| w[0].order_key() <= w[1].order_key()));
}

#[test]
fn sessions_cover_every_message() {
    let out = pipeline().run(&load_chat()).unwrap();
    assert_eq!(out.stats.sessions(), 4);
    let per_chat: usize = out.stats.chats.iter().map(|c| c.messages).sum();
    assert_eq!(per_chat, out.messages.len());
}

#[test]
fn examples_pair_partner_context_with_reply() {
    let out = pipeline().run(&load_chat()).unwrap();

    assert_eq!(out.stats.raw_examples(), 8);
    assert_eq!(out.examples.len(), 6);
    assert_eq!(out.stats.quality.too_short, 1);
    assert_eq!(out.stats.quality.filler_only, 1);

    let first = &out.examples[0];
    assert_eq!(first.context, "hii [MSG_BREAK] kya kar rhe ho\naaj college nhi aaye");
    assert_eq!(first.response, "Kuch nhi [MSG_BREAK] tum batao");
    assert_eq!(first.context_length, 1);
    assert!(first.preceding_context.is_empty());
    assert!(first.categories.contains(&"greeting_general".to_string()));

    let night = out
        .examples
        .iter()
        .find(|e| e.context == "good night")
        .unwrap();
    assert_eq!(night.chat_id.as_str(), "shubhi");
    assert_eq!(night.categories, ["greeting_night"]);
    assert_eq!(Turn::split(&night.response), ["Good night 🌉🌉🌉", "so jao"]);
}

#[test]
fn filler_reply_survives_with_history() {
    let out = pipeline().run(&load_chat()).unwrap();
    let ok = out
        .examples
        .iter()
        .find(|e| e.response == "ok")
        .unwrap();
    assert_eq!(ok.preceding_context.len(), 4);
    assert!(out.examples.iter().all(|e| e.response != "Hmm [MSG_BREAK] ok"));
}

#[test]
fn every_example_is_usable() {
    let out = pipeline().run(&load_chat()).unwrap();
    for example in &out.examples {
        assert!(!example.context.trim().is_empty());
        assert!(example.response.replace("[MSG_BREAK]", "").trim().chars().count() >= 2);
        assert!(example.context_length >= 1);
        assert!(example.preceding_context.len() <= 5);
        assert!(!example.categories.is_empty());
    }
}

#[test]
fn conversations_per_session() {
    let out = pipeline().run(&load_chat()).unwrap();
    assert_eq!(out.conversations.len(), 12);
    assert_eq!(
        out.conversations.iter().filter(|c| c.is_full_session()).count(),
        4
    );
    let first = &out.conversations[0];
    assert!(first.messages[0].content.contains("Class Cr"));
}

#[test]
fn repeated_runs_are_identical() {
    let content = load_chat();
    let a = pipeline().run(&content).unwrap();
    let b = pipeline().run(&content).unwrap();

    let render = |out: &chatcorpus::CorpusOutput| {
        let messages: Vec<String> = out
            .messages
            .iter()
            .map(|m| serde_json::to_string(&m.record()).unwrap())
            .collect();
        let examples = serde_json::to_string(&out.examples).unwrap();
        let conversations = serde_json::to_string(&out.conversations).unwrap();
        (messages, examples, conversations)
    };
    assert_eq!(render(&a), render(&b));
}
