//! Style profile on the sample export

use chatcorpus::{Pipeline, StyleProfiler};

use crate::helpers::{load_chat, load_config};

#[test]
fn profiles_the_assistant_only() {
    let config = load_config();
    let profiler = StyleProfiler::new(&config).unwrap();
    let (messages, _) = Pipeline::new(config).unwrap().parse(&load_chat()).unwrap();
    let profile = profiler.profile(&messages);

    assert_eq!(profile.meta.total_messages, 22);
    assert_eq!(profile.meta.total_messages_analyzed, 11);
    assert_eq!(profile.per_chat_breakdown.len(), 2);
    assert_eq!(
        profile.greetings_and_closings.night_closings[0].text,
        "Good night 🌉🌉🌉"
    );
    assert_eq!(profile.emoji_profile.top_emojis[0].emoji, "🌉");
    assert_eq!(profile.emoji_profile.top_emojis[0].count, 3);
}

#[test]
fn spelling_map_reports_used_spellings_in_table_order() {
    let config = load_config();
    let profiler = StyleProfiler::new(&config).unwrap();
    let (messages, _) = Pipeline::new(config).unwrap().parse(&load_chat()).unwrap();
    let profile = profiler.profile(&messages);

    let found: Vec<(&str, usize)> = profile
        .spelling_map
        .iter()
        .map(|e| (e.spelling.as_str(), e.assistant_count))
        .collect();
    assert_eq!(found, [("nhi", 1), ("Ha", 2), ("jao", 1), ("Hmm", 1)]);
    assert_eq!(profile.spelling_map[1].standard_form, "haan");
}
