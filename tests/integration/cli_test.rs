//! Integration tests for the chatcorpus binary

use std::fs;

use predicates::prelude::*;
use tempfile::TempDir;

use crate::helpers::{chat_fixture, chatcorpus};

// ============================================================================
// Help Output Tests
// ============================================================================

#[test]
fn help_lists_subcommands() {
    chatcorpus()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("build"))
        .stdout(predicate::str::contains("parse"))
        .stdout(predicate::str::contains("style"));
}

#[test]
fn version_flag_prints_version() {
    chatcorpus()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

// ============================================================================
// Build Tests
// ============================================================================

#[test]
fn build_writes_all_outputs() {
    let dir = TempDir::new().unwrap();

    chatcorpus()
        .arg("build")
        .arg(chat_fixture())
        .arg("-o")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("[class_cr]"))
        .stdout(predicate::str::contains("3 removed, 1 promoted"));

    let parsed = fs::read_to_string(dir.path().join("parsed_messages.jsonl")).unwrap();
    assert_eq!(parsed.lines().count(), 22);
    let first: serde_json::Value = serde_json::from_str(parsed.lines().next().unwrap()).unwrap();
    assert_eq!(first["timestamp"], "2024-01-05T09:00:00");
    assert_eq!(first["sender"], "Class Cr");
    assert_eq!(first["chat_id"], "class_cr");
    assert_eq!(first["line_number"], 2);

    let examples = fs::read_to_string(dir.path().join("example_bank.jsonl")).unwrap();
    assert_eq!(examples.lines().count(), 6);
    for line in examples.lines() {
        let example: serde_json::Value = serde_json::from_str(line).unwrap();
        assert!(example["categories"].as_array().is_some_and(|c| !c.is_empty()));
        assert!(example["preceding_context"].is_array());
    }

    let conversations = fs::read_to_string(dir.path().join("conversations.jsonl")).unwrap();
    assert_eq!(conversations.lines().count(), 12);
}

#[test]
fn build_twice_is_byte_identical() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();

    for dir in [&first, &second] {
        chatcorpus()
            .arg("build")
            .arg(chat_fixture())
            .arg("-o")
            .arg(dir.path())
            .assert()
            .success();
    }

    for name in ["parsed_messages.jsonl", "example_bank.jsonl", "conversations.jsonl"] {
        let a = fs::read(first.path().join(name)).unwrap();
        let b = fs::read(second.path().join(name)).unwrap();
        assert_eq!(a, b, "{} differs between runs", name);
    }
}

#[test]
fn missing_input_fails_without_writing() {
    let dir = TempDir::new().unwrap();

    chatcorpus()
        .arg("build")
        .arg(dir.path().join("no-such-export.txt"))
        .arg("-o")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));

    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn bad_config_is_reported() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("broken.toml");
    fs::write(&config, "[segmentation\n").unwrap();

    assert_cmd::Command::cargo_bin("chatcorpus")
        .unwrap()
        .arg("--config")
        .arg(&config)
        .arg("build")
        .arg(chat_fixture())
        .arg("-o")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load config"));
}

// ============================================================================
// Parse and Style Tests
// ============================================================================

#[test]
fn parse_writes_messages_only() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("messages.jsonl");

    chatcorpus()
        .arg("parse")
        .arg(chat_fixture())
        .arg("-o")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Messages: 22"));

    assert_eq!(fs::read_to_string(&out).unwrap().lines().count(), 22);
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn style_writes_profile() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("style.json");

    chatcorpus()
        .arg("style")
        .arg(chat_fixture())
        .arg("-o")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Analyzed 11 of 22 messages"));

    let profile: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(profile["meta"]["assistant"], "I Am All");
    assert_eq!(profile["time_patterns"]["hourly_distribution"]["22:00"], 3);
}

// ============================================================================
// Config and Completions Tests
// ============================================================================

#[test]
fn config_show_prints_effective_values() {
    chatcorpus()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("shared_boundary_line = 15"))
        .stdout(predicate::str::contains("session_gap_secs = 7200"));
}

#[test]
fn config_path_echoes_override() {
    chatcorpus()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn config_init_refuses_to_overwrite() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config.toml");
    let run = |force: bool| {
        let mut cmd = assert_cmd::Command::cargo_bin("chatcorpus").unwrap();
        cmd.arg("--config").arg(&path).args(["config", "init"]);
        if force {
            cmd.arg("--force");
        }
        cmd.assert()
    };

    run(false).success();
    assert!(path.exists());
    run(false)
        .failure()
        .stderr(predicate::str::contains("already exists"));
    run(true).success();

    let written = fs::read_to_string(&path).unwrap();
    assert!(written.contains("[identities]"));
}

#[test]
fn completions_for_bash() {
    chatcorpus()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("chatcorpus"));
}

#[test]
fn out_of_range_window_fails_without_output() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.toml");
    fs::write(&config, "[segmentation]\nsession_gap_secs = 10000000000000000\n").unwrap();

    assert_cmd::Command::cargo_bin("chatcorpus")
        .unwrap()
        .arg("--config")
        .arg(&config)
        .arg("build")
        .arg(chat_fixture())
        .arg("-o")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("session_gap_secs"));

    assert!(!dir.path().join("parsed_messages.jsonl").exists());
}
