//! Shared fixtures for integration tests

use std::path::PathBuf;

use assert_cmd::Command;
use chatcorpus::Config;

/// Directory holding test fixtures.
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

/// Sample export with two chats and a re-exported region.
pub fn chat_fixture() -> PathBuf {
    fixtures_dir().join("chat.txt")
}

/// Config matching the identities and line layout of [`chat_fixture`].
pub fn config_fixture() -> PathBuf {
    fixtures_dir().join("config.toml")
}

pub fn load_chat() -> String {
    std::fs::read_to_string(chat_fixture()).expect("Failed to read chat fixture")
}

pub fn load_config() -> Config {
    Config::load_from(&config_fixture()).expect("Failed to load config fixture")
}

/// The binary, pointed at the fixture config and with logging silenced.
pub fn chatcorpus() -> Command {
    let mut cmd = Command::cargo_bin("chatcorpus").expect("binary should be built");
    cmd.arg("--config")
        .arg(config_fixture())
        .env_remove("CHATCORPUS_LOG");
    cmd
}
