//! Configuration for the corpus pipeline.
//!
//! Every threshold, identity and output name the pipeline uses lives here and is
//! handed to [`crate::Pipeline::new`]. Missing fields fall back to the defaults,
//! so a config file only needs the values it wants to change.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CorpusError, Result};
use crate::pipeline::CategoryRule;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub identities: IdentityConfig,
    pub segmentation: SegmentationConfig,
    pub extraction: ExtractionConfig,
    pub quality: QualityConfig,
    pub tagging: TaggingConfig,
    pub style: StyleConfig,
    pub output: OutputConfig,
}

impl Config {
    /// Load config from the default location, or defaults if no file exists.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load config from an explicit path. The file must exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| CorpusError::ReadInput {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|e| CorpusError::InvalidConfig {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        config.validate().map_err(|e| CorpusError::InvalidConfig {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(config)
    }

    /// Check values that parse as TOML but cannot be used.
    pub fn validate(&self) -> Result<()> {
        self.segmentation.session_gap()?;
        self.segmentation.burst_window()?;
        Ok(())
    }

    /// Default config file location (`<config dir>/chatcorpus/config.toml`).
    pub fn config_path() -> Result<PathBuf> {
        let dir = dirs::config_dir().ok_or(CorpusError::NoConfigDir)?;
        Ok(dir.join("chatcorpus").join("config.toml"))
    }

    /// Serialize as pretty TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| CorpusError::InvalidConfig {
            path: PathBuf::from("<memory>"),
            message: e.to_string(),
        })
    }

    /// Write the config to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = self.to_toml()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| CorpusError::WriteOutput {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(path, content).map_err(|source| CorpusError::WriteOutput {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Who is who in the export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    /// Sender name whose replies become example responses.
    pub assistant: String,
    /// Human name used in rendered system prompts.
    pub assistant_name: String,
    /// Last raw line that still belongs to the first partner's chat.
    /// The assistant appears in both chats, so its chat is decided by position.
    pub shared_boundary_line: usize,
    /// First raw line of the re-exported (duplicate) region, if any.
    pub duplicate_region_start: Option<usize>,
    /// Chat partners, in export order.
    pub partners: Vec<PartnerConfig>,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            assistant: "I Am All".to_string(),
            assistant_name: "Ayush".to_string(),
            shared_boundary_line: 21926,
            duplicate_region_start: Some(32925),
            partners: vec![
                PartnerConfig {
                    sender: "Class Cr".to_string(),
                    chat_id: "class_cr".to_string(),
                    display_name: "Class Cr".to_string(),
                    relationship: "casual college friend, light banter".to_string(),
                },
                PartnerConfig {
                    sender: "shubha 2 Kritika, May".to_string(),
                    chat_id: "shubhi".to_string(),
                    display_name: "Shubhi".to_string(),
                    relationship: "romantic interest, deeper emotional connection".to_string(),
                },
            ],
        }
    }
}

/// A chat partner and the conversation they own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartnerConfig {
    /// Sender name exactly as it appears in the export.
    pub sender: String,
    /// Identifier written to `chat_id` fields.
    pub chat_id: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub relationship: String,
}

/// Temporal windowing thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentationConfig {
    /// Silence longer than this starts a new session.
    pub session_gap_secs: u64,
    /// Same-sender messages at most this far apart form one turn.
    pub burst_window_secs: u64,
    /// Sessions with fewer raw messages are not mined for examples.
    pub min_session_messages: usize,
}

impl SegmentationConfig {
    pub fn session_gap(&self) -> Result<chrono::Duration> {
        seconds("segmentation.session_gap_secs", self.session_gap_secs)
    }

    pub fn burst_window(&self) -> Result<chrono::Duration> {
        seconds("segmentation.burst_window_secs", self.burst_window_secs)
    }
}

fn seconds(field: &'static str, value: u64) -> Result<chrono::Duration> {
    i64::try_from(value)
        .ok()
        .and_then(chrono::Duration::try_seconds)
        .ok_or(CorpusError::OutOfRange { field, value })
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            session_gap_secs: 2 * 60 * 60,
            burst_window_secs: 60,
            min_session_messages: 3,
        }
    }
}

/// Context window sizes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Turns kept in an example's `preceding_context`.
    pub preceding_window: usize,
    /// Prior turns included in each sliding-window conversation record.
    pub conversation_window: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            preceding_window: 5,
            conversation_window: 10,
        }
    }
}

/// Example quality thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityConfig {
    pub min_response_chars: usize,
    /// Acknowledgement words that carry no content on their own.
    pub filler_words: Vec<String>,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            min_response_chars: 2,
            filler_words: ["ha", "hmm", "ok", "ook", "hm", "mm"]
                .iter()
                .map(|w| w.to_string())
                .collect(),
        }
    }
}

/// Extra categories appended after the built-in ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaggingConfig {
    pub custom: Vec<CategoryRule>,
}

/// Personal spellings tracked by the style profile, as `(spelling, standard)`.
const SPELLING_PAIRS: &[(&str, &str)] = &[
    ("h", "hai"),
    ("nhi", "nahi"),
    ("Or", "aur"),
    ("Ha", "haan"),
    ("aacha", "accha"),
    ("phele", "pehle"),
    ("kyuch", "kuch"),
    ("thik", "theek"),
    ("to", "toh"),
    ("kesi", "kaisi"),
    ("hme", "humein"),
    ("kro", "karo"),
    ("krta", "karta"),
    ("krti", "karti"),
    ("krna", "karna"),
    ("krne", "karne"),
    ("kya", "kya"),
    ("bhi", "bhi"),
    ("me", "mein"),
    ("bol", "bol"),
    ("btao", "batao"),
    ("Ho", "ho"),
    ("jao", "jao"),
    ("aao", "aao"),
    ("sab", "sab"),
    ("rha", "raha"),
    ("rahi", "rahi"),
    ("rah", "raha"),
    ("isake", "iske"),
    ("teri", "teri"),
    ("meri", "meri"),
    ("Hmm", "hmm"),
    ("Ook", "ok"),
    ("Sahi", "sahi"),
];

/// Style profile settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Case-sensitive spellings looked up in the assistant's words.
    pub spelling_pairs: Vec<SpellingPair>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpellingPair {
    pub spelling: String,
    pub standard: String,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            spelling_pairs: SPELLING_PAIRS
                .iter()
                .map(|(spelling, standard)| SpellingPair {
                    spelling: spelling.to_string(),
                    standard: standard.to_string(),
                })
                .collect(),
        }
    }
}

/// Output file names and the conversation system prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub parsed_file: String,
    pub examples_file: String,
    pub conversations_file: String,
    pub style_file: String,
    /// Template with `{assistant_name}`, `{partner_name}` and
    /// `{relationship_type}` placeholders.
    pub system_prompt: String,
}

const DEFAULT_SYSTEM_PROMPT: &str = "You are {assistant_name}, texting with {partner_name} \
(relationship: {relationship_type}). Reply exactly the way {assistant_name} does: short \
messages, the same spelling and emoji habits, and [MSG_BREAK] between the separate \
messages of a burst.";

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            parsed_file: "parsed_messages.jsonl".to_string(),
            examples_file: "example_bank.jsonl".to_string(),
            conversations_file: "conversations.jsonl".to_string(),
            style_file: "style_profile.json".to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_roundtrips_through_toml() {
        let config = Config::default();
        let text = config.to_toml().unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let parsed: Config = toml::from_str(
            r#"
[segmentation]
burst_window_secs = 30
"#,
        )
        .unwrap();

        assert_eq!(parsed.segmentation.burst_window_secs, 30);
        assert_eq!(parsed.segmentation.session_gap_secs, 7200);
        assert_eq!(parsed.identities.assistant, "I Am All");
        assert_eq!(parsed.quality.filler_words.len(), 6);
        assert_eq!(parsed.style.spelling_pairs[0].spelling, "h");
    }

    #[test]
    fn durations_follow_seconds() {
        let seg = SegmentationConfig::default();
        assert_eq!(seg.session_gap().unwrap(), chrono::Duration::hours(2));
        assert_eq!(seg.burst_window().unwrap(), chrono::Duration::seconds(60));
    }

    #[test]
    fn oversized_gap_is_rejected() {
        let parsed: Config =
            toml::from_str("[segmentation]\nsession_gap_secs = 10000000000000000\n").unwrap();
        let err = parsed.segmentation.session_gap().unwrap_err();
        assert!(matches!(
            err,
            CorpusError::OutOfRange {
                field: "segmentation.session_gap_secs",
                ..
            }
        ));

        let mut seg = SegmentationConfig::default();
        seg.burst_window_secs = u64::MAX;
        assert!(seg.burst_window().is_err());
    }

    #[test]
    fn load_from_rejects_out_of_range_durations() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[segmentation]\nburst_window_secs = 10000000000000000\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        match err {
            CorpusError::InvalidConfig { message, .. } => {
                assert!(message.contains("segmentation.burst_window_secs"), "{message}");
            }
            other => panic!("expected InvalidConfig, got {other:?}"),
        }
    }

    #[test]
    fn load_from_reports_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[segmentation\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, CorpusError::InvalidConfig { .. }));
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = Config::default();
        config.extraction.preceding_window = 3;

        config.save_to(&path).unwrap();
        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.extraction.preceding_window, 3);
    }
}
