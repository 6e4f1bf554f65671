//! Multi-label topic tagging.
//!
//! Each category owns one or more case-insensitive regular expressions and is
//! assigned when any of them matches. Categories are evaluated in a fixed
//! order, which is also the order of the returned labels.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::error::{CorpusError, Result};

/// Label for text no category matches.
pub const GENERAL: &str = "general";

/// A named category and its patterns, as written in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub name: String,
    pub patterns: Vec<String>,
}

impl CategoryRule {
    pub fn new(name: &str, patterns: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            patterns: patterns.iter().map(|p| p.to_string()).collect(),
        }
    }
}

/// Built-in categories for casual Hinglish chat.
pub fn builtin_rules() -> Vec<CategoryRule> {
    vec![
        CategoryRule::new(
            "greeting_morning",
            &[r"good\s*morning", r"subah|subh|suprabhat"],
        ),
        CategoryRule::new("greeting_night", &[r"good\s*night", r"shubh\s*ratri"]),
        CategoryRule::new(
            "greeting_general",
            &[
                r"^(hi|hello|hey|hii+|hlo|helloo+)\b",
                r"^(kya\s*hal|kesi\s*ho|kaisi\s*ho|kaise\s*ho)",
            ],
        ),
        CategoryRule::new(
            "flirting",
            &[
                r"(pyar|love|crush|dil|heart|ishq|pati|wife|husband|shaadi|sindur)",
                r"(cute|beautiful|pretty|hot|sexy|handsome|acch[ai]\s*lag)",
                r"(miss\s*(you|kar)|yaad\s*aa)",
                r"(date|propose|relationship)",
            ],
        ),
        CategoryRule::new(
            "teasing",
            &[
                r"(pagal|bewakoof|stupid|idiot|buddhu|nalayak|chapri)",
                r"(mazak|joke|funny|haha|lol|rofl|😂|🤣|😈)",
                r"(chup|hatt|ja\s*na|dur\s*ho)",
            ],
        ),
        CategoryRule::new(
            "emotional_support",
            &[
                r"(sad|upset|cry|ro\s|rona|dukhi|tension|stress|depres)",
                r"(problem|dikkat|pareshani|worried|anxious)",
                r"(hospital|bimar|sick|health|doctor)",
                r"(care|samjh|understand|support|help\s*kar)",
            ],
        ),
        CategoryRule::new(
            "planning",
            &[
                r"(milte|milna|meet|plan|chalte|chalo|aaja|aao)",
                r"(kal|tomorrow|weekend|sunday|saturday)",
                r"(movie|outing|trip|cafe|restaurant)",
            ],
        ),
        CategoryRule::new(
            "gaming",
            &[
                r"(bgmi|pubg|game|gaming|match|rank|push|classic|tdm)",
                r"(chicken\s*dinner|squad|duo|solo|drop)",
            ],
        ),
        CategoryRule::new(
            "daily_update",
            &[
                r"(kya\s*kar\s*r[ah]|kya\s*ho\s*r[ah]|kya\s*chal\s*r[ah])",
                r"(class|college|school|office|work|assignment|exam|test)",
                r"(khana|breakfast|lunch|dinner|soya|utha|neend)",
            ],
        ),
        CategoryRule::new(
            "compliment",
            &[
                r"(ach+[ai]\s*(h|ho|lag)|nice|great|amazing|awesome)",
                r"(smart|intelligent|talented|best)",
            ],
        ),
        CategoryRule::new(
            "argument",
            &[
                r"(gussa|angry|naraz|fight|ladai|jhagda)",
                r"(sorry|maaf|galti|mistake)",
                r"(block|ignore|seen|reply\s*nahi|baat\s*nahi)",
            ],
        ),
        CategoryRule::new(
            "philosophy",
            &[
                r"(life|zindagi|destiny|kismat|bhagwan|god)",
                r"(future|career|dream|goal|success)",
                r"(believe|sochta|think|opinion|perspective)",
            ],
        ),
        CategoryRule::new(
            "media_reaction",
            &[
                r"(song|gaana|movie|film|show|series|reel|meme)",
                r"(insta|instagram|youtube|yt|spotify)",
            ],
        ),
    ]
}

struct CompiledCategory {
    name: String,
    patterns: Vec<Regex>,
}

impl CompiledCategory {
    fn matches(&self, text: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(text))
    }
}

/// Assigns category labels to text.
pub struct CategoryTagger {
    categories: Vec<CompiledCategory>,
}

impl CategoryTagger {
    /// Compile `rules` in order.
    pub fn new(rules: Vec<CategoryRule>) -> Result<Self> {
        let categories = rules
            .into_iter()
            .map(|rule| {
                let patterns = rule
                    .patterns
                    .iter()
                    .map(|pattern| {
                        RegexBuilder::new(pattern)
                            .case_insensitive(true)
                            .build()
                            .map_err(|source| CorpusError::InvalidPattern {
                                category: rule.name.clone(),
                                source,
                            })
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(CompiledCategory {
                    name: rule.name,
                    patterns,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { categories })
    }

    /// The built-in categories followed by `custom` ones.
    pub fn with_custom(custom: &[CategoryRule]) -> Result<Self> {
        let mut rules = builtin_rules();
        rules.extend(custom.iter().cloned());
        Self::new(rules)
    }

    /// Category names in evaluation order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.name.as_str())
    }

    /// Every matching category, or `["general"]` when none match.
    pub fn tag(&self, text: &str) -> Vec<String> {
        let mut labels: Vec<String> = Vec::new();
        for category in &self.categories {
            if category.matches(text) && !labels.iter().any(|l| *l == category.name) {
                labels.push(category.name.clone());
            }
        }
        if labels.is_empty() {
            labels.push(GENERAL.to_string());
        }
        labels
    }
}
