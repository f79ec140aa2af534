/*!
 * Database entity models and DTOs.
 *
 * These structures map directly to the vocabulary table and provide
 * type-safe access to persisted data.
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// Filter value that disables filtering on an axis
pub const ALL_SENTINELS: [&str; 2] = ["all", "todos"];

/// Learning status of a word
///
/// Any label is accepted and stored verbatim; the named variants only cover
/// the labels the application itself writes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum LearningStatus {
    /// Word was just looked up for the first time
    #[default]
    New,
    /// Learner is actively studying the word
    Learning,
    /// Learner marked the word as known
    Known,
    /// Any other label set by the user
    Custom(String),
}

impl LearningStatus {
    /// The stored label
    pub fn as_str(&self) -> &str {
        match self {
            LearningStatus::New => "new",
            LearningStatus::Learning => "learning",
            LearningStatus::Known => "known",
            LearningStatus::Custom(label) => label,
        }
    }
}

impl fmt::Display for LearningStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for LearningStatus {
    fn from(s: &str) -> Self {
        match s {
            "new" => LearningStatus::New,
            "learning" => LearningStatus::Learning,
            "known" => LearningStatus::Known,
            other => LearningStatus::Custom(other.to_string()),
        }
    }
}

impl From<String> for LearningStatus {
    fn from(s: String) -> Self {
        LearningStatus::from(s.as_str())
    }
}

impl Serialize for LearningStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for LearningStatus {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(LearningStatus::from(label))
    }
}

/// Source/target language pair, written as `src-tgt` (e.g. `ko-es`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguagePair {
    /// Source language code
    pub source: String,
    /// Target language code
    pub target: String,
}

impl LanguagePair {
    /// Create a new language pair
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

impl fmt::Display for LanguagePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.source, self.target)
    }
}

impl std::str::FromStr for LanguagePair {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('-') {
            Some((source, target)) if !source.is_empty() && !target.is_empty() => {
                Ok(LanguagePair::new(source, target))
            }
            _ => Err(anyhow::anyhow!(
                "Invalid language pair '{}', expected 'source-target'",
                s
            )),
        }
    }
}

/// Vocabulary table record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VocabularyRecord {
    /// Normalized word text
    pub word_text: String,
    /// Source language code
    pub source_language: String,
    /// Target language code
    pub target_language: String,
    /// Translation, if one was stored
    pub translation: Option<String>,
    /// Learning status label
    pub learning_status: LearningStatus,
}

/// Result of looking up a single word
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordLookup {
    /// Stored translation
    pub translation: Option<String>,
    /// Stored learning status
    pub status: LearningStatus,
}

/// Optional filters for listing the vocabulary
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VocabularyFilter {
    /// Only rows with this status
    pub status: Option<LearningStatus>,
    /// Only rows with exactly this source and target language
    pub language_pair: Option<LanguagePair>,
}

impl VocabularyFilter {
    /// Build a filter from raw request values.
    ///
    /// Missing, empty and "all" values (`all`, `todos`) disable the axis.
    pub fn from_query(status: Option<&str>, language_pair: Option<&str>) -> anyhow::Result<Self> {
        let status = active_value(status).map(LearningStatus::from);
        let language_pair = match active_value(language_pair) {
            Some(pair) => Some(pair.parse()?),
            None => None,
        };

        Ok(Self {
            status,
            language_pair,
        })
    }
}

fn active_value(value: Option<&str>) -> Option<&str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && !ALL_SENTINELS.contains(&v.to_lowercase().as_str()))
}
