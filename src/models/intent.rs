use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Mood label used when no mood keyword group matched
pub const UNKNOWN_MOOD: &str = "unknown";

/// How soon the user wants to start
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    High,
    Medium,
    Low,
}

impl Urgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::High => "high",
            Urgency::Medium => "medium",
            Urgency::Low => "low",
        }
    }
}

/// Time budget named without a number, as in "something quick"
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TimePreference {
    Quick,
    Medium,
    Long,
    AllDay,
}

impl TimePreference {
    /// Rough range in minutes
    pub fn range_label(&self) -> &'static str {
        match self {
            TimePreference::Quick => "15-30",
            TimePreference::Medium => "30-60",
            TimePreference::Long => "60-120",
            TimePreference::AllDay => "120+",
        }
    }
}

/// Structured reading of a single user utterance
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Intent {
    /// Canonical mood label, or `"unknown"`
    pub mood: String,
    /// Requested time budget; `None` when the utterance names no duration
    pub duration_minutes: Option<u32>,
    /// Qualitative time phrase; informational only, never fills `duration_minutes`
    #[serde(default)]
    pub time_preference: Option<TimePreference>,
    /// Lower-cased content words with stop words removed
    pub keywords: BTreeSet<String>,
    /// Coarse activity types hinted at by the utterance, in table order
    pub activity_types: Vec<String>,
    pub urgency: Urgency,
}

impl Intent {
    pub fn is_mood_unknown(&self) -> bool {
        self.mood == UNKNOWN_MOOD
    }

    /// One-line human readable description of the intent
    pub fn summary(&self) -> String {
        let time = match (self.duration_minutes, self.time_preference) {
            (Some(minutes), _) => format!("{} minutes", minutes),
            (None, Some(preference)) => format!("{} minutes", preference.range_label()),
            (None, None) => "any".to_string(),
        };
        let types = if self.activity_types.is_empty() {
            "general".to_string()
        } else {
            self.activity_types.join(", ")
        };

        format!(
            "Mood: {} | Time: {} | Types: {} | Urgency: {}",
            self.mood,
            time,
            types,
            self.urgency.as_str()
        )
    }
}
