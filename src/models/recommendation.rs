use serde::Serialize;

use super::Activity;

/// How the intent's mood related to the activity's mood
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MoodMatch {
    Exact,
    /// Intent mood was unknown, so neutral credit applied
    Neutral,
    Mismatch,
}

/// How the activity's duration related to the requested time budget
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DurationFit {
    Within,
    Outside,
    /// No duration was requested
    Unconstrained,
}

/// Per-term contributions to a match score
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Default)]
pub struct ScoreBreakdown {
    pub mood: f64,
    pub keywords: f64,
    pub duration: f64,
}

impl ScoreBreakdown {
    pub fn total(&self) -> f64 {
        self.mood + self.keywords + self.duration
    }
}

/// Which parts of the intent contributed to a score
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MatchRationale {
    pub mood: MoodMatch,
    pub matched_tags: Vec<String>,
    pub unmatched_tags: Vec<String>,
    pub duration: DurationFit,
    pub breakdown: ScoreBreakdown,
}

/// A scored catalog entry
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Recommendation<'a> {
    pub activity: &'a Activity,
    /// Position of the activity in the catalog, used as tie-break
    pub catalog_index: usize,
    pub score: f64,
    pub rationale: MatchRationale,
}
