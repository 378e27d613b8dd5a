use std::cmp::Ordering;

use serde::Serialize;
use thiserror::Error;

use crate::models::{
    Activity, DurationFit, Intent, MatchRationale, MoodMatch, Recommendation, ScoreBreakdown,
};

/// Raised when a caller asks for a non-positive number of recommendations
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("Limit must be a positive integer, got {limit}")]
pub struct InvalidLimitError {
    pub limit: i64,
}

/// Weights of the additive match score
///
/// With the default weights the score can never exceed 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoringWeights {
    /// Intent mood equals the activity mood
    pub mood_match: f64,
    /// Intent mood is unknown
    pub mood_neutral: f64,
    /// Scaled by the share of the activity's tags found in the keywords
    pub keyword_overlap: f64,
    /// Activity duration within tolerance of the requested duration
    pub duration_fit: f64,
    /// No duration was requested
    pub duration_unconstrained: f64,
    /// Maximum distance in minutes that still counts as a fit
    pub duration_tolerance_minutes: u32,
}

impl ScoringWeights {
    pub const MOOD_MATCH: f64 = 0.5;
    pub const MOOD_NEUTRAL: f64 = 0.1;
    pub const KEYWORD_OVERLAP: f64 = 0.4;
    pub const DURATION_FIT: f64 = 0.1;
    pub const DURATION_UNCONSTRAINED: f64 = 0.05;
    pub const DURATION_TOLERANCE_MINUTES: u32 = 10;

    pub const DEFAULT: ScoringWeights = ScoringWeights {
        mood_match: Self::MOOD_MATCH,
        mood_neutral: Self::MOOD_NEUTRAL,
        keyword_overlap: Self::KEYWORD_OVERLAP,
        duration_fit: Self::DURATION_FIT,
        duration_unconstrained: Self::DURATION_UNCONSTRAINED,
        duration_tolerance_minutes: Self::DURATION_TOLERANCE_MINUTES,
    };
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Ranks catalog activities against an intent using the default weights
///
/// Returns at most `limit` recommendations sorted by descending score; equal
/// scores keep catalog order. Zero-score activities are kept.
pub fn recommend<'a>(
    intent: &Intent,
    catalog: &'a [Activity],
    limit: usize,
) -> Result<Vec<Recommendation<'a>>, InvalidLimitError> {
    recommend_with_weights(intent, catalog, limit, &ScoringWeights::DEFAULT)
}

/// Ranks catalog activities against an intent using explicit weights
pub fn recommend_with_weights<'a>(
    intent: &Intent,
    catalog: &'a [Activity],
    limit: usize,
    weights: &ScoringWeights,
) -> Result<Vec<Recommendation<'a>>, InvalidLimitError> {
    if limit == 0 {
        return Err(InvalidLimitError { limit: 0 });
    }

    let mut ranked: Vec<Recommendation<'a>> = catalog
        .iter()
        .enumerate()
        .map(|(index, activity)| score_activity(intent, activity, index, weights))
        .collect();

    ranked.sort_by(rank_order);
    ranked.truncate(limit);

    Ok(ranked)
}

/// Scores a single activity
pub fn score_activity<'a>(
    intent: &Intent,
    activity: &'a Activity,
    catalog_index: usize,
    weights: &ScoringWeights,
) -> Recommendation<'a> {
    let (mood, mood_score) = if intent.mood == activity.mood {
        (MoodMatch::Exact, weights.mood_match)
    } else if intent.is_mood_unknown() {
        (MoodMatch::Neutral, weights.mood_neutral)
    } else {
        (MoodMatch::Mismatch, 0.0)
    };

    let (matched_tags, unmatched_tags): (Vec<String>, Vec<String>) = activity
        .tags
        .iter()
        .cloned()
        .partition(|tag| intent.keywords.contains(tag));
    let keyword_score = weights.keyword_overlap * matched_tags.len() as f64
        / activity.tags.len().max(1) as f64;

    let (duration, duration_score) = match intent.duration_minutes {
        Some(requested) => {
            if activity.duration_minutes.abs_diff(requested) <= weights.duration_tolerance_minutes {
                (DurationFit::Within, weights.duration_fit)
            } else {
                (DurationFit::Outside, 0.0)
            }
        }
        None => (DurationFit::Unconstrained, weights.duration_unconstrained),
    };

    let breakdown = ScoreBreakdown {
        mood: mood_score,
        keywords: keyword_score,
        duration: duration_score,
    };

    Recommendation {
        activity,
        catalog_index,
        score: breakdown.total(),
        rationale: MatchRationale {
            mood,
            matched_tags,
            unmatched_tags,
            duration,
            breakdown,
        },
    }
}

/// Descending score, then ascending catalog index
pub fn rank_order(a: &Recommendation<'_>, b: &Recommendation<'_>) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.catalog_index.cmp(&b.catalog_index))
}
