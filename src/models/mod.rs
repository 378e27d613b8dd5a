use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub mod activity;
pub mod intent;
pub mod recommendation;

pub use activity::{Activity, Category};
pub use intent::{Intent, TimePreference, Urgency, UNKNOWN_MOOD};
pub use recommendation::{DurationFit, MatchRationale, MoodMatch, Recommendation, ScoreBreakdown};

/// Request body for text recommendations
#[derive(Debug, Deserialize)]
pub struct TextRecommendationRequest {
    pub text: String,
    /// Maximum number of recommendations; falls back to the configured default
    #[serde(default)]
    pub limit: Option<i64>,
}

/// Where the text fed to the extractor came from
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "input_type", rename_all = "lowercase")]
pub enum InputSource {
    Text,
    Audio { transcribed_text: String },
}

/// A recommendation as returned to the client
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RecommendedActivity {
    pub id: usize,
    pub activity: String,
    pub category: Category,
    pub mood: String,
    pub tags: Vec<String>,
    pub time_minutes: u32,
    pub score: f64,
    pub rationale: MatchRationale,
}

impl From<&Recommendation<'_>> for RecommendedActivity {
    fn from(rec: &Recommendation<'_>) -> Self {
        Self {
            id: rec.activity.id,
            activity: rec.activity.description.clone(),
            category: rec.activity.category.clone(),
            mood: rec.activity.mood.clone(),
            tags: rec.activity.tags.iter().cloned().collect(),
            time_minutes: rec.activity.duration_minutes,
            score: rec.score,
            rationale: rec.rationale.clone(),
        }
    }
}

/// Bookkeeping about how a response was produced
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProcessingInfo {
    #[serde(flatten)]
    pub source: InputSource,
    pub recommendations_count: usize,
    pub generated_at: DateTime<Utc>,
}

/// Response for both text and audio recommendation endpoints
#[derive(Debug, Clone, Serialize)]
pub struct RecommendationResponse {
    pub recommendations: Vec<RecommendedActivity>,
    pub intent_summary: String,
    pub intent: Intent,
    pub processing_info: ProcessingInfo,
}

/// Catalog entry as listed by `GET /activities`
#[derive(Debug, Clone, Serialize)]
pub struct ActivityResponse {
    pub id: usize,
    pub activity: String,
    pub category: Category,
    pub mood: String,
    pub tags: Vec<String>,
    pub time_minutes: u32,
}

impl From<&Activity> for ActivityResponse {
    fn from(activity: &Activity) -> Self {
        Self {
            id: activity.id,
            activity: activity.description.clone(),
            category: activity.category.clone(),
            mood: activity.mood.clone(),
            tags: activity.tags.iter().cloned().collect(),
            time_minutes: activity.duration_minutes,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ActivitiesResponse {
    pub activities: Vec<ActivityResponse>,
    pub total_count: usize,
}

/// Inclusive duration bounds of the catalog
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct TimeRange {
    pub min: u32,
    pub max: u32,
}

/// Summary statistics over the loaded catalog
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CatalogStats {
    pub total_activities: usize,
    pub categories: BTreeMap<String, usize>,
    pub moods: BTreeMap<String, usize>,
    /// Mean duration in minutes; absent for an empty catalog
    pub avg_time: Option<f64>,
    pub time_range: Option<TimeRange>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_activity() -> Activity {
        Activity {
            id: 3,
            description: "Listen to calming music".to_string(),
            category: Category::Wellness,
            tags: ["music", "relaxing"].iter().map(|t| t.to_string()).collect(),
            mood: "relaxed".to_string(),
            duration_minutes: 30,
        }
    }

    #[test]
    fn test_recommended_activity_from_recommendation() {
        let activity = sample_activity();
        let rec = Recommendation {
            activity: &activity,
            catalog_index: 2,
            score: 0.75,
            rationale: MatchRationale {
                mood: MoodMatch::Exact,
                matched_tags: vec!["music".to_string()],
                unmatched_tags: vec!["relaxing".to_string()],
                duration: DurationFit::Unconstrained,
                breakdown: ScoreBreakdown {
                    mood: 0.5,
                    keywords: 0.2,
                    duration: 0.05,
                },
            },
        };

        let dto = RecommendedActivity::from(&rec);
        assert_eq!(dto.id, 3);
        assert_eq!(dto.activity, "Listen to calming music");
        assert_eq!(dto.tags, vec!["music".to_string(), "relaxing".to_string()]);
        assert_eq!(dto.time_minutes, 30);
        assert_eq!(dto.score, 0.75);
    }

    #[test]
    fn test_processing_info_flattens_input_source() {
        let info = ProcessingInfo {
            source: InputSource::Audio {
                transcribed_text: "I am bored".to_string(),
            },
            recommendations_count: 2,
            generated_at: Utc::now(),
        };

        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["input_type"], "audio");
        assert_eq!(json["transcribed_text"], "I am bored");
        assert_eq!(json["recommendations_count"], 2);
    }

    #[test]
    fn test_text_request_limit_is_optional() {
        let request: TextRecommendationRequest =
            serde_json::from_str(r#"{"text": "something fun"}"#).unwrap();
        assert_eq!(request.text, "something fun");
        assert_eq!(request.limit, None);
    }
}
