use chrono::Utc;

use crate::{
    error::AppResult,
    models::{InputSource, ProcessingInfo, RecommendationResponse, RecommendedActivity},
    services::{
        catalog::ActivityCatalog,
        intent::IntentExtractor,
        scorer::{self, InvalidLimitError},
        transcription::{validate_audio, Transcriber},
    },
};

/// Turns an optional client-supplied limit into a positive count
pub fn resolve_limit(requested: Option<i64>, default: usize) -> Result<usize, InvalidLimitError> {
    match requested {
        None => Ok(default),
        Some(limit) if limit > 0 => usize::try_from(limit).map_err(|_| InvalidLimitError { limit }),
        Some(limit) => Err(InvalidLimitError { limit }),
    }
}

/// Generates personalized activity recommendations from an utterance
///
/// Extracts the intent from `text`, ranks the whole catalog against it and
/// wraps the top `limit` entries together with an intent summary.
pub fn recommend_from_text(
    extractor: &IntentExtractor,
    catalog: &ActivityCatalog,
    text: &str,
    limit: usize,
    source: InputSource,
) -> AppResult<RecommendationResponse> {
    let intent = extractor.extract(text)?;

    tracing::info!(
        mood = %intent.mood,
        duration_minutes = ?intent.duration_minutes,
        keywords = ?intent.keywords,
        "Intent extracted"
    );

    let ranked = scorer::recommend(&intent, catalog.all(), limit)?;
    let recommendations: Vec<RecommendedActivity> =
        ranked.iter().map(RecommendedActivity::from).collect();

    tracing::info!(
        count = recommendations.len(),
        top_score = ?recommendations.first().map(|r| r.score),
        "Generated recommendations"
    );

    Ok(RecommendationResponse {
        intent_summary: intent.summary(),
        processing_info: ProcessingInfo {
            source,
            recommendations_count: recommendations.len(),
            generated_at: Utc::now(),
        },
        recommendations,
        intent,
    })
}

/// Transcribes an audio clip and recommends activities for the resulting text
pub async fn recommend_from_audio(
    transcriber: &dyn Transcriber,
    extractor: &IntentExtractor,
    catalog: &ActivityCatalog,
    audio: Vec<u8>,
    content_type: &str,
    limit: usize,
) -> AppResult<RecommendationResponse> {
    validate_audio(content_type, audio.len())?;

    let transcribed_text = transcriber.transcribe(audio, content_type).await?;

    tracing::info!(
        backend = transcriber.name(),
        transcribed_text = %transcribed_text,
        "Audio transcribed"
    );

    recommend_from_text(
        extractor,
        catalog,
        &transcribed_text,
        limit,
        InputSource::Audio {
            transcribed_text: transcribed_text.clone(),
        },
    )
}
