use axum::{
    extract::{multipart::MultipartRejection, Multipart, Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{
        ActivitiesResponse, ActivityResponse, CatalogStats, InputSource, RecommendationResponse,
        TextRecommendationRequest,
    },
    services::{recommendations, scorer::ScoringWeights},
};

use super::AppState;

/// Multipart field carrying the audio clip
pub const AUDIO_FIELD: &str = "audio_file";

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct AudioQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct SystemInfo {
    pub speech_processor: String,
    pub intent_extractor: String,
    pub recommender: String,
    pub mood_labels: Vec<&'static str>,
    pub scoring_weights: ScoringWeights,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub dataset_stats: CatalogStats,
    pub system_info: SystemInfo,
}

// Handlers

/// Service information and available endpoints
pub async fn root() -> Json<Value> {
    Json(json!({
        "message": "Activity Recommendation Service",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "/health": "Health check",
            "/recommend/text": "Get recommendations from text input",
            "/recommend/audio": "Get recommendations from an audio clip",
            "/stats": "Catalog statistics",
            "/activities": "Browse all activities"
        },
        "status": "running"
    }))
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let transcriber = state
        .transcriber
        .as_ref()
        .map(|t| t.name().to_string())
        .unwrap_or_else(|| "not configured".to_string());

    Json(json!({
        "status": "healthy",
        "components": {
            "catalog": format!("loaded ({} activities)", state.catalog.len()),
            "intent_extractor": "loaded",
            "transcriber": transcriber
        }
    }))
}

/// Recommend activities for a typed utterance
pub async fn recommend_text(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<TextRecommendationRequest>,
) -> AppResult<Json<RecommendationResponse>> {
    tracing::info!(
        request_id = %request_id,
        text_len = request.text.len(),
        "Processing text recommendation request"
    );

    let limit = recommendations::resolve_limit(request.limit, state.default_limit)?;
    let response = recommendations::recommend_from_text(
        &state.extractor,
        &state.catalog,
        &request.text,
        limit,
        InputSource::Text,
    )?;

    Ok(Json(response))
}

/// Recommend activities for a spoken utterance uploaded as the `audio_file`
/// field of a multipart form
pub async fn recommend_audio(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(query): Query<AudioQuery>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<RecommendationResponse>> {
    let transcriber = state
        .transcriber
        .clone()
        .ok_or(AppError::TranscriptionUnavailable)?;

    let limit = recommendations::resolve_limit(query.limit, state.default_limit)?;

    let mut multipart = multipart.map_err(|rejection| AppError::InvalidInput(rejection.body_text()))?;
    let upload = read_audio_upload(&mut multipart).await?;

    tracing::info!(
        request_id = %request_id,
        file_name = ?upload.file_name,
        content_type = %upload.content_type,
        audio_bytes = upload.audio.len(),
        "Processing audio recommendation request"
    );

    let response = recommendations::recommend_from_audio(
        transcriber.as_ref(),
        &state.extractor,
        &state.catalog,
        upload.audio,
        &upload.content_type,
        limit,
    )
    .await?;

    Ok(Json(response))
}

struct AudioUpload {
    file_name: Option<String>,
    content_type: String,
    audio: Vec<u8>,
}

/// Reads the first `audio_file` field; other fields are skipped
async fn read_audio_upload(multipart: &mut Multipart) -> AppResult<AudioUpload> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(AUDIO_FIELD) {
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().unwrap_or_default().to_string();
        let audio = field.bytes().await?;

        return Ok(AudioUpload {
            file_name,
            content_type,
            audio: audio.to_vec(),
        });
    }

    Err(AppError::InvalidInput(format!(
        "Missing '{}' file field",
        AUDIO_FIELD
    )))
}

/// List the whole catalog
pub async fn get_activities(State(state): State<AppState>) -> Json<ActivitiesResponse> {
    let activities: Vec<ActivityResponse> =
        state.catalog.all().iter().map(ActivityResponse::from).collect();

    Json(ActivitiesResponse {
        total_count: activities.len(),
        activities,
    })
}

/// Catalog statistics and a description of the pipeline
pub async fn get_stats(State(state): State<AppState>) -> Json<StatsResponse> {
    let tables = state.extractor.tables();

    Json(StatsResponse {
        dataset_stats: state.catalog.stats(),
        system_info: SystemInfo {
            speech_processor: state
                .transcriber
                .as_ref()
                .map(|t| t.name().to_string())
                .unwrap_or_else(|| "not configured".to_string()),
            intent_extractor: format!(
                "keyword tables ({} mood groups, {} activity types, {} stop words)",
                tables.mood_groups.len(),
                tables.activity_type_groups.len(),
                tables.stop_words.len()
            ),
            recommender: "weighted mood, keyword and duration scoring".to_string(),
            mood_labels: tables.mood_groups.iter().map(|g| g.label).collect(),
            scoring_weights: ScoringWeights::DEFAULT,
        },
    })
}
