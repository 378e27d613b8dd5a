use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::request_id::{make_span_with_request_id, request_id_middleware};

use super::handlers;
use super::AppState;

/// Largest audio upload accepted by `/recommend/audio`
pub const MAX_AUDIO_BYTES: usize = 25 * 1024 * 1024;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        // Recommendations
        .route("/recommend/text", post(handlers::recommend_text))
        .route(
            "/recommend/audio",
            post(handlers::recommend_audio).layer(DefaultBodyLimit::max(MAX_AUDIO_BYTES)),
        )
        // Catalog
        .route("/activities", get(handlers::get_activities))
        .route("/stats", get(handlers::get_stats))
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
