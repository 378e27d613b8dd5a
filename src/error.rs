use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::services::{intent::EmptyInputError, scorer::InvalidLimitError};

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    EmptyInput(#[from] EmptyInputError),

    #[error(transparent)]
    InvalidLimit(#[from] InvalidLimitError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid multipart upload: {0}")]
    Multipart(#[from] MultipartError),

    #[error("Transcription failed: {0}")]
    Transcription(String),

    #[error("Transcription is not configured")]
    TranscriptionUnavailable,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::EmptyInput(_)
            | AppError::InvalidLimit(_)
            | AppError::InvalidInput(_)
            | AppError::Transcription(_) => StatusCode::BAD_REQUEST,
            AppError::Multipart(err) => err.status(),
            AppError::TranscriptionUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            AppError::HttpClient(_) => StatusCode::BAD_GATEWAY,
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::warn!(error = %self, "Request rejected");
        }

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
