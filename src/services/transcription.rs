//! Speech-to-text adapter
//!
//! The recommendation core only ever sees finished text. Audio is handed to a
//! [`Transcriber`]; anything it cannot turn into non-blank text is reported as
//! an input error and extraction is never attempted.

use reqwest::{
    multipart::{Form, Part},
    Client as HttpClient,
};
use serde::Deserialize;

use crate::error::{AppError, AppResult};

/// Audio formats accepted by the audio endpoint
pub const ALLOWED_CONTENT_TYPES: &[&str] = &[
    "audio/wav",
    "audio/x-wav",
    "audio/mpeg",
    "audio/mp4",
    "audio/ogg",
    "audio/webm",
];

/// Trait for speech-to-text backends
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait Transcriber: Send + Sync {
    /// Converts an audio clip into text
    async fn transcribe(&self, audio: Vec<u8>, content_type: &str) -> AppResult<String>;

    /// Backend name for logging and health reporting
    fn name(&self) -> &'static str;
}

/// Checks that an upload is a supported, non-empty audio clip
pub fn validate_audio(content_type: &str, len: usize) -> AppResult<()> {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_lowercase();

    if !ALLOWED_CONTENT_TYPES.contains(&mime.as_str()) {
        return Err(AppError::InvalidInput(format!(
            "Unsupported audio format '{}'. Allowed: {}",
            content_type,
            ALLOWED_CONTENT_TYPES.join(", ")
        )));
    }

    if len == 0 {
        return Err(AppError::InvalidInput("Audio upload is empty".to_string()));
    }

    Ok(())
}

fn file_extension(content_type: &str) -> &'static str {
    match content_type {
        "audio/mpeg" => "mp3",
        "audio/mp4" => "m4a",
        "audio/ogg" => "ogg",
        "audio/webm" => "webm",
        _ => "wav",
    }
}

/// Whisper-compatible HTTP transcription backend
///
/// Posts the clip as multipart form data to `/v1/audio/transcriptions` and reads
/// the `text` field of the JSON reply.
#[derive(Clone)]
pub struct WhisperTranscriber {
    http_client: HttpClient,
    api_url: String,
    api_key: Option<String>,
    model: String,
}

impl WhisperTranscriber {
    pub fn new(api_url: String, api_key: Option<String>, model: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_url,
            api_key,
            model,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/audio/transcriptions", self.api_url.trim_end_matches('/'))
    }
}

#[async_trait::async_trait]
impl Transcriber for WhisperTranscriber {
    async fn transcribe(&self, audio: Vec<u8>, content_type: &str) -> AppResult<String> {
        let mime = content_type.split(';').next().unwrap_or_default().trim().to_lowercase();
        let audio_bytes = audio.len();

        tracing::info!(
            backend = self.name(),
            audio_bytes,
            content_type = %mime,
            "Sending audio for transcription"
        );

        let part = Part::bytes(audio)
            .file_name(format!("audio.{}", file_extension(&mime)))
            .mime_str(&mime)?;
        let form = Form::new()
            .part("file", part)
            .text("model", self.model.clone());

        let mut request = self.http_client.post(self.endpoint()).multipart(form);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Transcription API call failed");
            return Err(AppError::Transcription(format!(
                "Transcription API returned status {}",
                status
            )));
        }

        #[derive(Deserialize)]
        struct TranscriptionResponse {
            text: String,
        }

        let transcription: TranscriptionResponse = response.json().await?;
        let text = transcription.text.trim().to_string();

        if text.is_empty() {
            return Err(AppError::Transcription(
                "Could not transcribe audio. Please ensure audio is clear.".to_string(),
            ));
        }

        tracing::debug!(chars = text.len(), "Transcription received");

        Ok(text)
    }

    fn name(&self) -> &'static str {
        "whisper"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_audio_accepts_supported_types() {
        assert!(validate_audio("audio/wav", 10).is_ok());
        assert!(validate_audio("audio/webm; codecs=opus", 10).is_ok());
        assert!(validate_audio("Audio/MPEG", 10).is_ok());
    }

    #[test]
    fn test_validate_audio_rejects_unsupported_type() {
        let err = validate_audio("video/mp4", 10).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn test_validate_audio_rejects_empty_upload() {
        let err = validate_audio("audio/wav", 0).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension("audio/mpeg"), "mp3");
        assert_eq!(file_extension("audio/x-wav"), "wav");
    }

    #[test]
    fn test_endpoint_strips_trailing_slash() {
        let transcriber = WhisperTranscriber::new(
            "http://localhost:9000/".to_string(),
            None,
            "whisper-1".to_string(),
        );
        assert_eq!(
            transcriber.endpoint(),
            "http://localhost:9000/v1/audio/transcriptions"
        );
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_an_http_error() {
        let transcriber = WhisperTranscriber::new(
            "http://127.0.0.1:1".to_string(),
            None,
            "whisper-1".to_string(),
        );
        let err = transcriber
            .transcribe(vec![0u8; 16], "audio/wav")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::HttpClient(_)));
    }
}
