use std::sync::Arc;

use crate::{
    config::Config,
    services::{
        catalog::CatalogLoadError, ActivityCatalog, IntentExtractor, Transcriber,
        WhisperTranscriber,
    },
};

/// Shared application state
///
/// Everything here is built before the server accepts requests and is only
/// read afterwards, so handlers share it without locking.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<ActivityCatalog>,
    pub extractor: Arc<IntentExtractor>,
    /// Absent when no transcription backend is configured
    pub transcriber: Option<Arc<dyn Transcriber>>,
    pub default_limit: usize,
}

impl AppState {
    /// Creates state over a loaded catalog with default tables and no transcriber
    pub fn new(catalog: ActivityCatalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
            extractor: Arc::new(IntentExtractor::new()),
            transcriber: None,
            default_limit: 5,
        }
    }

    /// Loads the catalog and wires the transcriber described by `config`
    pub fn from_config(config: &Config) -> Result<Self, CatalogLoadError> {
        let catalog = ActivityCatalog::load(&config.catalog_path)?;
        let mut state = Self::new(catalog).with_default_limit(config.default_limit);

        match &config.transcription_api_url {
            Some(url) => {
                tracing::info!(api_url = %url, model = %config.transcription_model, "Audio transcription enabled");
                state = state.with_transcriber(Arc::new(WhisperTranscriber::new(
                    url.clone(),
                    config.transcription_api_key.clone(),
                    config.transcription_model.clone(),
                )));
            }
            None => tracing::warn!("TRANSCRIPTION_API_URL not set; audio recommendations disabled"),
        }

        Ok(state)
    }

    pub fn with_transcriber(mut self, transcriber: Arc<dyn Transcriber>) -> Self {
        self.transcriber = Some(transcriber);
        self
    }

    pub fn with_default_limit(mut self, default_limit: usize) -> Self {
        self.default_limit = default_limit;
        self
    }
}
