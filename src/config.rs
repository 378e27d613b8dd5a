use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Path to the activity catalog CSV
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,

    /// Number of recommendations returned when the client does not ask for a limit
    #[serde(default = "default_limit")]
    pub default_limit: usize,

    /// Base URL of a Whisper-compatible transcription API; audio input is disabled when unset
    #[serde(default)]
    pub transcription_api_url: Option<String>,

    /// Bearer token for the transcription API
    #[serde(default)]
    pub transcription_api_key: Option<String>,

    /// Transcription model name
    #[serde(default = "default_transcription_model")]
    pub transcription_model: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_catalog_path() -> String {
    "data/activities.csv".to_string()
}

fn default_limit() -> usize {
    5
}

fn default_transcription_model() -> String {
    "whisper-1".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Load configuration from explicit key/value pairs
    pub fn from_vars<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config: Config = envy::from_iter(vars)
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

        if config.default_limit == 0 {
            anyhow::bail!("DEFAULT_LIMIT must be a positive integer");
        }

        Ok(config)
    }

    /// Socket address the server binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_vars(Vec::new()).unwrap();
        assert_eq!(config.catalog_path, "data/activities.csv");
        assert_eq!(config.default_limit, 5);
        assert_eq!(config.transcription_api_url, None);
        assert_eq!(config.transcription_model, "whisper-1");
        assert_eq!(config.bind_addr(), "127.0.0.1:8000");
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_vars(vars(&[
            ("CATALOG_PATH", "/srv/catalog.csv"),
            ("DEFAULT_LIMIT", "3"),
            ("TRANSCRIPTION_API_URL", "http://localhost:9000"),
            ("PORT", "3000"),
        ]))
        .unwrap();
        assert_eq!(config.catalog_path, "/srv/catalog.csv");
        assert_eq!(config.default_limit, 3);
        assert_eq!(
            config.transcription_api_url.as_deref(),
            Some("http://localhost:9000")
        );
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn test_zero_default_limit_is_rejected() {
        assert!(Config::from_vars(vars(&[("DEFAULT_LIMIT", "0")])).is_err());
    }

    #[test]
    fn test_bad_port_is_rejected() {
        assert!(Config::from_vars(vars(&[("PORT", "not-a-port")])).is_err());
    }
}
