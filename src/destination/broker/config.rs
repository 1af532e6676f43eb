//! Environment-driven configuration for the Gemini lookup client.

use std::{env, fmt, time::Duration};

const API_KEY_ENV: &str = "GEMINI_API_KEY";
const BASE_URL_ENV: &str = "GEMINI_BASE_URL";
const MODEL_ENV: &str = "GEMINI_MODEL";
const TEMPERATURE_ENV: &str = "GEMINI_TEMPERATURE";
const TIMEOUT_ENV: &str = "GEMINI_TIMEOUT_SECS";

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_TEMPERATURE: f32 = 0.8;
const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Connection settings for the hosted Gemini API.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub request_timeout: Duration,
}

impl GeminiConfig {
    /// Reads the configuration from the process environment.
    ///
    /// Only the API key is mandatory; everything else falls back to the
    /// hosted defaults so a bare `GEMINI_API_KEY` is enough to go live.
    pub fn from_env() -> Result<Self, GeminiConfigError> {
        let api_key = env::var(API_KEY_ENV)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .ok_or(GeminiConfigError::MissingApiKey)?;

        let base_url = env::var(BASE_URL_ENV)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let model = env::var(MODEL_ENV)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let temperature = env::var(TEMPERATURE_ENV)
            .ok()
            .and_then(|value| value.trim().parse::<f32>().ok())
            .filter(|value| value.is_finite() && *value >= 0.0)
            .unwrap_or(DEFAULT_TEMPERATURE);

        let timeout_secs = env::var(TIMEOUT_ENV)
            .ok()
            .and_then(|value| value.trim().parse::<u64>().ok())
            .filter(|value| *value > 0)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Ok(Self {
            api_key,
            base_url,
            model,
            temperature,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Full URL of the `generateContent` endpoint for the configured model.
    pub fn generate_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[derive(Debug)]
pub enum GeminiConfigError {
    MissingApiKey,
    ClientBuild(String),
}

impl fmt::Display for GeminiConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingApiKey => {
                write!(f, "{} is not set; generative lookup stays offline", API_KEY_ENV)
            }
            Self::ClientBuild(message) => {
                write!(f, "failed to build the HTTP client: {}", message)
            }
        }
    }
}

impl std::error::Error for GeminiConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_base(base_url: &str) -> GeminiConfig {
        GeminiConfig {
            api_key: "test-key".to_string(),
            base_url: base_url.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    #[test]
    fn generate_url_joins_base_model_and_action() {
        let config = config_with_base("https://generativelanguage.googleapis.com");

        assert_eq!(
            config.generate_url(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn generate_url_tolerates_trailing_slash() {
        let config = config_with_base("https://example.test/");

        assert_eq!(
            config.generate_url(),
            "https://example.test/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }
}
