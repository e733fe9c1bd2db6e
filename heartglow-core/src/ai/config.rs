//! Chat-completion client configuration from environment variables.

use std::env;
use std::time::Duration;
use thiserror::Error;

/// Default OpenAI-compatible base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default model to use.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default per-request timeout in seconds. The upstream default is much
/// longer than a person will wait for a message draft, so we cap it.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default number of attempts for transport failures (first try included).
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default base delay between retries; doubles per attempt.
pub const DEFAULT_RETRY_BASE_MS: u64 = 500;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("API credential rejected by provider: {0}")]
    BadCredential(String),
}

/// Completion client configuration.
#[derive(Debug, Clone)]
pub struct AiConfig {
    /// API key for the completion provider.
    pub api_key: String,
    /// Model name (e.g. "gpt-4o-mini").
    pub model: String,
    /// Base URL of the OpenAI-compatible API.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Attempts per completion call; only transport failures are retried.
    pub max_attempts: u32,
    /// Base backoff delay, doubled on each subsequent retry.
    pub retry_base: Duration,
}

impl AiConfig {
    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - `OPENAI_API_KEY`: API key for the completion provider
    ///
    /// Optional:
    /// - `HEARTGLOW_AI_MODEL`: Model name (default: "gpt-4o-mini")
    /// - `HEARTGLOW_AI_BASE_URL`: API base URL (default: "https://api.openai.com/v1")
    /// - `HEARTGLOW_AI_TIMEOUT_SECS`: Per-request timeout (default: 30)
    /// - `HEARTGLOW_AI_MAX_ATTEMPTS`: Attempts per call (default: 3)
    /// - `HEARTGLOW_AI_RETRY_BASE_MS`: Base retry delay (default: 500)
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = env::var("OPENAI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar("OPENAI_API_KEY".to_string()))?;

        let model = env::var("HEARTGLOW_AI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let base_url =
            env::var("HEARTGLOW_AI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let timeout_secs = env::var("HEARTGLOW_AI_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let max_attempts = env::var("HEARTGLOW_AI_MAX_ATTEMPTS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_MAX_ATTEMPTS)
            .max(1);

        let retry_base_ms = env::var("HEARTGLOW_AI_RETRY_BASE_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_RETRY_BASE_MS);

        Ok(Self {
            api_key,
            model,
            base_url,
            timeout: Duration::from_secs(timeout_secs),
            max_attempts,
            retry_base: Duration::from_millis(retry_base_ms),
        })
    }

    /// A config pointed at the given base URL, for tests and local stubs.
    pub fn for_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: base_url.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_base: Duration::from_millis(DEFAULT_RETRY_BASE_MS),
        }
    }
}
