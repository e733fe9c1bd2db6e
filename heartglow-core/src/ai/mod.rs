//! Chat-completion client for message generation.
//!
//! This module provides:
//! - `ChatClient` trait abstracting the completion provider
//! - `OpenAiClient` implementation for OpenAI-compatible APIs
//! - `FakeChatClient` for tests
//! - Prompt templates and the generation/analysis flows built on them
//!
//! # Configuration
//!
//! Set these environment variables:
//!
//! - `OPENAI_API_KEY` (required): API key for the completion provider
//! - `HEARTGLOW_AI_MODEL` (optional): Model name, e.g. "gpt-4o-mini"
//! - `HEARTGLOW_AI_BASE_URL` (optional): OpenAI-compatible base URL
//! - `HEARTGLOW_AI_TIMEOUT_SECS` (optional): Per-request timeout
//! - `HEARTGLOW_AI_MAX_ATTEMPTS` (optional): Attempts per call
//! - `HEARTGLOW_AI_RETRY_BASE_MS` (optional): Base retry backoff delay

mod analyze;
mod config;
mod fake;
mod generate;
mod openai;
pub mod prompts;
mod types;

pub use analyze::analyze_message;
pub use config::{AiConfig, ConfigError};
pub use fake::FakeChatClient;
pub use generate::generate_message;
pub use openai::OpenAiClient;
pub use types::{ChatMessage, ChatRequest, ChatResponse, Role, Usage};

use async_trait::async_trait;
use thiserror::Error;

/// Error type for completion calls.
///
/// `Network` is the only retryable class; the client already retries it
/// internally, so callers seeing one know the attempts are exhausted.
#[derive(Debug, Error)]
pub enum AiError {
    #[error("Completion provider not configured: {0}")]
    NotConfigured(#[from] ConfigError),

    #[error("Network failure calling completion provider: {0}")]
    Network(String),

    #[error("Completion provider returned {status}: {message}")]
    Provider { status: u16, message: String },

    #[error("Unreadable completion payload: {0}")]
    Decode(String),
}

impl AiError {
    /// Whether a caller could reasonably try the whole call again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AiError::Network(_))
    }
}

/// Trait for chat-completion clients.
///
/// Implementations must be stateless per call and safe to share across
/// tasks. `prompt_name` identifies the prompt template for log correlation.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Send a chat request and return the model's first-choice text.
    async fn complete(
        &self,
        prompt_name: &str,
        request: ChatRequest,
    ) -> Result<ChatResponse, AiError>;

    /// The model this client targets (e.g. "gpt-4o-mini", "fake-model").
    fn model_name(&self) -> &str;
}
