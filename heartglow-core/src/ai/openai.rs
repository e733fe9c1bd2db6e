//! OpenAI-compatible chat-completion client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::config::AiConfig;
use super::types::{ChatMessage, ChatRequest, ChatResponse, Usage};
use super::{AiError, ChatClient, ConfigError};

/// Client for an OpenAI-compatible `/chat/completions` endpoint.
///
/// One best-effort upstream call per invocation, with an explicit request
/// timeout and bounded exponential backoff for transport failures only.
/// Provider rejections (any non-2xx response) are returned on first
/// occurrence with the upstream status preserved.
#[derive(Debug)]
pub struct OpenAiClient {
    client: reqwest::Client,
    config: AiConfig,
}

impl OpenAiClient {
    /// Create a client from environment configuration.
    pub fn from_env() -> Result<Self, AiError> {
        Ok(Self::new(AiConfig::from_env()?))
    }

    /// Create a client with the given configuration.
    pub fn new(config: AiConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    /// One upstream call, classified per the error taxonomy.
    async fn try_complete(&self, request: &ChatRequest) -> Result<ChatResponse, AiError> {
        let body = CompletionRequest {
            model: &self.config.model,
            messages: &request.messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.config.api_key)
            .timeout(self.config.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| AiError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| AiError::Network(e.to_string()))?;

        if !(200..300).contains(&status) {
            let message = match serde_json::from_str::<ErrorEnvelope>(&text) {
                Ok(envelope) => envelope.error.message,
                Err(_) => text,
            };
            // A rejected key is a configuration problem, not a provider one.
            if status == 401 {
                return Err(AiError::NotConfigured(ConfigError::BadCredential(message)));
            }
            return Err(AiError::Provider { status, message });
        }

        let envelope: CompletionResponse =
            serde_json::from_str(&text).map_err(|e| AiError::Decode(e.to_string()))?;

        let content = envelope
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Err(AiError::Decode(
                "completion contained no message content".to_string(),
            ));
        }

        Ok(ChatResponse {
            content,
            usage: envelope.usage.unwrap_or_default(),
        })
    }
}

#[async_trait]
impl ChatClient for OpenAiClient {
    async fn complete(
        &self,
        prompt_name: &str,
        request: ChatRequest,
    ) -> Result<ChatResponse, AiError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.try_complete(&request).await {
                Err(AiError::Network(error)) if attempt < self.config.max_attempts => {
                    let delay = backoff_delay(self.config.retry_base, attempt);
                    tracing::warn!(
                        prompt_name,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %error,
                        "completion call failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(error) => {
                    tracing::warn!(prompt_name, attempt, error = %error, "completion call failed");
                    return Err(error);
                }
                Ok(response) => return Ok(response),
            }
        }
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

/// Delay before the retry following attempt `attempt` (1-based): the base
/// delay doubled for each failure already seen.
fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    base * 2u32.saturating_pow(attempt.saturating_sub(1))
}

/// Chat-completion request wire format.
#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// Chat-completion response wire format.
#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Error response wire format.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ApiErrorBody,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(base_url: &str) -> AiConfig {
        let mut config = AiConfig::for_base_url("test-key", base_url);
        config.retry_base = Duration::from_millis(5);
        config
    }

    fn chat_request() -> ChatRequest {
        ChatRequest {
            messages: vec![ChatMessage::user("hello")],
            max_tokens: Some(100),
            temperature: Some(0.7),
        }
    }

    #[tokio::test]
    async fn test_success_returns_first_choice_content() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "choices": [{"message": {"role": "assistant", "content": "Hi\nINSIGHTS:\n- A"}}],
                    "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
                }"#,
            )
            .create_async()
            .await;

        let client = OpenAiClient::new(test_config(&server.url()));
        let response = client.complete("test", chat_request()).await.unwrap();

        assert_eq!(response.content, "Hi\nINSIGHTS:\n- A");
        assert_eq!(response.usage.total_tokens, 15);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_provider_429_preserves_status_and_does_not_retry() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .with_status(429)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error": {"message": "Rate limit reached", "type": "requests"}}"#)
            .expect(1)
            .create_async()
            .await;

        let client = OpenAiClient::new(test_config(&server.url()));
        let error = client.complete("test", chat_request()).await.unwrap_err();

        match error {
            AiError::Provider { status, message } => {
                assert_eq!(status, 429);
                assert_eq!(message, "Rate limit reached");
            }
            other => panic!("expected Provider error, got {:?}", other),
        }
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_provider_500_is_not_retried() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .with_status(500)
            .with_body("upstream exploded")
            .expect(1)
            .create_async()
            .await;

        let client = OpenAiClient::new(test_config(&server.url()));
        let error = client.complete("test", chat_request()).await.unwrap_err();

        match error {
            AiError::Provider { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "upstream exploded");
            }
            other => panic!("expected Provider error, got {:?}", other),
        }
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_rejected_credential_is_configuration_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(401)
            .with_body(r#"{"error": {"message": "Incorrect API key provided"}}"#)
            .create_async()
            .await;

        let client = OpenAiClient::new(test_config(&server.url()));
        let error = client.complete("test", chat_request()).await.unwrap_err();

        assert!(matches!(error, AiError::NotConfigured(_)));
        assert!(!error.is_retryable());
    }

    #[tokio::test]
    async fn test_unparseable_success_body_is_decode_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body("not json at all")
            .create_async()
            .await;

        let client = OpenAiClient::new(test_config(&server.url()));
        let error = client.complete("test", chat_request()).await.unwrap_err();

        assert!(matches!(error, AiError::Decode(_)));
    }

    #[tokio::test]
    async fn test_empty_content_is_decode_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices": [{"message": {"role": "assistant", "content": ""}}]}"#)
            .create_async()
            .await;

        let client = OpenAiClient::new(test_config(&server.url()));
        let error = client.complete("test", chat_request()).await.unwrap_err();

        assert!(matches!(error, AiError::Decode(_)));
    }

    #[tokio::test]
    async fn test_network_failure_retries_then_succeeds() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            // First connection: close without responding.
            let (socket, _) = listener.accept().await.unwrap();
            drop(socket);

            // Second connection: serve a minimal completion by hand.
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let body = r#"{"choices": [{"message": {"role": "assistant", "content": "ok"}}]}"#;
            let response = format!(
                "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });

        let client = OpenAiClient::new(test_config(&format!("http://{}", addr)));
        let response = client.complete("test", chat_request()).await.unwrap();

        assert_eq!(response.content, "ok");
    }

    #[tokio::test]
    async fn test_network_failure_surfaces_after_retries() {
        // Bind then drop a listener so the port is very likely refused.
        let addr = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap()
        };

        let client = OpenAiClient::new(test_config(&format!("http://{}", addr)));
        let error = client.complete("test", chat_request()).await.unwrap_err();

        assert!(matches!(error, AiError::Network(_)));
        assert!(error.is_retryable());
    }

    #[test]
    fn test_backoff_delay_doubles() {
        let base = Duration::from_millis(500);
        assert_eq!(backoff_delay(base, 1), Duration::from_millis(500));
        assert_eq!(backoff_delay(base, 2), Duration::from_millis(1000));
        assert_eq!(backoff_delay(base, 3), Duration::from_millis(2000));
    }
}
