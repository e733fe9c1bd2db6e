//! Fake chat client for tests.
//!
//! Returns canned completions matched by prompt substring, so flow tests
//! can run without network access or API spend.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use super::types::{ChatRequest, ChatResponse, Usage};
use super::{AiError, ChatClient};

/// A fake chat client.
///
/// Responses are matched case-insensitively against the concatenated text
/// of all request messages. Without a match the default response is used,
/// or a `Network` error if no default is set.
#[derive(Debug, Default)]
pub struct FakeChatClient {
    responses: RwLock<HashMap<String, String>>,
    default_response: Option<String>,
}

impl FakeChatClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// A client that answers prompts containing `prompt_contains` with
    /// `response`.
    pub fn with_response(prompt_contains: &str, response: &str) -> Self {
        let client = Self::new();
        client.add_response(prompt_contains, response);
        client
    }

    /// Register a canned response for prompts containing a substring.
    pub fn add_response(&self, prompt_contains: &str, response: &str) {
        self.responses
            .write()
            .unwrap()
            .insert(prompt_contains.to_string(), response.to_string());
    }

    /// Set the response used when no pattern matches.
    pub fn with_default_response(mut self, response: &str) -> Self {
        self.default_response = Some(response.to_string());
        self
    }
}

#[async_trait]
impl ChatClient for FakeChatClient {
    async fn complete(
        &self,
        _prompt_name: &str,
        request: ChatRequest,
    ) -> Result<ChatResponse, AiError> {
        let prompt: String = request
            .messages
            .iter()
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n")
            .to_lowercase();

        let responses = self.responses.read().unwrap();
        let matched = responses
            .iter()
            .find(|(pattern, _)| prompt.contains(&pattern.to_lowercase()))
            .map(|(_, response)| response.clone())
            .or_else(|| self.default_response.clone());

        match matched {
            Some(content) => Ok(ChatResponse {
                content,
                usage: Usage::default(),
            }),
            None => Err(AiError::Network(format!(
                "FakeChatClient: no response configured for prompt (first 100 chars): {}",
                &prompt[..prompt.len().min(100)]
            ))),
        }
    }

    fn model_name(&self) -> &str {
        "fake-model"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::ChatMessage;

    fn request_with(text: &str) -> ChatRequest {
        ChatRequest {
            messages: vec![ChatMessage::user(text)],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_substring_match() {
        let client = FakeChatClient::with_response("gratitude", "Thank you!");
        let response = client
            .complete("test", request_with("a message about gratitude"))
            .await
            .unwrap();
        assert_eq!(response.content, "Thank you!");
    }

    #[tokio::test]
    async fn test_match_is_case_insensitive() {
        let client = FakeChatClient::with_response("GRATITUDE", "Thank you!");
        let response = client
            .complete("test", request_with("about gratitude"))
            .await
            .unwrap();
        assert_eq!(response.content, "Thank you!");
    }

    #[tokio::test]
    async fn test_no_match_without_default_errors() {
        let client = FakeChatClient::new();
        assert!(client
            .complete("test", request_with("anything"))
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_default_response() {
        let client = FakeChatClient::new().with_default_response("fallback");
        let response = client
            .complete("test", request_with("anything"))
            .await
            .unwrap();
        assert_eq!(response.content, "fallback");
    }
}
