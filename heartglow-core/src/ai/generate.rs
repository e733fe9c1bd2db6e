//! Message generation flow: assemble prompts, complete, parse.

use crate::ai::prompts::generate::GENERATE_PROMPT_NAME;
use crate::ai::prompts::{render_system_prompt, render_user_prompt};
use crate::ai::{AiError, ChatClient, ChatMessage, ChatRequest};
use crate::completion_parser::parse_completion;
use crate::types::{GenerationRequest, GenerationResult};

/// Completion budget for a message plus its insight bullets.
const MAX_COMPLETION_TOKENS: u32 = 600;

/// Sampling temperature for message writing. High enough that two requests
/// for the same person do not produce the same message.
const TEMPERATURE: f32 = 0.7;

/// Generate (or revise) a message for the given request.
///
/// One completion call per invocation; the raw completion is parsed with
/// the fallback guarantees of [`parse_completion`], so any non-empty
/// completion yields a usable result even when the model ignores the
/// response-format directive.
pub async fn generate_message(
    client: &dyn ChatClient,
    request: &GenerationRequest,
) -> Result<GenerationResult, AiError> {
    let mode = request.mode();

    let chat = ChatRequest {
        messages: vec![
            ChatMessage::system(render_system_prompt(mode)),
            ChatMessage::user(render_user_prompt(request)),
        ],
        max_tokens: Some(MAX_COMPLETION_TOKENS),
        temperature: Some(TEMPERATURE),
    };

    let response = client.complete(GENERATE_PROMPT_NAME, chat).await?;

    tracing::debug!(
        mode = mode.as_str(),
        model = client.model_name(),
        prompt_tokens = response.usage.prompt_tokens,
        completion_tokens = response.usage.completion_tokens,
        "message completion received"
    );

    Ok(parse_completion(&response.content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::FakeChatClient;

    fn request() -> GenerationRequest {
        GenerationRequest {
            recipient_name: "Sam".to_string(),
            relationship: "Friend".to_string(),
            intent: "gratitude".to_string(),
            custom_intent: None,
            tone: "warm".to_string(),
            tone_intensity: 3,
            format: "text".to_string(),
            format_length: "brief".to_string(),
            special_circumstances: None,
            previous_message: None,
            user_feedback: None,
        }
    }

    #[tokio::test]
    async fn test_generate_parses_message_and_insights() {
        let client = FakeChatClient::with_response(
            "Sam",
            "Hey Sam, thank you for everything this year.\nINSIGHTS:\n• Specific thanks lands better\n• Short and warm fits a text",
        );

        let result = generate_message(&client, &request()).await.unwrap();

        assert_eq!(result.message, "Hey Sam, thank you for everything this year.");
        assert_eq!(
            result.insights,
            vec![
                "Specific thanks lands better",
                "Short and warm fits a text"
            ]
        );
    }

    #[tokio::test]
    async fn test_generate_tolerates_missing_marker() {
        let client = FakeChatClient::with_response("Sam", "Hey Sam, thank you.");

        let result = generate_message(&client, &request()).await.unwrap();

        assert_eq!(result.message, "Hey Sam, thank you.");
        assert!(result.insights.is_empty());
    }

    #[tokio::test]
    async fn test_generate_propagates_client_errors() {
        let client = FakeChatClient::new();
        let error = generate_message(&client, &request()).await.unwrap_err();
        assert!(error.is_retryable());
    }
}
