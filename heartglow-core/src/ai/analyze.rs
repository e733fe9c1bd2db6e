//! Message analysis flow: review an existing message instead of writing one.

use crate::ai::prompts::analyze::{render_analyze_user_prompt, ANALYZE_PROMPT_NAME};
use crate::ai::prompts::render_system_prompt;
use crate::ai::{AiError, ChatClient, ChatMessage, ChatRequest};
use crate::completion_parser::parse_completion;
use crate::types::{GenerationMode, GenerationResult};

/// Completion budget for an assessment plus insight bullets.
const MAX_COMPLETION_TOKENS: u32 = 400;

/// Lower temperature than generation; analysis should be steady, not
/// creative.
const TEMPERATURE: f32 = 0.4;

/// Analyze a message the user wrote themselves.
///
/// The result reuses the generation shape: `message` holds the overall
/// assessment and `insights` the concrete observations.
pub async fn analyze_message(
    client: &dyn ChatClient,
    message: &str,
    relationship: Option<&str>,
) -> Result<GenerationResult, AiError> {
    let chat = ChatRequest {
        messages: vec![
            ChatMessage::system(render_system_prompt(GenerationMode::Analyze)),
            ChatMessage::user(render_analyze_user_prompt(message, relationship)),
        ],
        max_tokens: Some(MAX_COMPLETION_TOKENS),
        temperature: Some(TEMPERATURE),
    };

    let response = client.complete(ANALYZE_PROMPT_NAME, chat).await?;

    tracing::debug!(
        model = client.model_name(),
        prompt_tokens = response.usage.prompt_tokens,
        completion_tokens = response.usage.completion_tokens,
        "analysis completion received"
    );

    Ok(parse_completion(&response.content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::FakeChatClient;

    #[tokio::test]
    async fn test_analyze_parses_assessment_and_insights() {
        let client = FakeChatClient::with_response(
            "missed your call",
            "Honest and warm overall.\nINSIGHTS:\n- The apology is direct\n- Consider naming a time to talk",
        );

        let result = analyze_message(&client, "Sorry I missed your call.", Some("Sister"))
            .await
            .unwrap();

        assert_eq!(result.message, "Honest and warm overall.");
        assert_eq!(result.insights.len(), 2);
    }
}
