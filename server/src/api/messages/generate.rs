use crate::api::messages::ai_error_response;
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::quota;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use heartglow_core::ai::generate_message;
use heartglow_core::draft::DEFAULT_TONE_INTENSITY;
use heartglow_core::{GenerationRequest, OpenAiClient};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

/// Inbound generation request. Every field defaults so that a missing one
/// reaches validation (which names it) instead of a bare deserialization
/// failure.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct GenerateMessageRequest {
    pub recipient_name: String,
    pub relationship: String,
    pub intent: String,
    pub custom_intent: Option<String>,
    pub tone: String,
    pub tone_intensity: Option<u8>,
    pub format: String,
    pub format_length: String,
    pub special_circumstances: Option<String>,
    pub previous_message: Option<String>,
    pub user_feedback: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GenerateMessageResponse {
    pub message: String,
    pub insights: Vec<String>,
}

/// Validate the wire request and build the immutable core request.
/// Errors name the offending wire field.
fn build_request(req: &GenerateMessageRequest) -> Result<GenerationRequest, String> {
    let recipient_name = require_field(&req.recipient_name, "recipientName")?;
    let relationship = require_field(&req.relationship, "relationship")?;

    // A free-text intent stands in for the intent type when only it is given.
    let custom_intent = clean(&req.custom_intent);
    let intent = match require_field(&req.intent, "intent") {
        Ok(intent) => intent,
        Err(_) if custom_intent.is_some() => "custom".to_string(),
        Err(e) => return Err(e),
    };

    let tone = require_field(&req.tone, "tone")?;
    let tone_intensity = req.tone_intensity.unwrap_or(DEFAULT_TONE_INTENSITY);
    if !(1..=5).contains(&tone_intensity) {
        return Err(format!(
            "toneIntensity must be between 1 and 5, got {}",
            tone_intensity
        ));
    }

    let format = require_field(&req.format, "format")?;
    let format_length = require_field(&req.format_length, "formatLength")?;

    Ok(GenerationRequest {
        recipient_name,
        relationship,
        intent,
        custom_intent,
        tone,
        tone_intensity,
        format,
        format_length,
        special_circumstances: clean(&req.special_circumstances),
        previous_message: clean(&req.previous_message),
        user_feedback: clean(&req.user_feedback),
    })
}

fn require_field(value: &str, name: &'static str) -> Result<String, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(format!("{} is required", name));
    }
    Ok(trimmed.to_string())
}

fn clean(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Generate a message draft
///
/// Stateless with respect to message history: the result is returned to the
/// client, which saves it via POST /api/messages only if the user keeps it.
/// Counts against the per-user daily generation quota.
#[utoipa::path(
    post,
    path = "/api/messages/generate",
    tag = "messages",
    request_body = GenerateMessageRequest,
    responses(
        (status = 200, description = "Generated message with insights", body = GenerateMessageResponse),
        (status = 400, description = "Missing or invalid field", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 429, description = "Daily generation limit reached", body = ErrorResponse),
        (status = 500, description = "Configuration or internal failure", body = ErrorResponse),
        (status = 502, description = "AI provider rejected the request", body = ErrorResponse),
        (status = 503, description = "AI provider unreachable", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn generate(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Json(req): Json<GenerateMessageRequest>,
) -> impl IntoResponse {
    let request = match build_request(&req) {
        Ok(r) => r,
        Err(message) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse { error: message }),
            )
                .into_response()
        }
    };

    let mut conn = get_conn!(pool);

    let today = chrono::Utc::now().date_naive();
    let count = match quota::check_and_increment(&mut conn, user.id, today) {
        Ok(count) => count,
        Err(e) => {
            tracing::error!("Failed to update usage counter: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to update usage counter".to_string(),
                }),
            )
                .into_response();
        }
    };
    if !quota::within_limit(count, quota::daily_limit()) {
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(ErrorResponse {
                error: "Daily generation limit reached".to_string(),
            }),
        )
            .into_response();
    }

    let client = match OpenAiClient::from_env() {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!("AI client unavailable: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "AI client is not configured".to_string(),
                }),
            )
                .into_response();
        }
    };

    match generate_message(&client, &request).await {
        Ok(result) => (
            StatusCode::OK,
            Json(GenerateMessageResponse {
                message: result.message,
                insights: result.insights,
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::warn!("AI call failed: {}", e);
            ai_error_response(&e).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heartglow_core::GenerationMode;

    fn full_request() -> GenerateMessageRequest {
        GenerateMessageRequest {
            recipient_name: "Sam".to_string(),
            relationship: "Friend".to_string(),
            intent: "gratitude".to_string(),
            tone: "warm".to_string(),
            tone_intensity: Some(3),
            format: "text".to_string(),
            format_length: "brief".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_build_request_passes_fields_through() {
        let request = build_request(&full_request()).unwrap();
        assert_eq!(request.recipient_name, "Sam");
        assert_eq!(request.tone_intensity, 3);
        assert_eq!(request.mode(), GenerationMode::Generate);
    }

    #[test]
    fn test_missing_field_named_in_error() {
        let mut req = full_request();
        req.recipient_name = "  ".to_string();
        let error = build_request(&req).unwrap_err();
        assert!(error.contains("recipientName"));
    }

    #[test]
    fn test_camel_case_wire_names() {
        let req: GenerateMessageRequest = serde_json::from_str(
            r#"{"recipientName": "Sam", "relationship": "Friend", "intent": "gratitude",
                "tone": "warm", "toneIntensity": 4, "format": "text", "formatLength": "brief"}"#,
        )
        .unwrap();
        assert_eq!(req.recipient_name, "Sam");
        assert_eq!(req.tone_intensity, Some(4));
    }

    #[test]
    fn test_intensity_defaults_and_validates() {
        let mut req = full_request();
        req.tone_intensity = None;
        assert_eq!(
            build_request(&req).unwrap().tone_intensity,
            DEFAULT_TONE_INTENSITY
        );

        req.tone_intensity = Some(0);
        assert!(build_request(&req).unwrap_err().contains("toneIntensity"));
    }

    #[test]
    fn test_custom_intent_substitutes_for_intent() {
        let mut req = full_request();
        req.intent = String::new();
        req.custom_intent = Some("wish them luck".to_string());
        let request = build_request(&req).unwrap();
        assert_eq!(request.intent, "custom");
        assert_eq!(request.effective_intent(), "wish them luck");
    }

    #[test]
    fn test_revision_fields_select_revise_mode() {
        let mut req = full_request();
        req.previous_message = Some("Thanks for everything.".to_string());
        req.user_feedback = Some("mention the concert".to_string());
        let request = build_request(&req).unwrap();
        assert_eq!(request.mode(), GenerationMode::Revise);
    }

    #[test]
    fn test_blank_optionals_are_dropped() {
        let mut req = full_request();
        req.special_circumstances = Some("   ".to_string());
        req.previous_message = Some(String::new());
        let request = build_request(&req).unwrap();
        assert!(request.special_circumstances.is_none());
        assert!(request.previous_message.is_none());
    }
}
