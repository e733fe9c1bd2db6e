pub mod analyze;
pub mod create;
pub mod delete;
pub mod generate;
pub mod list;

use crate::api::ErrorResponse;
use crate::AppState;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Json;
use axum::Router;
use heartglow_core::AiError;
use utoipa::OpenApi;

/// Returns the router for /api/messages endpoints (mounted at /api/messages)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::list_messages).post(create::create_message))
        .route("/generate", post(generate::generate))
        .route("/analyze", post(analyze::analyze))
        .route("/{id}", axum::routing::delete(delete::delete_message))
}

/// Map a completion-client failure onto the HTTP contract. Provider
/// rejections keep the upstream status and message in the error string;
/// network failures have already been retried by the client.
pub fn ai_error_response(error: &AiError) -> (StatusCode, Json<ErrorResponse>) {
    let (status, message) = match error {
        AiError::NotConfigured(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("AI client is not configured: {}", e),
        ),
        AiError::Provider { status, message } => (
            StatusCode::BAD_GATEWAY,
            format!("AI provider rejected the request ({}): {}", status, message),
        ),
        AiError::Decode(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("AI response could not be decoded: {}", e),
        ),
        AiError::Network(_) => (
            StatusCode::SERVICE_UNAVAILABLE,
            "AI service unreachable".to_string(),
        ),
    };
    (status, Json(ErrorResponse { error: message }))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        generate::generate,
        analyze::analyze,
        create::create_message,
        list::list_messages,
        delete::delete_message,
    ),
    components(schemas(
        generate::GenerateMessageRequest,
        generate::GenerateMessageResponse,
        analyze::AnalyzeMessageRequest,
        create::CreateMessageRequest,
        create::CreateMessageResponse,
        list::MessageItem,
        list::MessageListResponse,
    ))
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use heartglow_core::ConfigError;

    #[test]
    fn test_provider_errors_map_to_bad_gateway() {
        let error = AiError::Provider {
            status: 429,
            message: "Rate limit reached".to_string(),
        };
        let (status, body) = ai_error_response(&error);
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(body.error.contains("429"));
        assert!(body.error.contains("Rate limit reached"));
    }

    #[test]
    fn test_network_errors_map_to_service_unavailable() {
        let error = AiError::Network("connection refused".to_string());
        let (status, _) = ai_error_response(&error);
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_configuration_errors_map_to_internal() {
        let error = AiError::NotConfigured(ConfigError::MissingEnvVar("OPENAI_API_KEY".to_string()));
        let (status, _) = ai_error_response(&error);
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        let (status, _) = ai_error_response(&AiError::Decode("empty choices".to_string()));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
