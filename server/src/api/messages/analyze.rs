use crate::api::messages::ai_error_response;
use crate::api::messages::generate::GenerateMessageResponse;
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::quota;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use heartglow_core::ai::analyze_message;
use heartglow_core::OpenAiClient;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct AnalyzeMessageRequest {
    pub message: String,
    pub relationship: Option<String>,
}

/// Analyze a drafted message
///
/// Reviews a message the user already wrote and returns an overall
/// assessment plus insight bullets. Counts against the same daily quota as
/// generation.
#[utoipa::path(
    post,
    path = "/api/messages/analyze",
    tag = "messages",
    request_body = AnalyzeMessageRequest,
    responses(
        (status = 200, description = "Assessment with insights", body = GenerateMessageResponse),
        (status = 400, description = "Missing message text", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 429, description = "Daily generation limit reached", body = ErrorResponse),
        (status = 500, description = "Configuration or internal failure", body = ErrorResponse),
        (status = 502, description = "AI provider rejected the request", body = ErrorResponse),
        (status = 503, description = "AI provider unreachable", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn analyze(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Json(req): Json<AnalyzeMessageRequest>,
) -> impl IntoResponse {
    let message = req.message.trim();
    if message.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "message is required".to_string(),
            }),
        )
            .into_response();
    }
    let relationship = req
        .relationship
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

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

    match analyze_message(&client, message, relationship).await {
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
