use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::NewMessage;
use crate::schema::messages;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateMessageRequest {
    pub message: String,
    pub insights: Vec<String>,
    pub recipient_name: String,
    pub relationship: String,
    pub intent: String,
    pub tone: String,
    pub format: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CreateMessageResponse {
    pub id: Uuid,
}

/// Save a generated message
///
/// Persists a result the user decided to keep. Always inserts a new row
/// with a fresh id; saving twice stores two copies.
#[utoipa::path(
    post,
    path = "/api/messages",
    tag = "messages",
    request_body = CreateMessageRequest,
    responses(
        (status = 201, description = "Message saved", body = CreateMessageResponse),
        (status = 400, description = "Missing message text", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_message(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Json(req): Json<CreateMessageRequest>,
) -> impl IntoResponse {
    let content = req.message.trim();
    if content.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "message is required".to_string(),
            }),
        )
            .into_response();
    }
    if req.recipient_name.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "recipientName is required".to_string(),
            }),
        )
            .into_response();
    }

    let mut conn = get_conn!(pool);

    let insights: Vec<Option<String>> = req.insights.iter().cloned().map(Some).collect();
    let new_message = NewMessage {
        user_id: user.id,
        content,
        insights: &insights,
        recipient_name: req.recipient_name.trim(),
        relationship: req.relationship.trim(),
        intent: req.intent.trim(),
        tone: req.tone.trim(),
        format: req.format.trim(),
    };

    match diesel::insert_into(messages::table)
        .values(&new_message)
        .returning(messages::id)
        .get_result::<Uuid>(&mut conn)
    {
        Ok(id) => (StatusCode::CREATED, Json(CreateMessageResponse { id })).into_response(),
        Err(e) => {
            tracing::error!("Failed to save message: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to save message".to_string(),
                }),
            )
                .into_response()
        }
    }
}
