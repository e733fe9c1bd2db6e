use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::StoredMessage;
use crate::schema::messages;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

const DEFAULT_PAGE_SIZE: i64 = 50;
const MAX_PAGE_SIZE: i64 = 200;

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListMessagesParams {
    /// Maximum number of messages to return. Defaults to 50, capped at 200.
    pub limit: Option<i64>,
    /// Number of messages to skip. Defaults to 0.
    pub offset: Option<i64>,
}

fn page_bounds(params: &ListMessagesParams) -> (i64, i64) {
    let limit = params.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    let offset = params.offset.unwrap_or(0).max(0);
    (limit, offset)
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MessageItem {
    pub id: Uuid,
    pub message: String,
    pub insights: Vec<String>,
    pub recipient_name: String,
    pub relationship: String,
    pub intent: String,
    pub tone: String,
    pub format: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MessageListResponse {
    pub messages: Vec<MessageItem>,
}

#[utoipa::path(
    get,
    path = "/api/messages",
    tag = "messages",
    params(ListMessagesParams),
    responses(
        (status = 200, description = "Saved messages, newest first", body = MessageListResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_messages(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Query(params): Query<ListMessagesParams>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);
    let (limit, offset) = page_bounds(&params);

    let rows: Vec<StoredMessage> = match messages::table
        .filter(messages::user_id.eq(user.id))
        .filter(messages::deleted_at.is_null())
        .order(messages::created_at.desc())
        .limit(limit)
        .offset(offset)
        .select(StoredMessage::as_select())
        .load(&mut conn)
    {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!("Failed to fetch messages: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to fetch messages".to_string(),
                }),
            )
                .into_response();
        }
    };

    let messages = rows
        .into_iter()
        .map(|m| MessageItem {
            id: m.id,
            message: m.content,
            insights: m.insights.into_iter().flatten().collect(),
            recipient_name: m.recipient_name,
            relationship: m.relationship,
            intent: m.intent,
            tone: m.tone,
            format: m.format,
            created_at: m.created_at,
        })
        .collect();

    (StatusCode::OK, Json(MessageListResponse { messages })).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_bounds_defaults() {
        let (limit, offset) = page_bounds(&ListMessagesParams::default());
        assert_eq!(limit, DEFAULT_PAGE_SIZE);
        assert_eq!(offset, 0);
    }

    #[test]
    fn test_page_bounds_clamps() {
        let params = ListMessagesParams {
            limit: Some(10_000),
            offset: Some(-5),
        };
        let (limit, offset) = page_bounds(&params);
        assert_eq!(limit, MAX_PAGE_SIZE);
        assert_eq!(offset, 0);

        let params = ListMessagesParams {
            limit: Some(0),
            offset: Some(20),
        };
        let (limit, offset) = page_bounds(&params);
        assert_eq!(limit, 1);
        assert_eq!(offset, 20);
    }
}
