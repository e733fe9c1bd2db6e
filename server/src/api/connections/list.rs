use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::Connection;
use crate::schema::connections;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionItem {
    pub id: Uuid,
    pub name: String,
    pub relationship: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ConnectionListResponse {
    pub connections: Vec<ConnectionItem>,
}

#[utoipa::path(
    get,
    path = "/api/connections",
    tag = "connections",
    responses(
        (status = 200, description = "The user's connections, by name", body = ConnectionListResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_connections(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    let rows: Vec<Connection> = match connections::table
        .filter(connections::user_id.eq(user.id))
        .filter(connections::deleted_at.is_null())
        .order(connections::name.asc())
        .select(Connection::as_select())
        .load(&mut conn)
    {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!("Failed to fetch connections: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to fetch connections".to_string(),
                }),
            )
                .into_response();
        }
    };

    let connections = rows
        .into_iter()
        .map(|c| ConnectionItem {
            id: c.id,
            name: c.name,
            relationship: c.relationship,
            notes: c.notes,
            created_at: c.created_at,
        })
        .collect();

    (StatusCode::OK, Json(ConnectionListResponse { connections })).into_response()
}
