use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::NewConnection;
use crate::schema::connections;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct CreateConnectionRequest {
    pub name: String,
    pub relationship: String,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CreateConnectionResponse {
    pub id: Uuid,
}

/// Save a connection
///
/// A connection is a recipient the user messages often; clients use it to
/// pre-fill the recipient fields of a new draft.
#[utoipa::path(
    post,
    path = "/api/connections",
    tag = "connections",
    request_body = CreateConnectionRequest,
    responses(
        (status = 201, description = "Connection created", body = CreateConnectionResponse),
        (status = 400, description = "Missing name or relationship", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_connection(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Json(req): Json<CreateConnectionRequest>,
) -> impl IntoResponse {
    let name = req.name.trim();
    if name.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "name is required".to_string(),
            }),
        )
            .into_response();
    }
    let relationship = req.relationship.trim();
    if relationship.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "relationship is required".to_string(),
            }),
        )
            .into_response();
    }

    let mut conn = get_conn!(pool);

    let notes = req
        .notes
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());
    let new_connection = NewConnection {
        user_id: user.id,
        name,
        relationship,
        notes,
    };

    match diesel::insert_into(connections::table)
        .values(&new_connection)
        .returning(connections::id)
        .get_result::<Uuid>(&mut conn)
    {
        Ok(id) => (StatusCode::CREATED, Json(CreateConnectionResponse { id })).into_response(),
        Err(e) => {
            tracing::error!("Failed to create connection: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to create connection".to_string(),
                }),
            )
                .into_response()
        }
    }
}
