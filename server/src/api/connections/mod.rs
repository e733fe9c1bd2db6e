pub mod create;
pub mod delete;
pub mod list;

use crate::AppState;
use axum::routing::get;
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /api/connections endpoints (mounted at /api/connections)
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list::list_connections).post(create::create_connection),
        )
        .route("/{id}", axum::routing::delete(delete::delete_connection))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        list::list_connections,
        create::create_connection,
        delete::delete_connection,
    ),
    components(schemas(
        list::ConnectionListResponse,
        list::ConnectionItem,
        create::CreateConnectionRequest,
        create::CreateConnectionResponse,
    ))
)]
pub struct ApiDoc;
