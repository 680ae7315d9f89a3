use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Extension, Json,
};
use models::User;
use serde_json::{Map, Value};
use service::auth::domain::Claims;
use tracing::info;

use crate::{errors::JsonApiError, routes::{auth::ServerState, products::parse_id}};

#[utoipa::path(
    get, path = "/users", tag = "users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "All users", body = [crate::openapi::UserDoc]),
        (status = 401, description = "Missing token"),
        (status = 403, description = "Invalid or expired token")
    )
)]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<User>>, JsonApiError> {
    Ok(Json(state.users.list().await?))
}

#[utoipa::path(
    get, path = "/users/{id}", tag = "users",
    params(("id" = i64, Path, description = "User id")),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "OK", body = crate::openapi::UserDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorResponse)
    )
)]
pub async fn get(State(state): State<ServerState>, Path(id): Path<String>) -> Result<Json<User>, JsonApiError> {
    let id = parse_id(&id, "user")?;
    Ok(Json(state.users.get(id).await?))
}

#[utoipa::path(
    post, path = "/users", tag = "users",
    request_body = crate::openapi::RegisterRequest,
    responses(
        (status = 201, description = "Registered", body = crate::openapi::UserDoc),
        (status = 400, description = "Missing required field", body = crate::openapi::ErrorResponse)
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    body: Result<Json<Map<String, Value>>, JsonRejection>,
) -> Result<(StatusCode, Json<User>), JsonApiError> {
    let Json(body) = body?;
    let user = state.users.create(&body).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[utoipa::path(
    delete, path = "/users/{id}", tag = "users",
    params(("id" = i64, Path, description = "User id")),
    security(("bearer" = [])),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorResponse)
    )
)]
pub async fn delete(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<StatusCode, JsonApiError> {
    let id = parse_id(&id, "user")?;
    state.users.delete(id).await?;
    info!(id, actor = %claims.email, "deleted user");
    Ok(StatusCode::NO_CONTENT)
}
