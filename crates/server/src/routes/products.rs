use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Extension, Json,
};
use models::Product;
use serde_json::{Map, Value};
use service::auth::domain::Claims;
use tracing::info;

use crate::{errors::JsonApiError, routes::auth::ServerState};

/// Path ids that are not integers can never match a record.
pub(crate) fn parse_id(raw: &str, entity: &str) -> Result<i64, JsonApiError> {
    raw.trim().parse::<i64>().map_err(|_| JsonApiError::not_found(entity))
}

#[utoipa::path(
    get, path = "/products", tag = "products",
    responses((status = 200, description = "All products", body = [crate::openapi::ProductDoc]))
)]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<Product>>, JsonApiError> {
    Ok(Json(state.products.list().await?))
}

#[utoipa::path(
    get, path = "/products/{id}", tag = "products",
    params(("id" = i64, Path, description = "Product id")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::ProductDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorResponse)
    )
)]
pub async fn get(State(state): State<ServerState>, Path(id): Path<String>) -> Result<Json<Product>, JsonApiError> {
    let id = parse_id(&id, "product")?;
    Ok(Json(state.products.get(id).await?))
}

#[utoipa::path(
    post, path = "/products", tag = "products",
    request_body = crate::openapi::ProductDoc,
    security(("bearer" = [])),
    responses(
        (status = 201, description = "Created", body = crate::openapi::ProductDoc),
        (status = 400, description = "Body is not a JSON object", body = crate::openapi::ErrorResponse),
        (status = 401, description = "Missing token"),
        (status = 403, description = "Invalid or expired token")
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    body: Result<Json<Map<String, Value>>, JsonRejection>,
) -> Result<(StatusCode, Json<Product>), JsonApiError> {
    let Json(body) = body?;
    let created = state.products.create(body).await?;
    info!(id = created.id, actor = %claims.email, "created product");
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put, path = "/products/{id}", tag = "products",
    params(("id" = i64, Path, description = "Product id")),
    request_body = crate::openapi::ProductDoc,
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Merged record", body = crate::openapi::ProductDoc),
        (status = 400, description = "Body is not a JSON object", body = crate::openapi::ErrorResponse),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorResponse)
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    body: Result<Json<Map<String, Value>>, JsonRejection>,
) -> Result<Json<Product>, JsonApiError> {
    let id = parse_id(&id, "product")?;
    let Json(patch) = body?;
    let merged = state.products.update(id, patch).await?;
    info!(id, actor = %claims.email, "updated product");
    Ok(Json(merged))
}

#[utoipa::path(
    delete, path = "/products/{id}", tag = "products",
    params(("id" = i64, Path, description = "Product id")),
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
    let id = parse_id(&id, "product")?;
    state.products.delete(id).await?;
    info!(id, actor = %claims.email, "deleted product");
    Ok(StatusCode::NO_CONTENT)
}
