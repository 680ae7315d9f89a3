use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
    Json,
};
use serde::Serialize;
use service::{
    auth::{domain::LoginInput, errors::AuthError, AuthConfig, AuthService},
    storage::StateStore,
    ProductService, UserService,
};

use crate::errors::JsonApiError;

/// Shared handler state: one service per collection plus the token service,
/// all backed by the same store.
#[derive(Clone)]
pub struct ServerState {
    pub products: ProductService,
    pub users: UserService,
    pub auth: AuthService,
}

impl ServerState {
    pub fn new(store: Arc<dyn StateStore>, auth: AuthConfig) -> Self {
        Self {
            products: ProductService::new(store.clone()),
            users: UserService::new(store.clone()),
            auth: AuthService::new(store, auth),
        }
    }
}

#[derive(Serialize)]
pub struct LoginOutput { pub token: String }

#[utoipa::path(
    post, path = "/login", tag = "auth",
    request_body = crate::openapi::LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = crate::openapi::TokenResponse),
        (status = 400, description = "Body is not valid JSON", body = crate::openapi::ErrorResponse),
        (status = 401, description = "Invalid credentials", body = crate::openapi::ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<ServerState>,
    body: Result<Json<LoginInput>, JsonRejection>,
) -> Result<Json<LoginOutput>, JsonApiError> {
    let Json(input) = body?;
    let session = state.auth.login(input).await?;
    Ok(Json(LoginOutput { token: session.token }))
}

/// Second whitespace-separated part of `Authorization`, i.e. `<token>` in `Bearer <token>`.
fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .split_whitespace()
        .nth(1)
        .map(str::to_owned)
}

/// Route middleware for protected endpoints.
/// Missing token → 401, invalid or expired → 403; on success the decoded
/// `Claims` are put in the request extensions.
pub async fn require_bearer_token(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, JsonApiError> {
    let Some(token) = bearer_token(req.headers()) else {
        tracing::warn!(method = %req.method(), path = %req.uri().path(), "missing bearer token");
        return Err(AuthError::MissingToken.into());
    };

    let claims = match state.auth.verify(&token) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::warn!(method = %req.method(), path = %req.uri().path(), code = e.code(), err = %e, "token validation failed");
            return Err(e.into());
        }
    };

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}
