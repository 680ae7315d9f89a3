use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use models::Database;
use serde_json::{json, Value};
use service::auth::AuthConfig;
use service::storage::MemoryStore;
use tower::Service;

use server::routes::{self, auth};

const SECRET: &str = "test-secret";

fn cors() -> tower_http::cors::CorsLayer { tower_http::cors::CorsLayer::very_permissive() }

fn seed() -> Database {
    serde_json::from_value(json!({
        "products": [{"id": 1, "name": "Espresso", "price": 3.0}],
        "users": [{"id": 10, "username": "barista", "email": "barista@coffee.shop", "password": "beans", "role": "admin"}]
    }))
    .expect("seed snapshot")
}

fn build_app() -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new(seed()));
    let state = auth::ServerState::new(store.clone(), AuthConfig::new(SECRET, 3600));
    (routes::build_router(state, cors()), store)
}

async fn send(app: &Router, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> anyhow::Result<(StatusCode, Value)> {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(t) = token {
        req = req.header("authorization", format!("Bearer {t}"));
    }
    let req = match body {
        Some(b) => req.header("content-type", "application/json").body(Body::from(serde_json::to_vec(&b)?))?,
        None => req.body(Body::empty())?,
    };
    let resp = app.clone().call(req).await?;
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
    let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes)? };
    Ok((status, value))
}

async fn login(app: &Router) -> anyhow::Result<String> {
    let (status, body) = send(app, "POST", "/login", None, Some(json!({"email": "barista@coffee.shop", "password": "beans"}))).await?;
    assert_eq!(status, StatusCode::OK);
    Ok(body["token"].as_str().expect("token in login response").to_string())
}

/// Flip the first signature character so the decoded signature bytes differ.
fn tamper(token: &str) -> String {
    let sig_start = token.rfind('.').expect("jwt has three parts") + 1;
    let mut chars: Vec<char> = token.chars().collect();
    chars[sig_start] = if chars[sig_start] == 'A' { 'B' } else { 'A' };
    chars.into_iter().collect()
}

#[tokio::test]
async fn test_login_then_protected_route() -> anyhow::Result<()> {
    let (app, _) = build_app();
    let token = login(&app).await?;

    let (status, body) = send(&app, "GET", "/users", Some(&token), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(1));
    Ok(())
}

#[tokio::test]
async fn test_login_wrong_password() -> anyhow::Result<()> {
    let (app, _) = build_app();
    let (status, body) = send(&app, "POST", "/login", None, Some(json!({"email": "barista@coffee.shop", "password": "tea"}))).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());
    Ok(())
}

#[tokio::test]
async fn test_login_missing_fields_is_unauthorized() -> anyhow::Result<()> {
    let (app, _) = build_app();
    let (status, _) = send(&app, "POST", "/login", None, Some(json!({"email": "barista@coffee.shop"}))).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn test_login_non_string_fields_is_unauthorized() -> anyhow::Result<()> {
    let (app, _) = build_app();
    let (status, body) = send(&app, "POST", "/login", None, Some(json!({"email": 5, "password": "p"}))).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());

    let (status, _) = send(&app, "POST", "/login", None, Some(json!({"email": "barista@coffee.shop", "password": {"p": 1}}))).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn test_missing_authorization_is_401() -> anyhow::Result<()> {
    let (app, store) = build_app();
    for (method, uri, body) in [
        ("GET", "/users", None),
        ("GET", "/users/10", None),
        ("DELETE", "/users/10", None),
        ("POST", "/products", Some(json!({"name": "Mocha"}))),
        ("PUT", "/products/1", Some(json!({"price": 1}))),
        ("DELETE", "/products/1", None),
    ] {
        let (status, body) = send(&app, method, uri, None, body).await?;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{method} {uri}");
        assert_eq!(body["error"], "missing bearer token");
    }
    assert_eq!(store.snapshot().await, seed());
    Ok(())
}

#[tokio::test]
async fn test_tampered_token_is_403() -> anyhow::Result<()> {
    let (app, store) = build_app();
    let token = tamper(&login(&app).await?);

    let (status, _) = send(&app, "GET", "/users", Some(&token), None).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = send(&app, "DELETE", "/products/1", Some(&token), None).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(store.snapshot().await.products.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_expired_token_is_403() -> anyhow::Result<()> {
    let (app, store) = build_app();
    let issuer = service::auth::AuthService::new(store, AuthConfig::new(SECRET, 3600));
    let token = issuer.issue_token_at("barista@coffee.shop", "admin", now_secs() - 7200)?;

    let (status, _) = send(&app, "GET", "/users", Some(&token), None).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn test_bearer_scheme_without_token_is_401() -> anyhow::Result<()> {
    let (app, _) = build_app();
    let req = Request::builder().method("GET").uri("/users").header("authorization", "Bearer").body(Body::empty())?;
    let resp = app.clone().call(req).await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn test_public_routes_need_no_token() -> anyhow::Result<()> {
    let (app, _) = build_app();
    assert_eq!(send(&app, "GET", "/products", None, None).await?.0, StatusCode::OK);
    assert_eq!(send(&app, "GET", "/products/1", None, None).await?.0, StatusCode::OK);
    assert_eq!(send(&app, "GET", "/health", None, None).await?, (StatusCode::OK, json!({"status": "ok"})));
    Ok(())
}

#[tokio::test]
async fn test_registered_user_can_log_in() -> anyhow::Result<()> {
    let (app, _) = build_app();
    let (status, _) = send(&app, "POST", "/users", None, Some(json!({
        "username": "rui", "email": "rui@coffee.shop", "password": "crema", "role": "staff"
    }))).await?;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, "POST", "/login", None, Some(json!({"email": "rui@coffee.shop", "password": "crema"}))).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].as_str().is_some_and(|t| t.split('.').count() == 3));
    Ok(())
}

fn now_secs() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
