use std::{path::PathBuf, time::Duration};

use axum::Router;
use common::{env::ensure_data_dir, keepalive::Keepalive};
use configs::AppConfig;
use service::{auth::AuthConfig, storage::JsonFileStore};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes::{self, auth};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Start the keepalive pinger if a public URL is configured.
fn spawn_keepalive(cfg: &configs::KeepaliveConfig) {
    let Some(url) = cfg.url.as_deref() else {
        info!("keepalive url not configured; pinger disabled");
        return;
    };
    match Keepalive::new(url, Duration::from_secs(cfg.interval_secs)) {
        Ok(pinger) => {
            pinger.spawn();
        }
        Err(e) => warn!(%url, error = %e, "keepalive disabled"),
    }
}

/// Build the router over the JSON file store named in the config.
pub async fn build_app(cfg: &AppConfig) -> Result<Router, StartupError> {
    let store_path = PathBuf::from(&cfg.store.path);
    ensure_data_dir(&store_path).await?;
    let store = JsonFileStore::open(store_path).await?;
    info!(path = %store.path().display(), "store ready");

    if cfg.uses_default_secret() {
        warn!("JWT_SECRET not set; signing tokens with the built-in development secret");
    }
    let auth_cfg = AuthConfig::new(cfg.auth.jwt_secret.clone(), cfg.auth.token_ttl_secs);
    let state = auth::ServerState::new(store, auth_cfg);
    Ok(routes::build_router(state, build_cors()))
}

/// Build the app from an already validated config and serve until the listener fails.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let app = build_app(&cfg).await?;
    spawn_keepalive(&cfg.keepalive);

    let addr = cfg.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|source| StartupError::Bind { addr: addr.clone(), source })?;
    info!(%addr, "coffeeshop api listening");
    axum::serve(listener, app).await?;
    Ok(())
}
