use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::types::ErrorBody;
use service::auth::errors::AuthError;
use service::errors::ServiceError;
use service::storage::StoreError;
use thiserror::Error;
use tracing::error;

/// Error returned by every handler; rendered as `{"error": "..."}`.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub message: String,
}

impl JsonApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }

    pub fn not_found(entity: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, format!("{entity} not found"))
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = self.status.as_u16(), error = %self.message, "request failed");
        }
        (self.status, Json(ErrorBody { error: self.message })).into_response()
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        let status = match &e {
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, e.to_string())
    }
}

impl From<AuthError> for JsonApiError {
    fn from(e: AuthError) -> Self {
        let status = match &e {
            AuthError::Unauthorized | AuthError::MissingToken => StatusCode::UNAUTHORIZED,
            AuthError::InvalidToken(_) => StatusCode::FORBIDDEN,
            AuthError::TokenError(_) | AuthError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, e.to_string())
    }
}

impl From<JsonRejection> for JsonApiError {
    fn from(e: JsonRejection) -> Self {
        Self::new(StatusCode::BAD_REQUEST, e.body_text())
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("store unavailable: {0}")]
    Store(#[from] StoreError),
    #[error("cannot bind {addr}: {source}")]
    Bind { addr: String, source: std::io::Error },
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_errors_map_to_statuses() {
        assert_eq!(JsonApiError::from(ServiceError::not_found("product")).status, StatusCode::NOT_FOUND);
        assert_eq!(JsonApiError::from(ServiceError::Validation("x".into())).status, StatusCode::BAD_REQUEST);
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let store = StoreError::Read { path: "db.json".into(), source: io };
        assert_eq!(JsonApiError::from(ServiceError::from(store)).status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn auth_errors_split_401_and_403() {
        assert_eq!(JsonApiError::from(AuthError::MissingToken).status, StatusCode::UNAUTHORIZED);
        assert_eq!(JsonApiError::from(AuthError::Unauthorized).status, StatusCode::UNAUTHORIZED);
        assert_eq!(JsonApiError::from(AuthError::InvalidToken("bad".into())).status, StatusCode::FORBIDDEN);
    }

    #[test]
    fn not_found_message_names_entity() {
        let e = JsonApiError::from(ServiceError::not_found("product"));
        assert_eq!(e.message, "product not found");
    }

    #[test]
    fn startup_errors_name_the_cause() {
        let io = std::io::Error::new(std::io::ErrorKind::AddrInUse, "in use");
        let e = StartupError::Bind { addr: "0.0.0.0:3000".into(), source: io };
        assert_eq!(e.to_string(), "cannot bind 0.0.0.0:3000: in use");

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let e = StartupError::from(StoreError::Write { path: "data/db.json".into(), source: io });
        assert!(e.to_string().starts_with("store unavailable:"));
    }
}
