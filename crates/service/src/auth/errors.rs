use thiserror::Error;

use crate::storage::StoreError;

/// Business errors for auth workflows
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    Unauthorized,
    #[error("missing bearer token")]
    MissingToken,
    #[error("invalid or expired token")]
    InvalidToken(String),
    #[error("token error: {0}")]
    TokenError(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AuthError {
    /// Stable numeric code for logging
    pub fn code(&self) -> u16 {
        match self {
            AuthError::Unauthorized => 1004,
            AuthError::MissingToken => 1005,
            AuthError::InvalidToken(_) => 1006,
            AuthError::TokenError(_) => 1102,
            AuthError::Store(_) => 1200,
        }
    }
}
