use std::sync::Arc;

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header as JwtHeader, Validation};
use tracing::{debug, info, instrument};

use super::domain::{AuthSession, Claims, LoginInput};
use super::errors::AuthError;
use crate::storage::StateStore;

/// Auth service configuration
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_secs: u64,
}

impl AuthConfig {
    pub fn new(jwt_secret: impl Into<String>, token_ttl_secs: u64) -> Self {
        Self { jwt_secret: jwt_secret.into(), token_ttl_secs }
    }
}

/// Auth business service independent of web framework
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn StateStore>,
    cfg: AuthConfig,
}

impl AuthService {
    pub fn new(store: Arc<dyn StateStore>, cfg: AuthConfig) -> Self { Self { store, cfg } }

    /// Authenticate by exact email + password match and issue a token.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{AuthConfig, AuthService, domain::LoginInput};
    /// use service::storage::MemoryStore;
    /// use std::sync::Arc;
    /// let db = serde_json::from_value(serde_json::json!({
    ///     "users": [{"id": 1, "username": "u", "email": "u@e.com", "password": "pw", "role": "admin"}]
    /// })).unwrap();
    /// let svc = AuthService::new(Arc::new(MemoryStore::new(db)), AuthConfig::new("secret", 3600));
    /// let input = LoginInput { email: Some("u@e.com".into()), password: Some("pw".into()) };
    /// let session = tokio_test::block_on(svc.login(input)).unwrap();
    /// let claims = svc.verify(&session.token).unwrap();
    /// assert_eq!(claims.role, "admin");
    /// ```
    #[instrument(skip(self, input), fields(email = input.email.as_deref().unwrap_or("")))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        let (Some(email), Some(password)) = (input.email.as_deref(), input.password.as_deref()) else {
            debug!("login without email or password");
            return Err(AuthError::Unauthorized);
        };

        let db = self.store.load().await?;
        let user = db.user_by_credentials(email, password).ok_or(AuthError::Unauthorized)?;
        let token = self.issue_token(&user.email, &user.role)?;
        info!(user_id = user.id, role = %user.role, "login_succeeded");
        Ok(AuthSession { token })
    }

    /// Sign `{email, role}` valid for the configured TTL from now.
    pub fn issue_token(&self, email: &str, role: &str) -> Result<String, AuthError> {
        let now = u64::try_from(Utc::now().timestamp()).unwrap_or_default();
        self.issue_token_at(email, role, now)
    }

    /// Sign a token as if issued at `iat` (seconds since the epoch).
    pub fn issue_token_at(&self, email: &str, role: &str, iat: u64) -> Result<String, AuthError> {
        let claims = Claims {
            email: email.to_string(),
            role: role.to_string(),
            iat,
            exp: iat + self.cfg.token_ttl_secs,
        };
        encode(&JwtHeader::default(), &claims, &EncodingKey::from_secret(self.cfg.jwt_secret.as_bytes()))
            .map_err(|e| AuthError::TokenError(e.to_string()))
    }

    /// Check signature and expiry (no leeway) and return the claims.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let key = DecodingKey::from_secret(self.cfg.jwt_secret.as_bytes());
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        decode::<Claims>(token, &key, &validation)
            .map(|data| data.claims)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }
}
