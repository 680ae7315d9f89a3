use std::sync::Arc;

use models::{id, NewUser, User};
use serde_json::{Map, Value};
use tracing::{info, instrument};

use crate::errors::ServiceError;
use crate::storage::StateStore;

/// User records: listing, lookup, self-registration and removal.
#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn StateStore>,
}

impl UserService {
    pub fn new(store: Arc<dyn StateStore>) -> Self { Self { store } }

    pub async fn list(&self) -> Result<Vec<User>, ServiceError> {
        let db = self.store.load().await?;
        Ok(db.users)
    }

    pub async fn get(&self, id: i64) -> Result<User, ServiceError> {
        let db = self.store.load().await?;
        db.user(id).cloned().ok_or_else(|| ServiceError::not_found("user"))
    }

    /// Register a user. `username`, `email`, `password` and `role` must all be
    /// non-empty strings; otherwise nothing is loaded or written.
    #[instrument(skip(self, body))]
    pub async fn create(&self, body: &Map<String, Value>) -> Result<User, ServiceError> {
        let input = NewUser::from_body(body)?;
        let mut db = self.store.load().await?;
        let user = input.into_user(id::next_id());
        db.users.push(user.clone());
        self.store.save(&db).await?;
        info!(id = user.id, email = %user.email, role = %user.role, "user_registered");
        Ok(user)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let mut db = self.store.load().await?;
        if !db.remove_user(id) {
            return Err(ServiceError::not_found("user"));
        }
        self.store.save(&db).await?;
        info!(id, "user_deleted");
        Ok(())
    }
}
