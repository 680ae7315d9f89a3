use async_trait::async_trait;
use models::Database;
use tokio::sync::RwLock;

use super::{StateStore, StoreError};

/// In-memory snapshot with the same load/save contract as the file store.
/// `load` hands out a copy, so callers still have to `save` to publish changes.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Database>,
}

impl MemoryStore {
    pub fn new(db: Database) -> Self {
        Self { inner: RwLock::new(db) }
    }

    pub async fn snapshot(&self) -> Database {
        self.inner.read().await.clone()
    }
}

#[async_trait]
impl StateStore for MemoryStore {
    async fn load(&self) -> Result<Database, StoreError> {
        Ok(self.inner.read().await.clone())
    }

    async fn save(&self, db: &Database) -> Result<(), StoreError> {
        *self.inner.write().await = db.clone();
        Ok(())
    }
}
