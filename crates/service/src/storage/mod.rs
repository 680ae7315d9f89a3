//! Storage port for the service layer
//!
//! The whole `Database` snapshot is the unit of persistence: callers load it,
//! mutate a copy and save it back. Nothing here serializes those
//! read-modify-write spans, so concurrent mutations are last-write-wins.

use std::path::PathBuf;

use async_trait::async_trait;
use models::Database;
use thiserror::Error;

pub mod json_file_store;
pub mod memory_store;

pub use json_file_store::JsonFileStore;
pub use memory_store::MemoryStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cannot read store file {}: {source}", .path.display())]
    Read { path: PathBuf, source: std::io::Error },
    #[error("cannot write store file {}: {source}", .path.display())]
    Write { path: PathBuf, source: std::io::Error },
    #[error("store file {} is not a valid snapshot: {source}", .path.display())]
    Malformed { path: PathBuf, source: serde_json::Error },
    #[error("cannot serialize snapshot: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Load/save capability over the full snapshot.
#[async_trait]
pub trait StateStore: Send + Sync {
    async fn load(&self) -> Result<Database, StoreError>;
    async fn save(&self, db: &Database) -> Result<(), StoreError>;
}
