use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use models::Database;
use tokio::fs;
use tracing::{debug, info};

use super::{StateStore, StoreError};

static TMP_SEQ: AtomicU64 = AtomicU64::new(0);

/// JSON file holding the whole snapshot, pretty-printed with two-space indent.
///
/// Every `load` re-reads the file; nothing is cached between calls.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    file_path: PathBuf,
}

impl JsonFileStore {
    /// Open the store at `path`, seeding an empty snapshot if the file does not exist.
    /// An existing file is left untouched even if it is malformed.
    /// The parent directory must already exist (see `common::env::ensure_data_dir`).
    pub async fn open<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, StoreError> {
        let file_path = path.into();
        let store = Self { file_path };
        match fs::metadata(&store.file_path).await {
            Ok(_) => debug!(path = %store.file_path.display(), "using existing store file"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                store.save(&Database::default()).await?;
                info!(path = %store.file_path.display(), "seeded empty store file");
            }
            Err(source) => return Err(StoreError::Read { path: store.file_path.clone(), source }),
        }
        Ok(Arc::new(store))
    }

    /// Wrap a path without touching the filesystem.
    pub fn at<P: Into<PathBuf>>(path: P) -> Self {
        Self { file_path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn tmp_path(&self) -> PathBuf {
        let seq = TMP_SEQ.fetch_add(1, Ordering::Relaxed);
        let name = self
            .file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "store".into());
        self.file_path.with_file_name(format!(".{name}.{}.{seq}.tmp", std::process::id()))
    }
}

#[async_trait]
impl StateStore for JsonFileStore {
    async fn load(&self) -> Result<Database, StoreError> {
        let bytes = fs::read(&self.file_path)
            .await
            .map_err(|source| StoreError::Read { path: self.file_path.clone(), source })?;
        serde_json::from_slice(&bytes)
            .map_err(|source| StoreError::Malformed { path: self.file_path.clone(), source })
    }

    /// Write to a sibling temp file, then rename over the target so readers never see half a snapshot.
    async fn save(&self, db: &Database) -> Result<(), StoreError> {
        let data = serde_json::to_vec_pretty(db).map_err(StoreError::Serialize)?;
        let tmp = self.tmp_path();
        fs::write(&tmp, data)
            .await
            .map_err(|source| StoreError::Write { path: tmp.clone(), source })?;
        if let Err(source) = fs::rename(&tmp, &self.file_path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(StoreError::Write { path: self.file_path.clone(), source });
        }
        Ok(())
    }
}
