//! File-backed vector index store

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;
use uuid::Uuid;

use super::lock::DirLock;
use crate::domain::vector_index::{IndexStore, IndexUpdate, IndexedEntry, VectorIndex};
use crate::domain::DomainError;

const INDEX_FILE: &str = "index.json";
const LOCK_FILE: &str = "index.lock";
const FORMAT_VERSION: u32 = 1;

#[derive(Serialize)]
struct IndexFileRef<'a> {
    version: u32,
    dimensions: Option<usize>,
    entries: &'a [IndexedEntry],
}

#[derive(Deserialize)]
struct IndexFile {
    version: u32,
    dimensions: Option<usize>,
    entries: Vec<IndexedEntry>,
}

/// Stores an index as `<dir>/index.json`.
///
/// Writes go to a uniquely named temporary file in the same directory and are
/// renamed over `index.json`, so readers only ever see a complete snapshot.
/// [`IndexStore::update`] holds an exclusive lock on `<dir>/index.lock` from
/// load to rename, so writers in separate processes never drop each other's
/// entries.
#[derive(Debug, Clone)]
pub struct FileIndexStore {
    dir: PathBuf,
}

impl FileIndexStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn index_path(&self) -> PathBuf {
        self.dir.join(INDEX_FILE)
    }

    fn parse(&self, bytes: &[u8]) -> Result<VectorIndex, DomainError> {
        let path = self.index_path();

        let file: IndexFile = serde_json::from_slice(bytes).map_err(|e| {
            DomainError::storage(format!("Failed to parse {}: {}", path.display(), e))
        })?;

        if file.version != FORMAT_VERSION {
            return Err(DomainError::storage(format!(
                "Unsupported index format version {} in {} (expected {})",
                file.version,
                path.display(),
                FORMAT_VERSION
            )));
        }

        let index = VectorIndex::from_entries(file.entries).map_err(|e| {
            DomainError::storage(format!("Corrupted index at {}: {}", path.display(), e))
        })?;

        if index.dimensions().is_some() && index.dimensions() != file.dimensions {
            return Err(DomainError::storage(format!(
                "Index header in {} declares {:?} dimensions, entries have {:?}",
                path.display(),
                file.dimensions,
                index.dimensions()
            )));
        }

        Ok(index)
    }

    async fn lock(&self) -> Result<DirLock, DomainError> {
        fs::create_dir_all(&self.dir).await.map_err(|e| {
            DomainError::storage(format!("Failed to create {}: {}", self.dir.display(), e))
        })?;

        DirLock::acquire_async(self.dir.join(LOCK_FILE)).await
    }

    async fn write_atomically(&self, body: &[u8]) -> std::io::Result<()> {
        fs::create_dir_all(&self.dir).await?;

        let tmp_path = self
            .dir
            .join(format!("{}.{}.tmp", INDEX_FILE, Uuid::new_v4().simple()));

        let result = async {
            let mut file = fs::File::create(&tmp_path).await?;
            file.write_all(body).await?;
            file.sync_all().await?;
            fs::rename(&tmp_path, self.index_path()).await
        }
        .await;

        if result.is_err() {
            let _ = fs::remove_file(&tmp_path).await;
        }

        result
    }
}

#[async_trait]
impl IndexStore for FileIndexStore {
    async fn load(&self) -> Result<Option<VectorIndex>, DomainError> {
        let path = self.index_path();

        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No persisted index at {}", path.display());
                return Ok(None);
            }
            Err(e) => {
                return Err(DomainError::storage(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )));
            }
        };

        self.parse(&bytes).map(Some)
    }

    async fn persist(&self, index: &VectorIndex) -> Result<(), DomainError> {
        let body = serde_json::to_vec(&IndexFileRef {
            version: FORMAT_VERSION,
            dimensions: index.dimensions(),
            entries: index.entries(),
        })
        .map_err(|e| DomainError::internal(format!("Failed to serialize index: {}", e)))?;

        self.write_atomically(&body).await.map_err(|e| {
            DomainError::storage(format!(
                "Failed to persist index to {}: {}",
                self.index_path().display(),
                e
            ))
        })?;

        debug!(
            "Persisted {} entries to {}",
            index.len(),
            self.index_path().display()
        );

        Ok(())
    }

    async fn update(&self, apply: IndexUpdate) -> Result<VectorIndex, DomainError> {
        let _lock = self.lock().await?;

        let mut index = self.load().await?.unwrap_or_default();
        apply(&mut index)?;
        self.persist(&index).await?;

        Ok(index)
    }

    fn location(&self) -> String {
        self.dir.display().to_string()
    }
}
