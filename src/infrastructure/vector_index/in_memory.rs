//! In-memory vector index store for development and testing

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::vector_index::{IndexStore, IndexUpdate, VectorIndex};
use crate::domain::DomainError;

/// Keeps the "persisted" snapshot in process memory.
///
/// Load and persist failures can be injected to exercise error paths.
#[derive(Debug, Default)]
pub struct InMemoryIndexStore {
    snapshot: RwLock<Option<VectorIndex>>,
    load_error: Option<String>,
    persist_error: Option<String>,
    persists: AtomicUsize,
}

impl InMemoryIndexStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_index(index: VectorIndex) -> Self {
        Self {
            snapshot: RwLock::new(Some(index)),
            ..Self::default()
        }
    }

    pub fn with_load_error(mut self, error: impl Into<String>) -> Self {
        self.load_error = Some(error.into());
        self
    }

    pub fn with_persist_error(mut self, error: impl Into<String>) -> Self {
        self.persist_error = Some(error.into());
        self
    }

    /// Number of successful `persist` calls
    pub fn persist_count(&self) -> usize {
        self.persists.load(Ordering::SeqCst)
    }

    /// Current snapshot, bypassing injected load errors
    pub async fn snapshot(&self) -> Option<VectorIndex> {
        self.snapshot.read().await.clone()
    }
}

#[async_trait]
impl IndexStore for InMemoryIndexStore {
    async fn load(&self) -> Result<Option<VectorIndex>, DomainError> {
        if let Some(ref error) = self.load_error {
            return Err(DomainError::storage(error));
        }

        Ok(self.snapshot.read().await.clone())
    }

    async fn persist(&self, index: &VectorIndex) -> Result<(), DomainError> {
        if let Some(ref error) = self.persist_error {
            return Err(DomainError::storage(error));
        }

        *self.snapshot.write().await = Some(index.clone());
        self.persists.fetch_add(1, Ordering::SeqCst);

        Ok(())
    }

    async fn update(&self, apply: IndexUpdate) -> Result<VectorIndex, DomainError> {
        if let Some(ref error) = self.load_error {
            return Err(DomainError::storage(error));
        }

        let mut snapshot = self.snapshot.write().await;
        let mut index = snapshot.clone().unwrap_or_default();
        apply(&mut index)?;

        if let Some(ref error) = self.persist_error {
            return Err(DomainError::storage(error));
        }

        *snapshot = Some(index.clone());
        self.persists.fetch_add(1, Ordering::SeqCst);

        Ok(index)
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::vector_index::IndexedEntry;

    #[tokio::test]
    async fn test_empty_store_loads_none() {
        let store = InMemoryIndexStore::new();

        assert!(store.load().await.unwrap().is_none());
        assert_eq!(store.location(), "memory");
    }

    #[tokio::test]
    async fn test_persist_replaces_snapshot() {
        let store = InMemoryIndexStore::new();
        let index = VectorIndex::from_entries(vec![IndexedEntry::new("q", vec![1.0])]).unwrap();

        store.persist(&index).await.unwrap();

        assert_eq!(store.load().await.unwrap().unwrap().len(), 1);
        assert_eq!(store.persist_count(), 1);
    }

    #[tokio::test]
    async fn test_injected_errors() {
        let store = InMemoryIndexStore::with_index(VectorIndex::new())
            .with_load_error("disk on fire")
            .with_persist_error("read-only filesystem");

        assert!(store.load().await.is_err());
        assert!(store.persist(&VectorIndex::new()).await.is_err());
        assert_eq!(store.persist_count(), 0);
        assert!(store.snapshot().await.is_some());
    }

    #[tokio::test]
    async fn test_update_appends_to_snapshot() {
        let store = InMemoryIndexStore::new();

        for text in ["q1", "q2"] {
            let entry = IndexedEntry::new(text, vec![1.0]);
            store
                .update(Box::new(move |index: &mut VectorIndex| index.add(entry)))
                .await
                .unwrap();
        }

        assert_eq!(store.snapshot().await.unwrap().len(), 2);
        assert_eq!(store.persist_count(), 2);
    }

    #[tokio::test]
    async fn test_failed_update_keeps_snapshot() {
        let store = InMemoryIndexStore::new().with_persist_error("read-only filesystem");
        let entry = IndexedEntry::new("q", vec![1.0]);

        let result = store
            .update(Box::new(move |index: &mut VectorIndex| index.add(entry)))
            .await;

        assert!(matches!(result, Err(DomainError::Storage { .. })));
        assert!(store.snapshot().await.is_none());
    }
}
