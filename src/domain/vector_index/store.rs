//! Persistence seam for vector indexes

use std::fmt::Debug;

use async_trait::async_trait;

use super::VectorIndex;
use crate::domain::DomainError;

/// Mutation applied to the latest snapshot inside [`IndexStore::update`]
pub type IndexUpdate = Box<dyn FnOnce(&mut VectorIndex) -> Result<(), DomainError> + Send>;

/// Durable home of one vector index.
///
/// Each call reads or replaces the whole snapshot; stores keep no view of
/// the index between calls.
#[async_trait]
pub trait IndexStore: Send + Sync + Debug {
    /// Load the persisted index, `None` if nothing has been persisted yet
    async fn load(&self) -> Result<Option<VectorIndex>, DomainError>;

    /// Replace the persisted index with `index`
    async fn persist(&self, index: &VectorIndex) -> Result<(), DomainError>;

    /// Load, apply `apply` and persist, returning the stored index.
    ///
    /// Stores shared between writers override this to hold their lock for
    /// the whole sequence. Nothing is persisted when `apply` fails.
    async fn update(&self, apply: IndexUpdate) -> Result<VectorIndex, DomainError> {
        let mut index = self.load().await?.unwrap_or_default();
        apply(&mut index)?;
        self.persist(&index).await?;

        Ok(index)
    }

    /// Human-readable location (path, URI)
    fn location(&self) -> String;
}
