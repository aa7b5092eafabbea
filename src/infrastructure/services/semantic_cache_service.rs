//! Semantic response cache service
//!
//! Reuses answers generated for earlier questions when a new question embeds
//! within `distance_threshold` of a stored one. Lookups fail open: storage
//! trouble on the read path is logged and reported as a miss. Writes fail
//! loud: every `save` error reaches the caller. Appends go through
//! [`IndexStore::update`], which serializes writers sharing a store.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::domain::embedding::{EmbeddingProvider, EmbeddingRequest};
use crate::domain::semantic_cache::{CacheEntry, CacheInfo, SemanticCacheConfig};
use crate::domain::vector_index::{IndexStore, VectorIndex};
use crate::domain::DomainError;

/// Semantic cache over a persisted vector index
#[derive(Debug)]
pub struct SemanticCacheService {
    store: Arc<dyn IndexStore>,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    config: SemanticCacheConfig,
}

impl SemanticCacheService {
    pub fn new(store: Arc<dyn IndexStore>, embedding_provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self::with_config(store, embedding_provider, SemanticCacheConfig::default())
    }

    pub fn with_config(
        store: Arc<dyn IndexStore>,
        embedding_provider: Arc<dyn EmbeddingProvider>,
        config: SemanticCacheConfig,
    ) -> Self {
        Self {
            store,
            embedding_provider,
            config,
        }
    }

    pub fn config(&self) -> &SemanticCacheConfig {
        &self.config
    }

    async fn embed_query(&self, query: &str) -> Result<Vec<f32>, DomainError> {
        let request = EmbeddingRequest::single(&self.config.embedding_model, query);
        let response = self.embedding_provider.embed(request).await?;

        response
            .into_vectors()
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::internal("No embedding returned"))
    }

    /// Return the answer stored for the closest earlier question, if close enough
    pub async fn search(&self, query: &str) -> Result<Option<String>, DomainError> {
        let index = match self.store.load().await {
            Ok(Some(index)) => index,
            Ok(None) => {
                debug!("Semantic cache is empty at {}", self.store.location());
                return Ok(None);
            }
            Err(e) => {
                warn!(
                    "Semantic cache at {} unreadable, treating as miss: {}",
                    self.store.location(),
                    e
                );
                return Ok(None);
            }
        };

        let embedding = self.embed_query(query).await?;

        let neighbors = match index.nearest(&embedding, 1) {
            Ok(neighbors) => neighbors,
            Err(e) => {
                warn!("Semantic cache lookup failed, treating as miss: {}", e);
                return Ok(None);
            }
        };

        let Some(nearest) = neighbors.first() else {
            return Ok(None);
        };

        // NaN on either side never counts as a hit
        let within_threshold = nearest.distance <= self.config.distance_threshold;
        if !within_threshold {
            debug!(
                "Semantic cache miss: nearest distance {:.4} exceeds threshold {:.4}",
                nearest.distance, self.config.distance_threshold
            );
            return Ok(None);
        }

        match CacheEntry::from_indexed(nearest.entry) {
            Some(entry) => {
                debug!(
                    "Semantic cache hit with distance {:.4} for entry {}",
                    nearest.distance,
                    nearest.entry.id()
                );
                Ok(Some(entry.answer))
            }
            None => {
                warn!(
                    "Semantic cache entry {} has no answer, treating as miss",
                    nearest.entry.id()
                );
                Ok(None)
            }
        }
    }

    /// Append a question/answer pair and persist before returning
    pub async fn save(&self, query: &str, answer: &str) -> Result<(), DomainError> {
        if query.is_empty() {
            return Err(DomainError::validation("Cache query must not be empty"));
        }

        if answer.is_empty() {
            return Err(DomainError::validation("Cache answer must not be empty"));
        }

        let embedding = self.embed_query(query).await?;
        let entry = CacheEntry::new(query, answer).into_indexed(embedding);

        let index = self
            .store
            .update(Box::new(move |index: &mut VectorIndex| index.add(entry)))
            .await?;

        info!(
            "Cached answer at {} ({} entries)",
            self.store.location(),
            index.len()
        );

        Ok(())
    }

    /// Entry count and dimensionality of the persisted cache
    pub async fn info(&self) -> Result<CacheInfo, DomainError> {
        let index = self.store.load().await?.unwrap_or_default();

        Ok(CacheInfo {
            location: self.store.location(),
            entries: index.len(),
            dimensions: index.dimensions(),
        })
    }
}

/// Caller-facing cache operations
#[async_trait]
pub trait SemanticCacheServiceTrait: Send + Sync + std::fmt::Debug {
    async fn search(&self, query: &str) -> Result<Option<String>, DomainError>;

    async fn save(&self, query: &str, answer: &str) -> Result<(), DomainError>;
}

#[async_trait]
impl SemanticCacheServiceTrait for SemanticCacheService {
    async fn search(&self, query: &str) -> Result<Option<String>, DomainError> {
        SemanticCacheService::search(self, query).await
    }

    async fn save(&self, query: &str, answer: &str) -> Result<(), DomainError> {
        SemanticCacheService::save(self, query, answer).await
    }
}
