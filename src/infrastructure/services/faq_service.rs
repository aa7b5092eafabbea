//! FAQ knowledge store: build once from question/answer records, then
//! retrieve the documents most relevant to a customer question.

use std::sync::Arc;

use tracing::info;

use crate::domain::embedding::{EmbeddingProvider, EmbeddingRequest};
use crate::domain::faq::{FaqConfig, FaqMatch, FaqRecord};
use crate::domain::vector_index::{IndexStore, IndexedEntry, VectorIndex};
use crate::domain::DomainError;

#[derive(Debug)]
pub struct FaqService {
    store: Arc<dyn IndexStore>,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    config: FaqConfig,
}

impl FaqService {
    pub fn new(
        store: Arc<dyn IndexStore>,
        embedding_provider: Arc<dyn EmbeddingProvider>,
        config: FaqConfig,
    ) -> Self {
        Self {
            store,
            embedding_provider,
            config,
        }
    }

    /// Embed every record in one batch and replace the persisted FAQ index
    pub async fn build(&self, records: &[FaqRecord]) -> Result<usize, DomainError> {
        if records.is_empty() {
            return Err(DomainError::validation("No FAQ records to index"));
        }

        let texts: Vec<String> = records.iter().map(FaqRecord::document_text).collect();
        let request = EmbeddingRequest::batch(&self.config.embedding_model, texts.clone());
        let vectors = self.embedding_provider.embed(request).await?.into_vectors();

        if vectors.len() != texts.len() {
            return Err(DomainError::provider(
                self.embedding_provider.provider_name(),
                format!("Expected {} embeddings, received {}", texts.len(), vectors.len()),
            ));
        }

        let entries = texts
            .into_iter()
            .zip(vectors)
            .map(|(text, vector)| IndexedEntry::new(text, vector))
            .collect();

        let index = VectorIndex::from_entries(entries)?;
        self.store.persist(&index).await?;

        info!(
            "Built FAQ index with {} documents at {}",
            index.len(),
            self.store.location()
        );

        Ok(index.len())
    }

    /// FAQ documents relevant to `query`, most similar first.
    ///
    /// An empty result means nothing in the FAQ is close enough.
    pub async fn lookup(&self, query: &str) -> Result<Vec<FaqMatch>, DomainError> {
        self.lookup_with(query, self.config.top_k, self.config.max_distance)
            .await
    }

    pub async fn lookup_with(
        &self,
        query: &str,
        top_k: usize,
        max_distance: f32,
    ) -> Result<Vec<FaqMatch>, DomainError> {
        let index = self.store.load().await?.ok_or_else(|| {
            DomainError::storage(format!(
                "FAQ index not found at {}; build it first",
                self.store.location()
            ))
        })?;

        let request = EmbeddingRequest::single(&self.config.embedding_model, query);
        let embedding = self
            .embedding_provider
            .embed(request)
            .await?
            .into_vectors()
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::internal("No embedding returned"))?;

        let matches = index
            .nearest(&embedding, top_k)?
            .into_iter()
            .filter(|n| n.distance <= max_distance)
            .map(|n| FaqMatch {
                similarity: 1.0 - n.distance,
                content: n.entry.text().to_string(),
            })
            .collect();

        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::embedding::MockEmbeddingProvider;
    use crate::infrastructure::vector_index::InMemoryIndexStore;

    fn records() -> Vec<FaqRecord> {
        vec![
            FaqRecord::new("Can I sign up as a company?", "Yes, corporate contracts are available."),
            FaqRecord::new("Is there a cancellation fee?", "No."),
            FaqRecord::new("Can I keep my number?", "Yes, porting is free."),
        ]
    }

    fn provider() -> MockEmbeddingProvider {
        let r = records();
        MockEmbeddingProvider::new(2)
            .with_vector(r[0].document_text(), vec![1.0, 0.0])
            .with_vector(r[1].document_text(), vec![0.0, 1.0])
            .with_vector(r[2].document_text(), vec![0.7, 0.7])
            .with_vector("corporate contract", vec![0.9, 0.1])
    }

    fn service(store: Arc<InMemoryIndexStore>) -> FaqService {
        FaqService::new(store, Arc::new(provider()), FaqConfig::default())
    }

    #[tokio::test]
    async fn test_build_persists_all_records() {
        let store = Arc::new(InMemoryIndexStore::new());
        let service = service(store.clone());

        let count = service.build(&records()).await.unwrap();

        assert_eq!(count, 3);
        let snapshot = store.snapshot().await.unwrap();
        assert_eq!(
            snapshot.entries()[1].text(),
            "question: Is there a cancellation fee?\nanswer: No."
        );
    }

    #[tokio::test]
    async fn test_lookup_filters_by_distance_and_reports_similarity() {
        let store = Arc::new(InMemoryIndexStore::new());
        let service = service(store);
        service.build(&records()).await.unwrap();

        let matches = service.lookup("corporate contract").await.unwrap();

        // [1,0] -> 0.02, [0.7,0.7] -> 0.40, [0,1] -> 1.62 (dropped)
        assert_eq!(matches.len(), 2);
        assert!(matches[0].content.contains("sign up as a company"));
        assert!((matches[0].similarity - 0.98).abs() < 1e-4);
        assert!(matches[0].similarity > matches[1].similarity);
    }

    #[tokio::test]
    async fn test_lookup_with_top_k() {
        let store = Arc::new(InMemoryIndexStore::new());
        let service = service(store);
        service.build(&records()).await.unwrap();

        let matches = service.lookup_with("corporate contract", 1, 10.0).await.unwrap();

        assert_eq!(matches.len(), 1);
    }

    #[tokio::test]
    async fn test_lookup_without_index_is_error() {
        let service = service(Arc::new(InMemoryIndexStore::new()));

        let result = service.lookup("anything").await;

        assert!(matches!(result, Err(DomainError::Storage { .. })));
    }

    #[tokio::test]
    async fn test_build_rejects_empty_records() {
        let service = service(Arc::new(InMemoryIndexStore::new()));

        assert!(matches!(
            service.build(&[]).await,
            Err(DomainError::Validation { .. })
        ));
    }
}
