//! Offline embedding provider derived from SHA-256

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use crate::domain::embedding::{
    Embedding, EmbeddingProvider, EmbeddingRequest, EmbeddingResponse, EmbeddingUsage,
};
use crate::domain::DomainError;

pub const DEFAULT_HASH_DIMENSIONS: usize = 256;

/// Deterministic, credential-free embeddings.
///
/// Vectors are unit length. Identical texts map to identical vectors; any
/// other pair lands roughly `2.0` apart in squared L2, so only exact repeats
/// hit the cache. Not semantic: meant for local runs and demos.
#[derive(Debug, Clone)]
pub struct HashEmbeddingProvider {
    dimensions: usize,
}

impl HashEmbeddingProvider {
    pub fn new(dimensions: usize) -> Result<Self, DomainError> {
        if dimensions == 0 {
            return Err(DomainError::configuration(
                "Hash embedding dimensions must be greater than zero",
            ));
        }

        Ok(Self { dimensions })
    }

    fn vector_for(&self, text: &str) -> Vec<f32> {
        let mut vector = Vec::with_capacity(self.dimensions);
        let mut block: u32 = 0;

        while vector.len() < self.dimensions {
            let digest = Sha256::new()
                .chain_update(text.as_bytes())
                .chain_update(block.to_le_bytes())
                .finalize();

            for chunk in digest.chunks_exact(4) {
                if vector.len() == self.dimensions {
                    break;
                }
                let raw = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
                vector.push((raw as f64 / u32::MAX as f64 * 2.0 - 1.0) as f32);
            }

            block += 1;
        }

        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|x| *x /= norm);
        }

        vector
    }
}

impl Default for HashEmbeddingProvider {
    fn default() -> Self {
        Self {
            dimensions: DEFAULT_HASH_DIMENSIONS,
        }
    }
}

#[async_trait]
impl EmbeddingProvider for HashEmbeddingProvider {
    async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse, DomainError> {
        let inputs = request.inputs();

        let embeddings = inputs
            .iter()
            .enumerate()
            .map(|(idx, text)| Embedding::new(idx, self.vector_for(text)))
            .collect();

        let tokens = inputs.iter().map(|t| t.split_whitespace().count()).sum::<usize>() as u32;

        Ok(EmbeddingResponse::new(
            request.model().to_string(),
            embeddings,
            EmbeddingUsage::new(tokens, tokens),
        ))
    }

    fn provider_name(&self) -> &'static str {
        "hash"
    }

    fn default_model(&self) -> &'static str {
        "sha256"
    }

    fn dimensions(&self, _model: &str) -> Option<usize> {
        Some(self.dimensions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::embedding::squared_l2_distance;

    async fn embed(provider: &HashEmbeddingProvider, text: &str) -> Vec<f32> {
        provider
            .embed(EmbeddingRequest::single("sha256", text))
            .await
            .unwrap()
            .into_vectors()
            .remove(0)
    }

    #[tokio::test]
    async fn test_vectors_are_unit_length() {
        let provider = HashEmbeddingProvider::new(100).unwrap();

        let vector = embed(&provider, "What is the cancellation fee?").await;

        assert_eq!(vector.len(), 100);
        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-4);
    }

    #[tokio::test]
    async fn test_identical_texts_collide() {
        let provider = HashEmbeddingProvider::default();

        let a = embed(&provider, "same question").await;
        let b = embed(&provider, "same question").await;

        assert_eq!(squared_l2_distance(&a, &b), 0.0);
    }

    #[tokio::test]
    async fn test_distinct_texts_are_far_apart() {
        let provider = HashEmbeddingProvider::default();

        let a = embed(&provider, "What is the cancellation fee?").await;
        let b = embed(&provider, "What is today's weather?").await;

        assert!(squared_l2_distance(&a, &b) > 1.0);
    }

    #[tokio::test]
    async fn test_batch_preserves_order() {
        let provider = HashEmbeddingProvider::new(16).unwrap();

        let response = provider
            .embed(EmbeddingRequest::batch("sha256", vec!["x".into(), "y".into()]))
            .await
            .unwrap();

        let vectors = response.into_vectors();
        assert_eq!(vectors[0], embed(&provider, "x").await);
        assert_eq!(vectors[1], embed(&provider, "y").await);
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        assert!(HashEmbeddingProvider::new(0).is_err());
    }
}
