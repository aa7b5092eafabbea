//! Semantic cache configuration

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Configuration for the semantic response cache
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SemanticCacheConfig {
    /// Directory holding the persisted cache index
    #[serde(default = "default_storage_path")]
    pub storage_path: PathBuf,

    /// Maximum nearest-neighbour distance counted as a hit.
    /// Squared L2; calibrated per embedding model, smaller is stricter.
    #[serde(default = "default_distance_threshold")]
    pub distance_threshold: f32,

    /// Embedding model used for queries
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("./vectorstore/cache")
}

fn default_distance_threshold() -> f32 {
    0.05
}

fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}

impl Default for SemanticCacheConfig {
    fn default() -> Self {
        Self {
            storage_path: default_storage_path(),
            distance_threshold: default_distance_threshold(),
            embedding_model: default_embedding_model(),
        }
    }
}

impl SemanticCacheConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_storage_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.storage_path = path.into();
        self
    }

    /// Set the hit threshold; negative values are clamped to 0.0
    pub fn with_distance_threshold(mut self, threshold: f32) -> Self {
        self.distance_threshold = threshold.max(0.0);
        self
    }

    pub fn with_embedding_model(mut self, model: impl Into<String>) -> Self {
        self.embedding_model = model.into();
        self
    }

    /// Reject thresholds that no distance can be compared against
    pub fn validate(&self) -> Result<(), DomainError> {
        if !self.distance_threshold.is_finite() || self.distance_threshold < 0.0 {
            return Err(DomainError::configuration(format!(
                "cache.distance_threshold must be a finite value >= 0, got {}",
                self.distance_threshold
            )));
        }

        Ok(())
    }
}
