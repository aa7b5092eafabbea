//! A single stored text and its embedding

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An entry in a vector index: the embedded text plus free-form metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedEntry {
    id: String,
    /// The text that was embedded
    text: String,
    vector: Vec<f32>,
    /// Attached data, never embedded
    #[serde(default)]
    metadata: HashMap<String, serde_json::Value>,
    created_at: DateTime<Utc>,
}

impl IndexedEntry {
    pub fn new(text: impl Into<String>, vector: Vec<f32>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text: text.into(),
            vector,
            metadata: HashMap::new(),
            created_at: Utc::now(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn vector(&self) -> &[f32] {
        &self.vector
    }

    pub fn metadata(&self) -> &HashMap<String, serde_json::Value> {
        &self.metadata
    }

    /// String metadata value, `None` if missing or not a string
    pub fn metadata_str(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(|value| value.as_str())
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
