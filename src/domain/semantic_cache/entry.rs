//! Cache entry and operator-facing summary

use serde::{Deserialize, Serialize};

use crate::domain::vector_index::IndexedEntry;

/// Metadata key carrying the cached answer
pub const ANSWER_KEY: &str = "answer";

/// A question and the answer generated for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub query: String,
    pub answer: String,
}

impl CacheEntry {
    pub fn new(query: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            answer: answer.into(),
        }
    }

    /// Index the query under `vector`; the answer rides along as metadata
    pub fn into_indexed(self, vector: Vec<f32>) -> IndexedEntry {
        IndexedEntry::new(self.query, vector)
            .with_metadata(ANSWER_KEY, serde_json::Value::String(self.answer))
    }

    /// Recover a cache entry from an index entry, `None` if it has no answer
    pub fn from_indexed(entry: &IndexedEntry) -> Option<Self> {
        entry
            .metadata_str(ANSWER_KEY)
            .map(|answer| Self::new(entry.text(), answer))
    }
}

/// Snapshot of the persisted cache
#[derive(Debug, Clone, Serialize)]
pub struct CacheInfo {
    pub location: String,
    pub entries: usize,
    pub dimensions: Option<usize>,
}
