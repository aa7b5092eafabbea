//! Flat, append-only nearest-neighbour index

use serde::{Deserialize, Serialize};

use super::IndexedEntry;
use crate::domain::embedding::squared_l2_distance;
use crate::domain::DomainError;

/// A neighbour returned by [`VectorIndex::nearest`]
#[derive(Debug, Clone, Copy)]
pub struct Neighbor<'a> {
    pub entry: &'a IndexedEntry,
    /// Squared Euclidean distance to the query (smaller is closer)
    pub distance: f32,
}

/// Exact k-NN over every stored vector.
///
/// All vectors share the dimensionality of the first entry. Entries are only
/// ever appended; insertion order breaks distance ties.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VectorIndex {
    entries: Vec<IndexedEntry>,
}

impl VectorIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from existing entries
    pub fn from_entries(entries: Vec<IndexedEntry>) -> Result<Self, DomainError> {
        let mut index = Self::new();

        for entry in entries {
            index.add(entry)?;
        }

        Ok(index)
    }

    /// Append an entry
    pub fn add(&mut self, entry: IndexedEntry) -> Result<(), DomainError> {
        if entry.vector().is_empty() {
            return Err(DomainError::validation("Cannot index an empty vector"));
        }

        if let Some(expected) = self.dimensions() {
            if entry.vector().len() != expected {
                return Err(DomainError::cache(format!(
                    "Vector has {} dimensions, index expects {}",
                    entry.vector().len(),
                    expected
                )));
            }
        }

        self.entries.push(entry);
        Ok(())
    }

    /// The `k` closest entries, nearest first
    pub fn nearest(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor<'_>>, DomainError> {
        let Some(expected) = self.dimensions() else {
            return Ok(Vec::new());
        };

        if query.len() != expected {
            return Err(DomainError::cache(format!(
                "Query vector has {} dimensions, index expects {}",
                query.len(),
                expected
            )));
        }

        let mut neighbors: Vec<Neighbor<'_>> = self
            .entries
            .iter()
            .map(|entry| Neighbor {
                entry,
                distance: squared_l2_distance(query, entry.vector()),
            })
            .collect();

        // Stable sort: equal distances keep insertion order.
        neighbors.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        neighbors.truncate(k);

        Ok(neighbors)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Dimensionality of stored vectors, `None` while empty
    pub fn dimensions(&self) -> Option<usize> {
        self.entries.first().map(|entry| entry.vector().len())
    }

    pub fn entries(&self) -> &[IndexedEntry] {
        &self.entries
    }
}
