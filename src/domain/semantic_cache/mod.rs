//! Semantic cache domain models
//!
//! Maps a natural-language question to a previously generated answer by
//! nearest-neighbour lookup over query embeddings.

mod config;
mod entry;

pub use config::SemanticCacheConfig;
pub use entry::{CacheEntry, CacheInfo, ANSWER_KEY};
