//! Domain layer - Core models and traits

pub mod conversation;
pub mod embedding;
pub mod error;
pub mod faq;
pub mod semantic_cache;
pub mod vector_index;

pub use conversation::{ChatMessage, ChatRole, Conversation};
pub use embedding::{EmbeddingProvider, EmbeddingRequest, EmbeddingResponse};
pub use error::DomainError;
pub use faq::{FaqConfig, FaqMatch, FaqRecord};
pub use semantic_cache::{CacheEntry, CacheInfo, SemanticCacheConfig};
pub use vector_index::{IndexStore, IndexedEntry, Neighbor, VectorIndex};
