//! Semantic Response Cache
//!
//! Reuses answers to repeated customer-support questions:
//! - Nearest-neighbour lookup over query embeddings, persisted between runs
//! - Pluggable embedding providers (OpenAI, offline hashing)
//! - First-turn caching policy for support conversations
//! - FAQ knowledge store built on the same vector index

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;
pub use domain::DomainError;
pub use infrastructure::services::{SemanticCacheService, SemanticCacheServiceTrait};
