//! Embedding provider implementations

mod factory;
mod hash;
mod http_client;
mod openai;

pub use factory::{EmbeddingProviderConfig, EmbeddingProviderFactory};
pub use hash::HashEmbeddingProvider;
pub use http_client::{HttpClient, HttpClientTrait};
pub use openai::OpenAiEmbeddingProvider;
