//! OpenAI `/v1/embeddings` provider
//!
//! Questions are always sent as an array so single and batch requests share
//! one response path. Every requested text must come back exactly once.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::HttpClientTrait;
use crate::domain::embedding::{
    Embedding, EmbeddingProvider, EmbeddingRequest, EmbeddingResponse, EmbeddingUsage,
};
use crate::domain::DomainError;

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";

const PROVIDER: &str = "openai";

/// Embedding provider backed by the OpenAI API (or a compatible endpoint)
#[derive(Debug)]
pub struct OpenAiEmbeddingProvider<C: HttpClientTrait> {
    client: C,
    api_key: String,
    endpoint: String,
}

impl<C: HttpClientTrait> OpenAiEmbeddingProvider<C> {
    pub fn new(client: C, api_key: impl Into<String>) -> Self {
        Self::with_base_url(client, api_key, DEFAULT_OPENAI_BASE_URL)
    }

    pub fn with_base_url(
        client: C,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        let endpoint = format!("{}/v1/embeddings", base_url.into().trim_end_matches('/'));

        Self {
            client,
            api_key: api_key.into(),
            endpoint,
        }
    }

    fn collect(
        &self,
        body: EmbeddingsReply,
        expected: usize,
    ) -> Result<EmbeddingResponse, DomainError> {
        if body.data.len() != expected {
            return Err(DomainError::provider(
                PROVIDER,
                format!("Asked for {} embeddings, got {}", expected, body.data.len()),
            ));
        }

        let mut seen = vec![false; expected];
        let mut embeddings = Vec::with_capacity(expected);

        for item in body.data {
            match seen.get_mut(item.index) {
                Some(slot) if !*slot => *slot = true,
                _ => {
                    return Err(DomainError::provider(
                        PROVIDER,
                        format!("Unexpected embedding index {}", item.index),
                    ));
                }
            }

            if item.embedding.is_empty() {
                return Err(DomainError::provider(
                    PROVIDER,
                    format!("Empty embedding at index {}", item.index),
                ));
            }

            embeddings.push(Embedding::new(item.index, item.embedding));
        }

        let usage = body
            .usage
            .map(|u| EmbeddingUsage::new(u.prompt_tokens, u.total_tokens))
            .unwrap_or_default();

        Ok(EmbeddingResponse::new(body.model, embeddings, usage))
    }
}

#[async_trait]
impl<C: HttpClientTrait> EmbeddingProvider for OpenAiEmbeddingProvider<C> {
    async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse, DomainError> {
        let texts = request.inputs();
        let expected = texts.len();

        let payload = serde_json::to_value(EmbeddingsCall {
            model: request.model(),
            input: texts,
            encoding_format: "float",
            dimensions: request.dimensions(),
        })
        .map_err(|e| DomainError::internal(format!("Failed to encode request: {}", e)))?;

        debug!(
            "Embedding {} text(s) with {} via {}",
            expected,
            request.model(),
            self.endpoint
        );

        let authorization = format!("Bearer {}", self.api_key);
        let raw = self
            .client
            .post_json(
                &self.endpoint,
                vec![("Authorization", authorization.as_str())],
                &payload,
            )
            .await?;

        let body: EmbeddingsReply = serde_json::from_value(raw).map_err(|e| {
            DomainError::provider(PROVIDER, format!("Malformed embeddings reply: {}", e))
        })?;

        self.collect(body, expected)
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }

    fn default_model(&self) -> &'static str {
        "text-embedding-3-small"
    }

    fn dimensions(&self, model: &str) -> Option<usize> {
        match model {
            "text-embedding-3-small" | "text-embedding-ada-002" => Some(1536),
            "text-embedding-3-large" => Some(3072),
            _ => None,
        }
    }
}

#[derive(Serialize)]
struct EmbeddingsCall<'a> {
    model: &'a str,
    input: Vec<&'a str>,
    encoding_format: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensions: Option<usize>,
}

#[derive(Deserialize)]
struct EmbeddingsReply {
    model: String,
    data: Vec<EmbeddingItem>,
    usage: Option<UsageItem>,
}

#[derive(Deserialize)]
struct EmbeddingItem {
    index: usize,
    embedding: Vec<f32>,
}

#[derive(Deserialize)]
struct UsageItem {
    prompt_tokens: u32,
    total_tokens: u32,
}
