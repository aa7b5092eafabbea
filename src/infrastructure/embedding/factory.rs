use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use super::hash::DEFAULT_HASH_DIMENSIONS;
use super::openai::DEFAULT_OPENAI_BASE_URL;
use super::{HashEmbeddingProvider, HttpClient, OpenAiEmbeddingProvider};
use crate::domain::{DomainError, EmbeddingProvider};

const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Embedding provider configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EmbeddingProviderConfig {
    #[serde(rename = "openai")]
    OpenAi {
        /// Falls back to `OPENAI_API_KEY`
        #[serde(default)]
        api_key: Option<String>,
        #[serde(default = "default_base_url")]
        base_url: String,
        #[serde(default)]
        timeout_secs: Option<u64>,
    },
    Hash {
        #[serde(default = "default_hash_dimensions")]
        dimensions: usize,
    },
}

fn default_base_url() -> String {
    DEFAULT_OPENAI_BASE_URL.to_string()
}

fn default_hash_dimensions() -> usize {
    DEFAULT_HASH_DIMENSIONS
}

impl Default for EmbeddingProviderConfig {
    fn default() -> Self {
        Self::OpenAi {
            api_key: None,
            base_url: default_base_url(),
            timeout_secs: None,
        }
    }
}

/// Factory for creating embedding providers
#[derive(Debug)]
pub struct EmbeddingProviderFactory;

impl EmbeddingProviderFactory {
    pub fn create(
        config: &EmbeddingProviderConfig,
    ) -> Result<Arc<dyn EmbeddingProvider>, DomainError> {
        match config {
            EmbeddingProviderConfig::OpenAi {
                api_key,
                base_url,
                timeout_secs,
            } => {
                let api_key = Self::resolve_api_key(api_key.as_deref())?;

                let client = match timeout_secs {
                    Some(secs) => HttpClient::with_timeout(Duration::from_secs(*secs))?,
                    None => HttpClient::new(),
                };

                Ok(Arc::new(OpenAiEmbeddingProvider::with_base_url(
                    client, api_key, base_url,
                )))
            }

            EmbeddingProviderConfig::Hash { dimensions } => {
                Ok(Arc::new(HashEmbeddingProvider::new(*dimensions)?))
            }
        }
    }

    fn resolve_api_key(configured: Option<&str>) -> Result<String, DomainError> {
        if let Some(key) = configured.filter(|k| !k.trim().is_empty()) {
            return Ok(key.to_string());
        }

        std::env::var(OPENAI_API_KEY_ENV)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                DomainError::configuration(format!(
                    "OpenAI API key missing: set embedding.api_key or {}",
                    OPENAI_API_KEY_ENV
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_hash_provider() {
        let provider =
            EmbeddingProviderFactory::create(&EmbeddingProviderConfig::Hash { dimensions: 32 })
                .unwrap();

        assert_eq!(provider.provider_name(), "hash");
        assert_eq!(provider.dimensions("any"), Some(32));
    }

    #[test]
    fn test_create_openai_with_configured_key() {
        let config = EmbeddingProviderConfig::OpenAi {
            api_key: Some("sk-test".into()),
            base_url: "http://localhost:9999".into(),
            timeout_secs: Some(10),
        };

        let provider = EmbeddingProviderFactory::create(&config).unwrap();

        assert_eq!(provider.provider_name(), "openai");
    }

    #[test]
    fn test_configured_key_takes_precedence() {
        assert_eq!(
            EmbeddingProviderFactory::resolve_api_key(Some("sk-configured")).unwrap(),
            "sk-configured"
        );
    }

    #[test]
    fn test_deserialize_tagged_config() {
        let config: EmbeddingProviderConfig =
            serde_json::from_str(r#"{"type": "hash", "dimensions": 64}"#).unwrap();
        assert!(matches!(config, EmbeddingProviderConfig::Hash { dimensions: 64 }));

        let config: EmbeddingProviderConfig =
            serde_json::from_str(r#"{"type": "openai"}"#).unwrap();
        match config {
            EmbeddingProviderConfig::OpenAi { base_url, api_key, .. } => {
                assert_eq!(base_url, DEFAULT_OPENAI_BASE_URL);
                assert!(api_key.is_none());
            }
            other => panic!("unexpected config: {:?}", other),
        }
    }
}
