use std::path::Path;

use serde::Deserialize;

use crate::domain::{FaqConfig, SemanticCacheConfig};
use crate::infrastructure::embedding::EmbeddingProviderConfig;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub embedding: EmbeddingProviderConfig,
    #[serde(default)]
    pub cache: SemanticCacheConfig,
    #[serde(default)]
    pub faq: FaqConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

fn default_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
        }
    }
}

impl AppConfig {
    /// Layered load: `config/default`, `config/local`, then `APP__*` env vars
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(None)
    }

    /// Same as [`AppConfig::load`] with an extra file applied before env vars.
    /// Fails on an unusable cache threshold.
    pub fn load_from(extra: Option<&Path>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false));

        if let Some(path) = extra {
            builder = builder.add_source(config::File::from(path.to_path_buf()));
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let app_config: Self = config.try_deserialize()?;
        app_config
            .cache
            .validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;

        Ok(app_config)
    }
}
