//! Cache subcommands

use std::sync::Arc;

use clap::Args;
use tracing::info;

use super::embedding_provider;
use crate::config::AppConfig;
use crate::infrastructure::services::SemanticCacheService;
use crate::infrastructure::vector_index::FileIndexStore;

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Customer question
    pub query: String,

    /// Override the configured distance threshold
    #[arg(long)]
    pub threshold: Option<f32>,
}

#[derive(Args, Debug)]
pub struct SaveArgs {
    /// Customer question
    pub query: String,

    /// Answer to reuse for similar questions
    pub answer: String,
}

fn cache_service(config: &AppConfig, threshold: Option<f32>) -> anyhow::Result<SemanticCacheService> {
    let mut cache_config = config.cache.clone();
    if let Some(threshold) = threshold {
        cache_config = cache_config.with_distance_threshold(threshold);
    }

    let store = Arc::new(FileIndexStore::new(&cache_config.storage_path));

    Ok(SemanticCacheService::with_config(
        store,
        embedding_provider(config)?,
        cache_config,
    ))
}

pub async fn search(config: &AppConfig, args: SearchArgs) -> anyhow::Result<()> {
    let service = cache_service(config, args.threshold)?;

    match service.search(&args.query).await? {
        Some(answer) => println!("(cache) {}", answer),
        None => println!("No cached answer"),
    }

    Ok(())
}

pub async fn save(config: &AppConfig, args: SaveArgs) -> anyhow::Result<()> {
    let service = cache_service(config, None)?;

    service.save(&args.query, &args.answer).await?;
    info!("Saved answer for '{}'", args.query);
    println!("Saved to {}", service.config().storage_path.display());

    Ok(())
}

pub async fn info(config: &AppConfig) -> anyhow::Result<()> {
    let info = cache_service(config, None)?.info().await?;

    println!("{}", serde_json::to_string_pretty(&info)?);

    Ok(())
}
