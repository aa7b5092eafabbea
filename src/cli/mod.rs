//! CLI module for the semantic response cache
//!
//! Subcommands:
//! - `search`: look up a cached answer
//! - `save`: store a question/answer pair
//! - `info`: describe the persisted cache
//! - `faq`: build or query the FAQ knowledge store

pub mod cache;
pub mod faq;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::domain::EmbeddingProvider;
use crate::infrastructure::embedding::EmbeddingProviderFactory;
use crate::infrastructure::logging::{self, LoggingConfig};

/// Semantic response cache for customer-support chat
#[derive(Parser)]
#[command(name = "semantic-cache")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Extra configuration file, applied after config/default and config/local
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the cached answer for a question, if any
    Search(cache::SearchArgs),

    /// Cache the answer to a question
    Save(cache::SaveArgs),

    /// Show where the cache lives and how many entries it holds
    Info,

    /// FAQ knowledge store
    #[command(subcommand)]
    Faq(faq::FaqCommand),
}

/// Load `.env`, configuration and logging
pub fn bootstrap(config_path: Option<&Path>) -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load_from(config_path).context("Failed to load configuration")?;
    logging::init_logging(&LoggingConfig::from(&config.logging));

    Ok(config)
}

fn embedding_provider(config: &AppConfig) -> anyhow::Result<Arc<dyn EmbeddingProvider>> {
    EmbeddingProviderFactory::create(&config.embedding)
        .context("Failed to create embedding provider")
}
