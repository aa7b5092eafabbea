//! FAQ subcommands

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Subcommand};

use super::embedding_provider;
use crate::config::AppConfig;
use crate::domain::FaqRecord;
use crate::infrastructure::services::FaqService;
use crate::infrastructure::vector_index::FileIndexStore;

#[derive(Subcommand, Debug)]
pub enum FaqCommand {
    /// Index a JSON array of {"question", "answer"} records
    Build(BuildArgs),

    /// Show FAQ documents relevant to a question
    Query(QueryArgs),
}

#[derive(Args, Debug)]
pub struct BuildArgs {
    #[arg(long)]
    pub input: PathBuf,
}

#[derive(Args, Debug)]
pub struct QueryArgs {
    pub query: String,

    #[arg(long)]
    pub top_k: Option<usize>,

    #[arg(long)]
    pub max_distance: Option<f32>,
}

pub async fn run(config: &AppConfig, command: FaqCommand) -> anyhow::Result<()> {
    let service = FaqService::new(
        Arc::new(FileIndexStore::new(&config.faq.storage_path)),
        embedding_provider(config)?,
        config.faq.clone(),
    );

    match command {
        FaqCommand::Build(args) => {
            let raw = tokio::fs::read(&args.input)
                .await
                .with_context(|| format!("Failed to read {}", args.input.display()))?;
            let records: Vec<FaqRecord> = serde_json::from_slice(&raw)
                .with_context(|| format!("Invalid FAQ file {}", args.input.display()))?;

            let count = service.build(&records).await?;
            println!(
                "Indexed {} FAQ entries into {}",
                count,
                config.faq.storage_path.display()
            );
        }
        FaqCommand::Query(args) => {
            let matches = service
                .lookup_with(
                    &args.query,
                    args.top_k.unwrap_or(config.faq.top_k),
                    args.max_distance.unwrap_or(config.faq.max_distance),
                )
                .await?;

            println!("{}", serde_json::to_string_pretty(&matches)?);
        }
    }

    Ok(())
}
