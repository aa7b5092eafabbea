use clap::Parser;
use semantic_response_cache::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli::bootstrap(cli.config.as_deref())?;

    match cli.command {
        Command::Search(args) => cli::cache::search(&config, args).await,
        Command::Save(args) => cli::cache::save(&config, args).await,
        Command::Info => cli::cache::info(&config).await,
        Command::Faq(command) => cli::faq::run(&config, command).await,
    }
}
