use clap::Parser;
use pdf_search::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve => cli::serve::run().await,
        Command::Ingest(args) => cli::ingest::run(args).await,
        Command::Reprocess(args) => cli::reprocess::run(args).await,
    }
}
