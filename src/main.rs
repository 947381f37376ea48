use anyhow::Context;
use clap::Parser;

use leaselens::cli::{check, compare, heatmap, score, CheckCommand, Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    match cli.command {
        Commands::Compare(args) => compare::run(args)
            .await
            .context("comparison run failed")?,
        Commands::Heatmap(args) => heatmap::run(args).await.context("heatmap run failed")?,
        Commands::Score(args) => score::run(args).context("scoring failed")?,
        Commands::Check(CheckCommand::Config(args)) => {
            check::config(args).context("config check failed")?
        }
    }

    Ok(())
}
