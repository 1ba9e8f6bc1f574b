//! `tagrec` - train and query the tag-to-recipe retrieval recommender.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

/// tagrec - a two-tower retrieval recommender over tagged catalogs
#[derive(Parser, Debug)]
#[command(name = "tagrec")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Train towers from a recipe catalog and optionally query them
    Train(commands::TrainArgs),
    /// Query a previously saved model artifact
    Recommend(commands::RecommendArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Train(args) => commands::train(&args),
        Command::Recommend(args) => commands::recommend(&args),
    }
}
