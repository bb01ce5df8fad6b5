use anyhow::Result;
use clap::Parser;

use quotemill::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate { input, master, out } => {
            quotemill::cli::generate::run(&input, master.as_deref(), &out).await
        }
        Commands::Extract { input } => quotemill::cli::extract::run(&input).await,
        Commands::Match { table, master } => {
            quotemill::cli::match_rows::run(&table, master.as_deref())
        }
        Commands::Body {
            input,
            keep_boilerplate,
        } => quotemill::cli::body::run(&input, keep_boilerplate),
    }
}
