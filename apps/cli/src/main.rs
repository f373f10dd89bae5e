//! ContentForge CLI — competitor-aware article generation.
//!
//! Turns a topic into a publication-ready Markdown article by mining
//! competitor pages for structure and entities, then driving a chained
//! sequence of generation stages.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
