//! DeepResearch CLI — answer questions from live web context.
//!
//! Searches the web for context, asks a language model to draft an answer,
//! and prints it as plain text.

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
