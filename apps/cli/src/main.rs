//! tenderbot CLI: drive the tender-link handler from a terminal.
//!
//! Runs the same extraction, resolution, and reply logic the chat bot uses,
//! printing the reply instead of posting it.

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
