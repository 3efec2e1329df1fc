//! Development tasks for the outcome engine
//!
//! This binary provides content and balance utilities using the cargo-xtask
//! pattern. Run with: `cargo xtask <command>`

mod commands;
mod utils;

use anyhow::Result;
use clap::Parser;
use commands::{Drops, Duel, Roll, Validate};

/// Development tasks for the outcome engine
#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Content and balance tools for the outcome engine", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Load the content directory and report every integrity issue
    Validate(Validate),

    /// Simulate drop tables and compare against their configured odds
    Drops(Drops),

    /// Roll dice notation and summarize the distribution
    Roll(Roll),

    /// Fight a catalog monster with a configurable player
    Duel(Duel),
}

fn main() -> Result<()> {
    // Load .env file if it exists (for OUTCOME_DATA_DIR and RUST_LOG)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Validate(cmd) => cmd.execute(),
        Command::Drops(cmd) => cmd.execute(),
        Command::Roll(cmd) => cmd.execute(),
        Command::Duel(cmd) => cmd.execute(),
    }
}
