//! Utility functions for xtask commands

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use outcome_content::ContentFactory;
use outcome_core::{Catalog, EngineConfig, PcgRng};

/// Environment variable naming the content directory.
pub const DATA_DIR_ENV: &str = "OUTCOME_DATA_DIR";

/// Content directory used when neither the flag nor the environment names one.
pub const DEFAULT_DATA_DIR: &str = "crates/game/content/data";

/// `--data-dir` shared by every command that reads content.
#[derive(Args, Debug, Clone)]
pub struct ContentArgs {
    /// Content directory (defaults to $OUTCOME_DATA_DIR, then crates/game/content/data)
    #[arg(short, long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,
}

impl ContentArgs {
    pub fn resolve_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .or_else(|| std::env::var_os(DATA_DIR_ENV).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
    }

    /// Loads the catalog and engine configuration.
    pub fn load(&self) -> Result<(Catalog, EngineConfig)> {
        let dir = self.resolve_dir();
        if !dir.is_dir() {
            anyhow::bail!(
                "Content directory not found: {}\n\nHint: pass --data-dir or set {}",
                dir.display(),
                DATA_DIR_ENV
            );
        }
        ContentFactory::new(&dir)
            .load_all()
            .with_context(|| format!("Failed to load content from {}", dir.display()))
    }
}

/// `--seed` shared by every command that rolls.
#[derive(Args, Debug, Clone)]
pub struct SeedArgs {
    /// RNG seed (random if omitted; the chosen seed is printed)
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,
}

impl SeedArgs {
    pub fn rng(&self) -> (u64, PcgRng) {
        let seed = self.seed.unwrap_or_else(rand::random);
        tracing::debug!(seed, "rng seeded");
        (seed, PcgRng::seed_from_u64(seed))
    }
}

/// Output format for commands that produce a report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary
    Summary,
    /// Full JSON output
    Json,
}

/// Renders a probability as a percentage with two decimals.
pub fn percent(p: f64) -> String {
    format!("{:6.2}%", p * 100.0)
}

/// Proportional bar for terminal histograms.
pub fn bar(fraction: f64, width: usize) -> String {
    let filled = (fraction.clamp(0.0, 1.0) * width as f64).round() as usize;
    "█".repeat(filled)
}
