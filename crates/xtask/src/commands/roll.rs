//! Dice notation sampler
//!
//! Parses a damage roll, prints its analytic range and compares it with a
//! simulated distribution.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use outcome_core::DamageRoll;

use crate::utils::{OutputFormat, SeedArgs, bar, percent};

/// Roll dice notation
#[derive(Parser, Debug)]
pub struct Roll {
    /// Damage roll such as "2d6 +1" or "1 (Unarmed)"
    #[arg(value_name = "NOTATION")]
    notation: String,

    /// Number of rolls to simulate
    #[arg(short = 'n', long, default_value_t = 10_000)]
    samples: u32,

    #[command(flatten)]
    seed: SeedArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    format: OutputFormat,
}

impl Roll {
    pub fn execute(self) -> Result<()> {
        let roll = DamageRoll::parse(&self.notation)
            .with_context(|| format!("Invalid damage roll {:?}", self.notation))?;
        let range = roll.range();
        let (seed, mut rng) = self.seed.rng();

        let mut histogram: BTreeMap<u32, u32> = BTreeMap::new();
        let mut total = 0u64;
        for _ in 0..self.samples {
            let value = roll.roll(&mut rng);
            total += u64::from(value);
            *histogram.entry(value).or_default() += 1;
        }
        let samples = self.samples.max(1);
        let mean = total as f64 / f64::from(samples);

        if self.format == OutputFormat::Json {
            let report = serde_json::json!({
                "roll": roll.to_string(),
                "seed": seed,
                "samples": self.samples,
                "range": range,
                "mean": mean,
                "histogram": histogram,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
            return Ok(());
        }

        println!("{} {}", style("Roll").cyan().bold(), style(&roll).bold());
        println!(
            "  range {}..={}  expected {:.2}  simulated {:.3}",
            range.min, range.max, range.avg, mean
        );
        println!("  {} samples, seed {}", self.samples, seed);
        println!();

        let peak = histogram.values().copied().max().unwrap_or(1);
        for (value, count) in &histogram {
            let share = f64::from(*count) / f64::from(samples);
            println!(
                "  {:>4} {} {}",
                value,
                percent(share),
                style(bar(f64::from(*count) / f64::from(peak), 40)).green()
            );
        }
        Ok(())
    }
}
