//! Drop table simulator
//!
//! Prints the configured odds of a table and rolls it repeatedly to compare
//! observed drop rates. With `--monster`, rolls every table the monster drops
//! from, the way a won encounter does.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use outcome_core::{
    Catalog, DropOutcome, DropTable, EngineConfig, GameError, ItemDrop, PcgRng, drop_table_stats,
    resolve_drop_table, resolve_drop_tables,
};
use serde_json::json;

use crate::utils::{ContentArgs, OutputFormat, SeedArgs, percent};

/// Simulate drop tables
#[derive(Parser, Debug)]
pub struct Drops {
    /// Drop table to roll (lists every table when omitted)
    #[arg(value_name = "TABLE", conflicts_with = "monster")]
    table: Option<String>,

    /// Roll all loot tables of this monster instead
    #[arg(short, long, value_name = "MONSTER")]
    monster: Option<String>,

    /// Number of rolls to simulate
    #[arg(short = 'n', long, default_value_t = 10_000)]
    samples: u32,

    #[command(flatten)]
    content: ContentArgs,

    #[command(flatten)]
    seed: SeedArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    format: OutputFormat,
}

/// Observed totals per item over all samples.
#[derive(Default)]
struct Tally {
    empty: u32,
    /// item id -> (rolls that dropped it, total quantity)
    items: BTreeMap<String, (u32, u64)>,
}

impl Tally {
    fn record(&mut self, drops: &[ItemDrop]) {
        if drops.is_empty() {
            self.empty += 1;
        }
        for drop in drops {
            let (hits, quantity) = self
                .items
                .entry(drop.instance.item_id.to_string())
                .or_default();
            *hits += 1;
            *quantity += u64::from(drop.quantity);
        }
    }

    fn to_json(&self, samples: u32) -> serde_json::Value {
        let items: BTreeMap<_, _> = self
            .items
            .iter()
            .map(|(id, (hits, quantity))| {
                (
                    id.clone(),
                    json!({
                        "rate": f64::from(*hits) / f64::from(samples),
                        "avg_quantity": *quantity as f64 / f64::from(*hits),
                    }),
                )
            })
            .collect();
        json!({
            "samples": samples,
            "empty_rate": f64::from(self.empty) / f64::from(samples),
            "items": items,
        })
    }

    fn print(&self, samples: u32) {
        println!(
            "  {:<28} {}",
            style("(nothing)").dim(),
            percent(f64::from(self.empty) / f64::from(samples))
        );
        for (id, (hits, quantity)) in &self.items {
            println!(
                "  {:<28} {}  avg qty {:.2}",
                id,
                percent(f64::from(*hits) / f64::from(samples)),
                *quantity as f64 / f64::from(*hits)
            );
        }
    }
}

fn describe(outcome: &DropOutcome) -> String {
    match outcome {
        DropOutcome::Item {
            item_id, quantity, ..
        } if quantity.min == quantity.max => format!("{item_id} x{}", quantity.min),
        DropOutcome::Item {
            item_id, quantity, ..
        } => format!("{item_id} x{}-{}", quantity.min, quantity.max),
        DropOutcome::Nothing => "(nothing)".to_owned(),
        DropOutcome::Table(table) => format!("-> {table}"),
    }
}

impl Drops {
    pub fn execute(self) -> Result<()> {
        let (catalog, config) = self.content.load()?;
        let samples = self.samples.max(1);

        if let Some(monster_id) = &self.monster {
            return self.roll_monster(&catalog, &config, monster_id, samples);
        }
        match &self.table {
            Some(table_id) => {
                let table = catalog
                    .drop_table(table_id)
                    .with_context(|| format!("Drop table not found: {table_id}"))?;
                self.roll_table(&catalog, &config, table, samples)
            }
            None => {
                self.list(&catalog);
                Ok(())
            }
        }
    }

    fn list(&self, catalog: &Catalog) {
        println!("{}", style("Drop tables").cyan().bold());
        for table in catalog.drop_tables() {
            let weight = table
                .total_weight()
                .map_or_else(|| "overflow".to_owned(), |w| w.to_string());
            println!(
                "  {:<28} {} entries, weight {}",
                style(&table.id).bold(),
                table.entries.len(),
                weight
            );
        }
    }

    fn roll_table(
        &self,
        catalog: &Catalog,
        config: &EngineConfig,
        table: &DropTable,
        samples: u32,
    ) -> Result<()> {
        let stats = drop_table_stats(table)
            .map_err(|e| anyhow::anyhow!("{} ({})", e, e.error_code()))?;
        let (seed, mut rng) = self.seed.rng();
        let tally = simulate(samples, &mut rng, |rng| {
            resolve_drop_table(catalog, config, table, rng)
                .map_err(|e| anyhow::anyhow!("{} ({})", e, e.error_code()))
        })?;

        if self.format == OutputFormat::Json {
            let report = json!({
                "table": table.id,
                "seed": seed,
                "configured": stats,
                "observed": tally.to_json(samples),
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
            return Ok(());
        }

        println!(
            "{} {}  weight {}",
            style("Drop table").cyan().bold(),
            style(&table.id).bold(),
            stats.total_weight
        );
        for entry in &stats.entries {
            println!(
                "  {:<28} {}  (weight {})",
                describe(&entry.outcome),
                percent(entry.probability),
                entry.weight
            );
        }
        println!();
        println!(
            "{} {} rolls, seed {}",
            style("Observed").cyan().bold(),
            samples,
            seed
        );
        tally.print(samples);
        Ok(())
    }

    fn roll_monster(
        &self,
        catalog: &Catalog,
        config: &EngineConfig,
        monster_id: &str,
        samples: u32,
    ) -> Result<()> {
        let monster = catalog
            .monster(monster_id)
            .with_context(|| format!("Monster not found: {monster_id}"))?;
        let (seed, mut rng) = self.seed.rng();
        let tally = simulate(samples, &mut rng, |rng| {
            Ok(resolve_drop_tables(catalog, config, &monster.loot_tables, rng))
        })?;

        if self.format == OutputFormat::Json {
            let report = json!({
                "monster": monster.id,
                "tables": monster.loot_tables,
                "seed": seed,
                "observed": tally.to_json(samples),
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
            return Ok(());
        }

        let tables: Vec<_> = monster.loot_tables.iter().map(|t| t.as_str()).collect();
        println!(
            "{} {}  tables [{}]",
            style("Loot of").cyan().bold(),
            style(&monster.name).bold(),
            tables.join(", ")
        );
        println!("  {} kills, seed {}", samples, seed);
        tally.print(samples);
        Ok(())
    }
}

fn simulate(
    samples: u32,
    rng: &mut PcgRng,
    mut roll: impl FnMut(&mut PcgRng) -> Result<Vec<ItemDrop>>,
) -> Result<Tally> {
    let mut tally = Tally::default();
    for _ in 0..samples {
        tally.record(&roll(rng)?);
    }
    Ok(tally)
}
