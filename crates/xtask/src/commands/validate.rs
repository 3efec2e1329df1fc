//! Offline content validation
//!
//! Loads every content file, builds the catalog and reports all integrity
//! issues at once. Exits non-zero when any error (or, with `--strict`, any
//! warning) is found.

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use outcome_core::IssueSeverity;

use crate::utils::ContentArgs;

/// Validate the content directory
#[derive(Parser, Debug)]
pub struct Validate {
    #[command(flatten)]
    content: ContentArgs,

    /// Treat warnings as errors
    #[arg(long)]
    strict: bool,
}

impl Validate {
    pub fn execute(self) -> Result<()> {
        let dir = self.content.resolve_dir();
        let (catalog, config) = self.content.load()?;

        println!(
            "{} {}",
            style("Validating").cyan().bold(),
            style(dir.display()).dim()
        );
        println!(
            "  {} items, {} qualities, {} traits, {} abilities, {} passives",
            catalog.items().count(),
            catalog.qualities().count(),
            catalog.traits().count(),
            catalog.abilities().count(),
            catalog.passives().count()
        );
        println!(
            "  {} monsters, {} recipes, {} drop tables",
            catalog.monsters().count(),
            catalog.recipes().count(),
            catalog.drop_tables().count()
        );

        let digest = catalog.digest().context("Failed to compute catalog digest")?;
        println!("  digest {}", style(hex::encode(digest)).dim());
        println!();

        let issues = catalog.validate(&config);
        let errors = issues
            .iter()
            .filter(|i| i.severity == IssueSeverity::Error)
            .count();
        let warnings = issues.len() - errors;

        for issue in &issues {
            let tag = match issue.severity {
                IssueSeverity::Error => style("error").red().bold(),
                IssueSeverity::Warning => style("warn ").yellow().bold(),
            };
            println!("{} {} {}", tag, style(&issue.location).cyan(), issue.message);
        }
        if !issues.is_empty() {
            println!();
        }

        if errors > 0 || (self.strict && warnings > 0) {
            anyhow::bail!("{errors} errors, {warnings} warnings");
        }

        println!(
            "{} {} warnings",
            style("✓ Content is valid,").green().bold(),
            warnings
        );
        Ok(())
    }
}
