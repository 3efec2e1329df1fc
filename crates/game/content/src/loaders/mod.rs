//! Content loaders for reading game data from files.
//!
//! Each loader converts one RON/TOML file into outcome-core types. Catalog
//! files wrap their definitions in a single named list (`(items: [...])`).

pub mod abilities;
pub mod config;
pub mod drops;
pub mod factory;
pub mod item;
pub mod modifiers;
pub mod monsters;
pub mod recipes;

pub use abilities::{AbilityLoader, AbilitySet};
pub use config::ConfigLoader;
pub use drops::DropTableLoader;
pub use factory::ContentFactory;
pub use item::ItemLoader;
pub use modifiers::{QualityLoader, TraitLoader};
pub use monsters::MonsterLoader;
pub use recipes::RecipeLoader;

use std::path::Path;

use anyhow::Context;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read file {}", path.display()))
}

/// Parses a RON document, naming the file on failure.
pub(crate) fn parse_ron<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> LoadResult<T> {
    let content = read_file(path)?;
    ron::from_str(&content)
        .map_err(|e| anyhow::anyhow!("Failed to parse {} RON ({}): {}", what, path.display(), e))
}
