//! Content factory for building the engine catalog from data files.

use std::path::{Path, PathBuf};

use anyhow::Context;
use outcome_core::{
    Catalog, DropTable, EngineConfig, ItemDefinition, Monster, QualityDefinition, Recipe,
    TraitDefinition,
};

use crate::loaders::{
    AbilityLoader, AbilitySet, ConfigLoader, DropTableLoader, ItemLoader, LoadResult,
    MonsterLoader, QualityLoader, RecipeLoader, TraitLoader,
};

/// Content factory that loads all game content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── items.ron
/// ├── qualities.ron
/// ├── traits.ron
/// ├── abilities.ron
/// ├── monsters.ron
/// ├── recipes.ron
/// └── drop_tables.ron
/// ```
///
/// Every file except `items.ron` is optional; a missing file contributes no
/// definitions (or, for `config.toml`, the default configuration).
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    ///
    /// # Arguments
    ///
    /// * `data_dir` - Path to the directory containing data files
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Load engine configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<EngineConfig> {
        let path = self.data_dir.join("config.toml");
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(EngineConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load item catalog from `items.ron`.
    pub fn load_items(&self) -> LoadResult<Vec<ItemDefinition>> {
        ItemLoader::load(&self.data_dir.join("items.ron"))
    }

    /// Load quality definitions from `qualities.ron`.
    pub fn load_qualities(&self) -> LoadResult<Vec<QualityDefinition>> {
        self.optional("qualities.ron", QualityLoader::load)
    }

    /// Load trait definitions from `traits.ron`.
    pub fn load_traits(&self) -> LoadResult<Vec<TraitDefinition>> {
        self.optional("traits.ron", TraitLoader::load)
    }

    /// Load active and passive abilities from `abilities.ron`.
    pub fn load_abilities(&self) -> LoadResult<AbilitySet> {
        self.optional("abilities.ron", AbilityLoader::load)
    }

    /// Load monster catalog from `monsters.ron`.
    pub fn load_monsters(&self) -> LoadResult<Vec<Monster>> {
        self.optional("monsters.ron", MonsterLoader::load)
    }

    /// Load recipe catalog from `recipes.ron`.
    pub fn load_recipes(&self) -> LoadResult<Vec<Recipe>> {
        self.optional("recipes.ron", RecipeLoader::load)
    }

    /// Load drop tables from `drop_tables.ron`.
    pub fn load_drop_tables(&self) -> LoadResult<Vec<DropTable>> {
        self.optional("drop_tables.ron", DropTableLoader::load)
    }

    /// Load every catalog file and assemble one [`Catalog`].
    ///
    /// Fails on unreadable or malformed files and on duplicate ids. Dangling
    /// references are left to [`Catalog::validate`].
    pub fn load_catalog(&self) -> LoadResult<Catalog> {
        let items = self.load_items()?;
        let qualities = self.load_qualities()?;
        let traits = self.load_traits()?;
        let abilities = self.load_abilities()?;
        let monsters = self.load_monsters()?;
        let recipes = self.load_recipes()?;
        let drop_tables = self.load_drop_tables()?;

        tracing::info!(
            data_dir = %self.data_dir.display(),
            items = items.len(),
            qualities = qualities.len(),
            traits = traits.len(),
            abilities = abilities.abilities.len(),
            passives = abilities.passives.len(),
            monsters = monsters.len(),
            recipes = recipes.len(),
            drop_tables = drop_tables.len(),
            "content loaded"
        );

        Catalog::builder()
            .items(items)
            .qualities(qualities)
            .traits(traits)
            .abilities(abilities.abilities)
            .passives(abilities.passives)
            .monsters(monsters)
            .recipes(recipes)
            .drop_tables(drop_tables)
            .build()
            .with_context(|| format!("Failed to assemble catalog from {}", self.data_dir.display()))
    }

    /// Load both the catalog and the engine configuration.
    pub fn load_all(&self) -> LoadResult<(Catalog, EngineConfig)> {
        Ok((self.load_catalog()?, self.load_config()?))
    }

    fn optional<T: Default>(
        &self,
        file: &str,
        load: impl FnOnce(&Path) -> LoadResult<T>,
    ) -> LoadResult<T> {
        let path = self.data_dir.join(file);
        if !path.exists() {
            tracing::debug!(path = %path.display(), "content file absent, skipping");
            return Ok(T::default());
        }
        load(&path)
    }
}
