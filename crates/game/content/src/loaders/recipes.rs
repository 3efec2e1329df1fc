//! Recipe catalog loader.

use std::path::Path;

use outcome_core::Recipe;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, parse_ron};

/// Recipe catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeCatalog {
    pub recipes: Vec<Recipe>,
}

/// Loader for recipe catalog from RON files.
pub struct RecipeLoader;

impl RecipeLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<Recipe>> {
        let catalog: RecipeCatalog = parse_ron(path, "recipe catalog")?;
        Ok(catalog.recipes)
    }
}
