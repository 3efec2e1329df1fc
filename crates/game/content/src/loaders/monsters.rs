//! Monster catalog loader.

use std::path::Path;

use outcome_core::Monster;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, parse_ron};

/// Monster catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonsterCatalog {
    pub monsters: Vec<Monster>,
}

/// Loader for monster catalog from RON files.
pub struct MonsterLoader;

impl MonsterLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<Monster>> {
        let catalog: MonsterCatalog = parse_ron(path, "monster catalog")?;
        Ok(catalog.monsters)
    }
}
