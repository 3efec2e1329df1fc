//! Quality and trait definition loaders.

use std::path::Path;

use outcome_core::{QualityDefinition, TraitDefinition};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, parse_ron};

/// Quality catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityCatalog {
    pub qualities: Vec<QualityDefinition>,
}

/// Trait catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraitCatalog {
    pub traits: Vec<TraitDefinition>,
}

/// Loader for quality definitions from RON files.
pub struct QualityLoader;

impl QualityLoader {
    /// Legacy per-level fields (`combat_damage_bonus`, ...) are kept as read;
    /// the catalog builder turns them into applicators.
    pub fn load(path: &Path) -> LoadResult<Vec<QualityDefinition>> {
        let catalog: QualityCatalog = parse_ron(path, "quality catalog")?;
        Ok(catalog.qualities)
    }
}

/// Loader for trait definitions from RON files.
pub struct TraitLoader;

impl TraitLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<TraitDefinition>> {
        let catalog: TraitCatalog = parse_ron(path, "trait catalog")?;
        Ok(catalog.traits)
    }
}
