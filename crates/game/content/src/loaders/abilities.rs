//! Active and passive ability loader.

use std::path::Path;

use outcome_core::{Ability, PassiveAbility};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, parse_ron};

/// Abilities and passives share one RON file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AbilitySet {
    #[serde(default)]
    pub abilities: Vec<Ability>,
    #[serde(default)]
    pub passives: Vec<PassiveAbility>,
}

/// Loader for abilities from RON files.
pub struct AbilityLoader;

impl AbilityLoader {
    pub fn load(path: &Path) -> LoadResult<AbilitySet> {
        parse_ron(path, "ability catalog")
    }
}
