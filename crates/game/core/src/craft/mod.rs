//! Crafting: recipe gates, ingredient allocation and output generation.
//!
//! A craft is two calls. [`match_ingredients`] checks the recipe gates and
//! picks which inventory instances to consume; [`craft`] turns that
//! allocation into output instances. The caller's inventory store applies
//! both results, the engine never mutates the inventory.

mod allocate;
mod output;

pub use allocate::{Allocation, AllocationPick, ScoreWeights, match_ingredients, quality_score};
pub use output::{CraftResult, CraftedItem, craft};

use std::collections::{BTreeMap, BTreeSet};

use crate::catalog::Recipe;
use crate::error::{ErrorSeverity, GameError};
use crate::ids::{ItemId, RecipeId};
use crate::instance::InventoryEntry;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CraftError {
    #[error("{skill} level {current} is below the required {required}")]
    LevelTooLow {
        skill: String,
        required: u32,
        current: u32,
    },

    #[error("recipe `{recipe}` is locked: {reason}")]
    RecipeLocked { recipe: RecipeId, reason: String },

    #[error("need {required} of {requirement}, only {available} available")]
    InsufficientIngredients {
        requirement: String,
        required: u32,
        available: u32,
    },

    #[error("allocation does not match the inventory: {0}")]
    AllocationMismatch(String),

    #[error("recipe output item `{0}` not found")]
    UnknownItem(ItemId),
}

impl GameError for CraftError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::LevelTooLow { .. }
            | Self::RecipeLocked { .. }
            | Self::InsufficientIngredients { .. } => ErrorSeverity::Recoverable,
            Self::AllocationMismatch(_) => ErrorSeverity::Internal,
            Self::UnknownItem(_) => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::LevelTooLow { .. } => "CRAFT_LEVEL_TOO_LOW",
            Self::RecipeLocked { .. } => "CRAFT_RECIPE_LOCKED",
            Self::InsufficientIngredients { .. } => "CRAFT_INSUFFICIENT_INGREDIENTS",
            Self::AllocationMismatch(_) => "CRAFT_ALLOCATION_MISMATCH",
            Self::UnknownItem(_) => "CRAFT_UNKNOWN_ITEM",
        }
    }
}

/// Crafter progression supplied by the caller.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CrafterProfile {
    pub skill_levels: BTreeMap<String, u32>,
    /// Recipes crafted at least once.
    pub crafted_recipes: BTreeSet<RecipeId>,
    /// Recipes unlocked by other means (scrolls, trainers).
    pub discovered_recipes: BTreeSet<RecipeId>,
    pub completed_quests: BTreeSet<String>,
}

impl CrafterProfile {
    #[must_use]
    pub fn with_skill(mut self, skill: impl Into<String>, level: u32) -> Self {
        self.skill_levels.insert(skill.into(), level);
        self
    }

    #[must_use]
    pub fn with_crafted(mut self, recipe: impl Into<RecipeId>) -> Self {
        self.crafted_recipes.insert(recipe.into());
        self
    }

    pub fn skill_level(&self, skill: &str) -> u32 {
        self.skill_levels.get(skill).copied().unwrap_or(0)
    }
}

/// Checks the skill level and unlock conditions of `recipe`.
pub fn check_gates(
    recipe: &Recipe,
    profile: &CrafterProfile,
    inventory: &[InventoryEntry],
) -> Result<(), CraftError> {
    let current = profile.skill_level(&recipe.skill);
    if current < recipe.required_level {
        return Err(CraftError::LevelTooLow {
            skill: recipe.skill.clone(),
            required: recipe.required_level,
            current,
        });
    }

    let unlock = &recipe.unlock;
    if unlock.discovered_by_default || profile.discovered_recipes.contains(&recipe.id) {
        return Ok(());
    }
    let locked = |reason: String| CraftError::RecipeLocked {
        recipe: recipe.id.clone(),
        reason,
    };
    if !unlock.has_requirements() {
        return Err(locked("not discovered yet".to_owned()));
    }
    if let Some(missing) = unlock
        .required_recipes
        .iter()
        .find(|r| !profile.crafted_recipes.contains(*r))
    {
        return Err(locked(format!("craft `{missing}` first")));
    }
    if let Some(missing) = unlock.required_items.iter().find(|item| {
        !inventory
            .iter()
            .any(|entry| entry.quantity > 0 && &entry.instance.item_id == *item)
    }) {
        return Err(locked(format!("requires `{missing}` in inventory")));
    }
    match &unlock.quest_required {
        Some(quest) if !profile.completed_quests.contains(quest) => {
            Err(locked(format!("complete quest `{quest}`")))
        }
        _ => Ok(()),
    }
}
