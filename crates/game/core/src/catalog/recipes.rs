use core::fmt;

use crate::ids::{ItemId, RecipeId};

/// What inventory instances satisfy an ingredient.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IngredientMatch {
    /// One specific item.
    Item(ItemId),
    /// Any item tagged with this subcategory.
    Subcategory(String),
}

impl fmt::Display for IngredientMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Item(id) => write!(f, "{id}"),
            Self::Subcategory(tag) => write!(f, "any {tag}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ingredient {
    pub matches: IngredientMatch,
    pub quantity: u32,
}

impl Ingredient {
    pub fn item(id: impl Into<ItemId>, quantity: u32) -> Self {
        Self {
            matches: IngredientMatch::Item(id.into()),
            quantity,
        }
    }

    pub fn subcategory(tag: impl Into<String>, quantity: u32) -> Self {
        Self {
            matches: IngredientMatch::Subcategory(tag.into()),
            quantity,
        }
    }
}

/// How crafted output gets its quality levels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum QualityPolicy {
    /// Averaged from the consumed ingredients.
    #[default]
    Inherit,
    /// The output item's catalog defaults.
    Fixed,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RecipeOutput {
    pub item_id: ItemId,
    pub quantity: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub quality: QualityPolicy,
}

/// What unlocks a recipe beyond the crafter's skill level.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct UnlockConditions {
    pub discovered_by_default: bool,
    /// Recipes the crafter must have crafted before.
    pub required_recipes: Vec<RecipeId>,
    /// Items the crafter must hold.
    pub required_items: Vec<ItemId>,
    pub quest_required: Option<String>,
}

impl Default for UnlockConditions {
    fn default() -> Self {
        Self {
            discovered_by_default: true,
            required_recipes: Vec::new(),
            required_items: Vec::new(),
            quest_required: None,
        }
    }
}

impl UnlockConditions {
    pub fn has_requirements(&self) -> bool {
        !self.required_recipes.is_empty()
            || !self.required_items.is_empty()
            || self.quest_required.is_some()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Recipe {
    pub id: RecipeId,
    pub name: String,
    /// Crafting skill (`alchemy`, `smithing`).
    pub skill: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub required_level: u32,
    /// Seconds, consumed by the caller's scheduler.
    #[cfg_attr(feature = "serde", serde(default))]
    pub duration: u32,
    pub ingredients: Vec<Ingredient>,
    pub outputs: Vec<RecipeOutput>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub experience: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub unlock: UnlockConditions,
}

impl Recipe {
    pub fn new(id: impl Into<RecipeId>, name: impl Into<String>, skill: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            skill: skill.into(),
            required_level: 0,
            duration: 0,
            ingredients: Vec::new(),
            outputs: Vec::new(),
            experience: 0,
            unlock: UnlockConditions::default(),
        }
    }

    #[must_use]
    pub fn ingredient(mut self, ingredient: Ingredient) -> Self {
        self.ingredients.push(ingredient);
        self
    }

    #[must_use]
    pub fn output(mut self, item_id: impl Into<ItemId>, quantity: u32, quality: QualityPolicy) -> Self {
        self.outputs.push(RecipeOutput {
            item_id: item_id.into(),
            quantity,
            quality,
        });
        self
    }
}
