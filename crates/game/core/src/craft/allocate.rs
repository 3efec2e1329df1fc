//! Greedy ingredient allocation.

use std::cmp::Reverse;
use std::collections::BTreeMap;

use super::{CraftError, CrafterProfile, check_gates};
use crate::catalog::{Catalog, IngredientMatch, Recipe};
use crate::config::EngineConfig;
use crate::ids::RecipeId;
use crate::instance::{InstanceId, InventoryEntry, ItemInstance};

/// Weights of the ingredient quality score.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScoreWeights {
    pub quality: u32,
    pub trait_weight: u32,
}

impl ScoreWeights {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            quality: config.quality_weight,
            trait_weight: config.trait_weight,
        }
    }
}

/// `quality × Σ quality levels + trait_weight × Σ trait levels`
///
/// Saturates at `u32::MAX` instead of overflowing.
pub fn quality_score(instance: &ItemInstance, weights: ScoreWeights) -> u32 {
    weights
        .quality
        .saturating_mul(instance.total_quality_levels())
        .saturating_add(
            weights
                .trait_weight
                .saturating_mul(instance.total_trait_levels()),
        )
}

/// Units taken from one inventory row for one requirement.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AllocationPick {
    /// Index into the recipe's ingredient list.
    pub requirement: usize,
    pub instance_id: InstanceId,
    pub quantity: u32,
}

/// Which inventory units a craft will consume.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Allocation {
    pub recipe_id: RecipeId,
    pub picks: Vec<AllocationPick>,
}

impl Allocation {
    /// Units consumed per inventory row.
    pub fn consumed(&self) -> BTreeMap<InstanceId, u32> {
        let mut totals = BTreeMap::new();
        for pick in &self.picks {
            let total = totals.entry(pick.instance_id).or_insert(0u32);
            *total = total.saturating_add(pick.quantity);
        }
        totals
    }
}

/// Allocates inventory units to every ingredient of `recipe`.
///
/// Requirements naming a specific item are served before subcategory
/// requirements. Within a requirement the highest-scoring instances are
/// consumed first; ties go to the lower instance id.
pub fn match_ingredients(
    catalog: &Catalog,
    config: &EngineConfig,
    recipe: &Recipe,
    profile: &CrafterProfile,
    inventory: &[InventoryEntry],
) -> Result<Allocation, CraftError> {
    check_gates(recipe, profile, inventory)?;

    let weights = ScoreWeights::from_config(config);
    let mut remaining: Vec<u32> = inventory.iter().map(|entry| entry.quantity).collect();
    let mut picks = Vec::new();

    let specific_first = recipe
        .ingredients
        .iter()
        .enumerate()
        .filter(|(_, i)| matches!(i.matches, IngredientMatch::Item(_)))
        .chain(
            recipe
                .ingredients
                .iter()
                .enumerate()
                .filter(|(_, i)| matches!(i.matches, IngredientMatch::Subcategory(_))),
        );

    for (requirement, ingredient) in specific_first {
        let mut candidates: Vec<usize> = inventory
            .iter()
            .enumerate()
            .filter(|(index, entry)| {
                remaining[*index] > 0 && satisfies(catalog, &ingredient.matches, &entry.instance)
            })
            .map(|(index, _)| index)
            .collect();
        candidates.sort_by_key(|&index| {
            let entry = &inventory[index];
            (Reverse(quality_score(&entry.instance, weights)), entry.id)
        });

        let available = candidates
            .iter()
            .map(|&index| remaining[index])
            .fold(0u32, u32::saturating_add);
        if available < ingredient.quantity {
            return Err(CraftError::InsufficientIngredients {
                requirement: ingredient.matches.to_string(),
                required: ingredient.quantity,
                available,
            });
        }

        let mut needed = ingredient.quantity;
        for index in candidates {
            if needed == 0 {
                break;
            }
            let take = needed.min(remaining[index]);
            remaining[index] -= take;
            needed -= take;
            tracing::debug!(
                recipe = %recipe.id,
                requirement,
                instance = %inventory[index].id,
                take,
                "allocated ingredient"
            );
            picks.push(AllocationPick {
                requirement,
                instance_id: inventory[index].id,
                quantity: take,
            });
        }
    }

    Ok(Allocation {
        recipe_id: recipe.id.clone(),
        picks,
    })
}

pub(super) fn satisfies(catalog: &Catalog, requirement: &IngredientMatch, instance: &ItemInstance) -> bool {
    match requirement {
        IngredientMatch::Item(id) => &instance.item_id == id,
        IngredientMatch::Subcategory(tag) => catalog
            .item(instance.item_id.as_str())
            .is_some_and(|definition| definition.has_subcategory(tag)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Ingredient, ItemDefinition, ItemKind, QualityPolicy, ResourceData};

    fn herb(id: &str) -> ItemDefinition {
        ItemDefinition::new(id, id, ItemKind::Resource(ResourceData::default()))
            .with_subcategories(["herb"])
    }

    fn catalog() -> Catalog {
        Catalog::builder()
            .items([herb("chamomile"), herb("sage"), herb("mint")])
            .build()
            .unwrap()
    }

    fn alchemist() -> CrafterProfile {
        CrafterProfile::default().with_skill("alchemy", 10)
    }

    #[test]
    fn huge_stacks_and_weights_saturate() {
        let weights = ScoreWeights {
            quality: u32::MAX,
            trait_weight: u32::MAX,
        };
        let relic = ItemInstance::new("sage")
            .with_quality("age", 3)
            .with_trait("blessed", 2);
        assert_eq!(quality_score(&relic, weights), u32::MAX);

        let recipe = Recipe::new("tonic", "Tonic", "alchemy")
            .ingredient(Ingredient::subcategory("herb", u32::MAX))
            .output("tonic", 1, QualityPolicy::Inherit);
        let inventory = [
            InventoryEntry::new(1, ItemInstance::new("sage"), u32::MAX),
            InventoryEntry::new(2, ItemInstance::new("mint"), u32::MAX),
        ];
        let config = EngineConfig {
            quality_weight: u32::MAX,
            trait_weight: u32::MAX,
            ..EngineConfig::default()
        };
        let allocation =
            match_ingredients(&catalog(), &config, &recipe, &alchemist(), &inventory).unwrap();
        assert_eq!(
            allocation.consumed(),
            BTreeMap::from([(InstanceId(1), u32::MAX)])
        );
    }

    #[test]
    fn score_weighs_traits_heavier() {
        let weights = ScoreWeights::from_config(&EngineConfig::default());
        let aged = ItemInstance::new("sage").with_quality("age", 3);
        let blessed = ItemInstance::new("sage").with_trait("blessed", 1);
        assert_eq!(quality_score(&aged, weights), 3);
        assert_eq!(quality_score(&blessed, weights), 10);
    }

    #[test]
    fn best_instances_are_consumed_first() {
        let recipe = Recipe::new("tonic", "Tonic", "alchemy")
            .ingredient(Ingredient::subcategory("herb", 3))
            .output("tonic", 1, QualityPolicy::Inherit);
        let inventory = [
            InventoryEntry::new(1, ItemInstance::new("mint"), 5),
            InventoryEntry::new(2, ItemInstance::new("sage").with_quality("potency", 2), 2),
            InventoryEntry::new(3, ItemInstance::new("chamomile").with_quality("potency", 2), 1),
        ];
        let allocation = match_ingredients(
            &catalog(),
            &EngineConfig::default(),
            &recipe,
            &alchemist(),
            &inventory,
        )
        .unwrap();
        assert_eq!(
            allocation.consumed(),
            BTreeMap::from([(InstanceId(2), 2), (InstanceId(3), 1)])
        );
    }

    #[test]
    fn specific_requirements_are_served_first() {
        let recipe = Recipe::new("enhanced", "Enhanced", "alchemy")
            .ingredient(Ingredient::subcategory("herb", 1))
            .ingredient(Ingredient::item("chamomile", 2))
            .output("potion", 1, QualityPolicy::Inherit);
        let inventory = [
            InventoryEntry::new(1, ItemInstance::new("chamomile").with_quality("age", 5), 2),
            InventoryEntry::new(2, ItemInstance::new("sage"), 1),
        ];
        let allocation = match_ingredients(
            &catalog(),
            &EngineConfig::default(),
            &recipe,
            &alchemist(),
            &inventory,
        )
        .unwrap();
        assert_eq!(allocation.picks[0].requirement, 1);
        assert_eq!(allocation.picks[0].instance_id, InstanceId(1));
        assert_eq!(allocation.picks[1].instance_id, InstanceId(2));
    }

    #[test]
    fn shortfall_reports_availability() {
        let recipe = Recipe::new("tonic", "Tonic", "alchemy")
            .ingredient(Ingredient::subcategory("herb", 4))
            .output("tonic", 1, QualityPolicy::Inherit);
        let inventory = [
            InventoryEntry::new(1, ItemInstance::new("sage"), 2),
            InventoryEntry::new(2, ItemInstance::new("iron_ore"), 9),
        ];
        let err = match_ingredients(
            &catalog(),
            &EngineConfig::default(),
            &recipe,
            &alchemist(),
            &inventory,
        )
        .unwrap_err();
        assert_eq!(
            err,
            CraftError::InsufficientIngredients {
                requirement: "any herb".into(),
                required: 4,
                available: 2
            }
        );
    }

    #[test]
    fn score_ties_break_on_instance_id() {
        let recipe = Recipe::new("tonic", "Tonic", "alchemy")
            .ingredient(Ingredient::subcategory("herb", 1))
            .output("tonic", 1, QualityPolicy::Inherit);
        let inventory = [
            InventoryEntry::new(9, ItemInstance::new("sage"), 1),
            InventoryEntry::new(4, ItemInstance::new("mint"), 1),
        ];
        let allocation = match_ingredients(
            &catalog(),
            &EngineConfig::default(),
            &recipe,
            &alchemist(),
            &inventory,
        )
        .unwrap();
        assert_eq!(allocation.picks[0].instance_id, InstanceId(4));
    }
}
