//! Output generation for an allocated craft.

use std::collections::BTreeMap;

use super::allocate::satisfies;
use super::{Allocation, CraftError, CrafterProfile, check_gates};
use crate::catalog::{Catalog, ItemDefinition, QualityPolicy, Recipe};
use crate::config::EngineConfig;
use crate::ids::{QualityId, RecipeId, TraitId};
use crate::instance::{InstanceId, InventoryEntry, ItemInstance};

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CraftedItem {
    pub instance: ItemInstance,
    pub quantity: u32,
}

/// Everything the caller's inventory store must apply for one craft.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CraftResult {
    pub recipe_id: RecipeId,
    /// Units to remove per inventory row.
    pub consumed: Vec<(InstanceId, u32)>,
    pub outputs: Vec<CraftedItem>,
    pub experience: u32,
}

/// Produces the outputs of `recipe` from a previously computed allocation.
///
/// The gates are checked again and the allocation is verified against
/// `inventory`, since the inventory may have changed since it was made.
pub fn craft(
    catalog: &Catalog,
    config: &EngineConfig,
    recipe: &Recipe,
    profile: &CrafterProfile,
    allocation: &Allocation,
    inventory: &[InventoryEntry],
) -> Result<CraftResult, CraftError> {
    check_gates(recipe, profile, inventory)?;
    let consumed = verify(catalog, recipe, allocation, inventory)?;

    let bonus = config.craft_quality_bonus(profile.skill_level(&recipe.skill));
    let mut outputs = Vec::with_capacity(recipe.outputs.len());
    for output in &recipe.outputs {
        let definition = catalog
            .item(output.item_id.as_str())
            .ok_or_else(|| CraftError::UnknownItem(output.item_id.clone()))?;
        let instance = match output.quality {
            QualityPolicy::Fixed => ItemInstance::from_definition(definition),
            QualityPolicy::Inherit => inherit(catalog, definition, &consumed, bonus),
        };
        outputs.push(CraftedItem {
            instance,
            quantity: output.quantity,
        });
    }

    tracing::debug!(
        recipe = %recipe.id,
        consumed = consumed.len(),
        outputs = outputs.len(),
        "crafted"
    );

    Ok(CraftResult {
        recipe_id: recipe.id.clone(),
        consumed: consumed.iter().map(|(id, _, units)| (*id, *units)).collect(),
        outputs,
        experience: recipe.experience,
    })
}

type Consumed<'a> = Vec<(InstanceId, &'a ItemInstance, u32)>;

fn verify<'a>(
    catalog: &Catalog,
    recipe: &Recipe,
    allocation: &Allocation,
    inventory: &'a [InventoryEntry],
) -> Result<Consumed<'a>, CraftError> {
    if allocation.recipe_id != recipe.id {
        return Err(CraftError::AllocationMismatch(format!(
            "allocation is for `{}`, not `{}`",
            allocation.recipe_id, recipe.id
        )));
    }

    let mut per_requirement = vec![0u32; recipe.ingredients.len()];
    for pick in &allocation.picks {
        let ingredient = recipe.ingredients.get(pick.requirement).ok_or_else(|| {
            CraftError::AllocationMismatch(format!("no requirement #{}", pick.requirement))
        })?;
        let entry = find(inventory, pick.instance_id)?;
        if !satisfies(catalog, &ingredient.matches, &entry.instance) {
            return Err(CraftError::AllocationMismatch(format!(
                "{} does not satisfy {}",
                pick.instance_id, ingredient.matches
            )));
        }
        per_requirement[pick.requirement] =
            per_requirement[pick.requirement].saturating_add(pick.quantity);
    }
    for (ingredient, allocated) in recipe.ingredients.iter().zip(&per_requirement) {
        if *allocated != ingredient.quantity {
            return Err(CraftError::AllocationMismatch(format!(
                "{allocated} units allocated to {}, recipe needs {}",
                ingredient.matches, ingredient.quantity
            )));
        }
    }

    let mut consumed = Vec::new();
    for (id, units) in allocation.consumed() {
        let entry = find(inventory, id)?;
        if entry.quantity < units {
            return Err(CraftError::AllocationMismatch(format!(
                "{id} holds {} units, {units} allocated",
                entry.quantity
            )));
        }
        consumed.push((id, &entry.instance, units));
    }
    Ok(consumed)
}

fn find(inventory: &[InventoryEntry], id: InstanceId) -> Result<&InventoryEntry, CraftError> {
    inventory
        .iter()
        .find(|entry| entry.id == id)
        .ok_or_else(|| CraftError::AllocationMismatch(format!("{id} is not in the inventory")))
}

/// Output instance whose qualities average the consumed ingredients'.
fn inherit(
    catalog: &Catalog,
    definition: &ItemDefinition,
    consumed: &Consumed<'_>,
    bonus: u8,
) -> ItemInstance {
    let max_level = |id: &QualityId| {
        catalog
            .quality(id.as_str())
            .map_or(EngineConfig::MAX_MODIFIER_LEVEL, |q| q.max_level)
    };
    let allowed_quality = |id: &QualityId| {
        definition.allowed_qualities.is_empty() || definition.allowed_qualities.contains(id)
    };

    // (Σ level × units, Σ units) per quality
    let mut sums: BTreeMap<&QualityId, (u64, u64)> = BTreeMap::new();
    for (_, instance, units) in consumed {
        for (id, level) in &instance.qualities {
            let (weighted, count) = sums.entry(id).or_insert((0, 0));
            *weighted += u64::from(*level) * u64::from(*units);
            *count += u64::from(*units);
        }
    }

    let mut qualities: BTreeMap<QualityId, u8> = sums
        .into_iter()
        .filter(|(id, _)| allowed_quality(*id))
        .map(|(id, (weighted, count))| {
            let average = (2 * weighted + count) / (2 * count);
            let level = u8::try_from(average).unwrap_or(u8::MAX);
            (id.clone(), level.max(1).min(max_level(id)))
        })
        .collect();
    if qualities.is_empty() {
        qualities = ItemInstance::from_definition(definition).qualities;
    }
    if let Some((id, level)) = qualities.iter_mut().next() {
        *level = level.saturating_add(bonus).min(max_level(id));
    }

    let traits: BTreeMap<TraitId, u8> = consumed
        .iter()
        .max_by(|(a_id, a, _), (b_id, b, _)| {
            a.traits.len().cmp(&b.traits.len()).then(b_id.cmp(a_id))
        })
        .map(|(_, instance, _)| {
            instance
                .traits
                .iter()
                .filter(|(id, _)| {
                    definition.allowed_traits.is_empty() || definition.allowed_traits.contains(*id)
                })
                .map(|(id, level)| (id.clone(), *level))
                .collect()
        })
        .unwrap_or_default();

    ItemInstance {
        item_id: definition.id.clone(),
        qualities,
        traits,
    }
}
