//! Effective stats of a single item instance.

use std::collections::BTreeMap;

use strum::IntoEnumIterator;

use super::StatError;
use crate::catalog::Catalog;
use crate::config::EngineConfig;
use crate::dice::{DamageRange, DamageRoll};
use crate::effect::{EffectContext, EffectDelta, ModifierTotals, Situation, evaluate};
use crate::ids::ItemId;
use crate::instance::ItemInstance;

/// Skill and attribute levels supplied by the progression store.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillScaling {
    /// Level of the weapon's skill (`oneHanded`, `ranged`, ...).
    pub skill_level: u32,
    /// Level of that skill's main attribute.
    pub attribute_level: u32,
}

/// Everything besides the instance that stat resolution depends on.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StatContext {
    pub situation: Situation,
    pub scaling: SkillScaling,
}

impl StatContext {
    pub fn new(situation: Situation) -> Self {
        Self {
            situation,
            scaling: SkillScaling::default(),
        }
    }

    #[must_use]
    pub fn with_scaling(mut self, skill_level: u32, attribute_level: u32) -> Self {
        self.scaling = SkillScaling {
            skill_level,
            attribute_level,
        };
        self
    }
}

/// Immutable stat snapshot of one item instance.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectiveStats {
    pub item_id: ItemId,
    /// Weapon damage roll, if the item is a weapon.
    pub damage_roll: Option<DamageRoll>,
    /// Roll range after level bonus and `combat.damage` applicators.
    pub damage: Option<DamageRange>,
    /// Bonus damage from skill and attribute levels.
    pub level_bonus: u32,
    pub attack_speed: Option<f64>,
    pub crit_chance: f64,
    pub armor: f64,
    pub evasion: f64,
    /// Aggregated modifiers for every context the instance touches.
    pub deltas: BTreeMap<EffectContext, ModifierTotals>,
}

impl EffectiveStats {
    /// Summed modifiers for `context`, identity if none apply.
    pub fn modifiers(&self, context: EffectContext) -> ModifierTotals {
        self.deltas
            .get(&context)
            .copied()
            .unwrap_or(ModifierTotals::IDENTITY)
    }

    /// Applies this instance's modifiers for `context` to a caller-owned base
    /// value (activity time, vendor price, crafting success rate).
    pub fn apply(&self, context: EffectContext, base: f64) -> f64 {
        context.bounds().clamp(self.modifiers(context).apply(base))
    }
}

/// Resolves the effective stats of `instance`.
///
/// Quality and trait levels are checked against their definitions. Missing
/// level entries inside a definition contribute nothing.
pub fn resolve_effective_stats(
    catalog: &Catalog,
    config: &EngineConfig,
    instance: &ItemInstance,
    context: &StatContext,
) -> Result<EffectiveStats, StatError> {
    let definition = catalog
        .item(instance.item_id.as_str())
        .ok_or_else(|| StatError::UnknownItem(instance.item_id.clone()))?;
    check_levels(catalog, instance)?;

    let applicators = catalog.applicators_for(instance);
    let deltas: BTreeMap<EffectContext, EffectDelta> = EffectContext::iter()
        .map(|ctx| (ctx, evaluate(&applicators, ctx, &context.situation)))
        .filter(|(_, delta)| !delta.totals.is_identity())
        .collect();
    let delta_for = |ctx: EffectContext| {
        deltas
            .get(&ctx)
            .cloned()
            .unwrap_or_else(|| EffectDelta::empty(ctx))
    };

    let equipment = definition.equipment();
    let damage_roll = equipment.and_then(|e| e.damage_roll);
    let level_bonus = match damage_roll {
        Some(roll) if !roll.is_unarmed() => config.level_damage_bonus(
            context.scaling.skill_level,
            context.scaling.attribute_level,
        ),
        _ => 0,
    };
    let damage = damage_roll.map(|roll| {
        let range = roll.range().shifted(i64::from(level_bonus));
        let delta = delta_for(EffectContext::CombatDamage);
        DamageRange {
            min: delta.apply(f64::from(range.min)).floor() as u32,
            max: delta.apply(f64::from(range.max)).floor() as u32,
            avg: delta.apply(range.avg),
        }
    });

    let stats = EffectiveStats {
        item_id: definition.id.clone(),
        damage_roll,
        damage,
        level_bonus,
        attack_speed: equipment
            .and_then(|e| e.attack_speed)
            .map(|speed| delta_for(EffectContext::CombatAttackSpeed).apply(speed)),
        crit_chance: delta_for(EffectContext::CombatCritChance)
            .apply(equipment.map_or(0.0, |e| e.crit_chance)),
        armor: delta_for(EffectContext::CombatArmor).apply(equipment.map_or(0.0, |e| e.armor)),
        evasion: delta_for(EffectContext::CombatEvasion)
            .apply(equipment.map_or(0.0, |e| e.evasion)),
        deltas: deltas
            .into_iter()
            .map(|(ctx, delta)| (ctx, delta.totals))
            .collect(),
    };

    tracing::debug!(
        item = %stats.item_id,
        damage = ?stats.damage,
        crit = stats.crit_chance,
        contexts = stats.deltas.len(),
        "resolved effective stats"
    );
    Ok(stats)
}

/// Evaluates one context for an instance and keeps the applied/skipped
/// provenance.
pub fn effect_breakdown(
    catalog: &Catalog,
    instance: &ItemInstance,
    context: EffectContext,
    situation: &Situation,
) -> EffectDelta {
    evaluate(&catalog.applicators_for(instance), context, situation)
}

fn check_levels(catalog: &Catalog, instance: &ItemInstance) -> Result<(), StatError> {
    for (id, level) in &instance.qualities {
        let max = catalog
            .quality(id.as_str())
            .map(|q| q.max_level)
            .ok_or_else(|| StatError::UnknownModifier {
                kind: "quality",
                id: id.to_string(),
            })?;
        check_level("quality", id.as_str(), *level, max)?;
    }
    for (id, level) in &instance.traits {
        let max = catalog
            .trait_def(id.as_str())
            .map(|t| t.max_level)
            .ok_or_else(|| StatError::UnknownModifier {
                kind: "trait",
                id: id.to_string(),
            })?;
        check_level("trait", id.as_str(), *level, max)?;
    }
    Ok(())
}

fn check_level(kind: &'static str, id: &str, level: u8, max: u8) -> Result<(), StatError> {
    if level == 0 || level > max {
        return Err(StatError::LevelOutOfRange {
            kind,
            id: id.to_owned(),
            level,
            max,
        });
    }
    Ok(())
}
