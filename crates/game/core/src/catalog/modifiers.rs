//! Quality and trait definitions.
//!
//! Qualities (`age`, `potency`) and traits (`hardened`, `blessed`) share one
//! shape: a maximum level and, per level, the applicators that level grants.

use std::collections::BTreeMap;

use crate::effect::{Applicator, EffectContext};

/// Definition of a leveled item modifier (a quality or a trait).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModifierDefinition<Id> {
    pub id: Id,
    pub name: String,
    pub max_level: u8,
    /// Effects granted at each level. Levels are 1-based.
    #[cfg_attr(feature = "serde", serde(default))]
    pub levels: BTreeMap<u8, LevelEffects>,
}

impl<Id> ModifierDefinition<Id> {
    pub fn new(id: Id, name: impl Into<String>, max_level: u8) -> Self {
        Self {
            id,
            name: name.into(),
            max_level,
            levels: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_level(mut self, level: u8, effects: LevelEffects) -> Self {
        self.levels.insert(level, effects);
        self
    }

    pub fn level(&self, level: u8) -> Option<&LevelEffects> {
        self.levels.get(&level)
    }

    /// Folds legacy effect fields of every level into applicators.
    pub(crate) fn normalize(&mut self) {
        for effects in self.levels.values_mut() {
            effects.normalize();
        }
    }
}

/// Effects granted by one level of a quality or trait.
///
/// Older content describes effects through dedicated fields instead of
/// applicators. Those are folded into `applicators` when the catalog is
/// built and are empty afterwards.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LevelEffects {
    #[cfg_attr(
        feature = "serde",
        serde(deserialize_with = "crate::effect::lenient::applicators")
    )]
    pub applicators: Vec<Applicator>,
    /// Flat combat damage.
    pub combat_damage_bonus: Option<f64>,
    /// Seconds removed from activity duration.
    pub activity_time_reduction: Option<f64>,
    /// Decimal fraction removed from activity duration.
    pub activity_time_reduction_percent: Option<f64>,
    /// Vendor sell price factor (`1.2` = sells for 20% more).
    pub vendor_price_modifier: Option<f64>,
}

impl LevelEffects {
    pub fn new(applicators: Vec<Applicator>) -> Self {
        Self {
            applicators,
            ..Self::default()
        }
    }

    pub fn has_legacy_fields(&self) -> bool {
        self.combat_damage_bonus.is_some()
            || self.activity_time_reduction.is_some()
            || self.activity_time_reduction_percent.is_some()
            || self.vendor_price_modifier.is_some()
    }

    fn normalize(&mut self) {
        if let Some(bonus) = self.combat_damage_bonus.take() {
            self.applicators
                .push(Applicator::flat(EffectContext::CombatDamage, bonus));
        }
        if let Some(seconds) = self.activity_time_reduction.take() {
            self.applicators
                .push(Applicator::flat(EffectContext::ActivityDuration, -seconds));
        }
        if let Some(fraction) = self.activity_time_reduction_percent.take() {
            self.applicators.push(Applicator::percentage(
                EffectContext::ActivityDuration,
                -fraction,
            ));
        }
        if let Some(factor) = self.vendor_price_modifier.take() {
            self.applicators
                .push(Applicator::multiplier(EffectContext::VendorSellPrice, factor));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::ModifierType;
    use crate::ids::TraitId;

    #[test]
    fn legacy_fields_become_applicators() {
        let mut hardened = ModifierDefinition::new(TraitId::new("hardened"), "Hardened", 3)
            .with_level(
                2,
                LevelEffects {
                    combat_damage_bonus: Some(4.0),
                    vendor_price_modifier: Some(1.4),
                    ..LevelEffects::default()
                },
            );
        hardened.normalize();

        let level = hardened.level(2).unwrap();
        assert!(!level.has_legacy_fields());
        assert_eq!(level.applicators.len(), 2);
        assert_eq!(level.applicators[0].context, EffectContext::CombatDamage);
        assert_eq!(level.applicators[0].value, 4.0);
        assert_eq!(level.applicators[1].modifier_type, ModifierType::Multiplier);
    }

    #[test]
    fn time_reductions_are_negative() {
        let mut effects = LevelEffects {
            activity_time_reduction: Some(3.0),
            activity_time_reduction_percent: Some(0.1),
            ..LevelEffects::default()
        };
        effects.normalize();
        assert_eq!(effects.applicators[0].value, -3.0);
        assert_eq!(effects.applicators[1].value, -0.1);
        assert_eq!(effects.applicators[1].modifier_type, ModifierType::Percentage);
    }
}
