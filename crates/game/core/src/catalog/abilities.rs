use crate::effect::{Applicator, Condition, EffectContext};
use crate::ids::{AbilityId, PassiveId};

/// What an active ability does when used.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AbilityKind {
    /// Weapon attack with damage scaled by `power_multiplier`.
    #[default]
    Attack,
    /// Self-buff only, no attack this round.
    Buff,
}

/// Gates an ability checks before it can be used.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AbilityRequirements {
    /// Weapon skill scalars the equipped weapon must have. Empty means any.
    pub weapon_types: Vec<String>,
    /// Minimum level in the equipped weapon's skill.
    pub min_skill_level: u32,
}

/// Temporary applicators granted by an ability.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BuffSpec {
    pub name: String,
    /// Rounds the buff lasts after the round it was applied in.
    pub duration: u32,
    #[cfg_attr(
        feature = "serde",
        serde(default, deserialize_with = "crate::effect::lenient::applicators")
    )]
    pub applicators: Vec<Applicator>,
}

/// An active combat ability.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ability {
    pub id: AbilityId,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub kind: AbilityKind,
    #[cfg_attr(feature = "serde", serde(default = "default_power"))]
    pub power_multiplier: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub mana_cost: u32,
    /// Rounds before the ability can be used again.
    #[cfg_attr(feature = "serde", serde(default))]
    pub cooldown: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub requirements: AbilityRequirements,
    #[cfg_attr(feature = "serde", serde(default))]
    pub buff: Option<BuffSpec>,
}

#[cfg(feature = "serde")]
fn default_power() -> f64 {
    1.0
}

impl Ability {
    pub fn attack(id: impl Into<AbilityId>, name: impl Into<String>, power_multiplier: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: AbilityKind::Attack,
            power_multiplier,
            mana_cost: 0,
            cooldown: 0,
            requirements: AbilityRequirements::default(),
            buff: None,
        }
    }

    pub fn buff(id: impl Into<AbilityId>, name: impl Into<String>, buff: BuffSpec) -> Self {
        Self {
            kind: AbilityKind::Buff,
            buff: Some(buff),
            ..Self::attack(id, name, 1.0)
        }
    }

    #[must_use]
    pub fn with_cost(mut self, mana_cost: u32, cooldown: u32) -> Self {
        self.mana_cost = mana_cost;
        self.cooldown = cooldown;
        self
    }

    #[must_use]
    pub fn with_requirements(mut self, requirements: AbilityRequirements) -> Self {
        self.requirements = requirements;
        self
    }
}

/// When a passive ability's effects are active.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PassiveTrigger {
    #[default]
    Always,
    #[cfg_attr(feature = "serde", serde(rename = "below_50_percent_hp"))]
    Below50PercentHp,
    #[cfg_attr(feature = "serde", serde(rename = "above_75_percent_hp"))]
    Above75PercentHp,
}

impl PassiveTrigger {
    pub fn condition(self) -> Condition {
        match self {
            Self::Always => Condition::Always,
            Self::Below50PercentHp => Condition::HpBelowPercent(50.0),
            Self::Above75PercentHp => Condition::HpAbovePercent(75.0),
        }
    }
}

/// Always-on or triggered applicators carried by a combatant.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PassiveAbility {
    pub id: PassiveId,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub trigger: PassiveTrigger,
    #[cfg_attr(
        feature = "serde",
        serde(default, deserialize_with = "crate::effect::lenient::applicators")
    )]
    pub applicators: Vec<Applicator>,
    /// Legacy: flat crit chance.
    #[cfg_attr(feature = "serde", serde(default))]
    pub crit_chance_bonus: Option<f64>,
    /// Legacy: flat armor.
    #[cfg_attr(feature = "serde", serde(default))]
    pub armor_bonus: Option<f64>,
    /// Legacy: flat evasion.
    #[cfg_attr(feature = "serde", serde(default))]
    pub evasion_bonus: Option<f64>,
    /// Legacy: decimal damage increase.
    #[cfg_attr(feature = "serde", serde(default))]
    pub damage_bonus: Option<f64>,
}

impl PassiveAbility {
    pub fn new(id: impl Into<PassiveId>, name: impl Into<String>, trigger: PassiveTrigger) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            trigger,
            applicators: Vec::new(),
            crit_chance_bonus: None,
            armor_bonus: None,
            evasion_bonus: None,
            damage_bonus: None,
        }
    }

    #[must_use]
    pub fn with_applicator(mut self, applicator: Applicator) -> Self {
        self.applicators.push(applicator);
        self
    }

    /// Folds legacy bonus fields into applicators and gates unconditional
    /// applicators behind the trigger.
    pub(crate) fn normalize(&mut self) {
        let legacy = [
            (self.crit_chance_bonus.take(), EffectContext::CombatCritChance, false),
            (self.armor_bonus.take(), EffectContext::CombatArmor, false),
            (self.evasion_bonus.take(), EffectContext::CombatEvasion, false),
            (self.damage_bonus.take(), EffectContext::CombatDamage, true),
        ];
        for (value, context, percentage) in legacy {
            if let Some(value) = value {
                self.applicators.push(if percentage {
                    Applicator::percentage(context, value)
                } else {
                    Applicator::flat(context, value)
                });
            }
        }

        let trigger = self.trigger.condition();
        for applicator in &mut self.applicators {
            if applicator.condition == Condition::Always {
                applicator.condition = trigger.clone();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::ModifierType;

    #[test]
    fn legacy_passive_is_normalized_with_trigger() {
        let mut frenzy = PassiveAbility::new("frenzy", "Frenzy", PassiveTrigger::Below50PercentHp);
        frenzy.damage_bonus = Some(0.25);
        frenzy.crit_chance_bonus = Some(0.03);
        frenzy.normalize();

        assert_eq!(frenzy.applicators.len(), 2);
        let damage = &frenzy.applicators[1];
        assert_eq!(damage.context, EffectContext::CombatDamage);
        assert_eq!(damage.modifier_type, ModifierType::Percentage);
        assert_eq!(damage.condition, Condition::HpBelowPercent(50.0));
        assert!(frenzy.damage_bonus.is_none());
    }

    #[test]
    fn explicit_conditions_survive_normalization() {
        let mut passive = PassiveAbility::new("steady", "Steady", PassiveTrigger::Above75PercentHp)
            .with_applicator(
                Applicator::flat(EffectContext::CombatArmor, 5.0).when(Condition::InCombat),
            );
        passive.normalize();
        assert_eq!(passive.applicators[0].condition, Condition::InCombat);
    }
}
