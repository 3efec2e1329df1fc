//! Effect applicators and their evaluation.
//!
//! Qualities, traits, passive abilities, buffs and innate item properties all
//! describe their effects as [`Applicator`]s: a target [`EffectContext`], a
//! [`ModifierType`], a value and an optional [`Condition`]. The evaluator
//! collects the applicators for one context whose conditions hold and folds
//! them into an [`EffectDelta`]:
//!
//! ```text
//! result = clamp((base + ΣFLAT) × (1 + ΣPERCENTAGE) × ΠMULTIPLIER, floor, ceiling)
//! ```

pub mod condition;
pub mod evaluate;
#[cfg(feature = "serde")]
pub(crate) mod lenient;
pub mod stack;

pub use condition::{Condition, Situation};
pub use evaluate::{
    AppliedEffect, EffectDelta, EffectSource, SkipReason, SkippedEffect, SourcedApplicator,
    evaluate,
};
pub use stack::{Modifier, ModifierStack, ModifierTotals};

use crate::error::{ErrorSeverity, GameError};

/// Effect evaluation errors.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectError {
    /// Content names a context this engine does not know. Ignored at load.
    #[error("unknown effect context `{0}`")]
    UnknownEffectContext(String),
}

impl GameError for EffectError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownEffectContext(_) => "EFFECT_UNKNOWN_CONTEXT",
        }
    }

    fn is_user_actionable(&self) -> bool {
        false
    }
}

/// What an applicator modifies.
///
/// Names follow the dotted form used in content files (`combat.damage`).
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::EnumString,
    strum::Display,
    strum::IntoStaticStr,
    strum::EnumIter,
)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "&'static str")
)]
pub enum EffectContext {
    #[strum(serialize = "combat.damage")]
    CombatDamage,
    #[strum(serialize = "combat.armor")]
    CombatArmor,
    #[strum(serialize = "combat.evasion")]
    CombatEvasion,
    #[strum(serialize = "combat.critChance")]
    CombatCritChance,
    #[strum(serialize = "combat.attackSpeed")]
    CombatAttackSpeed,
    #[strum(serialize = "combat.healthRegen")]
    CombatHealthRegen,
    #[strum(serialize = "combat.manaRegen")]
    CombatManaRegen,
    #[strum(serialize = "activity.duration")]
    ActivityDuration,
    #[strum(serialize = "activity.xpGain")]
    ActivityXpGain,
    #[strum(serialize = "activity.yieldQuantity")]
    ActivityYieldQuantity,
    #[strum(serialize = "activity.yieldQuality")]
    ActivityYieldQuality,
    #[strum(serialize = "crafting.qualityBonus")]
    CraftingQualityBonus,
    #[strum(serialize = "crafting.successRate")]
    CraftingSuccessRate,
    #[strum(serialize = "crafting.yieldMultiplier")]
    CraftingYieldMultiplier,
    #[strum(serialize = "vendor.sellPrice")]
    VendorSellPrice,
    #[strum(serialize = "vendor.buyPrice")]
    VendorBuyPrice,
}

impl EffectContext {
    /// Parses a dotted context name.
    pub fn parse(name: &str) -> Result<Self, EffectError> {
        name.parse::<Self>()
            .map_err(|_| EffectError::UnknownEffectContext(name.to_owned()))
    }

    pub fn as_str(self) -> &'static str {
        self.into()
    }

    /// Valid output range for values in this context.
    pub fn bounds(self) -> ContextBounds {
        use EffectContext::*;
        match self {
            ActivityDuration => ContextBounds::at_least(1.0),
            CombatCritChance | CraftingSuccessRate => ContextBounds::new(0.0, 1.0),
            _ => ContextBounds::NON_NEGATIVE,
        }
    }

    pub fn is_combat(self) -> bool {
        self.as_str().starts_with("combat.")
    }
}

impl TryFrom<String> for EffectContext {
    type Error = EffectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

/// Closed range an evaluated value is clamped into.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContextBounds {
    pub min: f64,
    pub max: f64,
}

impl ContextBounds {
    pub const NON_NEGATIVE: Self = Self::at_least(0.0);
    pub const UNBOUNDED: Self = Self::new(f64::NEG_INFINITY, f64::INFINITY);

    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub const fn at_least(min: f64) -> Self {
        Self::new(min, f64::INFINITY)
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

/// How an applicator's value combines with the base.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum ModifierType {
    /// Added to the base before any scaling.
    Flat,
    /// Decimal fraction summed with other percentages (`0.2` = +20%).
    Percentage,
    /// Factor applied after percentages (`1.2` = ×1.2).
    Multiplier,
}

/// One conditional modifier.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Applicator {
    pub context: EffectContext,
    pub modifier_type: ModifierType,
    pub value: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub condition: Condition,
}

impl Applicator {
    pub fn new(context: EffectContext, modifier_type: ModifierType, value: f64) -> Self {
        Self {
            context,
            modifier_type,
            value,
            condition: Condition::Always,
        }
    }

    pub fn flat(context: EffectContext, value: f64) -> Self {
        Self::new(context, ModifierType::Flat, value)
    }

    pub fn percentage(context: EffectContext, value: f64) -> Self {
        Self::new(context, ModifierType::Percentage, value)
    }

    pub fn multiplier(context: EffectContext, value: f64) -> Self {
        Self::new(context, ModifierType::Multiplier, value)
    }

    #[must_use]
    pub fn when(mut self, condition: Condition) -> Self {
        self.condition = condition;
        self
    }

    pub(crate) fn as_modifier(&self) -> Modifier {
        match self.modifier_type {
            ModifierType::Flat => Modifier::Flat(self.value),
            ModifierType::Percentage => Modifier::Percentage(self.value),
            ModifierType::Multiplier => Modifier::Multiplier(self.value),
        }
    }
}
