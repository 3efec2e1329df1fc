//! Damage scaling, mitigation and application.

use crate::config::EngineConfig;
use crate::dice::DamageResult;
use crate::effect::EffectDelta;

/// Every step between the dice and the health bar, kept for combat logs.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageBreakdown {
    pub roll: DamageResult,
    /// Ability power, 1.0 for a basic attack.
    pub power_multiplier: f64,
    pub level_bonus: u32,
    /// After power, level bonus and the `combat.damage` delta.
    pub modified: u32,
    pub critical: bool,
    /// After the crit multiplier.
    pub raw: u32,
    /// Removed by armor.
    pub mitigated: u32,
    pub dealt: u32,
}

/// Scales a rolled total before crit and armor.
///
/// # Formula
///
/// ```text
/// modified = floor(delta((rolled × power) + level_bonus))
/// ```
pub fn scale_damage(rolled: u32, power_multiplier: f64, level_bonus: u32, delta: &EffectDelta) -> u32 {
    let powered = (f64::from(rolled) * power_multiplier.max(0.0)).floor();
    delta.apply(powered + f64::from(level_bonus)).floor() as u32
}

/// Applies the crit multiplier.
pub fn critical_damage(config: &EngineConfig, damage: u32) -> u32 {
    (f64::from(damage) * config.crit_multiplier.max(1.0)).floor() as u32
}

/// Splits `raw` into the damage that lands and the amount armor absorbs.
///
/// # Formula
///
/// ```text
/// landed    = max(min_hit_damage, floor(raw × K / (armor + K)))
/// mitigated = raw − landed
/// ```
///
/// Returns `(landed, mitigated)`.
pub fn mitigate(config: &EngineConfig, raw: u32, armor: f64) -> (u32, u32) {
    let kept = 1.0 - config.armor_mitigation(armor);
    let landed = ((f64::from(raw) * kept).floor() as u32).max(config.min_hit_damage);
    (landed, raw.saturating_sub(landed))
}

/// Apply damage to current HP.
///
/// # Returns
///
/// New HP value (clamped to 0)
pub fn apply_damage(current_hp: u32, damage: u32) -> u32 {
    current_hp.saturating_sub(damage)
}
