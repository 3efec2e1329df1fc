/// Engine balance constants and tunable parameters.
///
/// Every field has a documented default and missing keys in `config.toml`
/// fall back to it.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// `K` in the armor curve: `mitigated = raw * armor / (armor + K)`.
    pub armor_constant: f64,
    /// Dodge chance is `evasion / (evasion + evasion_constant)`.
    pub evasion_constant: f64,
    /// Upper bound on dodge chance.
    pub max_dodge_chance: f64,
    /// Damage multiplier on a critical hit.
    pub crit_multiplier: f64,
    /// Damage dealt by a landed hit never drops below this.
    pub min_hit_damage: u32,
    /// Skill/attribute levels per point of bonus damage.
    pub skill_bonus_step: u32,
    /// Bonus damage cap for each of skill and attribute.
    pub skill_bonus_cap: u32,
    /// Weight of one quality level in the ingredient score.
    pub quality_weight: u32,
    /// Weight of one trait level in the ingredient score.
    pub trait_weight: u32,
    /// Maximum nesting of drop tables referencing drop tables.
    pub max_drop_depth: u8,
    /// Crafting skill levels per bonus quality level on crafted output.
    pub craft_skill_bonus_step: u32,
    /// Cap on the crafting skill quality bonus.
    pub craft_skill_bonus_cap: u8,
}

impl EngineConfig {
    // ===== compile-time limits =====
    /// Highest level any quality or trait definition may declare.
    pub const MAX_MODIFIER_LEVEL: u8 = 10;
    /// Largest die a damage roll may use.
    pub const MAX_DIE_SIDES: u32 = 1000;
    /// Largest number of dice in one roll.
    pub const MAX_DICE: u32 = 100;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_ARMOR_CONSTANT: f64 = 1000.0;
    pub const DEFAULT_EVASION_CONSTANT: f64 = 1000.0;
    pub const DEFAULT_MAX_DODGE_CHANCE: f64 = 0.75;
    pub const DEFAULT_CRIT_MULTIPLIER: f64 = 2.0;
    pub const DEFAULT_MIN_HIT_DAMAGE: u32 = 1;
    pub const DEFAULT_SKILL_BONUS_STEP: u32 = 10;
    pub const DEFAULT_SKILL_BONUS_CAP: u32 = 2;
    pub const DEFAULT_QUALITY_WEIGHT: u32 = 1;
    pub const DEFAULT_TRAIT_WEIGHT: u32 = 10;
    pub const DEFAULT_MAX_DROP_DEPTH: u8 = 5;
    pub const DEFAULT_CRAFT_SKILL_BONUS_STEP: u32 = 10;
    pub const DEFAULT_CRAFT_SKILL_BONUS_CAP: u8 = 2;

    pub fn new() -> Self {
        Self {
            armor_constant: Self::DEFAULT_ARMOR_CONSTANT,
            evasion_constant: Self::DEFAULT_EVASION_CONSTANT,
            max_dodge_chance: Self::DEFAULT_MAX_DODGE_CHANCE,
            crit_multiplier: Self::DEFAULT_CRIT_MULTIPLIER,
            min_hit_damage: Self::DEFAULT_MIN_HIT_DAMAGE,
            skill_bonus_step: Self::DEFAULT_SKILL_BONUS_STEP,
            skill_bonus_cap: Self::DEFAULT_SKILL_BONUS_CAP,
            quality_weight: Self::DEFAULT_QUALITY_WEIGHT,
            trait_weight: Self::DEFAULT_TRAIT_WEIGHT,
            max_drop_depth: Self::DEFAULT_MAX_DROP_DEPTH,
            craft_skill_bonus_step: Self::DEFAULT_CRAFT_SKILL_BONUS_STEP,
            craft_skill_bonus_cap: Self::DEFAULT_CRAFT_SKILL_BONUS_CAP,
        }
    }

    /// Bonus damage from skill and attribute levels.
    ///
    /// Each contributes `min(cap, level / step)`.
    pub fn level_damage_bonus(&self, skill_level: u32, attribute_level: u32) -> u32 {
        let step = self.skill_bonus_step.max(1);
        (skill_level / step).min(self.skill_bonus_cap)
            + (attribute_level / step).min(self.skill_bonus_cap)
    }

    /// Extra quality levels granted to crafted output by the crafter's skill.
    pub fn craft_quality_bonus(&self, skill_level: u32) -> u8 {
        let step = self.craft_skill_bonus_step.max(1);
        let bonus = (skill_level / step).min(u32::from(self.craft_skill_bonus_cap));
        bonus as u8
    }

    /// Fraction of raw damage removed by `armor`.
    pub fn armor_mitigation(&self, armor: f64) -> f64 {
        let armor = armor.max(0.0);
        if armor + self.armor_constant <= 0.0 {
            return 0.0;
        }
        armor / (armor + self.armor_constant)
    }

    /// Chance to dodge an incoming hit for the given evasion rating.
    pub fn dodge_chance(&self, evasion: f64) -> f64 {
        let evasion = evasion.max(0.0);
        if evasion + self.evasion_constant <= 0.0 {
            return 0.0;
        }
        (evasion / (evasion + self.evasion_constant)).min(self.max_dodge_chance)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_bonus_caps_each_source() {
        let config = EngineConfig::default();
        assert_eq!(config.level_damage_bonus(0, 0), 0);
        assert_eq!(config.level_damage_bonus(15, 9), 1);
        assert_eq!(config.level_damage_bonus(99, 99), 4);
    }

    #[test]
    fn dodge_is_capped() {
        let config = EngineConfig::default();
        assert_eq!(config.dodge_chance(0.0), 0.0);
        assert!((config.dodge_chance(1000.0) - 0.5).abs() < 1e-12);
        assert_eq!(config.dodge_chance(1_000_000.0), 0.75);
    }

    #[test]
    fn armor_mitigation_curve() {
        let config = EngineConfig::default();
        assert_eq!(config.armor_mitigation(0.0), 0.0);
        assert!((config.armor_mitigation(1000.0) - 0.5).abs() < 1e-12);
        assert_eq!(config.armor_mitigation(-50.0), 0.0);
    }

    #[test]
    fn craft_bonus_caps() {
        let config = EngineConfig::default();
        assert_eq!(config.craft_quality_bonus(9), 0);
        assert_eq!(config.craft_quality_bonus(25), 2);
        assert_eq!(config.craft_quality_bonus(500), 2);
    }
}
