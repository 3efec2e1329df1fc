use std::collections::BTreeMap;

use crate::dice::DamageRoll;
use crate::ids::{AbilityId, DropTableId, MonsterId, PassiveId};

/// A monster's own weapon (claws, a rusty sword).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NaturalWeapon {
    pub name: String,
    pub damage_roll: DamageRoll,
    #[cfg_attr(feature = "serde", serde(default = "NaturalWeapon::default_attack_speed"))]
    pub attack_speed: f64,
    #[cfg_attr(feature = "serde", serde(default = "NaturalWeapon::default_crit_chance"))]
    pub crit_chance: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub skill_scalar: Option<String>,
}

impl NaturalWeapon {
    pub const DEFAULT_ATTACK_SPEED: f64 = 3.0;
    pub const DEFAULT_CRIT_CHANCE: f64 = 0.05;

    pub fn new(name: impl Into<String>, damage_roll: DamageRoll) -> Self {
        Self {
            name: name.into(),
            damage_roll,
            attack_speed: Self::DEFAULT_ATTACK_SPEED,
            crit_chance: Self::DEFAULT_CRIT_CHANCE,
            skill_scalar: None,
        }
    }

    #[cfg(feature = "serde")]
    fn default_attack_speed() -> f64 {
        Self::DEFAULT_ATTACK_SPEED
    }

    #[cfg(feature = "serde")]
    fn default_crit_chance() -> f64 {
        Self::DEFAULT_CRIT_CHANCE
    }
}

/// Innate defensive ratings.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatRatings {
    pub armor: f64,
    pub evasion: f64,
}

/// A trained skill and the attribute that backs it.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillLevel {
    pub level: u32,
    #[cfg_attr(feature = "serde", serde(default = "SkillLevel::default_attribute"))]
    pub main_attribute: String,
}

impl SkillLevel {
    pub const DEFAULT_ATTRIBUTE: &'static str = "strength";

    pub fn new(level: u32, main_attribute: impl Into<String>) -> Self {
        Self {
            level,
            main_attribute: main_attribute.into(),
        }
    }

    #[cfg(feature = "serde")]
    fn default_attribute() -> String {
        Self::DEFAULT_ATTRIBUTE.to_owned()
    }
}

/// Gold dropped on defeat, uniform in `[min, max]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GoldRange {
    pub min: u32,
    pub max: u32,
}

/// A monster definition.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Monster {
    pub id: MonsterId,
    pub name: String,
    pub level: u32,
    /// Creature type matched by `TargetType` conditions (`humanoid`, `beast`).
    #[cfg_attr(feature = "serde", serde(default))]
    pub creature_type: Option<String>,
    pub health: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub mana: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub attributes: BTreeMap<String, u32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub skills: BTreeMap<String, SkillLevel>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub weapon: Option<NaturalWeapon>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub combat_stats: CombatRatings,
    #[cfg_attr(feature = "serde", serde(default))]
    pub passives: Vec<PassiveId>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub abilities: Vec<AbilityId>,
    /// Every table is rolled independently on defeat.
    #[cfg_attr(feature = "serde", serde(default))]
    pub loot_tables: Vec<DropTableId>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub gold: GoldRange,
    #[cfg_attr(feature = "serde", serde(default))]
    pub experience: u32,
}

impl Monster {
    pub fn new(id: impl Into<MonsterId>, name: impl Into<String>, level: u32, health: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            level,
            creature_type: None,
            health,
            mana: 0,
            attributes: BTreeMap::new(),
            skills: BTreeMap::new(),
            weapon: None,
            combat_stats: CombatRatings::default(),
            passives: Vec::new(),
            abilities: Vec::new(),
            loot_tables: Vec::new(),
            gold: GoldRange::default(),
            experience: 0,
        }
    }
}
