//! Per-encounter combatant state.
//!
//! The combat loop never mutates its inputs: each round clones both states,
//! applies the round, and returns the new states inside the
//! [`RoundResult`](super::RoundResult).

use std::collections::BTreeMap;

use crate::catalog::{CombatRatings, EquipmentSlot, Monster, NaturalWeapon, SkillLevel};
use crate::effect::Applicator;
use crate::ids::{AbilityId, MonsterId, PassiveId};
use crate::instance::ItemInstance;

/// A bounded resource pool (health, mana).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceMeter {
    pub current: u32,
    pub maximum: u32,
}

impl ResourceMeter {
    pub fn new(current: u32, maximum: u32) -> Self {
        Self {
            current: current.min(maximum),
            maximum,
        }
    }

    pub fn full(maximum: u32) -> Self {
        Self::new(maximum, maximum)
    }

    /// Current value as a percentage of maximum (0-100). Empty pools read 0.
    pub fn percent(&self) -> f64 {
        if self.maximum == 0 {
            return 0.0;
        }
        f64::from(self.current) * 100.0 / f64::from(self.maximum)
    }

    pub fn is_depleted(&self) -> bool {
        self.current == 0
    }

    /// Removes `amount`, returning false without change if it is not available.
    pub fn spend(&mut self, amount: u32) -> bool {
        match self.current.checked_sub(amount) {
            Some(rest) => {
                self.current = rest;
                true
            }
            None => false,
        }
    }

    /// Removes up to `amount`, saturating at zero.
    pub fn drain(&mut self, amount: u32) {
        self.current = self.current.saturating_sub(amount);
    }
}

/// Who a combatant is.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatantKind {
    Player,
    Monster(MonsterId),
}

/// A temporary self-buff granted by an ability.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActiveBuff {
    pub name: String,
    pub source: AbilityId,
    /// Rounds left before the buff expires.
    pub remaining: u32,
    pub applicators: Vec<Applicator>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantState {
    pub name: String,
    pub kind: CombatantKind,
    pub creature_type: Option<String>,
    pub health: ResourceMeter,
    pub mana: ResourceMeter,
    pub skills: BTreeMap<String, SkillLevel>,
    pub attributes: BTreeMap<String, u32>,
    pub equipment: BTreeMap<EquipmentSlot, ItemInstance>,
    /// Used when nothing is wielded in the main hand.
    pub natural_weapon: Option<NaturalWeapon>,
    /// Base armor and evasion before equipment.
    pub ratings: CombatRatings,
    pub passives: Vec<PassiveId>,
    pub abilities: Vec<AbilityId>,
    /// Rounds until each ability is usable again. Absent means ready.
    pub cooldowns: BTreeMap<AbilityId, u32>,
    pub buffs: Vec<ActiveBuff>,
}

impl CombatantState {
    pub fn player(name: impl Into<String>, health: u32, mana: u32) -> Self {
        Self {
            name: name.into(),
            kind: CombatantKind::Player,
            creature_type: None,
            health: ResourceMeter::full(health),
            mana: ResourceMeter::full(mana),
            skills: BTreeMap::new(),
            attributes: BTreeMap::new(),
            equipment: BTreeMap::new(),
            natural_weapon: None,
            ratings: CombatRatings::default(),
            passives: Vec::new(),
            abilities: Vec::new(),
            cooldowns: BTreeMap::new(),
            buffs: Vec::new(),
        }
    }

    /// Fresh state for a monster at full health and mana.
    pub fn from_monster(monster: &Monster) -> Self {
        Self {
            name: monster.name.clone(),
            kind: CombatantKind::Monster(monster.id.clone()),
            creature_type: monster.creature_type.clone(),
            health: ResourceMeter::full(monster.health),
            mana: ResourceMeter::full(monster.mana),
            skills: monster.skills.clone(),
            attributes: monster.attributes.clone(),
            equipment: BTreeMap::new(),
            natural_weapon: monster.weapon.clone(),
            ratings: monster.combat_stats,
            passives: monster.passives.clone(),
            abilities: monster.abilities.clone(),
            cooldowns: BTreeMap::new(),
            buffs: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_skill(
        mut self,
        skill: impl Into<String>,
        level: u32,
        main_attribute: impl Into<String>,
    ) -> Self {
        self.skills
            .insert(skill.into(), SkillLevel::new(level, main_attribute));
        self
    }

    #[must_use]
    pub fn with_attribute(mut self, attribute: impl Into<String>, level: u32) -> Self {
        self.attributes.insert(attribute.into(), level);
        self
    }

    #[must_use]
    pub fn equip(mut self, slot: EquipmentSlot, instance: ItemInstance) -> Self {
        self.equipment.insert(slot, instance);
        self
    }

    #[must_use]
    pub fn with_ability(mut self, ability: impl Into<AbilityId>) -> Self {
        self.abilities.push(ability.into());
        self
    }

    #[must_use]
    pub fn with_passive(mut self, passive: impl Into<PassiveId>) -> Self {
        self.passives.push(passive.into());
        self
    }

    pub fn is_defeated(&self) -> bool {
        self.health.is_depleted()
    }

    pub fn knows(&self, ability: &AbilityId) -> bool {
        self.abilities.contains(ability)
    }

    pub fn cooldown(&self, ability: &AbilityId) -> u32 {
        self.cooldowns.get(ability).copied().unwrap_or(0)
    }

    /// Level of `skill` and of its main attribute, zero when unknown.
    pub fn skill_scaling(&self, skill: &str) -> (u32, u32) {
        match self.skills.get(skill) {
            Some(skill) => (
                skill.level,
                self.attributes
                    .get(&skill.main_attribute)
                    .copied()
                    .unwrap_or(0),
            ),
            None => (0, 0),
        }
    }

    /// Advances cooldowns and buffs by one round.
    ///
    /// The ability used and the buff applied this round are skipped, so a
    /// cooldown of `N` keeps an ability unavailable for the next `N` rounds.
    pub(crate) fn tick(&mut self, used: Option<&AbilityId>) {
        for (ability, remaining) in self.cooldowns.iter_mut() {
            if Some(ability) != used {
                *remaining = remaining.saturating_sub(1);
            }
        }
        self.cooldowns.retain(|_, remaining| *remaining > 0);

        for buff in &mut self.buffs {
            if Some(&buff.source) != used {
                buff.remaining = buff.remaining.saturating_sub(1);
            }
        }
        self.buffs.retain(|buff| buff.remaining > 0);
    }
}
