//! Effective stats of a combatant for one exchange.

use crate::catalog::{Catalog, EquipmentData, EquipmentSlot, ItemDefinition, NaturalWeapon};
use crate::combat::CombatantState;
use crate::config::EngineConfig;
use crate::dice::DamageRoll;
use crate::effect::{
    EffectContext, EffectDelta, EffectSource, Situation, SourcedApplicator, evaluate,
};

const SHIELD: &str = "shield";
const TWO_HANDED: &str = "twoHanded";
const DUAL_WIELD: &str = "dualWield";
const DEFAULT_WEAPON_SKILL: &str = "oneHanded";

/// The weapon a combatant strikes with.
#[derive(Clone, Debug, PartialEq)]
pub struct WeaponProfile {
    pub name: String,
    pub damage_roll: DamageRoll,
    /// Skill that scales this weapon, `None` for unarmed strikes.
    pub skill: Option<String>,
    pub attack_speed: f64,
    pub crit_chance: f64,
}

impl WeaponProfile {
    fn unarmed() -> Self {
        Self {
            name: "Unarmed".to_owned(),
            damage_roll: DamageRoll::UNARMED,
            skill: None,
            attack_speed: NaturalWeapon::DEFAULT_ATTACK_SPEED,
            crit_chance: 0.0,
        }
    }

    fn natural(weapon: &NaturalWeapon) -> Self {
        Self {
            name: weapon.name.clone(),
            damage_roll: weapon.damage_roll,
            skill: weapon.skill_scalar.clone(),
            attack_speed: weapon.attack_speed,
            crit_chance: weapon.crit_chance,
        }
    }

    fn wielded(
        definition: &ItemDefinition,
        data: &EquipmentData,
        roll: DamageRoll,
        dual: bool,
    ) -> Self {
        let skill = if dual {
            DUAL_WIELD.to_owned()
        } else {
            data.skill_scalar
                .clone()
                .unwrap_or_else(|| DEFAULT_WEAPON_SKILL.to_owned())
        };
        Self {
            name: definition.name.clone(),
            damage_roll: roll,
            skill: Some(skill),
            attack_speed: data
                .attack_speed
                .unwrap_or(NaturalWeapon::DEFAULT_ATTACK_SPEED),
            crit_chance: data.crit_chance,
        }
    }

    pub fn is_unarmed(&self) -> bool {
        self.damage_roll.is_unarmed()
    }
}

/// Resolved combat stats of one combatant.
#[derive(Clone, Debug, PartialEq)]
pub struct CombatantStats {
    pub weapon: WeaponProfile,
    /// Bonus damage from the weapon skill and its main attribute.
    pub level_bonus: u32,
    pub crit_chance: f64,
    pub armor: f64,
    pub evasion: f64,
    pub attack_speed: f64,
    /// `combat.damage` delta, applied to each rolled hit.
    pub damage: EffectDelta,
    /// The situation the stats were resolved in, including the combatant's
    /// own HP and equipment flags.
    pub situation: Situation,
}

/// Resolves a combatant's stats.
///
/// The caller's `situation` supplies target and activity information; the
/// combatant's own HP percentage, equipment flags, skills and attributes are
/// filled in from `state`. Applicators are gathered from every equipped
/// instance, every passive (gated by its trigger), and every active buff.
pub fn resolve_combatant_stats(
    catalog: &Catalog,
    config: &EngineConfig,
    state: &CombatantState,
    situation: &Situation,
) -> CombatantStats {
    let wielded = |slot: EquipmentSlot| {
        state.equipment.get(&slot).and_then(|instance| {
            let definition = catalog.item(instance.item_id.as_str());
            if definition.is_none() {
                tracing::warn!(item = %instance.item_id, ?slot, "equipped item not in catalog");
            }
            definition.and_then(|d| d.equipment().map(|e| (d, e)))
        })
    };
    let main_hand = wielded(EquipmentSlot::MainHand);
    let off_hand = wielded(EquipmentSlot::OffHand);

    let main_weapon = main_hand.and_then(|(d, e)| e.damage_roll.map(|roll| (d, e, roll)));
    let dual_wielding = main_weapon.is_some() && off_hand.is_some_and(|(_, e)| e.is_weapon());
    let two_handed = main_hand.is_some_and(|(d, e)| {
        d.has_subcategory(TWO_HANDED) || e.skill_scalar.as_deref() == Some(TWO_HANDED)
    });
    let shield_equipped = off_hand.is_some_and(|(d, _)| d.has_subcategory(SHIELD));

    let weapon = match (main_weapon, &state.natural_weapon) {
        (Some((definition, data, roll)), _) => {
            WeaponProfile::wielded(definition, data, roll, dual_wielding)
        }
        (None, Some(natural)) => WeaponProfile::natural(natural),
        (None, None) => WeaponProfile::unarmed(),
    };

    let level_bonus = match &weapon.skill {
        Some(skill) if !weapon.is_unarmed() => {
            let (skill_level, attribute_level) = state.skill_scaling(skill);
            config.level_damage_bonus(skill_level, attribute_level)
        }
        _ => 0,
    };

    let situation = Situation {
        hp_percent: Some(state.health.percent()),
        shield_equipped,
        two_handed,
        dual_wielding,
        skills: state
            .skills
            .iter()
            .map(|(name, skill)| (name.clone(), skill.level))
            .collect(),
        attributes: state.attributes.clone(),
        ..situation.clone()
    };

    let applicators = gather_applicators(catalog, state);
    let delta = |context| evaluate(&applicators, context, &situation);

    let equipment = || state.equipment.values().filter_map(|instance| {
        catalog
            .item(instance.item_id.as_str())
            .and_then(ItemDefinition::equipment)
    });
    let base_armor = state.ratings.armor + equipment().map(|e| e.armor).sum::<f64>();
    let base_evasion = state.ratings.evasion + equipment().map(|e| e.evasion).sum::<f64>();

    CombatantStats {
        level_bonus,
        crit_chance: delta(EffectContext::CombatCritChance).apply(weapon.crit_chance),
        armor: delta(EffectContext::CombatArmor).apply(base_armor),
        evasion: delta(EffectContext::CombatEvasion).apply(base_evasion),
        attack_speed: delta(EffectContext::CombatAttackSpeed).apply(weapon.attack_speed),
        damage: delta(EffectContext::CombatDamage),
        weapon,
        situation,
    }
}

fn gather_applicators(catalog: &Catalog, state: &CombatantState) -> Vec<SourcedApplicator> {
    let mut applicators: Vec<SourcedApplicator> = state
        .equipment
        .values()
        .flat_map(|instance| catalog.applicators_for(instance))
        .collect();
    applicators.extend(
        state
            .passives
            .iter()
            .flat_map(|passive| catalog.passive_applicators(passive)),
    );
    for buff in &state.buffs {
        applicators.extend(buff.applicators.iter().map(|applicator| {
            SourcedApplicator::new(
                EffectSource::Buff {
                    name: buff.name.clone(),
                },
                applicator.clone(),
            )
        }));
    }
    applicators
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{
        CombatRatings, ItemKind, Monster, PassiveAbility, PassiveTrigger, SkillLevel,
    };
    use crate::combat::state::ActiveBuff;
    use crate::effect::Applicator;
    use crate::ids::AbilityId;
    use crate::instance::ItemInstance;

    fn catalog() -> Catalog {
        let sword = ItemDefinition::new(
            "bronze_sword",
            "Bronze Sword",
            ItemKind::Equipment(EquipmentData {
                crit_chance: 0.05,
                ..EquipmentData::weapon(DamageRoll::dice(1, 4, 0), "oneHanded")
            }),
        );
        let dagger = ItemDefinition::new(
            "bronze_dagger",
            "Bronze Dagger",
            ItemKind::Equipment(EquipmentData {
                slot: EquipmentSlot::OffHand,
                ..EquipmentData::weapon(DamageRoll::dice(1, 3, 0), "oneHanded")
            }),
        );
        let shield = ItemDefinition::new(
            "wooden_shield",
            "Wooden Shield",
            ItemKind::Equipment(EquipmentData {
                armor: 20.0,
                ..EquipmentData::new(EquipmentSlot::OffHand)
            }),
        )
        .with_subcategories(["shield"]);
        let mut dirty_fighter =
            PassiveAbility::new("dirty_fighter", "Dirty Fighter", PassiveTrigger::Always);
        dirty_fighter.crit_chance_bonus = Some(0.03);
        let mut cornered =
            PassiveAbility::new("cornered", "Cornered", PassiveTrigger::Below50PercentHp);
        cornered.damage_bonus = Some(0.5);

        Catalog::builder()
            .items([sword, dagger, shield])
            .passives([dirty_fighter, cornered])
            .build()
            .unwrap()
    }

    fn bandit() -> Monster {
        let mut bandit = Monster::new("bandit_thug", "Bandit Thug", 5, 75);
        bandit.weapon = Some(NaturalWeapon {
            skill_scalar: Some("oneHanded".into()),
            ..NaturalWeapon::new("Rusty Sword", DamageRoll::dice(1, 3, 0))
        });
        bandit.combat_stats = CombatRatings {
            armor: 12.0,
            evasion: 8.0,
        };
        bandit.attributes.insert("strength".into(), 4);
        bandit
            .skills
            .insert("oneHanded".into(), SkillLevel::new(14, "strength"));
        bandit.passives = vec!["dirty_fighter".into(), "cornered".into()];
        bandit
    }

    #[test]
    fn no_weapon_falls_back_to_unarmed() {
        let player = CombatantState::player("Hero", 100, 0).with_skill("oneHanded", 30, "strength");
        let stats = resolve_combatant_stats(
            &catalog(),
            &EngineConfig::default(),
            &player,
            &Situation::in_combat(),
        );
        assert!(stats.weapon.is_unarmed());
        assert_eq!(stats.weapon.damage_roll.range().max, 1);
        assert_eq!(stats.level_bonus, 0);
        assert_eq!(stats.crit_chance, 0.0);
    }

    #[test]
    fn monster_uses_natural_weapon_and_passives() {
        let state = CombatantState::from_monster(&bandit());
        let stats = resolve_combatant_stats(
            &catalog(),
            &EngineConfig::default(),
            &state,
            &Situation::in_combat(),
        );
        assert_eq!(stats.weapon.name, "Rusty Sword");
        assert_eq!(stats.level_bonus, 1);
        assert!((stats.crit_chance - 0.08).abs() < 1e-12);
        assert_eq!(stats.armor, 12.0);
        assert!(stats.damage.totals.is_identity());
    }

    #[test]
    fn hp_triggered_passive_activates_when_wounded() {
        let mut state = CombatantState::from_monster(&bandit());
        state.health.drain(50);
        let stats = resolve_combatant_stats(
            &catalog(),
            &EngineConfig::default(),
            &state,
            &Situation::in_combat(),
        );
        assert_eq!(stats.damage.totals.percentage, 0.5);
        assert_eq!(stats.situation.hp_percent, Some(100.0 * 25.0 / 75.0));
    }

    #[test]
    fn equipment_flags_are_derived() {
        let catalog = catalog();
        let config = EngineConfig::default();
        let armed = CombatantState::player("Hero", 100, 0)
            .equip(EquipmentSlot::MainHand, ItemInstance::new("bronze_sword"));

        let dual = armed
            .clone()
            .equip(EquipmentSlot::OffHand, ItemInstance::new("bronze_dagger"));
        let stats = resolve_combatant_stats(&catalog, &config, &dual, &Situation::in_combat());
        assert!(stats.situation.dual_wielding);
        assert_eq!(stats.weapon.skill.as_deref(), Some("dualWield"));

        let guarded = armed.equip(EquipmentSlot::OffHand, ItemInstance::new("wooden_shield"));
        let stats = resolve_combatant_stats(&catalog, &config, &guarded, &Situation::in_combat());
        assert!(stats.situation.shield_equipped);
        assert!(!stats.situation.dual_wielding);
        assert_eq!(stats.armor, 20.0);
        assert_eq!(stats.weapon.skill.as_deref(), Some("oneHanded"));
    }

    #[test]
    fn buffs_contribute_applicators() {
        let mut player = CombatantState::player("Hero", 100, 0)
            .equip(EquipmentSlot::MainHand, ItemInstance::new("bronze_sword"));
        player.buffs.push(ActiveBuff {
            name: "Battle Fury".into(),
            source: AbilityId::new("battle_fury"),
            remaining: 2,
            applicators: vec![Applicator::percentage(EffectContext::CombatDamage, 0.25)],
        });
        let stats = resolve_combatant_stats(
            &catalog(),
            &EngineConfig::default(),
            &player,
            &Situation::in_combat(),
        );
        assert_eq!(stats.damage.applied.len(), 1);
        assert_eq!(stats.damage.apply(8.0), 10.0);
    }
}
