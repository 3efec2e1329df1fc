//! Shared catalog fixture for the integration tests.

#![allow(dead_code)]

use outcome_core::{
    Ability, AbilityRequirements, Applicator, Catalog, DropEntry, DropTable, EffectContext,
    EquipmentData, EquipmentSlot, Ingredient, ItemDefinition, ItemKind, LevelEffects, Monster,
    NaturalWeapon, PassiveAbility, PassiveTrigger, QualityBonus, QualityDefinition, QualityPolicy,
    QuantityRange, Recipe, SkillLevel, TraitDefinition,
    catalog::{CombatRatings, ConsumableData, GoldRange, ResourceData},
    dice::DamageRoll,
};

pub fn weapon(id: &str, name: &str, roll: DamageRoll, skill: &str) -> ItemDefinition {
    ItemDefinition::new(
        id,
        name,
        ItemKind::Equipment(EquipmentData::weapon(roll, skill)),
    )
}

pub fn resource(id: &str, name: &str) -> ItemDefinition {
    ItemDefinition::new(id, name, ItemKind::Resource(ResourceData::default()))
}

pub fn herb(id: &str, name: &str) -> ItemDefinition {
    resource(id, name)
        .with_subcategories(["herb"])
        .allow_quality("potency", 1)
}

fn hardened() -> TraitDefinition {
    let flat = |value| LevelEffects::new(vec![Applicator::flat(EffectContext::CombatDamage, value)]);
    TraitDefinition::new("hardened".into(), "Hardened", 3)
        .with_level(1, flat(2.0))
        .with_level(2, flat(4.0))
        .with_level(3, flat(7.0))
}

fn bandit_thug() -> Monster {
    let mut bandit = Monster::new("bandit_thug", "Bandit Thug", 5, 75);
    bandit.mana = 30;
    bandit.creature_type = Some("humanoid".into());
    bandit.attributes = [
        ("strength", 4),
        ("endurance", 3),
        ("dexterity", 3),
        ("perception", 2),
        ("wisdom", 1),
        ("will", 1),
        ("charisma", 1),
    ]
    .into_iter()
    .map(|(name, level)| (name.to_owned(), level))
    .collect();
    bandit.skills = [
        ("oneHanded", SkillLevel::new(4, "strength")),
        ("dualWield", SkillLevel::new(2, "dexterity")),
        ("twoHanded", SkillLevel::new(1, "strength")),
        ("ranged", SkillLevel::new(2, "dexterity")),
        ("casting", SkillLevel::new(1, "wisdom")),
    ]
    .into_iter()
    .map(|(name, skill)| (name.to_owned(), skill))
    .collect();
    bandit.weapon = Some(NaturalWeapon {
        attack_speed: 2.6,
        skill_scalar: Some("oneHanded".into()),
        ..NaturalWeapon::new("Rusty Sword", DamageRoll::dice(1, 3, 0))
    });
    bandit.combat_stats = CombatRatings {
        armor: 12.0,
        evasion: 8.0,
    };
    bandit.passives = vec!["dirty_fighter".into()];
    bandit.loot_tables = vec!["combat-bandit-basic".into()];
    bandit.gold = GoldRange { min: 15, max: 35 };
    bandit.experience = 75;
    bandit
}

fn bandit_drops() -> DropTable {
    DropTable::new(
        "combat-bandit-basic",
        vec![
            DropEntry::item(60, "tattered_cloth", QuantityRange::new(1, 3)),
            DropEntry::item(50, "leather_scraps", QuantityRange::new(1, 2)),
            DropEntry::item(15, "bronze_woodcutting_axe", QuantityRange::ONE),
            DropEntry::item(10, "bronze_sword", QuantityRange::ONE)
                .with_quality_bonus(QualityBonus::Flat(1)),
            DropEntry::item(8, "leather_tunic", QuantityRange::ONE),
        ],
    )
}

/// Items, modifiers, abilities, a monster, its loot and two recipes.
pub fn catalog() -> Catalog {
    let mut dirty_fighter =
        PassiveAbility::new("dirty_fighter", "Dirty Fighter", PassiveTrigger::Always);
    dirty_fighter.crit_chance_bonus = Some(0.03);

    let mut tincture = Recipe::new("basic_health_tincture", "Basic Health Tincture", "alchemy")
        .ingredient(Ingredient::subcategory("herb", 2))
        .output("health_tincture", 1, QualityPolicy::Inherit);
    tincture.experience = 15;

    Catalog::builder()
        .items([
            weapon("bronze_sword", "Bronze Sword", DamageRoll::dice(1, 4, 0), "oneHanded")
                .allow_trait("hardened")
                .allow_quality("craftsmanship", 0),
            weapon("hunting_bow", "Hunting Bow", DamageRoll::dice(1, 6, 0), "ranged"),
            ItemDefinition::new(
                "bronze_woodcutting_axe",
                "Bronze Woodcutting Axe",
                ItemKind::Equipment(EquipmentData::new(EquipmentSlot::Tool)),
            ),
            ItemDefinition::new(
                "leather_tunic",
                "Leather Tunic",
                ItemKind::Equipment(EquipmentData {
                    armor: 8.0,
                    ..EquipmentData::new(EquipmentSlot::Body)
                }),
            ),
            ItemDefinition::new(
                "health_tincture",
                "Health Tincture",
                ItemKind::Consumable(ConsumableData {
                    restore_health: 20,
                    restore_mana: 0,
                }),
            )
            .allow_quality("potency", 1),
            herb("chamomile", "Chamomile"),
            herb("sage", "Sage"),
            resource("tattered_cloth", "Tattered Cloth"),
            resource("leather_scraps", "Leather Scraps"),
        ])
        .qualities([
            QualityDefinition::new("potency".into(), "Potency", 5),
            QualityDefinition::new("craftsmanship".into(), "Craftsmanship", 5),
        ])
        .traits([hardened()])
        .abilities([Ability::attack("aimed_shot", "Aimed Shot", 1.5)
            .with_cost(10, 2)
            .with_requirements(AbilityRequirements {
                weapon_types: vec!["ranged".into()],
                min_skill_level: 1,
            })])
        .passives([dirty_fighter])
        .monsters([bandit_thug()])
        .drop_tables([bandit_drops()])
        .recipes([tincture])
        .build()
        .expect("fixture catalog has unique ids")
}
