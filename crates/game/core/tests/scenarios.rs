//! End-to-end resolution scenarios over a small content catalog.

mod common;

use outcome_core::{
    CombatAction, CombatContext, CombatError, CombatOutcome, CombatantState, DropEntry, DropTable,
    EngineConfig, EquipmentSlot, InstanceId, InventoryEntry, ItemInstance, PcgRng, QuantityRange,
    Situation, StatContext, craft, match_ingredients, resolve_combat_round, resolve_drop_table,
    resolve_effective_stats,
};
use outcome_core::combat::Encounter;
use outcome_core::craft::CrafterProfile;

/// A hardened level 2 bronze sword rolls 1d4 + 4.
#[test]
fn hardened_bronze_sword_range() {
    let catalog = common::catalog();
    let sword = ItemInstance::new("bronze_sword").with_trait("hardened", 2);
    let stats = resolve_effective_stats(
        &catalog,
        &EngineConfig::default(),
        &sword,
        &StatContext::new(Situation::in_combat()),
    )
    .expect("sword resolves");

    let damage = stats.damage.expect("weapon has a damage range");
    assert_eq!((damage.min, damage.max), (5, 8));
    assert_eq!(damage.avg, 6.5);
}

/// A 5% empty slot comes up about 5% of the time.
#[test]
fn drop_nothing_frequency() {
    let catalog = common::catalog();
    let config = EngineConfig::default();
    let table = DropTable::new(
        "ore_vein",
        vec![
            DropEntry::item(70, "tattered_cloth", QuantityRange::new(1, 2)),
            DropEntry::item(25, "tattered_cloth", QuantityRange::new(2, 4)),
            DropEntry::nothing(5),
        ],
    );
    let mut rng = PcgRng::seed_from_u64(2024);

    let mut empty = 0;
    for _ in 0..10_000 {
        let drops = resolve_drop_table(&catalog, &config, &table, &mut rng).expect("valid table");
        match drops.as_slice() {
            [] => empty += 1,
            [drop] => assert!((1..=4).contains(&drop.quantity)),
            more => panic!("one entry per roll, got {}", more.len()),
        }
    }
    let rate = f64::from(empty) / 10_000.0;
    assert!((0.04..=0.06).contains(&rate), "dropNothing rate {rate}");
}

/// Two different herbs satisfy a two-herb recipe, one unit each.
#[test]
fn tincture_consumes_one_of_each_herb() {
    let catalog = common::catalog();
    let config = EngineConfig::default();
    let recipe = catalog.recipe("basic_health_tincture").expect("fixture recipe");
    let profile = CrafterProfile::default().with_skill("alchemy", 1);
    let inventory = [
        InventoryEntry::new(10, ItemInstance::new("chamomile").with_quality("potency", 2), 1),
        InventoryEntry::new(11, ItemInstance::new("sage").with_quality("potency", 4), 1),
    ];

    let allocation =
        match_ingredients(&catalog, &config, recipe, &profile, &inventory).expect("enough herbs");
    let result = craft(&catalog, &config, recipe, &profile, &allocation, &inventory)
        .expect("craft succeeds");

    assert_eq!(result.consumed, vec![(InstanceId(10), 1), (InstanceId(11), 1)]);
    assert_eq!(result.outputs.len(), 1);
    assert_eq!(result.outputs[0].instance.item_id.as_str(), "health_tincture");
    assert_eq!(result.outputs[0].instance.quality_level("potency"), 3);
    assert_eq!(result.experience, 15);
}

/// Using a cooldown-2 ability twice in a row is rejected the second time.
#[test]
fn aimed_shot_twice_is_on_cooldown() {
    let catalog = common::catalog();
    let config = EngineConfig::default();
    let archer = CombatantState::player("Archer", 80, 25)
        .with_skill("ranged", 12, "dexterity")
        .with_attribute("dexterity", 14)
        .equip(EquipmentSlot::MainHand, ItemInstance::new("hunting_bow"))
        .with_ability("aimed_shot");
    let bandit = CombatantState::from_monster(catalog.monster("bandit_thug").expect("fixture"));
    let aimed = CombatAction::UseAbility("aimed_shot".into());
    let mut rng = PcgRng::seed_from_u64(99);

    let first = resolve_combat_round(
        &CombatContext::new(&catalog, &config),
        &archer,
        &bandit,
        &aimed,
        &mut rng,
    )
    .expect("first shot is allowed");
    assert_eq!(first.attacker.mana.current, 15);

    let second = resolve_combat_round(
        &CombatContext::new(&catalog, &config).with_round(2),
        &first.attacker,
        &first.defender,
        &aimed,
        &mut rng,
    );
    assert!(matches!(second, Err(CombatError::OnCooldown { .. })));
}

/// A full fight against the bandit pays gold, experience and loot.
#[test]
fn bandit_encounter_rewards_on_victory() {
    let catalog = common::catalog();
    let config = EngineConfig::default();
    let mut rng = PcgRng::seed_from_u64(7);
    let knight = CombatantState::player("Knight", 400, 0)
        .with_skill("oneHanded", 20, "strength")
        .with_attribute("strength", 20)
        .equip(
            EquipmentSlot::MainHand,
            ItemInstance::new("bronze_sword").with_trait("hardened", 2),
        );

    let mut encounter = Encounter::start(&catalog, &"bandit_thug".into(), knight)
        .expect("bandit is in the catalog");
    while !encounter.is_over() {
        encounter
            .step(&catalog, &config, &CombatAction::Attack, &mut rng)
            .expect("attacks are always valid");
        assert!(encounter.round < 200, "fight should end");
    }
    assert_eq!(encounter.outcome(), Some(CombatOutcome::Victory));
    assert!(encounter.monster.is_defeated());

    let rewards = encounter
        .rewards(&catalog, &config, &mut rng)
        .expect("bandit is in the catalog");
    assert!((15..=35).contains(&rewards.gold));
    assert_eq!(rewards.experience, 75);
    assert_eq!(rewards.loot.len(), 1);
    let drop = &rewards.loot[0];
    assert!(
        [
            "tattered_cloth",
            "leather_scraps",
            "bronze_woodcutting_axe",
            "bronze_sword",
            "leather_tunic"
        ]
        .contains(&drop.instance.item_id.as_str())
    );
    assert_eq!(drop.source_table.as_str(), "combat-bandit-basic");
}

/// Running away ends the fight with nothing to show for it.
#[test]
fn fleeing_forfeits_rewards() {
    let catalog = common::catalog();
    let config = EngineConfig::default();
    let mut rng = PcgRng::seed_from_u64(8);
    let mut encounter = Encounter::start(
        &catalog,
        &"bandit_thug".into(),
        CombatantState::player("Coward", 30, 0),
    )
    .expect("bandit is in the catalog");

    let round = encounter
        .step(&catalog, &config, &CombatAction::Flee, &mut rng)
        .expect("fleeing is always allowed");
    assert_eq!(round.outcome(), Some(CombatOutcome::Fled));
    let rewards = encounter.rewards(&catalog, &config, &mut rng).expect("no lookup needed");
    assert!(rewards.is_empty());
}
