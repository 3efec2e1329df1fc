//! The content shipped in `data/` loads, validates and resolves.

use outcome_content::{ContentFactory, bundled_data_dir};
use outcome_core::craft::CrafterProfile;
use outcome_core::{
    Catalog, EngineConfig, InventoryEntry, IssueSeverity, ItemInstance, PcgRng, Situation,
    StatContext, craft, drop_table_stats, match_ingredients, resolve_drop_table,
    resolve_effective_stats,
};

fn load() -> (Catalog, EngineConfig) {
    ContentFactory::new(bundled_data_dir())
        .load_all()
        .expect("bundled content loads")
}

#[test]
fn bundled_content_has_no_errors() {
    let (catalog, config) = load();
    let errors: Vec<_> = catalog
        .validate(&config)
        .into_iter()
        .filter(|issue| issue.severity == IssueSeverity::Error)
        .collect();
    assert!(errors.is_empty(), "content errors: {errors:?}");

    assert!(catalog.item("bronze_sword").is_some());
    assert!(catalog.monster("bandit_thug").is_some());
    assert!(catalog.recipe("basic_health_tincture").is_some());
    assert_eq!(config, EngineConfig::default());
}

#[test]
fn legacy_fields_are_normalized_on_load() {
    let (catalog, _) = load();
    let age = catalog.quality("age").expect("age is defined");
    let level = age.level(2).expect("level 2 has effects");
    assert!(!level.has_legacy_fields());
    assert_eq!(level.applicators.len(), 1);

    let passive = catalog.passive("dirty_fighter").expect("passive is defined");
    assert!(passive.crit_chance_bonus.is_none());
    assert_eq!(passive.applicators.len(), 1);
}

#[test]
fn hardened_sword_from_content() {
    let (catalog, config) = load();
    let sword = ItemInstance::new("bronze_sword").with_trait("hardened", 2);
    let stats = resolve_effective_stats(
        &catalog,
        &config,
        &sword,
        &StatContext::new(Situation::in_combat()),
    )
    .expect("sword resolves");
    let damage = stats.damage.expect("weapon has a damage range");
    assert_eq!((damage.min, damage.max), (5, 8));
}

#[test]
fn vermin_table_odds() {
    let (catalog, config) = load();
    let table = catalog.drop_table("combat-vermin").expect("table is defined");
    let stats = drop_table_stats(table).expect("table has weight");
    assert_eq!(stats.total_weight, 100);
    let odds: Vec<f64> = stats.entries.iter().map(|e| e.probability).collect();
    assert_eq!(odds, [0.70, 0.25, 0.05]);

    let mut rng = PcgRng::seed_from_u64(11);
    for _ in 0..500 {
        let drops = resolve_drop_table(&catalog, &config, table, &mut rng).expect("valid table");
        assert!(drops.len() <= 1);
    }
}

#[test]
fn tincture_from_content() {
    let (catalog, config) = load();
    let recipe = catalog.recipe("basic_health_tincture").expect("recipe is defined");
    let profile = CrafterProfile::default().with_skill("alchemy", 1);
    let inventory = [
        InventoryEntry::new(10, ItemInstance::new("chamomile").with_quality("potency", 2), 1),
        InventoryEntry::new(11, ItemInstance::new("sage").with_quality("potency", 4), 1),
        InventoryEntry::new(12, ItemInstance::new("spring_water"), 3),
    ];

    let allocation =
        match_ingredients(&catalog, &config, recipe, &profile, &inventory).expect("enough herbs");
    let result = craft(&catalog, &config, recipe, &profile, &allocation, &inventory)
        .expect("craft succeeds");
    assert_eq!(result.consumed.len(), 3);
    assert_eq!(result.outputs[0].instance.quality_level("potency"), 3);
    assert_eq!(result.experience, 15);
}

#[test]
fn digest_is_stable_across_loads() {
    let (first, _) = load();
    let (second, _) = load();
    let a = first.digest().expect("catalog encodes");
    let b = second.digest().expect("catalog encodes");
    assert_eq!(a, b);
    assert_eq!(hex::encode(a).len(), 64);
}
