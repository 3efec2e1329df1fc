//! Loading hand-written content directories.

use std::fs;
use std::path::Path;

use outcome_content::ContentFactory;
use outcome_core::{EngineConfig, IssueSeverity};

fn write(dir: &Path, file: &str, content: &str) {
    fs::write(dir.join(file), content).expect("temp file is writable");
}

const ONE_ITEM: &str = r#"(items: [
    (id: "pebble", name: "Pebble", kind: Resource((tier: 0))),
])"#;

#[test]
fn only_items_are_required() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "items.ron", ONE_ITEM);

    let factory = ContentFactory::new(dir.path());
    let (catalog, config) = factory.load_all().expect("minimal content loads");
    assert_eq!(catalog.items().count(), 1);
    assert_eq!(catalog.monsters().count(), 0);
    assert_eq!(config, EngineConfig::default());
}

#[test]
fn missing_items_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let err = ContentFactory::new(dir.path()).load_catalog().unwrap_err();
    assert!(format!("{err:#}").contains("items.ron"));
}

#[test]
fn duplicate_ids_fail_the_catalog() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "items.ron",
        r#"(items: [
            (id: "pebble", name: "Pebble", kind: Resource((tier: 0))),
            (id: "pebble", name: "Other Pebble", kind: Resource((tier: 0))),
        ])"#,
    );
    let err = ContentFactory::new(dir.path()).load_catalog().unwrap_err();
    assert!(format!("{err:#}").contains("duplicate item id `pebble`"));
}

#[test]
fn zero_weight_tables_load_but_fail_validation() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "items.ron", ONE_ITEM);
    write(
        dir.path(),
        "drop_tables.ron",
        r#"(drop_tables: [
            (id: "empty", entries: [(weight: 0, outcome: Item(item_id: "pebble"))]),
        ])"#,
    );
    write(dir.path(), "config.toml", "max_drop_depth = 2\n");

    let (catalog, config) = ContentFactory::new(dir.path()).load_all().unwrap();
    assert_eq!(config.max_drop_depth, 2);
    let issues = catalog.validate(&config);
    assert!(issues.iter().any(|issue| {
        issue.severity == IssueSeverity::Error && issue.location == "drop_tables/empty"
    }));
}

#[test]
fn malformed_config_names_the_problem() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "items.ron", ONE_ITEM);
    write(dir.path(), "config.toml", "crit_multiplier = [1, 2]\n");
    let err = ContentFactory::new(dir.path()).load_config().unwrap_err();
    assert!(err.to_string().contains("config TOML"));
}
