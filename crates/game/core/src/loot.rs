//! Weighted loot table resolution.
//!
//! ```text
//! W = Σ entry.weight
//! r ∈ [0, W)                         uniform integer
//! select first entry where Σ_{0..=i} weight > r
//! ```
//!
//! Tables attached to the same monster or activity resolve independently and
//! their drops are concatenated.

use crate::catalog::{Catalog, DropEntry, DropOutcome, DropTable, ItemDefinition, QualityBonus};
use crate::config::EngineConfig;
use crate::error::{ErrorSeverity, GameError};
use crate::ids::{DropTableId, ItemId, QualityId};
use crate::instance::ItemInstance;
use crate::rng::RngOracle;

/// Content-integrity failures found while rolling a table.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LootError {
    #[error("drop table `{0}` has total weight 0")]
    DegenerateDropTable(DropTableId),

    #[error("drop table `{0}` total weight overflows")]
    WeightOverflow(DropTableId),

    #[error("drop table `{0}` not found")]
    UnknownDropTable(DropTableId),

    #[error("drop table `{table}` references unknown item `{item}`")]
    UnknownItem { table: DropTableId, item: ItemId },

    #[error("drop table `{table}` nests deeper than {limit}")]
    NestingTooDeep { table: DropTableId, limit: u8 },
}

impl GameError for LootError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::DegenerateDropTable(_) => "LOOT_DEGENERATE_TABLE",
            Self::WeightOverflow(_) => "LOOT_WEIGHT_OVERFLOW",
            Self::UnknownDropTable(_) => "LOOT_UNKNOWN_TABLE",
            Self::UnknownItem { .. } => "LOOT_UNKNOWN_ITEM",
            Self::NestingTooDeep { .. } => "LOOT_NESTING_TOO_DEEP",
        }
    }
}

/// A freshly created item stack.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemDrop {
    pub instance: ItemInstance,
    pub quantity: u32,
    /// Table whose entry produced the drop (the innermost one when nested).
    pub source_table: DropTableId,
}

/// Probability of one entry being selected.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntryChance {
    pub index: usize,
    pub outcome: DropOutcome,
    pub weight: u32,
    pub probability: f64,
}

/// Balancing summary of a table.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DropTableStats {
    pub table: DropTableId,
    pub total_weight: u32,
    pub entries: Vec<EntryChance>,
}

fn total_weight(table: &DropTable) -> Result<u32, LootError> {
    match table.total_weight() {
        Some(0) => Err(LootError::DegenerateDropTable(table.id.clone())),
        Some(total) => Ok(total),
        None => Err(LootError::WeightOverflow(table.id.clone())),
    }
}

/// Selects the entry for a roll `r` in `[0, W)`.
///
/// Returns `None` when `r` is outside the table's weight range.
pub fn select_entry(table: &DropTable, r: u32) -> Option<(usize, &DropEntry)> {
    let mut cumulative = 0u32;
    for (index, entry) in table.entries.iter().enumerate() {
        cumulative = cumulative.checked_add(entry.weight)?;
        if cumulative > r {
            return Some((index, entry));
        }
    }
    None
}

/// Rolls one table, following nested tables.
///
/// Fails on any content-integrity problem; use [`resolve_drop_tables`] in live
/// sessions.
pub fn resolve_drop_table(
    catalog: &Catalog,
    config: &EngineConfig,
    table: &DropTable,
    rng: &mut impl RngOracle,
) -> Result<Vec<ItemDrop>, LootError> {
    let mut drops = Vec::new();
    roll_table(catalog, config, table, 0, rng, &mut drops)?;
    Ok(drops)
}

fn roll_table(
    catalog: &Catalog,
    config: &EngineConfig,
    table: &DropTable,
    depth: u8,
    rng: &mut impl RngOracle,
    drops: &mut Vec<ItemDrop>,
) -> Result<(), LootError> {
    let total = total_weight(table)?;
    let r = rng.below(total);
    let Some((index, entry)) = select_entry(table, r) else {
        return Err(LootError::DegenerateDropTable(table.id.clone()));
    };
    tracing::debug!(table = %table.id, r, total, index, "selected drop entry");

    match &entry.outcome {
        DropOutcome::Nothing => {}
        DropOutcome::Item {
            item_id,
            quantity,
            quality_bonus,
        } => {
            let definition =
                catalog
                    .item(item_id.as_str())
                    .ok_or_else(|| LootError::UnknownItem {
                        table: table.id.clone(),
                        item: item_id.clone(),
                    })?;
            let quantity = rng.range(quantity.min, quantity.max);
            if quantity > 0 {
                drops.push(ItemDrop {
                    instance: roll_instance(catalog, definition, quality_bonus),
                    quantity,
                    source_table: table.id.clone(),
                });
            }
        }
        DropOutcome::Table(nested_id) => {
            if depth >= config.max_drop_depth {
                return Err(LootError::NestingTooDeep {
                    table: table.id.clone(),
                    limit: config.max_drop_depth,
                });
            }
            let nested = catalog
                .drop_table(nested_id.as_str())
                .ok_or_else(|| LootError::UnknownDropTable(nested_id.clone()))?;
            roll_table(catalog, config, nested, depth + 1, rng, drops)?;
        }
    }
    Ok(())
}

/// Highest level `quality` may reach; unknown qualities use the global cap.
fn max_quality_level(catalog: &Catalog, quality: &QualityId) -> u8 {
    catalog
        .quality(quality.as_str())
        .map_or(EngineConfig::MAX_MODIFIER_LEVEL, |q| q.max_level)
}

/// A new instance with the definition's default quality levels raised by
/// `bonus`, clamped to each quality's maximum. Defaults always land in
/// `[1, max]`; levels that a negative bonus takes to 0 are dropped.
pub fn roll_instance(
    catalog: &Catalog,
    definition: &ItemDefinition,
    bonus: &QualityBonus,
) -> ItemInstance {
    let mut instance = ItemInstance::from_definition(definition);
    let defaults: Vec<(QualityId, u8)> = instance
        .qualities
        .iter()
        .map(|(q, level)| (q.clone(), *level))
        .collect();
    for (quality, level) in defaults {
        let max_level = max_quality_level(catalog, &quality).max(1);
        instance = instance.with_quality(quality, level.clamp(1, max_level));
    }

    let bonuses: Vec<(&QualityId, i32)> = match bonus {
        QualityBonus::Flat(0) => Vec::new(),
        QualityBonus::Flat(flat) => definition.bonus_qualities().map(|q| (q, *flat)).collect(),
        QualityBonus::PerQuality(map) => map.iter().map(|(q, b)| (q, *b)).collect(),
    };

    for (quality, amount) in bonuses {
        let Some(max_level) = catalog.quality(quality.as_str()).map(|q| q.max_level) else {
            tracing::warn!(item = %definition.id, %quality, "quality bonus for unknown quality");
            continue;
        };
        let current = i32::from(instance.quality_level(quality.as_str()));
        let level = (current + amount).clamp(0, i32::from(max_level)) as u8;
        instance = instance.with_quality(quality.clone(), level);
    }
    instance
}

/// Rolls every table in `ids` and concatenates their drops.
///
/// Missing or broken tables are logged and contribute nothing, so a content
/// bug never aborts a live session.
pub fn resolve_drop_tables(
    catalog: &Catalog,
    config: &EngineConfig,
    ids: &[DropTableId],
    rng: &mut impl RngOracle,
) -> Vec<ItemDrop> {
    let mut drops = Vec::new();
    for id in ids {
        let Some(table) = catalog.drop_table(id.as_str()) else {
            tracing::error!(table = %id, "drop table not found, skipping");
            continue;
        };
        match resolve_drop_table(catalog, config, table, rng) {
            Ok(mut rolled) => drops.append(&mut rolled),
            Err(err) => tracing::error!(
                table = %id,
                code = err.error_code(),
                error = %err,
                "drop table failed, no drops"
            ),
        }
    }
    drops
}

/// Per-entry selection probabilities of a table.
pub fn drop_table_stats(table: &DropTable) -> Result<DropTableStats, LootError> {
    let total = total_weight(table)?;
    let entries = table
        .entries
        .iter()
        .enumerate()
        .map(|(index, entry)| EntryChance {
            index,
            outcome: entry.outcome.clone(),
            weight: entry.weight,
            probability: f64::from(entry.weight) / f64::from(total),
        })
        .collect();
    Ok(DropTableStats {
        table: table.id.clone(),
        total_weight: total,
        entries,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::catalog::{ItemKind, ModifierDefinition, QuantityRange, ResourceData};
    use crate::rng::PcgRng;

    fn catalog() -> Catalog {
        let cloth = ItemDefinition::new(
            "tattered_cloth",
            "Tattered Cloth",
            ItemKind::Resource(ResourceData::default()),
        )
        .allow_quality("age", 1)
        .allow_quality("purity", 0);
        Catalog::builder()
            .item(cloth)
            .quality(ModifierDefinition::new(QualityId::new("age"), "Age", 5))
            .quality(ModifierDefinition::new(QualityId::new("purity"), "Purity", 3))
            .drop_table(DropTable::new(
                "inner",
                vec![DropEntry::item(1, "tattered_cloth", QuantityRange::new(2, 2))],
            ))
            .drop_table(DropTable::new("loop", vec![DropEntry::table(1, "loop")]))
            .build()
            .unwrap()
    }

    #[test]
    fn selection_walks_cumulative_weights() {
        let table = DropTable::new(
            "t",
            vec![
                DropEntry::nothing(3),
                DropEntry::nothing(0),
                DropEntry::nothing(2),
            ],
        );
        assert_eq!(select_entry(&table, 0).map(|(i, _)| i), Some(0));
        assert_eq!(select_entry(&table, 2).map(|(i, _)| i), Some(0));
        assert_eq!(select_entry(&table, 3).map(|(i, _)| i), Some(2));
        assert_eq!(select_entry(&table, 4).map(|(i, _)| i), Some(2));
        assert!(select_entry(&table, 5).is_none());
    }

    #[test]
    fn degenerate_table_fails_loudly() {
        let table = DropTable::new("empty", vec![DropEntry::nothing(0)]);
        let mut rng = PcgRng::seed_from_u64(1);
        let err = resolve_drop_table(&catalog(), &EngineConfig::default(), &table, &mut rng)
            .unwrap_err();
        assert_eq!(err, LootError::DegenerateDropTable("empty".into()));
        assert!(err.severity().is_internal());
        assert!(drop_table_stats(&table).is_err());
    }

    #[test]
    fn nested_tables_are_followed() {
        let catalog = catalog();
        let outer = DropTable::new("outer", vec![DropEntry::table(1, "inner")]);
        let mut rng = PcgRng::seed_from_u64(7);
        let drops =
            resolve_drop_table(&catalog, &EngineConfig::default(), &outer, &mut rng).unwrap();
        assert_eq!(drops.len(), 1);
        assert_eq!(drops[0].quantity, 2);
        assert_eq!(drops[0].source_table.as_str(), "inner");
        assert_eq!(drops[0].instance.quality_level("age"), 1);
    }

    #[test]
    fn self_referencing_table_hits_depth_limit() {
        let catalog = catalog();
        let table = catalog.drop_table("loop").unwrap();
        let mut rng = PcgRng::seed_from_u64(7);
        let err =
            resolve_drop_table(&catalog, &EngineConfig::default(), table, &mut rng).unwrap_err();
        assert!(matches!(err, LootError::NestingTooDeep { limit: 5, .. }));
    }

    #[test]
    fn quality_bonus_is_clamped_per_quality() {
        let catalog = catalog();
        let cloth = catalog.item("tattered_cloth").unwrap();

        let flat = roll_instance(&catalog, cloth, &QualityBonus::Flat(4));
        assert_eq!(flat.quality_level("age"), 5);
        assert_eq!(flat.quality_level("purity"), 3);

        let per = roll_instance(
            &catalog,
            cloth,
            &QualityBonus::PerQuality(BTreeMap::from([(QualityId::new("age"), -1)])),
        );
        assert!(per.qualities.is_empty());
    }

    #[test]
    fn default_qualities_are_clamped_without_a_bonus() {
        let catalog = Catalog::builder()
            .item(
                ItemDefinition::new(
                    "relic",
                    "Relic",
                    ItemKind::Resource(ResourceData::default()),
                )
                .allow_quality("age", 9)
                .allow_quality("mystery", 40),
            )
            .quality(ModifierDefinition::new(QualityId::new("age"), "Age", 5))
            .build()
            .unwrap();
        let relic = catalog.item("relic").unwrap();

        let instance = roll_instance(&catalog, relic, &QualityBonus::Flat(0));
        assert_eq!(instance.quality_level("age"), 5);
        assert_eq!(
            instance.quality_level("mystery"),
            EngineConfig::MAX_MODIFIER_LEVEL
        );
    }

    #[test]
    fn tables_are_joined_in_order() {
        let catalog = Catalog::builder()
            .items([
                ItemDefinition::new("bone", "Bone", ItemKind::Resource(ResourceData::default())),
                ItemDefinition::new("pelt", "Pelt", ItemKind::Resource(ResourceData::default())),
            ])
            .drop_tables([
                DropTable::new(
                    "bones",
                    vec![DropEntry::item(1, "bone", QuantityRange::new(1, 1))],
                ),
                DropTable::new(
                    "pelts",
                    vec![DropEntry::item(1, "pelt", QuantityRange::new(2, 2))],
                ),
            ])
            .build()
            .unwrap();
        let config = EngineConfig::default();
        let summary = |drops: &[ItemDrop]| {
            drops
                .iter()
                .map(|d| (d.instance.item_id.as_str().to_owned(), d.quantity))
                .collect::<Vec<_>>()
        };

        let mut rng = PcgRng::seed_from_u64(11);
        let drops = resolve_drop_tables(
            &catalog,
            &config,
            &[DropTableId::new("pelts"), DropTableId::new("bones")],
            &mut rng,
        );
        assert_eq!(
            summary(&drops),
            vec![("pelt".to_owned(), 2), ("bone".to_owned(), 1)]
        );

        let drops = resolve_drop_tables(
            &catalog,
            &config,
            &[
                DropTableId::new("bones"),
                DropTableId::new("missing"),
                DropTableId::new("pelts"),
            ],
            &mut rng,
        );
        assert_eq!(
            summary(&drops),
            vec![("bone".to_owned(), 1), ("pelt".to_owned(), 2)]
        );
        assert_eq!(drops[0].source_table.as_str(), "bones");
        assert_eq!(drops[1].source_table.as_str(), "pelts");
    }

    #[test]
    fn broken_tables_degrade_to_no_drops() {
        let catalog = catalog();
        let mut rng = PcgRng::seed_from_u64(3);
        let drops = resolve_drop_tables(
            &catalog,
            &EngineConfig::default(),
            &[
                DropTableId::new("missing"),
                DropTableId::new("loop"),
                DropTableId::new("inner"),
            ],
            &mut rng,
        );
        assert_eq!(drops.len(), 1);
    }

    #[test]
    fn stats_report_probabilities() {
        let table = DropTable::new(
            "t",
            vec![
                DropEntry::item(70, "a", QuantityRange::new(1, 2)),
                DropEntry::item(25, "a", QuantityRange::new(2, 4)),
                DropEntry::nothing(5),
            ],
        );
        let stats = drop_table_stats(&table).unwrap();
        assert_eq!(stats.total_weight, 100);
        assert_eq!(stats.entries[2].probability, 0.05);
    }
}
