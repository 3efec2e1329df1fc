use std::collections::BTreeMap;

use crate::ids::{DropTableId, ItemId, QualityId};

/// Inclusive quantity range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuantityRange {
    pub min: u32,
    pub max: u32,
}

impl QuantityRange {
    pub const ONE: Self = Self { min: 1, max: 1 };

    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }
}

impl Default for QuantityRange {
    fn default() -> Self {
        Self::ONE
    }
}

/// Quality levels added on top of an item's defaults when it drops.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum QualityBonus {
    /// Added to every quality the item allows.
    Flat(i32),
    /// Added to the named qualities only.
    PerQuality(BTreeMap<QualityId, i32>),
}

impl Default for QualityBonus {
    fn default() -> Self {
        Self::Flat(0)
    }
}

/// What a selected entry yields.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DropOutcome {
    Item {
        item_id: ItemId,
        #[cfg_attr(feature = "serde", serde(default))]
        quantity: QuantityRange,
        #[cfg_attr(feature = "serde", serde(default))]
        quality_bonus: QualityBonus,
    },
    /// Explicit empty roll.
    Nothing,
    /// Roll another table.
    Table(DropTableId),
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DropEntry {
    pub weight: u32,
    pub outcome: DropOutcome,
}

impl DropEntry {
    pub fn item(weight: u32, item_id: impl Into<ItemId>, quantity: QuantityRange) -> Self {
        Self {
            weight,
            outcome: DropOutcome::Item {
                item_id: item_id.into(),
                quantity,
                quality_bonus: QualityBonus::default(),
            },
        }
    }

    pub fn nothing(weight: u32) -> Self {
        Self {
            weight,
            outcome: DropOutcome::Nothing,
        }
    }

    pub fn table(weight: u32, table: impl Into<DropTableId>) -> Self {
        Self {
            weight,
            outcome: DropOutcome::Table(table.into()),
        }
    }

    #[must_use]
    pub fn with_quality_bonus(mut self, bonus: QualityBonus) -> Self {
        if let DropOutcome::Item { quality_bonus, .. } = &mut self.outcome {
            *quality_bonus = bonus;
        }
        self
    }
}

/// Ordered weighted entries. Exactly one entry is selected per roll.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DropTable {
    pub id: DropTableId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: String,
    pub entries: Vec<DropEntry>,
}

impl DropTable {
    pub fn new(id: impl Into<DropTableId>, entries: Vec<DropEntry>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            entries,
        }
    }

    /// Σ weights, or `None` if the sum overflows `u32`.
    pub fn total_weight(&self) -> Option<u32> {
        self.entries
            .iter()
            .try_fold(0u32, |acc, entry| acc.checked_add(entry.weight))
    }
}
