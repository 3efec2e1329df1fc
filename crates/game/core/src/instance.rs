//! Item instances and inventory rows.
//!
//! An [`ItemInstance`] is a value: enchanting or repairing an item produces a
//! new instance instead of mutating the old one. Inventories are owned by the
//! caller; the engine only reads [`InventoryEntry`] snapshots.

use core::fmt;
use std::collections::BTreeMap;

use crate::catalog::ItemDefinition;
use crate::ids::{ItemId, QualityId, TraitId};

/// Caller-assigned identifier of an inventory row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InstanceId(pub u64);

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One concrete copy of an item with its quality and trait levels.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemInstance {
    pub item_id: ItemId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub qualities: BTreeMap<QualityId, u8>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub traits: BTreeMap<TraitId, u8>,
}

impl ItemInstance {
    /// A plain instance with no qualities or traits.
    pub fn new(item_id: impl Into<ItemId>) -> Self {
        Self {
            item_id: item_id.into(),
            qualities: BTreeMap::new(),
            traits: BTreeMap::new(),
        }
    }

    /// An instance carrying the definition's default quality levels.
    pub fn from_definition(definition: &ItemDefinition) -> Self {
        Self {
            item_id: definition.id.clone(),
            qualities: definition
                .default_qualities
                .iter()
                .filter(|(_, level)| **level > 0)
                .map(|(id, level)| (id.clone(), *level))
                .collect(),
            traits: BTreeMap::new(),
        }
    }

    /// Returns a copy with `quality` set to `level`. Level 0 removes it.
    #[must_use]
    pub fn with_quality(&self, quality: impl Into<QualityId>, level: u8) -> Self {
        let mut next = self.clone();
        let quality = quality.into();
        if level == 0 {
            next.qualities.remove(&quality);
        } else {
            next.qualities.insert(quality, level);
        }
        next
    }

    /// Returns a copy with `trait_id` set to `level`. Level 0 removes it.
    #[must_use]
    pub fn with_trait(&self, trait_id: impl Into<TraitId>, level: u8) -> Self {
        let mut next = self.clone();
        let trait_id = trait_id.into();
        if level == 0 {
            next.traits.remove(&trait_id);
        } else {
            next.traits.insert(trait_id, level);
        }
        next
    }

    pub fn quality_level(&self, quality: &str) -> u8 {
        self.qualities.get(quality).copied().unwrap_or(0)
    }

    pub fn trait_level(&self, trait_id: &str) -> u8 {
        self.traits.get(trait_id).copied().unwrap_or(0)
    }

    pub fn total_quality_levels(&self) -> u32 {
        self.qualities.values().map(|l| u32::from(*l)).sum()
    }

    pub fn total_trait_levels(&self) -> u32 {
        self.traits.values().map(|l| u32::from(*l)).sum()
    }
}

/// A stack of identical instances in a caller's inventory.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InventoryEntry {
    pub id: InstanceId,
    pub instance: ItemInstance,
    pub quantity: u32,
}

impl InventoryEntry {
    pub fn new(id: u64, instance: ItemInstance, quantity: u32) -> Self {
        Self {
            id: InstanceId(id),
            instance,
            quantity,
        }
    }
}
