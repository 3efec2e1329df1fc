use std::collections::{BTreeMap, BTreeSet};

use crate::dice::DamageRoll;
use crate::effect::Applicator;
use crate::ids::{ItemId, QualityId, TraitId};

/// Top-level item category, derived from [`ItemKind`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ItemCategory {
    Equipment,
    Consumable,
    Resource,
}

/// Item definition with common fields and category-specific data.
///
/// # Design: Base + Kind Pattern
///
/// - Base struct holds what every item has (id, subcategories, allowed modifiers)
/// - `kind` holds category-specific data (weapon dice, armor rating, restore amounts)
///
/// Definitions are immutable catalog records. Per-copy state (quality and
/// trait levels) lives on [`ItemInstance`](crate::instance::ItemInstance).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemDefinition {
    pub id: ItemId,
    pub name: String,
    /// Tags used by recipe requirements and ability requirements (`herb`, `sword`, `one-handed`).
    #[cfg_attr(feature = "serde", serde(default))]
    pub subcategories: Vec<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub base_value: u32,
    /// Whether identical instances share one inventory row.
    #[cfg_attr(feature = "serde", serde(default))]
    pub stackable: bool,
    pub kind: ItemKind,
    #[cfg_attr(feature = "serde", serde(default))]
    pub allowed_qualities: BTreeSet<QualityId>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub allowed_traits: BTreeSet<TraitId>,
    /// Starting quality levels for fresh instances.
    #[cfg_attr(feature = "serde", serde(default))]
    pub default_qualities: BTreeMap<QualityId, u8>,
}

impl ItemDefinition {
    pub fn new(id: impl Into<ItemId>, name: impl Into<String>, kind: ItemKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            subcategories: Vec::new(),
            base_value: 0,
            stackable: false,
            kind,
            allowed_qualities: BTreeSet::new(),
            allowed_traits: BTreeSet::new(),
            default_qualities: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_subcategories<S: Into<String>>(mut self, tags: impl IntoIterator<Item = S>) -> Self {
        self.subcategories.extend(tags.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn allow_quality(mut self, quality: impl Into<QualityId>, default_level: u8) -> Self {
        let quality = quality.into();
        if default_level > 0 {
            self.default_qualities.insert(quality.clone(), default_level);
        }
        self.allowed_qualities.insert(quality);
        self
    }

    #[must_use]
    pub fn allow_trait(mut self, trait_id: impl Into<TraitId>) -> Self {
        self.allowed_traits.insert(trait_id.into());
        self
    }

    pub fn category(&self) -> ItemCategory {
        match self.kind {
            ItemKind::Equipment(_) => ItemCategory::Equipment,
            ItemKind::Consumable(_) => ItemCategory::Consumable,
            ItemKind::Resource(_) => ItemCategory::Resource,
        }
    }

    pub fn equipment(&self) -> Option<&EquipmentData> {
        match &self.kind {
            ItemKind::Equipment(data) => Some(data),
            _ => None,
        }
    }

    pub fn has_subcategory(&self, tag: &str) -> bool {
        self.subcategories.iter().any(|s| s == tag)
    }

    /// Qualities a flat bonus applies to: the allowed set, or the defaults
    /// when the definition lists no allowed qualities.
    pub fn bonus_qualities(&self) -> impl Iterator<Item = &QualityId> {
        let use_allowed = !self.allowed_qualities.is_empty();
        self.allowed_qualities
            .iter()
            .filter(move |_| use_allowed)
            .chain(self.default_qualities.keys().filter(move |_| !use_allowed))
    }
}

/// Category-specific item data.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemKind {
    /// Weapons, armor and tools.
    Equipment(EquipmentData),

    /// Potions, food, scrolls.
    Consumable(ConsumableData),

    /// Crafting materials.
    Resource(ResourceData),
}

/// Where an equipment item is worn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EquipmentSlot {
    MainHand,
    OffHand,
    Head,
    Body,
    Hands,
    Legs,
    Feet,
    Neck,
    Ring,
    Tool,
}

/// Equipment-specific data.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EquipmentData {
    pub slot: EquipmentSlot,
    #[cfg_attr(feature = "serde", serde(default))]
    pub weight: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub tier: u8,
    /// Present on weapons.
    #[cfg_attr(feature = "serde", serde(default))]
    pub damage_roll: Option<DamageRoll>,
    /// Seconds between attacks.
    #[cfg_attr(feature = "serde", serde(default))]
    pub attack_speed: Option<f64>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub crit_chance: f64,
    /// Skill that scales this weapon's damage (`oneHanded`, `ranged`).
    #[cfg_attr(feature = "serde", serde(default))]
    pub skill_scalar: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub armor: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub evasion: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub required_level: u32,
    /// Innate applicators active whenever the item is equipped.
    #[cfg_attr(
        feature = "serde",
        serde(default, deserialize_with = "crate::effect::lenient::applicators")
    )]
    pub applicators: Vec<Applicator>,
}

impl EquipmentData {
    pub fn new(slot: EquipmentSlot) -> Self {
        Self {
            slot,
            weight: 0,
            tier: 0,
            damage_roll: None,
            attack_speed: None,
            crit_chance: 0.0,
            skill_scalar: None,
            armor: 0.0,
            evasion: 0.0,
            required_level: 0,
            applicators: Vec::new(),
        }
    }

    /// A main-hand weapon.
    pub fn weapon(damage_roll: DamageRoll, skill_scalar: impl Into<String>) -> Self {
        Self {
            damage_roll: Some(damage_roll),
            skill_scalar: Some(skill_scalar.into()),
            ..Self::new(EquipmentSlot::MainHand)
        }
    }

    pub fn is_weapon(&self) -> bool {
        self.damage_roll.is_some()
    }
}

/// Consumable-specific data.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConsumableData {
    #[cfg_attr(feature = "serde", serde(default))]
    pub restore_health: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub restore_mana: u32,
}

/// Resource-specific data.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceData {
    #[cfg_attr(feature = "serde", serde(default))]
    pub tier: u8,
}
