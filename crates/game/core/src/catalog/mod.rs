//! Immutable content catalog.
//!
//! Every definition the engine reads (items, qualities, traits, abilities,
//! passives, monsters, recipes, drop tables) lives in one [`Catalog`] built
//! once at startup and passed by reference into each resolver. There are no
//! global registries.

mod abilities;
mod drops;
mod items;
mod modifiers;
mod monsters;
mod recipes;
mod validate;

pub use abilities::{
    Ability, AbilityKind, AbilityRequirements, BuffSpec, PassiveAbility, PassiveTrigger,
};
pub use drops::{DropEntry, DropOutcome, DropTable, QualityBonus, QuantityRange};
pub use items::{
    ConsumableData, EquipmentData, EquipmentSlot, ItemCategory, ItemDefinition, ItemKind,
    ResourceData,
};
pub use modifiers::{LevelEffects, ModifierDefinition};
pub use monsters::{CombatRatings, GoldRange, Monster, NaturalWeapon, SkillLevel};
pub use recipes::{
    Ingredient, IngredientMatch, QualityPolicy, Recipe, RecipeOutput, UnlockConditions,
};
pub use validate::{CatalogIssue, IssueSeverity};

use std::collections::BTreeMap;

use crate::effect::{EffectSource, SourcedApplicator};
use crate::error::{ErrorSeverity, GameError};
use crate::ids::{AbilityId, DropTableId, ItemId, MonsterId, PassiveId, QualityId, RecipeId, TraitId};
use crate::instance::ItemInstance;

pub type QualityDefinition = ModifierDefinition<QualityId>;
pub type TraitDefinition = ModifierDefinition<TraitId>;

/// Errors raised while assembling a catalog.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("duplicate {kind} id `{id}`")]
    DuplicateId { kind: &'static str, id: String },

    #[error("catalog encoding failed: {0}")]
    Encoding(String),
}

impl GameError for CatalogError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::DuplicateId { .. } => ErrorSeverity::Fatal,
            Self::Encoding(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateId { .. } => "CATALOG_DUPLICATE_ID",
            Self::Encoding(_) => "CATALOG_ENCODING",
        }
    }
}

/// Read-only content for one engine lifetime.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Catalog {
    items: BTreeMap<ItemId, ItemDefinition>,
    qualities: BTreeMap<QualityId, QualityDefinition>,
    traits: BTreeMap<TraitId, TraitDefinition>,
    abilities: BTreeMap<AbilityId, Ability>,
    passives: BTreeMap<PassiveId, PassiveAbility>,
    monsters: BTreeMap<MonsterId, Monster>,
    recipes: BTreeMap<RecipeId, Recipe>,
    drop_tables: BTreeMap<DropTableId, DropTable>,
}

impl Catalog {
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    pub fn item(&self, id: &str) -> Option<&ItemDefinition> {
        self.items.get(id)
    }

    pub fn quality(&self, id: &str) -> Option<&QualityDefinition> {
        self.qualities.get(id)
    }

    pub fn trait_def(&self, id: &str) -> Option<&TraitDefinition> {
        self.traits.get(id)
    }

    pub fn ability(&self, id: &str) -> Option<&Ability> {
        self.abilities.get(id)
    }

    pub fn passive(&self, id: &str) -> Option<&PassiveAbility> {
        self.passives.get(id)
    }

    pub fn monster(&self, id: &str) -> Option<&Monster> {
        self.monsters.get(id)
    }

    pub fn recipe(&self, id: &str) -> Option<&Recipe> {
        self.recipes.get(id)
    }

    pub fn drop_table(&self, id: &str) -> Option<&DropTable> {
        self.drop_tables.get(id)
    }

    pub fn items(&self) -> impl Iterator<Item = &ItemDefinition> {
        self.items.values()
    }

    pub fn qualities(&self) -> impl Iterator<Item = &QualityDefinition> {
        self.qualities.values()
    }

    pub fn traits(&self) -> impl Iterator<Item = &TraitDefinition> {
        self.traits.values()
    }

    pub fn abilities(&self) -> impl Iterator<Item = &Ability> {
        self.abilities.values()
    }

    pub fn passives(&self) -> impl Iterator<Item = &PassiveAbility> {
        self.passives.values()
    }

    pub fn monsters(&self) -> impl Iterator<Item = &Monster> {
        self.monsters.values()
    }

    pub fn recipes(&self) -> impl Iterator<Item = &Recipe> {
        self.recipes.values()
    }

    pub fn drop_tables(&self) -> impl Iterator<Item = &DropTable> {
        self.drop_tables.values()
    }

    /// Collects the applicators an instance carries: innate equipment
    /// applicators, then quality levels, then trait levels.
    ///
    /// References the catalog cannot resolve are skipped with a warning.
    pub fn applicators_for(&self, instance: &ItemInstance) -> Vec<SourcedApplicator> {
        let mut out = Vec::new();

        let Some(definition) = self.item(instance.item_id.as_str()) else {
            tracing::warn!(item = %instance.item_id, "unknown item, no applicators");
            return out;
        };

        if let Some(equipment) = definition.equipment() {
            out.extend(equipment.applicators.iter().map(|applicator| {
                SourcedApplicator::new(
                    EffectSource::Innate {
                        item: definition.id.clone(),
                    },
                    applicator.clone(),
                )
            }));
        }

        for (id, level) in &instance.qualities {
            match self.quality(id.as_str()).and_then(|q| q.level(*level)) {
                Some(effects) => out.extend(effects.applicators.iter().map(|applicator| {
                    SourcedApplicator::new(
                        EffectSource::Quality {
                            id: id.clone(),
                            level: *level,
                        },
                        applicator.clone(),
                    )
                })),
                None => tracing::warn!(quality = %id, level, "no effects defined for quality level"),
            }
        }

        for (id, level) in &instance.traits {
            match self.trait_def(id.as_str()).and_then(|t| t.level(*level)) {
                Some(effects) => out.extend(effects.applicators.iter().map(|applicator| {
                    SourcedApplicator::new(
                        EffectSource::Trait {
                            id: id.clone(),
                            level: *level,
                        },
                        applicator.clone(),
                    )
                })),
                None => tracing::warn!(trait_id = %id, level, "no effects defined for trait level"),
            }
        }

        out
    }

    /// Applicators granted by a passive ability.
    pub fn passive_applicators(&self, id: &PassiveId) -> Vec<SourcedApplicator> {
        let Some(passive) = self.passive(id.as_str()) else {
            tracing::warn!(passive = %id, "unknown passive ability");
            return Vec::new();
        };
        passive
            .applicators
            .iter()
            .map(|applicator| {
                SourcedApplicator::new(EffectSource::Passive { id: id.clone() }, applicator.clone())
            })
            .collect()
    }

    /// SHA-256 of the catalog's bincode encoding.
    ///
    /// Identical content yields the same digest, so callers can key memoized
    /// stat snapshots by it.
    #[cfg(feature = "serde")]
    pub fn digest(&self) -> Result<[u8; 32], CatalogError> {
        use sha2::{Digest, Sha256};

        let bytes = bincode::serialize(self).map_err(|e| CatalogError::Encoding(e.to_string()))?;
        Ok(Sha256::digest(&bytes).into())
    }
}

/// Assembles a [`Catalog`], rejecting duplicate ids and normalizing legacy
/// effect fields into applicators.
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    catalog: Catalog,
    duplicates: Vec<CatalogError>,
}

macro_rules! builder_section {
    ($one:ident, $many:ident, $field:ident, $ty:ty, $kind:literal) => {
        pub fn $one(mut self, definition: $ty) -> Self {
            let key = definition.id.clone();
            if self.catalog.$field.contains_key(&key) {
                self.duplicates.push(CatalogError::DuplicateId {
                    kind: $kind,
                    id: key.to_string(),
                });
            } else {
                self.catalog.$field.insert(key, definition);
            }
            self
        }

        pub fn $many(self, definitions: impl IntoIterator<Item = $ty>) -> Self {
            definitions.into_iter().fold(self, Self::$one)
        }
    };
}

impl CatalogBuilder {
    builder_section!(item, items, items, ItemDefinition, "item");
    builder_section!(quality, qualities, qualities, QualityDefinition, "quality");
    builder_section!(trait_def, traits, traits, TraitDefinition, "trait");
    builder_section!(ability, abilities, abilities, Ability, "ability");
    builder_section!(passive, passives, passives, PassiveAbility, "passive");
    builder_section!(monster, monsters, monsters, Monster, "monster");
    builder_section!(recipe, recipes, recipes, Recipe, "recipe");
    builder_section!(drop_table, drop_tables, drop_tables, DropTable, "drop table");

    /// Finishes the catalog. Fails on the first duplicate id.
    pub fn build(mut self) -> Result<Catalog, CatalogError> {
        if let Some(duplicate) = self.duplicates.into_iter().next() {
            return Err(duplicate);
        }
        for quality in self.catalog.qualities.values_mut() {
            quality.normalize();
        }
        for trait_def in self.catalog.traits.values_mut() {
            trait_def.normalize();
        }
        for passive in self.catalog.passives.values_mut() {
            passive.normalize();
        }
        Ok(self.catalog)
    }
}
