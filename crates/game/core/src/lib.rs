//! Deterministic stat, effect and outcome resolution for the game backend.
//!
//! `outcome-core` computes effective item and combatant stats from stacked
//! quality/trait applicators, rolls dice-notation damage, resolves combat
//! rounds, weighted loot tables and crafting allocations. Every entry point is
//! a pure function over an immutable [`Catalog`], an [`EngineConfig`] and,
//! where randomness is involved, a caller-injected [`RngOracle`]. The engine
//! performs no I/O and keeps no state between calls.
pub mod catalog;
pub mod combat;
pub mod config;
pub mod craft;
pub mod dice;
pub mod effect;
pub mod error;
pub mod ids;
pub mod instance;
pub mod loot;
pub mod rng;
pub mod stats;

pub use catalog::{
    Ability, AbilityKind, AbilityRequirements, BuffSpec, Catalog, CatalogBuilder, CatalogError,
    CatalogIssue, DropEntry, DropOutcome, DropTable, EquipmentData, EquipmentSlot, Ingredient,
    IngredientMatch, IssueSeverity, ItemCategory, ItemDefinition, ItemKind, LevelEffects,
    ModifierDefinition, Monster, NaturalWeapon, PassiveAbility, PassiveTrigger, QualityBonus,
    QualityDefinition, QualityPolicy, QuantityRange, Recipe, SkillLevel, TraitDefinition,
};
pub use combat::{
    AttackOutcome, AttackResult, CombatAction, CombatContext, CombatError, CombatLogEntry,
    CombatOutcome, CombatPhase, CombatantState, Encounter, Exchange, LogKind, ResourceMeter,
    Rewards, RoundResult, Side, resolve_combat_round,
};
pub use config::EngineConfig;
pub use craft::{
    Allocation, CraftError, CraftResult, CrafterProfile, ScoreWeights, craft, match_ingredients,
    quality_score,
};
pub use dice::{DamageRange, DamageResult, DamageRoll, MalformedRollError, roll_damage};
pub use effect::{
    Applicator, Condition, EffectContext, EffectDelta, EffectError, EffectSource, ModifierType,
    Situation, SourcedApplicator, evaluate,
};
pub use error::{ErrorSeverity, GameError};
pub use ids::{AbilityId, DropTableId, ItemId, MonsterId, PassiveId, QualityId, RecipeId, TraitId};
pub use instance::{InstanceId, InventoryEntry, ItemInstance};
pub use loot::{
    DropTableStats, ItemDrop, LootError, drop_table_stats, resolve_drop_table,
    resolve_drop_tables, select_entry,
};
pub use rng::{PcgRng, RngOracle, derive_seed};
pub use stats::{
    CombatantStats, EffectiveStats, SkillScaling, StatContext, StatError, WeaponProfile,
    resolve_combatant_stats, resolve_effective_stats,
};
