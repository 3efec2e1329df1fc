//! Stat resolution.
//!
//! Effective stats are layered the same way for items and combatants:
//!
//! ```text
//! [ base definition stats ]
//!      ↓
//! [ skill / attribute scaling ]   (collaborator input)
//!      ↓
//! [ applicator deltas ]           (qualities, traits, innate, passives, buffs)
//!      ↓
//! [ context clamp ]
//! ```
//!
//! Both resolvers are pure: identical inputs always produce identical
//! snapshots, so callers may memoize them keyed by
//! [`Catalog::digest`](crate::Catalog) and the instance.

pub mod combatant;
pub mod item;

pub use combatant::{CombatantStats, WeaponProfile, resolve_combatant_stats};
pub use item::{
    EffectiveStats, SkillScaling, StatContext, effect_breakdown, resolve_effective_stats,
};

use crate::error::{ErrorSeverity, GameError};
use crate::ids::ItemId;

/// Errors raised while resolving stats for an item instance.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StatError {
    #[error("unknown item `{0}`")]
    UnknownItem(ItemId),

    #[error("unknown {kind} `{id}`")]
    UnknownModifier { kind: &'static str, id: String },

    #[error("{kind} `{id}` level {level} outside 1..={max}")]
    LevelOutOfRange {
        kind: &'static str,
        id: String,
        level: u8,
        max: u8,
    },
}

impl GameError for StatError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnknownItem(_) | Self::LevelOutOfRange { .. } => ErrorSeverity::Validation,
            Self::UnknownModifier { .. } => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownItem(_) => "STAT_UNKNOWN_ITEM",
            Self::UnknownModifier { .. } => "STAT_UNKNOWN_MODIFIER",
            Self::LevelOutOfRange { .. } => "STAT_LEVEL_OUT_OF_RANGE",
        }
    }

    fn is_user_actionable(&self) -> bool {
        false
    }
}
