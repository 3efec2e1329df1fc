//! Combat resolution system.
//!
//! This module provides pure functions for resolving combat interactions.
//! A round takes both combatant states by reference and returns the updated
//! copies; nothing here mutates caller state or holds state between calls.
//!
//! # Architecture
//!
//! - **Exchange**: [`resolve_attack`] turns two resolved stat snapshots into
//!   one [`AttackResult`] (damage roll, crit, dodge, armor)
//! - **Round**: [`resolve_combat_round`] validates and pays for the actor's
//!   action, runs both exchanges, and ticks cooldowns and buffs
//! - **Encounter**: [`Encounter`] chains rounds against one monster and
//!   hands out rewards on victory
//!
//! # Phases
//!
//! ```text
//! AttackWindow -> HitCheck -> DamageApplication -> CooldownTick -> AttackWindow
//!                                    |
//!                                    +-> Resolved(Victory | Defeat | Fled)
//! ```

pub mod damage;
mod encounter;
pub mod hit;
pub mod result;
mod round;
pub mod state;

pub use damage::{DamageBreakdown, apply_damage, mitigate};
pub use encounter::{Encounter, Rewards};
pub use hit::{check_dodge, roll_crit};
pub use result::{AttackOutcome, AttackResult, resolve_attack};
pub use round::{
    CombatAction, CombatContext, CombatLogEntry, CombatOutcome, CombatPhase, Exchange, LogKind,
    RoundResult, Side, resolve_combat_round,
};
pub use state::{ActiveBuff, CombatantKind, CombatantState, ResourceMeter};

use crate::error::{ErrorSeverity, GameError};
use crate::ids::{AbilityId, MonsterId};

/// Rejections of a combat action.
///
/// A rejected action leaves both combatants unchanged.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CombatError {
    #[error("{ability} needs {required} mana, {available} available")]
    InsufficientMana {
        ability: AbilityId,
        required: u32,
        available: u32,
    },

    #[error("{ability} is on cooldown for {remaining} more rounds")]
    OnCooldown { ability: AbilityId, remaining: u32 },

    #[error("cannot use {ability}: {reason}")]
    RequirementsNotMet { ability: AbilityId, reason: String },

    #[error("ability `{0}` is not known")]
    UnknownAbility(AbilityId),

    #[error("monster `{0}` not found")]
    UnknownMonster(MonsterId),

    #[error("the encounter is already resolved")]
    EncounterResolved,
}

impl GameError for CombatError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::InsufficientMana { .. } | Self::OnCooldown { .. } => ErrorSeverity::Recoverable,
            Self::RequirementsNotMet { .. } | Self::UnknownAbility(_) => ErrorSeverity::Validation,
            Self::UnknownMonster(_) => ErrorSeverity::Fatal,
            Self::EncounterResolved => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InsufficientMana { .. } => "COMBAT_INSUFFICIENT_MANA",
            Self::OnCooldown { .. } => "COMBAT_ON_COOLDOWN",
            Self::RequirementsNotMet { .. } => "COMBAT_REQUIREMENTS_NOT_MET",
            Self::UnknownAbility(_) => "COMBAT_UNKNOWN_ABILITY",
            Self::UnknownMonster(_) => "COMBAT_UNKNOWN_MONSTER",
            Self::EncounterResolved => "COMBAT_ENCOUNTER_RESOLVED",
        }
    }
}
