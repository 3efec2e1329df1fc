//! Common error infrastructure for outcome-core.
//!
//! Domain-specific errors (`MalformedRollError`, `LootError`, `CraftError`,
//! `CombatError`, ...) live next to the resolvers that produce them. This
//! module holds the shared classification every one of them implements.
//!
//! Two families matter to callers:
//!
//! - **User-actionable rejections** (not enough mana, ability on cooldown,
//!   missing ingredients, recipe locked, skill too low) are returned as typed
//!   errors with a readable message for the caller to surface.
//! - **Content-integrity errors** (degenerate drop table, malformed damage
//!   roll, dangling catalog references) fail loudly during offline validation
//!   and degrade to a safe default at runtime.

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: the same request may succeed later (cooldown expires, mana regenerates)
/// - **Validation**: the request itself is invalid and should not be retried unchanged
/// - **Internal**: inputs disagree with each other in a way that indicates a caller bug
/// - **Fatal**: the content catalog is broken and must be fixed offline
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Can retry with the same or an alternative request.
    ///
    /// Examples: ability on cooldown, insufficient mana
    Recoverable,

    /// Invalid request, should not retry without changes.
    ///
    /// Examples: missing ingredients, recipe locked
    Validation,

    /// Unexpected inconsistency between caller-supplied inputs.
    ///
    /// Examples: allocation references an instance missing from the inventory
    Internal,

    /// Content is corrupt and cannot be resolved.
    ///
    /// Examples: drop table with zero total weight, unparseable damage roll
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates broken content or a caller bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all outcome-core errors.
///
/// # Implementation Guidelines
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Codes are stable and safe to match on in callers and tests.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }

    /// Returns true if the player can act on this error (retry later, gather more, level up).
    fn is_user_actionable(&self) -> bool {
        matches!(
            self.severity(),
            ErrorSeverity::Recoverable | ErrorSeverity::Validation
        )
    }
}
