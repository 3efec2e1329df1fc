//! Applicator evaluation with provenance.

use core::fmt;

use super::condition::{Condition, Situation};
use super::stack::{ModifierStack, ModifierTotals};
use super::{Applicator, EffectContext, ModifierType};
use crate::ids::{ItemId, PassiveId, QualityId, TraitId};

/// Where an applicator came from.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectSource {
    Quality { id: QualityId, level: u8 },
    Trait { id: TraitId, level: u8 },
    /// Property of the item definition itself.
    Innate { item: ItemId },
    Passive { id: PassiveId },
    Buff { name: String },
}

impl fmt::Display for EffectSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Quality { id, level } => write!(f, "quality {id} L{level}"),
            Self::Trait { id, level } => write!(f, "trait {id} L{level}"),
            Self::Innate { item } => write!(f, "item {item}"),
            Self::Passive { id } => write!(f, "passive {id}"),
            Self::Buff { name } => write!(f, "buff {name}"),
        }
    }
}

/// An applicator tagged with its source.
#[derive(Clone, Debug, PartialEq)]
pub struct SourcedApplicator {
    pub source: EffectSource,
    pub applicator: Applicator,
}

impl SourcedApplicator {
    pub fn new(source: EffectSource, applicator: Applicator) -> Self {
        Self { source, applicator }
    }
}

/// An applicator that contributed to the delta.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AppliedEffect {
    pub source: EffectSource,
    pub modifier_type: ModifierType,
    pub value: f64,
}

/// Why a matching applicator did not contribute.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SkipReason {
    ConditionNotMet(Condition),
}

/// An applicator for the evaluated context that was left out.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkippedEffect {
    pub source: EffectSource,
    pub reason: SkipReason,
}

/// Aggregated modifiers for one context.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectDelta {
    pub context: EffectContext,
    pub totals: ModifierTotals,
    pub applied: Vec<AppliedEffect>,
    pub skipped: Vec<SkippedEffect>,
}

impl EffectDelta {
    pub fn empty(context: EffectContext) -> Self {
        Self {
            context,
            totals: ModifierTotals::IDENTITY,
            applied: Vec::new(),
            skipped: Vec::new(),
        }
    }

    /// Applies the delta to `base`, clamped to the context's bounds.
    pub fn apply(&self, base: f64) -> f64 {
        self.context.bounds().clamp(self.totals.apply(base))
    }

    /// Sum of flat modifiers.
    pub fn flat(&self) -> f64 {
        self.totals.flat
    }

    pub fn is_empty(&self) -> bool {
        self.applied.is_empty()
    }
}

/// Aggregates every applicator for `context` whose condition holds.
///
/// Applicators for other contexts are ignored silently. Matching applicators
/// whose condition fails are recorded in [`EffectDelta::skipped`].
pub fn evaluate<'a>(
    applicators: impl IntoIterator<Item = &'a SourcedApplicator>,
    context: EffectContext,
    situation: &Situation,
) -> EffectDelta {
    let mut delta = EffectDelta::empty(context);
    let mut stack = ModifierStack::new();

    for sourced in applicators {
        let applicator = &sourced.applicator;
        if applicator.context != context {
            continue;
        }
        if !applicator.condition.is_met(situation) {
            delta.skipped.push(SkippedEffect {
                source: sourced.source.clone(),
                reason: SkipReason::ConditionNotMet(applicator.condition.clone()),
            });
            continue;
        }
        stack.add(applicator.as_modifier());
        delta.applied.push(AppliedEffect {
            source: sourced.source.clone(),
            modifier_type: applicator.modifier_type,
            value: applicator.value,
        });
    }

    delta.totals = stack.totals();
    delta
}
