//! Modifier stacking.
//!
//! Stack order: Flat → Percentage → Multiplier → Clamp.
//!
//! Every evaluated context uses this order, so "+2 damage" from a trait and
//! "+20% damage" from a buff always combine as `(base + 2) × 1.2`.

use super::ContextBounds;

/// A single modifier value, already separated by stacking layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Modifier {
    /// Added to the base (summed with other flats).
    Flat(f64),
    /// Decimal increase, summed with other percentages then applied once.
    Percentage(f64),
    /// Factor applied sequentially after percentages.
    Multiplier(f64),
}

/// A collection of modifiers applied in a fixed order.
///
/// # Example
/// ```
/// # use outcome_core::effect::ModifierStack;
/// let stack = ModifierStack::new().flat(5.0).percentage(0.5).multiplier(2.0);
/// // (10 + 5) × 1.5 × 2 = 45
/// assert_eq!(stack.apply_unclamped(10.0), 45.0);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ModifierStack {
    modifiers: Vec<Modifier>,
}

/// Summed terms of a stack.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModifierTotals {
    pub flat: f64,
    pub percentage: f64,
    pub multiplier: f64,
}

impl ModifierTotals {
    pub const IDENTITY: Self = Self {
        flat: 0.0,
        percentage: 0.0,
        multiplier: 1.0,
    };

    /// `(base + flat) × (1 + percentage) × multiplier`
    pub fn apply(&self, base: f64) -> f64 {
        (base + self.flat) * (1.0 + self.percentage) * self.multiplier
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

impl Default for ModifierTotals {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ModifierStack {
    pub fn new() -> Self {
        Self {
            modifiers: Vec::new(),
        }
    }

    pub fn add(&mut self, modifier: Modifier) {
        self.modifiers.push(modifier);
    }

    pub fn extend(&mut self, modifiers: impl IntoIterator<Item = Modifier>) {
        self.modifiers.extend(modifiers);
    }

    /// Folds the stack into its summed terms.
    pub fn totals(&self) -> ModifierTotals {
        self.modifiers
            .iter()
            .fold(ModifierTotals::IDENTITY, |mut totals, modifier| {
                match *modifier {
                    Modifier::Flat(v) => totals.flat += v,
                    Modifier::Percentage(v) => totals.percentage += v,
                    Modifier::Multiplier(v) => totals.multiplier *= v,
                }
                totals
            })
    }

    /// Applies the stack to `base` and clamps into `bounds`.
    pub fn apply(&self, base: f64, bounds: ContextBounds) -> f64 {
        bounds.clamp(self.totals().apply(base))
    }

    pub fn apply_unclamped(&self, base: f64) -> f64 {
        self.totals().apply(base)
    }

    pub fn is_empty(&self) -> bool {
        self.modifiers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.modifiers.len()
    }
}

impl ModifierStack {
    /// Add a flat modifier (builder pattern)
    pub fn flat(mut self, value: f64) -> Self {
        self.add(Modifier::Flat(value));
        self
    }

    /// Add a percentage modifier (builder pattern)
    pub fn percentage(mut self, value: f64) -> Self {
        self.add(Modifier::Percentage(value));
        self
    }

    /// Add a multiplier (builder pattern)
    pub fn multiplier(mut self, value: f64) -> Self {
        self.add(Modifier::Multiplier(value));
        self
    }
}

impl FromIterator<Modifier> for ModifierStack {
    fn from_iter<I: IntoIterator<Item = Modifier>>(iter: I) -> Self {
        Self {
            modifiers: iter.into_iter().collect(),
        }
    }
}
