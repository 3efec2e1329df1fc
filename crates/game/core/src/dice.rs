//! Dice-notation damage rolls.
//!
//! Two forms are accepted:
//!
//! - `NdM`, optionally followed by a signed modifier (`"2d6 +3"`, `"1d4-1"`)
//! - `V (Unarmed)`, a fixed damage marker used when no weapon is equipped
//!
//! Rolling draws `N` independent integers in `[1, M]`, adds the modifier and
//! floors the total at zero.

use core::fmt;
use core::str::FromStr;

use crate::config::EngineConfig;
use crate::error::{ErrorSeverity, GameError};
use crate::rng::RngOracle;

const UNARMED_SUFFIX: &str = "(Unarmed)";

/// Damage roll that could not be parsed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MalformedRollError {
    #[error("damage roll `{0}` matches neither `NdM[+K]` nor `V (Unarmed)`")]
    Syntax(String),

    #[error("damage roll `{0}` rolls zero dice")]
    ZeroDice(String),

    #[error("damage roll `{0}` uses zero-sided dice")]
    ZeroSides(String),

    #[error("damage roll `{0}` exceeds {max_dice} dice of at most {max_sides} sides", max_dice = EngineConfig::MAX_DICE, max_sides = EngineConfig::MAX_DIE_SIDES)]
    TooLarge(String),
}

impl GameError for MalformedRollError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Syntax(_) => "ROLL_SYNTAX",
            Self::ZeroDice(_) => "ROLL_ZERO_DICE",
            Self::ZeroSides(_) => "ROLL_ZERO_SIDES",
            Self::TooLarge(_) => "ROLL_TOO_LARGE",
        }
    }
}

/// Parsed damage roll.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub enum DamageRoll {
    /// `count` dice with `sides` faces plus a flat `modifier`.
    Dice { count: u32, sides: u32, modifier: i32 },
    /// Fixed damage with no weapon equipped. Rendered as `"V (Unarmed)"`.
    Unarmed(u32),
}

/// Closed interval of possible roll totals plus the expected value.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageRange {
    pub min: u32,
    pub max: u32,
    pub avg: f64,
}

impl DamageRange {
    pub const ZERO: Self = Self {
        min: 0,
        max: 0,
        avg: 0.0,
    };

    /// Shifts every bound by a flat amount, flooring at zero.
    pub fn shifted(self, delta: i64) -> Self {
        let shift = |v: u32| (i64::from(v) + delta).max(0) as u32;
        Self {
            min: shift(self.min),
            max: shift(self.max),
            avg: (self.avg + delta as f64).max(0.0),
        }
    }
}

/// Outcome of one damage roll with the individual dice kept for combat logs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageResult {
    pub total: u32,
    pub dice: Vec<u32>,
    pub modifier: i32,
}

impl DamageRoll {
    /// The fallback used when a combatant has no weapon.
    pub const UNARMED: Self = Self::Unarmed(1);

    pub fn dice(count: u32, sides: u32, modifier: i32) -> Self {
        Self::Dice {
            count,
            sides,
            modifier,
        }
    }

    /// Parses `"NdM"`, `"NdM +K"`, `"NdM-K"` or `"V (Unarmed)"`.
    pub fn parse(input: &str) -> Result<Self, MalformedRollError> {
        let text = input.trim();
        let syntax = || MalformedRollError::Syntax(input.to_owned());

        if let Some(value) = text.strip_suffix(UNARMED_SUFFIX) {
            let value = parse_digits(value.trim()).ok_or_else(syntax)?;
            return Ok(Self::Unarmed(value));
        }

        let (count, rest) = text.split_once('d').ok_or_else(syntax)?;
        let count = parse_digits(count).ok_or_else(syntax)?;

        let (sides, modifier) = match rest.find(|c: char| c == '+' || c == '-') {
            Some(pos) => {
                let sign = if rest[pos..].starts_with('-') { -1 } else { 1 };
                let magnitude = parse_digits(rest[pos + 1..].trim_start()).ok_or_else(syntax)?;
                let magnitude = i32::try_from(magnitude).map_err(|_| syntax())?;
                (rest[..pos].trim_end(), sign * magnitude)
            }
            None => (rest, 0),
        };
        let sides = parse_digits(sides).ok_or_else(syntax)?;

        if count == 0 {
            return Err(MalformedRollError::ZeroDice(input.to_owned()));
        }
        if sides == 0 {
            return Err(MalformedRollError::ZeroSides(input.to_owned()));
        }
        if count > EngineConfig::MAX_DICE || sides > EngineConfig::MAX_DIE_SIDES {
            return Err(MalformedRollError::TooLarge(input.to_owned()));
        }

        Ok(Self::Dice {
            count,
            sides,
            modifier,
        })
    }

    /// `{min = N + K, max = N*M + K, avg = N*(M+1)/2 + K}`, floored at zero.
    pub fn range(&self) -> DamageRange {
        match *self {
            Self::Dice {
                count,
                sides,
                modifier,
            } => {
                let count = i64::from(count);
                let sides = i64::from(sides);
                let modifier = i64::from(modifier);
                DamageRange {
                    min: (count + modifier).max(0) as u32,
                    max: (count * sides + modifier).max(0) as u32,
                    avg: (count as f64 * (sides + 1) as f64 / 2.0 + modifier as f64).max(0.0),
                }
            }
            Self::Unarmed(value) => DamageRange {
                min: value,
                max: value,
                avg: f64::from(value),
            },
        }
    }

    /// Rolls and returns the floored total.
    pub fn roll(&self, rng: &mut impl RngOracle) -> u32 {
        self.roll_detailed(rng).total
    }

    /// Rolls and keeps each die.
    pub fn roll_detailed(&self, rng: &mut impl RngOracle) -> DamageResult {
        match *self {
            Self::Dice {
                count,
                sides,
                modifier,
            } => {
                let dice: Vec<u32> = (0..count).map(|_| rng.range(1, sides)).collect();
                let sum: i64 = dice.iter().map(|d| i64::from(*d)).sum();
                DamageResult {
                    total: (sum + i64::from(modifier)).max(0) as u32,
                    dice,
                    modifier,
                }
            }
            Self::Unarmed(value) => DamageResult {
                total: value,
                dice: Vec::new(),
                modifier: 0,
            },
        }
    }

    pub fn is_unarmed(&self) -> bool {
        matches!(self, Self::Unarmed(_))
    }
}

/// Parses and rolls a damage string.
///
/// Malformed content degrades to zero damage so a live encounter keeps
/// running; offline validation is where malformed rolls fail loudly.
pub fn roll_damage(roll: &str, rng: &mut impl RngOracle) -> DamageResult {
    match DamageRoll::parse(roll) {
        Ok(parsed) => parsed.roll_detailed(rng),
        Err(err) => {
            tracing::error!(roll, code = err.error_code(), "malformed damage roll, dealing 0");
            DamageResult::default()
        }
    }
}

fn parse_digits(text: &str) -> Option<u32> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

impl fmt::Display for DamageRoll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Dice {
                count,
                sides,
                modifier: 0,
            } => write!(f, "{count}d{sides}"),
            Self::Dice {
                count,
                sides,
                modifier,
            } if modifier > 0 => write!(f, "{count}d{sides} +{modifier}"),
            Self::Dice {
                count,
                sides,
                modifier,
            } => write!(f, "{count}d{sides} -{}", modifier.unsigned_abs()),
            Self::Unarmed(value) => write!(f, "{value} {UNARMED_SUFFIX}"),
        }
    }
}

impl FromStr for DamageRoll {
    type Err = MalformedRollError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for DamageRoll {
    type Error = MalformedRollError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<DamageRoll> for String {
    fn from(roll: DamageRoll) -> Self {
        roll.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::PcgRng;

    #[test]
    fn parses_plain_and_modified_dice() {
        assert_eq!(DamageRoll::parse("1d4"), Ok(DamageRoll::dice(1, 4, 0)));
        assert_eq!(DamageRoll::parse("2d6 +3"), Ok(DamageRoll::dice(2, 6, 3)));
        assert_eq!(DamageRoll::parse("2d4+2"), Ok(DamageRoll::dice(2, 4, 2)));
        assert_eq!(DamageRoll::parse("3d8 -2"), Ok(DamageRoll::dice(3, 8, -2)));
    }

    #[test]
    fn parses_unarmed_marker() {
        let roll = DamageRoll::parse("1 (Unarmed)").unwrap();
        assert_eq!(roll, DamageRoll::UNARMED);
        assert_eq!(roll.to_string(), "1 (Unarmed)");
        assert_eq!(
            roll.range(),
            DamageRange {
                min: 1,
                max: 1,
                avg: 1.0
            }
        );
    }

    #[test]
    fn rejects_malformed_rolls() {
        assert!(matches!(
            DamageRoll::parse("0d6"),
            Err(MalformedRollError::ZeroDice(_))
        ));
        assert!(matches!(
            DamageRoll::parse("2d0"),
            Err(MalformedRollError::ZeroSides(_))
        ));
        for bad in ["", "d6", "2d", "2x6", "two d six", "2d6+", "2d+6", "-1d6", "1d6 (Unarmed)"] {
            assert!(
                matches!(DamageRoll::parse(bad), Err(MalformedRollError::Syntax(_))),
                "{bad} should be a syntax error"
            );
        }
    }

    #[test]
    fn range_matches_formula() {
        let range = DamageRoll::dice(2, 6, 3).range();
        assert_eq!((range.min, range.max), (5, 15));
        assert!((range.avg - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn negative_modifier_floors_at_zero() {
        let roll = DamageRoll::dice(1, 2, -5);
        assert_eq!(roll.range().max, 0);
        let mut rng = PcgRng::seed_from_u64(11);
        for _ in 0..50 {
            assert_eq!(roll.roll(&mut rng), 0);
        }
    }

    #[test]
    fn display_round_trips_through_parse() {
        for text in ["1d4", "2d6 +3", "3d8 -2", "5 (Unarmed)"] {
            let roll = DamageRoll::parse(text).unwrap();
            assert_eq!(roll.to_string(), text);
        }
    }

    #[test]
    fn malformed_runtime_roll_deals_zero() {
        let mut rng = PcgRng::seed_from_u64(1);
        assert_eq!(roll_damage("banana", &mut rng).total, 0);
        let hit = roll_damage("1d4", &mut rng);
        assert_eq!(hit.dice.len(), 1);
        assert!((1..=4).contains(&hit.total));
    }
}
