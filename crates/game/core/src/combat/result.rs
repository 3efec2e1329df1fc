//! Combat result types and attack resolution.

use crate::config::EngineConfig;
use crate::rng::RngOracle;
use crate::stats::CombatantStats;

use super::damage::{DamageBreakdown, critical_damage, mitigate, scale_damage};
use super::hit::{check_dodge, roll_crit};

/// Outcome of an attack attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttackOutcome {
    /// Attack hit the target.
    Hit,
    /// Attack hit with the crit multiplier applied.
    Critical,
    /// Defender dodged, no damage.
    Dodged,
}

/// Result of a combat resolution.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackResult {
    pub outcome: AttackOutcome,

    /// Damage pipeline (None if dodged).
    pub breakdown: Option<DamageBreakdown>,
}

impl AttackResult {
    /// Damage that reached the defender's health.
    pub fn damage(&self) -> u32 {
        self.breakdown.as_ref().map_or(0, |b| b.dealt)
    }
}

/// Resolve one strike: damage roll, crit check, dodge check, mitigation.
///
/// Random numbers are drawn in that order. An unarmed strike deals its fixed
/// damage with no crit roll, level bonus or damage modifiers.
///
/// # Arguments
///
/// * `attacker` - Resolved stats of the striking combatant
/// * `defender` - Resolved stats of the target
/// * `power_multiplier` - Ability power, 1.0 for a basic attack
pub fn resolve_attack(
    config: &EngineConfig,
    attacker: &CombatantStats,
    defender: &CombatantStats,
    power_multiplier: f64,
    rng: &mut impl RngOracle,
) -> AttackResult {
    let unarmed = attacker.weapon.is_unarmed();

    // 1. Roll the weapon
    let roll = attacker.weapon.damage_roll.roll_detailed(rng);
    let (power_multiplier, level_bonus, modified) = if unarmed {
        (1.0, 0, roll.total)
    } else {
        let modified = scale_damage(
            roll.total,
            power_multiplier,
            attacker.level_bonus,
            &attacker.damage,
        );
        (power_multiplier, attacker.level_bonus, modified)
    };

    // 2. Crit
    let critical = !unarmed && roll_crit(attacker.crit_chance, rng);

    // 3. Dodge
    if check_dodge(config, defender.evasion, rng) {
        return AttackResult {
            outcome: AttackOutcome::Dodged,
            breakdown: None,
        };
    }

    // 4. Mitigation
    let raw = if critical {
        critical_damage(config, modified)
    } else {
        modified
    };
    let (dealt, mitigated) = mitigate(config, raw, defender.armor);

    AttackResult {
        outcome: if critical {
            AttackOutcome::Critical
        } else {
            AttackOutcome::Hit
        },
        breakdown: Some(DamageBreakdown {
            roll,
            power_multiplier,
            level_bonus,
            modified,
            critical,
            raw,
            mitigated,
            dealt,
        }),
    }
}
