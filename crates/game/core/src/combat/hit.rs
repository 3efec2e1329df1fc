//! Critical hit and dodge checks.

use crate::config::EngineConfig;
use crate::rng::RngOracle;

/// Rolls for a critical hit.
///
/// # Formula
///
/// ```text
/// critical = r < clamp(crit_chance, 0, 1)
/// ```
///
/// No random number is drawn when the chance is 0 or 1.
pub fn roll_crit(crit_chance: f64, rng: &mut impl RngOracle) -> bool {
    rng.chance(crit_chance)
}

/// Rolls the defender's dodge, independent of the crit roll.
///
/// # Formula
///
/// ```text
/// dodge_chance = min(max_dodge, evasion / (evasion + evasion_constant))
/// ```
pub fn check_dodge(config: &EngineConfig, evasion: f64, rng: &mut impl RngOracle) -> bool {
    rng.chance(config.dodge_chance(evasion))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::PcgRng;

    #[test]
    fn certain_outcomes_draw_nothing() {
        let mut rng = PcgRng::seed_from_u64(3);
        let before = rng.clone();
        assert!(!roll_crit(0.0, &mut rng));
        assert!(roll_crit(1.5, &mut rng));
        assert!(!check_dodge(&EngineConfig::default(), 0.0, &mut rng));
        assert_eq!(rng, before);
    }

    #[test]
    fn dodge_rate_tracks_evasion() {
        let config = EngineConfig::default();
        let mut rng = PcgRng::seed_from_u64(11);
        let dodged = (0..10_000)
            .filter(|_| check_dodge(&config, 1000.0, &mut rng))
            .count();
        assert!((4_700..5_300).contains(&dodged), "dodged {dodged}");
    }
}
