//! A fight between a player and one catalog monster.

use crate::catalog::Catalog;
use crate::config::EngineConfig;
use crate::ids::MonsterId;
use crate::loot::{ItemDrop, resolve_drop_tables};
use crate::rng::RngOracle;

use super::CombatError;
use super::round::{
    CombatAction, CombatContext, CombatLogEntry, CombatOutcome, CombatPhase, RoundResult,
    resolve_combat_round,
};
use super::state::CombatantState;

/// What a won encounter pays out.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rewards {
    pub gold: u32,
    pub experience: u32,
    pub loot: Vec<ItemDrop>,
}

impl Rewards {
    pub fn is_empty(&self) -> bool {
        self.gold == 0 && self.experience == 0 && self.loot.is_empty()
    }
}

/// Round counter, phase and both combatant states of one encounter.
///
/// The player always acts; the monster answers with its counter-attack.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Encounter {
    pub monster_id: MonsterId,
    pub player: CombatantState,
    pub monster: CombatantState,
    /// Rounds resolved so far.
    pub round: u32,
    pub phase: CombatPhase,
    pub log: Vec<CombatLogEntry>,
}

impl Encounter {
    /// Starts a fight against a fresh copy of `monster_id`.
    pub fn start(
        catalog: &Catalog,
        monster_id: &MonsterId,
        player: CombatantState,
    ) -> Result<Self, CombatError> {
        let monster = catalog
            .monster(monster_id.as_str())
            .ok_or_else(|| CombatError::UnknownMonster(monster_id.clone()))?;
        Ok(Self {
            monster_id: monster_id.clone(),
            player,
            monster: CombatantState::from_monster(monster),
            round: 0,
            phase: CombatPhase::AttackWindow,
            log: Vec::new(),
        })
    }

    /// Resolves the next round and folds its result into the encounter.
    ///
    /// On error the encounter is unchanged.
    pub fn step(
        &mut self,
        catalog: &Catalog,
        config: &EngineConfig,
        action: &CombatAction,
        rng: &mut impl RngOracle,
    ) -> Result<RoundResult, CombatError> {
        if self.is_over() {
            return Err(CombatError::EncounterResolved);
        }
        let ctx = CombatContext::new(catalog, config).with_round(self.round + 1);
        let result = resolve_combat_round(&ctx, &self.player, &self.monster, action, rng)?;

        self.round = result.round;
        self.phase = result.phase;
        self.player = result.attacker.clone();
        self.monster = result.defender.clone();
        self.log.extend(result.log.iter().cloned());
        Ok(result)
    }

    pub fn outcome(&self) -> Option<CombatOutcome> {
        match self.phase {
            CombatPhase::Resolved(outcome) => Some(outcome),
            _ => None,
        }
    }

    pub fn is_over(&self) -> bool {
        self.phase.is_resolved()
    }

    /// Gold, experience and loot for a won fight.
    ///
    /// Defeat, flight and unfinished fights yield nothing and draw no random
    /// numbers.
    pub fn rewards(
        &self,
        catalog: &Catalog,
        config: &EngineConfig,
        rng: &mut impl RngOracle,
    ) -> Result<Rewards, CombatError> {
        if self.outcome() != Some(CombatOutcome::Victory) {
            return Ok(Rewards::default());
        }
        let monster = catalog
            .monster(self.monster_id.as_str())
            .ok_or_else(|| CombatError::UnknownMonster(self.monster_id.clone()))?;

        let rewards = Rewards {
            gold: rng.range(monster.gold.min, monster.gold.max),
            experience: monster.experience,
            loot: resolve_drop_tables(catalog, config, &monster.loot_tables, rng),
        };
        tracing::debug!(
            monster = %monster.id,
            gold = rewards.gold,
            experience = rewards.experience,
            drops = rewards.loot.len(),
            "encounter rewards"
        );
        Ok(rewards)
    }
}
