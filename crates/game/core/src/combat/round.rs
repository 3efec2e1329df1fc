//! One combat round between an acting combatant and its opponent.

use crate::catalog::{Ability, AbilityKind, Catalog};
use crate::config::EngineConfig;
use crate::effect::Situation;
use crate::ids::AbilityId;
use crate::rng::RngOracle;
use crate::stats::resolve_combatant_stats;

use super::CombatError;
use super::damage::apply_damage;
use super::result::{AttackOutcome, AttackResult, resolve_attack};
use super::state::{ActiveBuff, CombatantState};

/// Read-only inputs shared by every round of an encounter.
#[derive(Clone, Copy, Debug)]
pub struct CombatContext<'a> {
    pub catalog: &'a Catalog,
    pub config: &'a EngineConfig,
    /// 1-based round number, recorded in the log.
    pub round: u32,
}

impl<'a> CombatContext<'a> {
    pub fn new(catalog: &'a Catalog, config: &'a EngineConfig) -> Self {
        Self {
            catalog,
            config,
            round: 1,
        }
    }

    #[must_use]
    pub fn with_round(mut self, round: u32) -> Self {
        self.round = round;
        self
    }
}

/// What the acting combatant does this round.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatAction {
    Attack,
    UseAbility(AbilityId),
    Flee,
}

/// How an encounter ended, seen from the acting combatant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum CombatOutcome {
    Victory,
    Defeat,
    Fled,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatPhase {
    AttackWindow,
    HitCheck,
    DamageApplication,
    CooldownTick,
    Resolved(CombatOutcome),
}

impl CombatPhase {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    Attacker,
    Defender,
}

/// One strike within a round.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Exchange {
    pub striker: Side,
    /// Ability that powered the strike, `None` for a basic attack.
    pub ability: Option<AbilityId>,
    pub result: AttackResult,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum LogKind {
    Attack,
    Critical,
    Dodge,
    Ability,
    Buff,
    System,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatLogEntry {
    pub round: u32,
    pub kind: LogKind,
    pub actor: String,
    pub message: String,
}

/// Both combatants after one round, plus what happened.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoundResult {
    pub round: u32,
    pub attacker: CombatantState,
    pub defender: CombatantState,
    pub exchanges: Vec<Exchange>,
    /// Phases passed through in order, ending with `phase`.
    pub phases: Vec<CombatPhase>,
    /// `AttackWindow` when another round follows, otherwise `Resolved`.
    pub phase: CombatPhase,
    pub log: Vec<CombatLogEntry>,
}

impl RoundResult {
    pub fn outcome(&self) -> Option<CombatOutcome> {
        match self.phase {
            CombatPhase::Resolved(outcome) => Some(outcome),
            _ => None,
        }
    }
}

/// Resolves one round.
///
/// The attacker acts (attack, ability or flee). If the defender survives it
/// counter-attacks. Cooldowns and buffs of both sides then tick down, except
/// the ability used this round, so a cooldown of `N` blocks the next `N`
/// rounds.
///
/// Ability use is validated in order (known, requirements, cooldown, mana)
/// before anything is paid. Any rejection returns an error and the inputs
/// stay as they were.
pub fn resolve_combat_round(
    ctx: &CombatContext<'_>,
    attacker: &CombatantState,
    defender: &CombatantState,
    action: &CombatAction,
    rng: &mut impl RngOracle,
) -> Result<RoundResult, CombatError> {
    if attacker.is_defeated() || defender.is_defeated() {
        return Err(CombatError::EncounterResolved);
    }

    let mut attacker = attacker.clone();
    let mut defender = defender.clone();
    let mut round = Round::new(ctx);
    round.enter(CombatPhase::AttackWindow);

    let (used, power) = match action {
        CombatAction::Flee => {
            round.note(
                LogKind::System,
                &attacker.name,
                format!("{} flees from {}", attacker.name, defender.name),
            );
            let phase = CombatPhase::Resolved(CombatOutcome::Fled);
            return Ok(round.finish(attacker, defender, phase));
        }
        CombatAction::Attack => (None, Some(1.0)),
        CombatAction::UseAbility(id) => {
            let ability = validate_ability(ctx, &attacker, id)?;
            round.pay(&mut attacker, ability);
            let power = match ability.kind {
                AbilityKind::Attack => Some(ability.power_multiplier),
                AbilityKind::Buff => None,
            };
            (Some(&ability.id), power)
        }
    };

    if let Some(power) = power {
        round.strike(&attacker, &mut defender, Side::Attacker, used, power, rng);
    }
    if !defender.is_defeated() {
        round.strike(&defender, &mut attacker, Side::Defender, None, 1.0, rng);
    }

    let outcome = if defender.is_defeated() {
        Some(CombatOutcome::Victory)
    } else if attacker.is_defeated() {
        Some(CombatOutcome::Defeat)
    } else {
        None
    };
    if let Some(outcome) = outcome {
        let fallen = match outcome {
            CombatOutcome::Victory => defender.name.clone(),
            _ => attacker.name.clone(),
        };
        round.note(LogKind::System, &fallen, format!("{fallen} is defeated"));
        return Ok(round.finish(attacker, defender, CombatPhase::Resolved(outcome)));
    }

    round.enter(CombatPhase::CooldownTick);
    attacker.tick(used);
    defender.tick(None);
    Ok(round.finish(attacker, defender, CombatPhase::AttackWindow))
}

fn validate_ability<'a>(
    ctx: &CombatContext<'a>,
    actor: &CombatantState,
    id: &AbilityId,
) -> Result<&'a Ability, CombatError> {
    let ability = ctx
        .catalog
        .ability(id.as_str())
        .filter(|_| actor.knows(id))
        .ok_or_else(|| CombatError::UnknownAbility(id.clone()))?;

    check_requirements(ctx, actor, ability)?;

    let remaining = actor.cooldown(id);
    if remaining > 0 {
        return Err(CombatError::OnCooldown {
            ability: id.clone(),
            remaining,
        });
    }
    if actor.mana.current < ability.mana_cost {
        return Err(CombatError::InsufficientMana {
            ability: id.clone(),
            required: ability.mana_cost,
            available: actor.mana.current,
        });
    }
    Ok(ability)
}

fn check_requirements(
    ctx: &CombatContext<'_>,
    actor: &CombatantState,
    ability: &Ability,
) -> Result<(), CombatError> {
    let requirements = &ability.requirements;
    if requirements.weapon_types.is_empty() && requirements.min_skill_level == 0 {
        return Ok(());
    }
    let unmet = |reason: String| CombatError::RequirementsNotMet {
        ability: ability.id.clone(),
        reason,
    };

    let stats = resolve_combatant_stats(ctx.catalog, ctx.config, actor, &Situation::in_combat());
    let skill = stats.weapon.skill.as_deref();
    if !requirements.weapon_types.is_empty()
        && !skill.is_some_and(|s| requirements.weapon_types.iter().any(|t| t == s))
    {
        return Err(unmet(format!(
            "requires a {} weapon",
            requirements.weapon_types.join(" or ")
        )));
    }
    let level = skill.map_or(0, |s| actor.skill_scaling(s).0);
    if level < requirements.min_skill_level {
        return Err(unmet(format!(
            "requires {} level {}",
            skill.unwrap_or("weapon skill"),
            requirements.min_skill_level
        )));
    }
    Ok(())
}

/// How a combatant sees its opponent.
fn facing(opponent: &CombatantState) -> Situation {
    Situation {
        target_type: opponent.creature_type.clone(),
        target_hp_percent: Some(opponent.health.percent()),
        ..Situation::in_combat()
    }
}

/// Accumulates the record of one round.
struct Round<'a> {
    catalog: &'a Catalog,
    config: &'a EngineConfig,
    round: u32,
    exchanges: Vec<Exchange>,
    phases: Vec<CombatPhase>,
    log: Vec<CombatLogEntry>,
}

impl<'a> Round<'a> {
    fn new(ctx: &CombatContext<'a>) -> Self {
        Self {
            catalog: ctx.catalog,
            config: ctx.config,
            round: ctx.round,
            exchanges: Vec::new(),
            phases: Vec::new(),
            log: Vec::new(),
        }
    }

    fn enter(&mut self, phase: CombatPhase) {
        tracing::debug!(round = self.round, ?phase, "combat phase");
        self.phases.push(phase);
    }

    fn note(&mut self, kind: LogKind, actor: &str, message: String) {
        self.log.push(CombatLogEntry {
            round: self.round,
            kind,
            actor: actor.to_owned(),
            message,
        });
    }

    /// Spends mana, starts the cooldown and applies the ability's buff.
    fn pay(&mut self, actor: &mut CombatantState, ability: &Ability) {
        actor.mana.spend(ability.mana_cost);
        if ability.cooldown > 0 {
            actor.cooldowns.insert(ability.id.clone(), ability.cooldown);
        }
        self.note(
            LogKind::Ability,
            &actor.name,
            format!("{} uses {}", actor.name, ability.name),
        );

        let Some(buff) = &ability.buff else {
            return;
        };
        actor.buffs.retain(|active| active.source != ability.id);
        if buff.duration == 0 {
            return;
        }
        actor.buffs.push(ActiveBuff {
            name: buff.name.clone(),
            source: ability.id.clone(),
            remaining: buff.duration,
            applicators: buff.applicators.clone(),
        });
        self.note(
            LogKind::Buff,
            &actor.name,
            format!("{} gains {} for {} rounds", actor.name, buff.name, buff.duration),
        );
    }

    fn strike(
        &mut self,
        striker: &CombatantState,
        target: &mut CombatantState,
        side: Side,
        ability: Option<&AbilityId>,
        power: f64,
        rng: &mut impl RngOracle,
    ) {
        self.enter(CombatPhase::HitCheck);
        let striker_stats =
            resolve_combatant_stats(self.catalog, self.config, striker, &facing(target));
        let target_stats =
            resolve_combatant_stats(self.catalog, self.config, target, &facing(striker));
        let result = resolve_attack(self.config, &striker_stats, &target_stats, power, rng);

        self.enter(CombatPhase::DamageApplication);
        let dealt = result.damage();
        target.health.current = apply_damage(target.health.current, dealt);

        let weapon = &striker_stats.weapon.name;
        match result.outcome {
            AttackOutcome::Dodged => self.note(
                LogKind::Dodge,
                &target.name,
                format!("{} dodges {}'s {}", target.name, striker.name, weapon),
            ),
            AttackOutcome::Hit => self.note(
                LogKind::Attack,
                &striker.name,
                format!("{} hits {} with {} for {dealt} damage", striker.name, target.name, weapon),
            ),
            AttackOutcome::Critical => self.note(
                LogKind::Critical,
                &striker.name,
                format!(
                    "{} critically hits {} with {} for {dealt} damage",
                    striker.name, target.name, weapon
                ),
            ),
        }

        self.exchanges.push(Exchange {
            striker: side,
            ability: ability.cloned(),
            result,
        });
    }

    fn finish(
        self,
        attacker: CombatantState,
        defender: CombatantState,
        phase: CombatPhase,
    ) -> RoundResult {
        let mut phases = self.phases;
        phases.push(phase);
        tracing::debug!(round = self.round, ?phase, "round resolved");
        RoundResult {
            round: self.round,
            attacker,
            defender,
            exchanges: self.exchanges,
            phases,
            phase,
            log: self.log,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{
        AbilityRequirements, BuffSpec, EquipmentData, EquipmentSlot, ItemDefinition, ItemKind,
        Monster, NaturalWeapon,
    };
    use crate::dice::DamageRoll;
    use crate::effect::{Applicator, EffectContext};
    use crate::error::GameError;
    use crate::instance::ItemInstance;
    use crate::rng::PcgRng;

    fn catalog() -> Catalog {
        Catalog::builder()
            .items([
                ItemDefinition::new(
                    "bronze_sword",
                    "Bronze Sword",
                    ItemKind::Equipment(EquipmentData::weapon(DamageRoll::dice(1, 4, 0), "oneHanded")),
                ),
                ItemDefinition::new(
                    "hunting_bow",
                    "Hunting Bow",
                    ItemKind::Equipment(EquipmentData::weapon(DamageRoll::dice(1, 6, 0), "ranged")),
                ),
            ])
            .abilities([
                Ability::attack("aimed_shot", "Aimed Shot", 1.5)
                    .with_cost(10, 2)
                    .with_requirements(AbilityRequirements {
                        weapon_types: vec!["ranged".into()],
                        min_skill_level: 1,
                    }),
                Ability::buff(
                    "battle_fury",
                    "Battle Fury",
                    BuffSpec {
                        name: "Battle Fury".into(),
                        duration: 2,
                        applicators: vec![Applicator::flat(EffectContext::CombatDamage, 2.0)],
                    },
                )
                .with_cost(5, 3),
            ])
            .build()
            .unwrap()
    }

    fn ranger() -> CombatantState {
        CombatantState::player("Ranger", 100, 30)
            .with_skill("ranged", 3, "dexterity")
            .equip(EquipmentSlot::MainHand, ItemInstance::new("hunting_bow"))
            .with_ability("aimed_shot")
            .with_ability("battle_fury")
    }

    fn dummy(health: u32) -> CombatantState {
        let mut monster = Monster::new("training_dummy", "Training Dummy", 1, health);
        monster.weapon = Some(NaturalWeapon::new("Flailing Arm", DamageRoll::dice(1, 2, 0)));
        CombatantState::from_monster(&monster)
    }

    #[test]
    fn plain_round_runs_every_phase() {
        let catalog = catalog();
        let config = EngineConfig::default();
        let ctx = CombatContext::new(&catalog, &config);
        let result = resolve_combat_round(
            &ctx,
            &ranger(),
            &dummy(500),
            &CombatAction::Attack,
            &mut PcgRng::seed_from_u64(7),
        )
        .unwrap();

        assert_eq!(
            result.phases,
            [
                CombatPhase::AttackWindow,
                CombatPhase::HitCheck,
                CombatPhase::DamageApplication,
                CombatPhase::HitCheck,
                CombatPhase::DamageApplication,
                CombatPhase::CooldownTick,
                CombatPhase::AttackWindow,
            ]
        );
        assert_eq!(result.exchanges.len(), 2);
        assert_eq!(result.exchanges[1].striker, Side::Defender);
        let dealt = result.exchanges[0].result.damage();
        assert_eq!(result.defender.health.current, 500 - dealt);
        assert!(result.log.iter().all(|entry| entry.round == 1));
    }

    #[test]
    fn ability_on_cooldown_is_rejected() {
        let catalog = catalog();
        let config = EngineConfig::default();
        let mut rng = PcgRng::seed_from_u64(21);
        let aimed = CombatAction::UseAbility("aimed_shot".into());

        let first = resolve_combat_round(
            &CombatContext::new(&catalog, &config),
            &ranger(),
            &dummy(500),
            &aimed,
            &mut rng,
        )
        .unwrap();
        assert_eq!(first.attacker.mana.current, 20);
        assert_eq!(first.attacker.cooldown(&"aimed_shot".into()), 2);
        assert_eq!(first.exchanges[0].result.breakdown.as_ref().map(|b| b.power_multiplier), Some(1.5));

        let err = resolve_combat_round(
            &CombatContext::new(&catalog, &config).with_round(2),
            &first.attacker,
            &first.defender,
            &aimed,
            &mut rng,
        )
        .unwrap_err();
        assert_eq!(
            err,
            CombatError::OnCooldown {
                ability: "aimed_shot".into(),
                remaining: 2
            }
        );
        assert!(err.is_user_actionable());
    }

    #[test]
    fn validation_order() {
        let catalog = catalog();
        let config = EngineConfig::default();
        let ctx = CombatContext::new(&catalog, &config);
        let mut rng = PcgRng::seed_from_u64(1);
        let aimed = CombatAction::UseAbility("aimed_shot".into());

        let unknown = resolve_combat_round(
            &ctx,
            &ranger(),
            &dummy(50),
            &CombatAction::UseAbility("fireball".into()),
            &mut rng,
        );
        assert_eq!(unknown.unwrap_err().error_code(), "COMBAT_UNKNOWN_ABILITY");

        // wrong weapon outranks the cooldown
        let mut swordsman = ranger().equip(EquipmentSlot::MainHand, ItemInstance::new("bronze_sword"));
        swordsman.cooldowns.insert("aimed_shot".into(), 1);
        let err = resolve_combat_round(&ctx, &swordsman, &dummy(50), &aimed, &mut rng).unwrap_err();
        assert_eq!(err.error_code(), "COMBAT_REQUIREMENTS_NOT_MET");

        // cooldown outranks mana
        let mut drained = ranger();
        drained.mana.current = 0;
        drained.cooldowns.insert("aimed_shot".into(), 1);
        let err = resolve_combat_round(&ctx, &drained, &dummy(50), &aimed, &mut rng).unwrap_err();
        assert_eq!(err.error_code(), "COMBAT_ON_COOLDOWN");

        drained.cooldowns.clear();
        let err = resolve_combat_round(&ctx, &drained, &dummy(50), &aimed, &mut rng).unwrap_err();
        assert_eq!(
            err,
            CombatError::InsufficientMana {
                ability: "aimed_shot".into(),
                required: 10,
                available: 0
            }
        );
    }

    #[test]
    fn buff_lasts_its_duration() {
        let catalog = catalog();
        let config = EngineConfig::default();
        let mut rng = PcgRng::seed_from_u64(4);
        let result = resolve_combat_round(
            &CombatContext::new(&catalog, &config),
            &ranger(),
            &dummy(500),
            &CombatAction::UseAbility("battle_fury".into()),
            &mut rng,
        )
        .unwrap();
        // buff abilities do not strike; only the counter-attack happens
        assert_eq!(result.exchanges.len(), 1);
        assert_eq!(result.exchanges[0].striker, Side::Defender);
        assert_eq!(result.attacker.buffs[0].remaining, 2);
        assert!(result.log.iter().any(|entry| entry.kind == LogKind::Buff));

        let mut state = (result.attacker, result.defender);
        for round in 2..=3 {
            let next = resolve_combat_round(
                &CombatContext::new(&catalog, &config).with_round(round),
                &state.0,
                &state.1,
                &CombatAction::Attack,
                &mut rng,
            )
            .unwrap();
            state = (next.attacker, next.defender);
        }
        assert!(state.0.buffs.is_empty());
        assert_eq!(state.0.cooldown(&"battle_fury".into()), 1);
    }

    #[test]
    fn lethal_blow_resolves_without_counter() {
        let catalog = catalog();
        let config = EngineConfig::default();
        let result = resolve_combat_round(
            &CombatContext::new(&catalog, &config),
            &ranger(),
            &dummy(1),
            &CombatAction::Attack,
            &mut PcgRng::seed_from_u64(9),
        )
        .unwrap();
        assert_eq!(result.outcome(), Some(CombatOutcome::Victory));
        assert_eq!(result.exchanges.len(), 1);
        assert!(!result.phases.contains(&CombatPhase::CooldownTick));

        let err = resolve_combat_round(
            &CombatContext::new(&catalog, &config),
            &result.attacker,
            &result.defender,
            &CombatAction::Attack,
            &mut PcgRng::seed_from_u64(9),
        )
        .unwrap_err();
        assert_eq!(err, CombatError::EncounterResolved);
    }

    #[test]
    fn fragile_attacker_is_defeated() {
        let catalog = catalog();
        let config = EngineConfig::default();
        let mut glass = ranger();
        glass.health.current = 1;
        let result = resolve_combat_round(
            &CombatContext::new(&catalog, &config),
            &glass,
            &dummy(500),
            &CombatAction::Attack,
            &mut PcgRng::seed_from_u64(3),
        )
        .unwrap();
        assert_eq!(result.phase, CombatPhase::Resolved(CombatOutcome::Defeat));
    }

    #[test]
    fn fleeing_changes_nothing() {
        let catalog = catalog();
        let config = EngineConfig::default();
        let ranger = ranger();
        let result = resolve_combat_round(
            &CombatContext::new(&catalog, &config),
            &ranger,
            &dummy(50),
            &CombatAction::Flee,
            &mut PcgRng::seed_from_u64(3),
        )
        .unwrap();
        assert_eq!(result.outcome(), Some(CombatOutcome::Fled));
        assert!(result.exchanges.is_empty());
        assert_eq!(result.attacker, ranger);
    }
}
