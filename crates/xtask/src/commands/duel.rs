//! Combat simulator
//!
//! Builds a player from the command line, fights one catalog monster round by
//! round and prints the combat log and rewards.

use anyhow::{Context, Result};
use clap::Parser;
use console::{StyledObject, style};
use outcome_core::{
    Catalog, CombatAction, CombatError, CombatLogEntry, CombatantState, Encounter, EngineConfig,
    GameError, ItemInstance, LogKind, PcgRng,
};
use serde_json::json;

use crate::utils::{ContentArgs, OutputFormat, SeedArgs};

/// Fight a catalog monster
#[derive(Parser, Debug)]
pub struct Duel {
    /// Monster to fight
    #[arg(value_name = "MONSTER")]
    monster: String,

    /// Weapon to wield (unarmed when omitted)
    #[arg(short, long, value_name = "ITEM")]
    weapon: Option<String>,

    /// Trait on the weapon, e.g. hardened=2 (repeatable)
    #[arg(long = "trait", value_name = "ID=LEVEL", value_parser = parse_level)]
    traits: Vec<(String, u8)>,

    /// Quality on the weapon, e.g. craftsmanship=3 (repeatable)
    #[arg(long = "quality", value_name = "ID=LEVEL", value_parser = parse_level)]
    qualities: Vec<(String, u8)>,

    /// Armor pieces to wear (repeatable)
    #[arg(long, value_name = "ITEM")]
    armor: Vec<String>,

    /// Level of the weapon's skill and of its main attribute
    #[arg(long, default_value_t = 10)]
    skill: u32,

    /// Maximum health
    #[arg(long, default_value_t = 100)]
    health: u32,

    /// Maximum mana
    #[arg(long, default_value_t = 50)]
    mana: u32,

    /// Abilities to use whenever ready, in priority order (repeatable)
    #[arg(short, long, value_name = "ABILITY")]
    ability: Vec<String>,

    /// Passive abilities the player has (repeatable)
    #[arg(short, long, value_name = "PASSIVE")]
    passive: Vec<String>,

    /// Give up after this many rounds
    #[arg(long, default_value_t = 100)]
    max_rounds: u32,

    #[command(flatten)]
    content: ContentArgs,

    #[command(flatten)]
    seed: SeedArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    format: OutputFormat,
}

fn parse_level(value: &str) -> Result<(String, u8), String> {
    let (id, level) = value
        .split_once('=')
        .ok_or_else(|| format!("expected ID=LEVEL, got {value:?}"))?;
    let level = level
        .trim()
        .parse::<u8>()
        .map_err(|e| format!("invalid level in {value:?}: {e}"))?;
    Ok((id.trim().to_owned(), level))
}

impl Duel {
    pub fn execute(self) -> Result<()> {
        let (catalog, config) = self.content.load()?;
        let player = self.build_player(&catalog)?;
        let (seed, mut rng) = self.seed.rng();

        let mut encounter = Encounter::start(&catalog, &self.monster.as_str().into(), player)
            .with_context(|| format!("Cannot start a fight with {}", self.monster))?;

        while !encounter.is_over() && encounter.round < self.max_rounds {
            self.play_round(&catalog, &config, &mut encounter, &mut rng)?;
        }

        let rewards = encounter
            .rewards(&catalog, &config, &mut rng)
            .context("Failed to roll rewards")?;

        if self.format == OutputFormat::Json {
            let report = json!({
                "seed": seed,
                "monster": encounter.monster_id,
                "rounds": encounter.round,
                "outcome": encounter.outcome().map(|o| o.to_string()),
                "player_health": encounter.player.health,
                "monster_health": encounter.monster.health,
                "log": encounter.log,
                "rewards": rewards,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
            return Ok(());
        }

        println!(
            "{} {} vs {}  seed {}",
            style("Duel").cyan().bold(),
            style(&encounter.player.name).bold(),
            style(&encounter.monster.name).bold(),
            seed
        );
        let mut round = 0;
        for entry in &encounter.log {
            if entry.round != round {
                round = entry.round;
                println!("{}", style(format!("-- round {round}")).dim());
            }
            print_entry(entry);
        }
        println!();

        match encounter.outcome() {
            Some(outcome) => println!(
                "{} after {} rounds  (hp {} / {})",
                style(outcome).green().bold(),
                encounter.round,
                encounter.player.health.current,
                encounter.monster.health.current
            ),
            None => println!(
                "{}",
                style(format!("No result after {} rounds", encounter.round)).yellow()
            ),
        }
        if !rewards.is_empty() {
            println!("  gold {}  experience {}", rewards.gold, rewards.experience);
            for drop in &rewards.loot {
                println!(
                    "  {} x{} {}",
                    style(&drop.instance.item_id).bold(),
                    drop.quantity,
                    style(format!("from {}", drop.source_table)).dim()
                );
            }
        }
        Ok(())
    }

    fn build_player(&self, catalog: &Catalog) -> Result<CombatantState> {
        let mut player = CombatantState::player("Player", self.health, self.mana);

        if let Some(weapon_id) = &self.weapon {
            let definition = catalog
                .item(weapon_id)
                .with_context(|| format!("Item not found: {weapon_id}"))?;
            let equipment = definition
                .equipment()
                .with_context(|| format!("{weapon_id} cannot be equipped"))?;

            let mut instance = ItemInstance::from_definition(definition);
            for (id, level) in &self.qualities {
                instance = instance.with_quality(id.as_str(), *level);
            }
            for (id, level) in &self.traits {
                instance = instance.with_trait(id.as_str(), *level);
            }
            if let Some(skill) = &equipment.skill_scalar {
                player = player
                    .with_skill(skill.as_str(), self.skill, "strength")
                    .with_attribute("strength", self.skill);
            }
            player = player.equip(equipment.slot, instance);
        }

        for armor_id in &self.armor {
            let definition = catalog
                .item(armor_id)
                .with_context(|| format!("Item not found: {armor_id}"))?;
            let slot = definition
                .equipment()
                .map(|e| e.slot)
                .with_context(|| format!("{armor_id} cannot be equipped"))?;
            player = player.equip(slot, ItemInstance::from_definition(definition));
        }

        for ability in &self.ability {
            player = player.with_ability(ability.as_str());
        }
        for passive in &self.passive {
            player = player.with_passive(passive.as_str());
        }
        Ok(player)
    }

    /// Uses the first ready ability, falling back to a basic attack.
    fn play_round(
        &self,
        catalog: &Catalog,
        config: &EngineConfig,
        encounter: &mut Encounter,
        rng: &mut PcgRng,
    ) -> Result<()> {
        for ability in &self.ability {
            let action = CombatAction::UseAbility(ability.as_str().into());
            match encounter.step(catalog, config, &action, rng) {
                Ok(_) => return Ok(()),
                Err(err) if err.severity().is_recoverable() => {
                    tracing::debug!(ability = %ability, code = err.error_code(), "{err}");
                }
                Err(err) => return Err(rejected(err)),
            }
        }
        encounter
            .step(catalog, config, &CombatAction::Attack, rng)
            .map(|_| ())
            .map_err(rejected)
    }
}

fn rejected(err: CombatError) -> anyhow::Error {
    anyhow::anyhow!("{} ({})", err, err.error_code())
}

fn print_entry(entry: &CombatLogEntry) {
    let tag: StyledObject<&str> = match entry.kind {
        LogKind::Attack => style("hit ").white(),
        LogKind::Critical => style("crit").red().bold(),
        LogKind::Dodge => style("miss").dim(),
        LogKind::Ability => style("abil").magenta(),
        LogKind::Buff => style("buff").blue(),
        LogKind::System => style("----").yellow(),
    };
    println!("  {} {}: {}", tag, entry.actor, entry.message);
}
