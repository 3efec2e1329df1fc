//! Offline content validation.
//!
//! Runtime resolvers degrade safely on broken content. This pass is where
//! broken content fails loudly: it reports every dangling reference and
//! integrity problem at once so content authors can fix them in one go.

use core::fmt;
use std::collections::BTreeSet;

use super::{Catalog, DropOutcome, IngredientMatch, ItemDefinition};
use crate::config::EngineConfig;
use crate::ids::DropTableId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum IssueSeverity {
    Warning,
    Error,
}

/// One problem found in the catalog.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogIssue {
    pub severity: IssueSeverity,
    /// `drop_tables/combat-bandit-basic`, `recipes/health_potion`.
    pub location: String,
    pub message: String,
}

impl fmt::Display for CatalogIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            IssueSeverity::Warning => "warning",
            IssueSeverity::Error => "error",
        };
        write!(f, "[{tag}] {}: {}", self.location, self.message)
    }
}

#[derive(Default)]
struct Report {
    issues: Vec<CatalogIssue>,
}

impl Report {
    fn error(&mut self, location: String, message: String) {
        self.issues.push(CatalogIssue {
            severity: IssueSeverity::Error,
            location,
            message,
        });
    }

    fn warn(&mut self, location: String, message: String) {
        self.issues.push(CatalogIssue {
            severity: IssueSeverity::Warning,
            location,
            message,
        });
    }
}

impl Catalog {
    /// Checks references and content integrity across the whole catalog.
    pub fn validate(&self, config: &EngineConfig) -> Vec<CatalogIssue> {
        let mut report = Report::default();
        self.validate_modifiers(&mut report);
        self.validate_items(&mut report);
        self.validate_drop_tables(config, &mut report);
        self.validate_monsters(&mut report);
        self.validate_abilities(&mut report);
        self.validate_recipes(&mut report);
        report.issues
    }

    fn validate_modifiers(&self, report: &mut Report) {
        let definitions = self
            .qualities()
            .map(|q| (format!("qualities/{}", q.id), q.max_level, &q.levels))
            .chain(
                self.traits()
                    .map(|t| (format!("traits/{}", t.id), t.max_level, &t.levels)),
            );
        for (location, max_level, levels) in definitions {
            if max_level == 0 || max_level > EngineConfig::MAX_MODIFIER_LEVEL {
                report.error(
                    location.clone(),
                    format!(
                        "max level {max_level} outside 1..={}",
                        EngineConfig::MAX_MODIFIER_LEVEL
                    ),
                );
            }
            for level in levels.keys() {
                if *level == 0 || *level > max_level {
                    report.error(
                        location.clone(),
                        format!("effects defined for level {level} beyond max level {max_level}"),
                    );
                }
            }
            for level in 1..=max_level {
                if !levels.contains_key(&level) {
                    report.warn(location.clone(), format!("level {level} defines no effects"));
                }
            }
        }
    }

    fn validate_items(&self, report: &mut Report) {
        for item in self.items() {
            let location = format!("items/{}", item.id);
            for quality in &item.allowed_qualities {
                if self.quality(quality.as_str()).is_none() {
                    report.error(location.clone(), format!("unknown quality `{quality}`"));
                }
            }
            for trait_id in &item.allowed_traits {
                if self.trait_def(trait_id.as_str()).is_none() {
                    report.error(location.clone(), format!("unknown trait `{trait_id}`"));
                }
            }
            for (quality, level) in &item.default_qualities {
                match self.quality(quality.as_str()) {
                    Some(def) if *level > def.max_level => report.error(
                        location.clone(),
                        format!(
                            "default {quality} level {level} exceeds max level {}",
                            def.max_level
                        ),
                    ),
                    Some(_) => {}
                    None => report.error(
                        location.clone(),
                        format!("default quality `{quality}` is not defined"),
                    ),
                }
            }
            let crit_chance = item.equipment().map_or(0.0, |e| e.crit_chance);
            if !(0.0..=1.0).contains(&crit_chance) {
                report.error(
                    location.clone(),
                    format!("crit chance {crit_chance} outside [0, 1]"),
                );
            }
        }
    }

    fn validate_drop_tables(&self, config: &EngineConfig, report: &mut Report) {
        for table in self.drop_tables() {
            let location = format!("drop_tables/{}", table.id);
            match table.total_weight() {
                Some(0) => report.error(location.clone(), "total weight is 0".to_owned()),
                None => report.error(location.clone(), "total weight overflows".to_owned()),
                Some(_) => {}
            }
            for (index, entry) in table.entries.iter().enumerate() {
                if entry.weight == 0 {
                    report.warn(location.clone(), format!("entry {index} has weight 0 and never drops"));
                }
                match &entry.outcome {
                    DropOutcome::Item {
                        item_id, quantity, ..
                    } => {
                        if self.item(item_id.as_str()).is_none() {
                            report.error(location.clone(), format!("unknown item `{item_id}`"));
                        }
                        if quantity.min > quantity.max || quantity.max == 0 {
                            report.error(
                                location.clone(),
                                format!(
                                    "entry {index} quantity range {}..={} is empty",
                                    quantity.min, quantity.max
                                ),
                            );
                        }
                    }
                    DropOutcome::Table(nested) => {
                        if self.drop_table(nested.as_str()).is_none() {
                            report.error(
                                location.clone(),
                                format!("nested drop table `{nested}` not found"),
                            );
                        }
                    }
                    DropOutcome::Nothing => {}
                }
            }
            let depth = self.nesting_depth(&table.id, &mut Vec::new());
            match depth {
                None => report.error(location.clone(), "nested drop tables form a cycle".to_owned()),
                Some(depth) if depth > usize::from(config.max_drop_depth) => report.error(
                    location.clone(),
                    format!(
                        "nesting depth {depth} exceeds limit {}",
                        config.max_drop_depth
                    ),
                ),
                Some(_) => {}
            }
        }
    }

    /// Longest chain of nested tables below `id`, or `None` on a cycle.
    fn nesting_depth(&self, id: &DropTableId, path: &mut Vec<DropTableId>) -> Option<usize> {
        if path.contains(id) {
            return None;
        }
        let Some(table) = self.drop_table(id.as_str()) else {
            return Some(0);
        };
        path.push(id.clone());
        let mut deepest = 0;
        for entry in &table.entries {
            if let DropOutcome::Table(nested) = &entry.outcome {
                let depth = self.nesting_depth(nested, path)?;
                deepest = deepest.max(depth + 1);
            }
        }
        path.pop();
        Some(deepest)
    }

    fn validate_monsters(&self, report: &mut Report) {
        for monster in self.monsters() {
            let location = format!("monsters/{}", monster.id);
            for table in &monster.loot_tables {
                if self.drop_table(table.as_str()).is_none() {
                    report.error(location.clone(), format!("loot table `{table}` not found"));
                }
            }
            for passive in &monster.passives {
                if self.passive(passive.as_str()).is_none() {
                    report.error(location.clone(), format!("passive `{passive}` not found"));
                }
            }
            for ability in &monster.abilities {
                if self.ability(ability.as_str()).is_none() {
                    report.error(location.clone(), format!("ability `{ability}` not found"));
                }
            }
            if monster.gold.min > monster.gold.max {
                report.error(
                    location.clone(),
                    format!("gold range {}..={} is empty", monster.gold.min, monster.gold.max),
                );
            }
            if monster.health == 0 {
                report.error(location.clone(), "health is 0".to_owned());
            }
        }
    }

    fn validate_abilities(&self, report: &mut Report) {
        let weapon_types: BTreeSet<&str> = self
            .items()
            .filter_map(ItemDefinition::equipment)
            .filter_map(|e| e.skill_scalar.as_deref())
            .collect();
        for ability in self.abilities() {
            let location = format!("abilities/{}", ability.id);
            for weapon_type in &ability.requirements.weapon_types {
                if !weapon_types.contains(weapon_type.as_str()) {
                    report.warn(
                        location.clone(),
                        format!("no weapons use skill `{weapon_type}`"),
                    );
                }
            }
            if ability.power_multiplier < 0.0 {
                report.error(location.clone(), "power multiplier is negative".to_owned());
            }
        }
    }

    fn validate_recipes(&self, report: &mut Report) {
        for recipe in self.recipes() {
            let location = format!("recipes/{}", recipe.id);
            if recipe.outputs.is_empty() {
                report.error(location.clone(), "recipe has no outputs".to_owned());
            }
            for ingredient in &recipe.ingredients {
                if ingredient.quantity == 0 {
                    report.warn(location.clone(), format!("{} has quantity 0", ingredient.matches));
                }
                match &ingredient.matches {
                    IngredientMatch::Item(id) if self.item(id.as_str()).is_none() => {
                        report.error(location.clone(), format!("ingredient item `{id}` not found"))
                    }
                    IngredientMatch::Subcategory(tag)
                        if !self.items().any(|item| item.has_subcategory(tag)) =>
                    {
                        report.warn(location.clone(), format!("no items have subcategory `{tag}`"))
                    }
                    _ => {}
                }
            }
            for output in &recipe.outputs {
                if self.item(output.item_id.as_str()).is_none() {
                    report.error(
                        location.clone(),
                        format!("output item `{}` not found", output.item_id),
                    );
                }
            }
            for required in &recipe.unlock.required_recipes {
                if self.recipe(required.as_str()).is_none() {
                    report.error(
                        location.clone(),
                        format!("required recipe `{required}` not found"),
                    );
                }
            }
            for required in &recipe.unlock.required_items {
                if self.item(required.as_str()).is_none() {
                    report.error(location.clone(), format!("required item `{required}` not found"));
                }
            }
        }
    }
}
