//! Applicator conditions and the runtime situation they are checked against.

use std::collections::BTreeMap;

/// When an applicator is active.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Condition {
    #[default]
    Always,
    /// Own HP percentage strictly below the value (0-100).
    HpBelowPercent(f64),
    /// Own HP percentage strictly above the value (0-100).
    HpAbovePercent(f64),
    InCombat,
    OutOfCombat,
    /// Current activity type is one of the listed types.
    ActivityType(Vec<String>),
    /// Current activity location is one of the listed locations.
    ActivityLocation(Vec<String>),
    /// Current target type is one of the listed types.
    TargetType(Vec<String>),
    /// Target HP percentage strictly below the value (0-100).
    TargetBelowHpPercent(f64),
    ShieldEquipped,
    TwoHanded,
    DualWielding,
    /// Skill level strictly above `level`.
    SkillLevelAbove { skill: String, level: u32 },
    /// Attribute level strictly above `value`.
    AttributeAbove { attribute: String, value: u32 },
}

impl Condition {
    /// Checks this condition against the current situation.
    ///
    /// Conditions that depend on information the situation does not carry
    /// (no HP known, no activity) evaluate to false.
    pub fn is_met(&self, situation: &Situation) -> bool {
        match self {
            Condition::Always => true,
            Condition::HpBelowPercent(threshold) => {
                situation.hp_percent.is_some_and(|hp| hp < *threshold)
            }
            Condition::HpAbovePercent(threshold) => {
                situation.hp_percent.is_some_and(|hp| hp > *threshold)
            }
            Condition::InCombat => situation.in_combat,
            Condition::OutOfCombat => !situation.in_combat,
            Condition::ActivityType(types) => contains(types, &situation.activity_type),
            Condition::ActivityLocation(locations) => {
                contains(locations, &situation.activity_location)
            }
            Condition::TargetType(types) => contains(types, &situation.target_type),
            Condition::TargetBelowHpPercent(threshold) => situation
                .target_hp_percent
                .is_some_and(|hp| hp < *threshold),
            Condition::ShieldEquipped => situation.shield_equipped,
            Condition::TwoHanded => situation.two_handed,
            Condition::DualWielding => situation.dual_wielding,
            Condition::SkillLevelAbove { skill, level } => {
                situation.skills.get(skill).copied().unwrap_or(0) > *level
            }
            Condition::AttributeAbove { attribute, value } => {
                situation.attributes.get(attribute).copied().unwrap_or(0) > *value
            }
        }
    }
}

fn contains(allowed: &[String], actual: &Option<String>) -> bool {
    actual
        .as_deref()
        .is_some_and(|actual| allowed.iter().any(|a| a == actual))
}

/// Runtime state conditions are evaluated against.
///
/// Built by the caller (or by the combat loop) for each evaluation; the
/// engine never stores it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Situation {
    /// Own HP as a percentage of maximum (0-100).
    pub hp_percent: Option<f64>,
    pub in_combat: bool,
    pub activity_type: Option<String>,
    pub activity_location: Option<String>,
    pub target_type: Option<String>,
    /// Target HP as a percentage of maximum (0-100).
    pub target_hp_percent: Option<f64>,
    pub shield_equipped: bool,
    pub two_handed: bool,
    pub dual_wielding: bool,
    pub skills: BTreeMap<String, u32>,
    pub attributes: BTreeMap<String, u32>,
}

impl Situation {
    /// A situation in which only `Always` conditions hold.
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn in_combat() -> Self {
        Self {
            in_combat: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_hp_percent(mut self, hp_percent: f64) -> Self {
        self.hp_percent = Some(hp_percent);
        self
    }

    #[must_use]
    pub fn with_target(mut self, target_type: impl Into<String>, hp_percent: f64) -> Self {
        self.target_type = Some(target_type.into());
        self.target_hp_percent = Some(hp_percent);
        self
    }

    #[must_use]
    pub fn with_activity(
        mut self,
        activity_type: impl Into<String>,
        location: Option<String>,
    ) -> Self {
        self.activity_type = Some(activity_type.into());
        self.activity_location = location;
        self
    }

    #[must_use]
    pub fn with_skill(mut self, skill: impl Into<String>, level: u32) -> Self {
        self.skills.insert(skill.into(), level);
        self
    }

    #[must_use]
    pub fn with_attribute(mut self, attribute: impl Into<String>, level: u32) -> Self {
        self.attributes.insert(attribute.into(), level);
        self
    }
}
