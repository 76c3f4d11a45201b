//! Skill entity - Proficiency-tiered checks governed by an ability

use std::fmt;
use std::str::FromStr;

use serde::de::Deserializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::common::lenient;
use crate::entities::Ability;
use crate::error::DomainError;
use crate::game_systems::DND5E_SKILLS;

/// Name given to skills stored without one.
pub const UNNAMED_SKILL: &str = "Unnamed Skill";

/// How well a character is trained in a skill.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillProficiency {
    /// Not proficient
    #[default]
    None,
    /// Standard proficiency
    Proficient,
    /// Expertise (double proficiency)
    Expertise,
}

impl SkillProficiency {
    /// Multiplier applied to the proficiency bonus.
    pub fn multiplier(&self) -> i32 {
        match self {
            Self::None => 0,
            Self::Proficient => 1,
            Self::Expertise => 2,
        }
    }
}

impl fmt::Display for SkillProficiency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Proficient => write!(f, "proficient"),
            Self::Expertise => write!(f, "expertise"),
        }
    }
}

impl FromStr for SkillProficiency {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "" => Ok(Self::None),
            "proficient" | "proficiency" => Ok(Self::Proficient),
            "expertise" | "expert" => Ok(Self::Expertise),
            _ => Err(DomainError::parse(format!("Unknown proficiency: {}", s))),
        }
    }
}

/// A skill entry on the character sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    /// Governing ability; the canonical table wins for known skill names
    #[serde(default, deserialize_with = "lenient::parsed")]
    pub ability: Ability,
    #[serde(default, deserialize_with = "lenient::parsed")]
    pub proficiency: SkillProficiency,
    /// Derived by the resolver
    #[serde(default, deserialize_with = "lenient::number")]
    pub modifier: i32,
}

impl Skill {
    pub fn new(name: impl Into<String>, ability: Ability) -> Self {
        Self {
            name: name.into(),
            ability,
            proficiency: SkillProficiency::None,
            modifier: 0,
        }
    }

    pub fn with_proficiency(mut self, proficiency: SkillProficiency) -> Self {
        self.proficiency = proficiency;
        self
    }

    /// The eighteen standard skills with zero modifiers.
    pub fn standard_roster() -> Vec<Skill> {
        DND5E_SKILLS
            .iter()
            .map(|(name, ability)| Skill::new(*name, *ability))
            .collect()
    }
}

/// Skill list field: a missing or non-list value becomes the standard roster,
/// malformed entries in a list are skipped.
pub(crate) fn skills_or_roster<'de, D>(deserializer: D) -> Result<Vec<Skill>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(lenient::list_from_value(value).unwrap_or_else(Skill::standard_roster))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn proficiency_multipliers() {
        assert_eq!(SkillProficiency::None.multiplier(), 0);
        assert_eq!(SkillProficiency::Proficient.multiplier(), 1);
        assert_eq!(SkillProficiency::Expertise.multiplier(), 2);
    }

    #[test]
    fn standard_roster_has_eighteen_zeroed_skills() {
        let roster = Skill::standard_roster();
        assert_eq!(roster.len(), 18);
        assert!(roster.iter().all(|s| s.modifier == 0));
        assert!(roster
            .iter()
            .any(|s| s.name == "Perception" && s.ability == Ability::Wis));
    }

    #[test]
    fn skill_loads_leniently() {
        let skill: Skill = serde_json::from_value(json!({
            "name": "Stealth",
            "ability": "dexterity",
            "proficiency": "Expertise",
            "modifier": "lots"
        }))
        .unwrap();

        assert_eq!(skill.ability, Ability::Dex);
        assert_eq!(skill.proficiency, SkillProficiency::Expertise);
        assert_eq!(skill.modifier, 0);
    }

    #[test]
    fn unknown_ability_and_tier_fall_back() {
        let skill: Skill = serde_json::from_value(json!({
            "name": "Cooking",
            "ability": "LUCK",
            "proficiency": "master"
        }))
        .unwrap();

        assert_eq!(skill.ability, Ability::Str);
        assert_eq!(skill.proficiency, SkillProficiency::None);
    }
}
