//! Ability scores - the six core attributes and their derived values

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::common::lenient;
use crate::error::DomainError;

/// Score used when a stored score is missing or unusable.
pub const DEFAULT_ABILITY_SCORE: i32 = 10;
/// Lowest score the sheet accepts.
pub const MIN_ABILITY_SCORE: i32 = 1;
/// Highest score the sheet accepts.
pub const MAX_ABILITY_SCORE: i32 = 30;

/// One of the six ability keys.
///
/// Defaults to STR, the fallback for skills with an unknown governing ability.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Ability {
    #[default]
    Str,
    Dex,
    Con,
    Int,
    Wis,
    Cha,
}

impl Ability {
    /// All abilities in sheet order.
    pub const ALL: [Ability; 6] = [
        Ability::Str,
        Ability::Dex,
        Ability::Con,
        Ability::Int,
        Ability::Wis,
        Ability::Cha,
    ];

    /// Short key as stored on the sheet ("STR", "DEX", ...).
    pub fn key(&self) -> &'static str {
        match self {
            Self::Str => "STR",
            Self::Dex => "DEX",
            Self::Con => "CON",
            Self::Int => "INT",
            Self::Wis => "WIS",
            Self::Cha => "CHA",
        }
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Ability {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "str" | "strength" => Ok(Self::Str),
            "dex" | "dexterity" => Ok(Self::Dex),
            "con" | "constitution" => Ok(Self::Con),
            "int" | "intelligence" => Ok(Self::Int),
            "wis" | "wisdom" => Ok(Self::Wis),
            "cha" | "charisma" => Ok(Self::Cha),
            _ => Err(DomainError::parse(format!("Unknown ability: {}", s))),
        }
    }
}

/// A single ability score with its derived modifier and saving throw.
///
/// `modifier` and `save` are outputs of the resolver; whatever a stored
/// document says about them is overwritten on every recalculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbilityScore {
    #[serde(default = "default_score", deserialize_with = "lenient::number")]
    pub score: i32,
    #[serde(default, deserialize_with = "lenient::number")]
    pub modifier: i32,
    #[serde(default, deserialize_with = "lenient::number")]
    pub save: i32,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub proficient_save: bool,
}

fn default_score() -> i32 {
    DEFAULT_ABILITY_SCORE
}

impl Default for AbilityScore {
    fn default() -> Self {
        Self::new(DEFAULT_ABILITY_SCORE)
    }
}

impl AbilityScore {
    pub fn new(score: i32) -> Self {
        Self {
            score,
            modifier: 0,
            save: 0,
            proficient_save: false,
        }
    }

    pub fn with_proficient_save(mut self, proficient: bool) -> Self {
        self.proficient_save = proficient;
        self
    }

    /// Clamp a raw score into the accepted range; zero counts as missing.
    pub fn sanitize_score(score: i32) -> i32 {
        if score == 0 {
            DEFAULT_ABILITY_SCORE
        } else {
            score.clamp(MIN_ABILITY_SCORE, MAX_ABILITY_SCORE)
        }
    }
}

/// The six ability scores of a character.
///
/// Missing or malformed entries in a stored document load as score 10.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AbilityScores {
    #[serde(rename = "STR", default, deserialize_with = "lenient::record")]
    pub str: AbilityScore,
    #[serde(rename = "DEX", default, deserialize_with = "lenient::record")]
    pub dex: AbilityScore,
    #[serde(rename = "CON", default, deserialize_with = "lenient::record")]
    pub con: AbilityScore,
    #[serde(rename = "INT", default, deserialize_with = "lenient::record")]
    pub int: AbilityScore,
    #[serde(rename = "WIS", default, deserialize_with = "lenient::record")]
    pub wis: AbilityScore,
    #[serde(rename = "CHA", default, deserialize_with = "lenient::record")]
    pub cha: AbilityScore,
}

impl AbilityScores {
    /// Build from raw scores in STR, DEX, CON, INT, WIS, CHA order.
    pub fn from_scores(scores: [i32; 6]) -> Self {
        let [str, dex, con, int, wis, cha] = scores.map(AbilityScore::new);
        Self {
            str,
            dex,
            con,
            int,
            wis,
            cha,
        }
    }

    pub fn get(&self, ability: Ability) -> &AbilityScore {
        match ability {
            Ability::Str => &self.str,
            Ability::Dex => &self.dex,
            Ability::Con => &self.con,
            Ability::Int => &self.int,
            Ability::Wis => &self.wis,
            Ability::Cha => &self.cha,
        }
    }

    pub fn get_mut(&mut self, ability: Ability) -> &mut AbilityScore {
        match ability {
            Ability::Str => &mut self.str,
            Ability::Dex => &mut self.dex,
            Ability::Con => &mut self.con,
            Ability::Int => &mut self.int,
            Ability::Wis => &mut self.wis,
            Ability::Cha => &mut self.cha,
        }
    }

    /// Shorthand for the stored modifier of an ability.
    pub fn modifier(&self, ability: Ability) -> i32 {
        self.get(ability).modifier
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ability_parses_short_and_long_names() {
        assert_eq!("dex".parse::<Ability>().unwrap(), Ability::Dex);
        assert_eq!("Wisdom".parse::<Ability>().unwrap(), Ability::Wis);
        assert!("luck".parse::<Ability>().is_err());
    }

    #[test]
    fn ability_serializes_as_uppercase_key() {
        assert_eq!(serde_json::to_value(Ability::Cha).unwrap(), json!("CHA"));
    }

    #[test]
    fn sanitize_score_clamps_and_defaults() {
        assert_eq!(AbilityScore::sanitize_score(0), 10);
        assert_eq!(AbilityScore::sanitize_score(-4), 1);
        assert_eq!(AbilityScore::sanitize_score(45), 30);
        assert_eq!(AbilityScore::sanitize_score(17), 17);
    }

    #[test]
    fn partial_scores_load_with_defaults() {
        let scores: AbilityScores = serde_json::from_value(json!({
            "STR": { "score": "16", "proficientSave": true },
            "DEX": null,
            "WIS": "wise"
        }))
        .unwrap();

        assert_eq!(scores.str.score, 16);
        assert!(scores.str.proficient_save);
        assert_eq!(scores.dex.score, 10);
        assert_eq!(scores.con.score, 10);
        assert_eq!(scores.wis.score, 10);
    }
}
