//! Character creation.

use std::sync::Arc;

use grimsheet_domain::{
    recalculate_with, AbilityScore, AbilityScores, CharacterRecord, GameSystem, HitPoints,
    DEFAULT_LEVEL,
};
use serde::Deserialize;
use tracing::instrument;

use crate::infrastructure::ports::RandomPort;

/// Scores dealt out when the player does not assign their own.
pub const STANDARD_ARRAY: [i32; 6] = [15, 14, 13, 12, 10, 8];

const DEFAULT_NAME: &str = "New Character";
const DEFAULT_CLASS: &str = "Fighter";
const DEFAULT_RACE: &str = "Human";

/// What the player chose on the creation screen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCharacter {
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "class")]
    pub class_name: Option<String>,
    #[serde(default)]
    pub race: Option<String>,
    /// STR, DEX, CON, INT, WIS, CHA; `None` deals the standard array
    #[serde(default)]
    pub scores: Option<[i32; 6]>,
}

impl NewCharacter {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_class(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    pub fn with_race(mut self, race: impl Into<String>) -> Self {
        self.race = Some(race.into());
        self
    }

    pub fn with_scores(mut self, scores: [i32; 6]) -> Self {
        self.scores = Some(scores);
        self
    }
}

/// Build a fresh level 1 sheet.
pub struct CreateCharacter {
    random: Arc<dyn RandomPort>,
    system: Arc<dyn GameSystem>,
}

impl CreateCharacter {
    pub fn new(random: Arc<dyn RandomPort>, system: Arc<dyn GameSystem>) -> Self {
        Self { random, system }
    }

    #[instrument(skip(self, request), fields(name = %request.name))]
    pub fn execute(&self, request: NewCharacter) -> CharacterRecord {
        let name = non_blank(Some(request.name), DEFAULT_NAME);
        let class_name = non_blank(request.class_name, DEFAULT_CLASS);
        let race = non_blank(request.race, DEFAULT_RACE);
        let scores = request
            .scores
            .unwrap_or_else(|| self.shuffled_standard_array());

        let engine = self.system.calculation_engine();
        let con_modifier = engine.ability_modifier(AbilityScore::sanitize_score(scores[2]));
        let max_hp = engine.calculate_max_hp(DEFAULT_LEVEL, &class_name, con_modifier, 0);

        let mut record = CharacterRecord::new(self.random.gen_uuid().to_string(), name)
            .with_class(class_name)
            .with_race(race)
            .with_level(DEFAULT_LEVEL)
            .with_stats(AbilityScores::from_scores(scores));
        record.hp = HitPoints::full(max_hp);

        let record = recalculate_with(self.system.as_ref(), &record);
        tracing::info!(
            character_id = %record.id,
            class = %record.class_name,
            max_hp = record.hp.max,
            "Created character"
        );
        record
    }

    fn shuffled_standard_array(&self) -> [i32; 6] {
        let mut scores = STANDARD_ARRAY;
        // Fisher-Yates over the injected source
        for i in (1..scores.len()).rev() {
            let upper = i32::try_from(i).unwrap_or(i32::MAX);
            let j = usize::try_from(self.random.gen_range(0, upper)).unwrap_or(0);
            scores.swap(i, j.min(i));
        }
        scores
    }
}

fn non_blank(value: Option<String>, default: &str) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}
