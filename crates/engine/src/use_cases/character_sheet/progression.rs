//! Levelling and resting.

use std::sync::Arc;

use grimsheet_domain::{
    average_hit_die, rebuild_slots, recalculate_with, roll_hit_die, Ability, CasterType,
    CharacterRecord, DiceExpression, DiceTerm, GameSystem, HitDice, HitDieRoll, RestType,
    SpellSlot, MAX_LEVEL,
};
use serde::Serialize;
use tracing::instrument;

use crate::infrastructure::ports::RandomPort;
use crate::use_cases::port_roller;

/// What a level-up changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelUpOutcome {
    pub previous_level: u32,
    pub new_level: u32,
    pub hp_gained: i32,
}

/// Advance a character one level using average hit point gains.
pub struct LevelUp {
    system: Arc<dyn GameSystem>,
}

impl LevelUp {
    pub fn new(system: Arc<dyn GameSystem>) -> Self {
        Self { system }
    }

    /// A character already at the level cap is recalculated and left there.
    #[instrument(skip(self, record), fields(character_id = %record.id))]
    pub fn execute(&self, record: &mut CharacterRecord) -> LevelUpOutcome {
        *record = recalculate_with(self.system.as_ref(), record);
        let previous_level = record.level;

        if previous_level >= MAX_LEVEL {
            tracing::debug!(level = previous_level, "Already at maximum level");
            return LevelUpOutcome {
                previous_level,
                new_level: previous_level,
                hp_gained: 0,
            };
        }

        let engine = self.system.calculation_engine();
        let new_level = previous_level + 1;
        let hit_die = engine.hit_die(&record.class_name) as i32;
        let hp_gained = (average_hit_die(hit_die) + record.modifier(Ability::Con)).max(1);

        record.level = new_level;
        record.hp.max = record.hp.max.saturating_add(hp_gained);
        record.hp.current = record.hp.current.saturating_add(hp_gained);
        if let Some(dice) = record.hit_dice.as_mut() {
            dice.max = dice.max.saturating_add(1);
            dice.current = dice.current.saturating_add(1);
        }

        if let Some(spellcasting) = self.system.spellcasting_system() {
            if spellcasting.caster_type(&record.class_name).is_some() {
                let table = spellcasting.spell_slots(&record.class_name, new_level);
                record.spell_slots = rebuild_slots(&record.spell_slots, &table);
            }
        }

        *record = recalculate_with(self.system.as_ref(), record);
        tracing::info!(new_level, hp_gained, "Levelled up");

        LevelUpOutcome {
            previous_level,
            new_level,
            hp_gained,
        }
    }
}

/// What a rest restored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestOutcome {
    pub rest: RestType,
    pub hp_restored: i32,
    /// The hit die spent on a short rest, if any were left
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hit_die: Option<HitDieRoll>,
    pub hit_dice_regained: u32,
    pub slots_restored: u32,
}

impl RestOutcome {
    fn new(rest: RestType) -> Self {
        Self {
            rest,
            hp_restored: 0,
            hit_die: None,
            hit_dice_regained: 0,
            slots_restored: 0,
        }
    }
}

/// Short and long rests.
pub struct Rest {
    random: Arc<dyn RandomPort>,
    system: Arc<dyn GameSystem>,
}

impl Rest {
    pub fn new(random: Arc<dyn RandomPort>, system: Arc<dyn GameSystem>) -> Self {
        Self { random, system }
    }

    #[instrument(skip(self, record), fields(character_id = %record.id))]
    pub fn execute(&self, record: &mut CharacterRecord, rest: RestType) -> RestOutcome {
        *record = recalculate_with(self.system.as_ref(), record);

        let outcome = match rest {
            RestType::Short => self.short_rest(record),
            RestType::Long => self.long_rest(record),
        };

        tracing::info!(
            hp_restored = outcome.hp_restored,
            slots_restored = outcome.slots_restored,
            "Finished rest"
        );
        outcome
    }

    /// Spend one hit die to heal. Pact magic slots also come back.
    fn short_rest(&self, record: &mut CharacterRecord) -> RestOutcome {
        let mut outcome = RestOutcome::new(RestType::Short);
        let engine = self.system.calculation_engine();
        let fallback = engine.hit_die(&record.class_name);
        let con_modifier = record.modifier(Ability::Con);

        if let Some(dice) = record.hit_dice.as_mut().filter(|d| d.current > 0) {
            let mut roller = port_roller(self.random.as_ref());
            let roll = roll_hit_die(die_sides(dice, fallback), con_modifier, &mut roller);
            dice.current -= 1;
            outcome.hp_restored = record.hp.heal(roll.total);
            outcome.hit_die = Some(roll);
        } else {
            tracing::debug!("No hit dice left to spend");
        }

        let pact_caster = self
            .system
            .spellcasting_system()
            .and_then(|s| s.caster_type(&record.class_name))
            == Some(CasterType::Pact);
        if pact_caster {
            outcome.slots_restored = restore_slots(&mut record.spell_slots);
        }

        outcome
    }

    /// Full hit points, every spell slot, and half the hit dice (at least one).
    fn long_rest(&self, record: &mut CharacterRecord) -> RestOutcome {
        let mut outcome = RestOutcome::new(RestType::Long);

        outcome.hp_restored = record.hp.heal(record.hp.max);
        outcome.slots_restored = restore_slots(&mut record.spell_slots);

        if let Some(dice) = record.hit_dice.as_mut() {
            let regained = (dice.max / 2).max(1);
            let current = dice.current.saturating_add(regained).min(dice.max);
            outcome.hit_dice_regained = current - dice.current;
            dice.current = current;
        }

        outcome
    }
}

/// Faces of a hit die descriptor like "1d10".
fn die_sides(dice: &HitDice, fallback: u32) -> u32 {
    DiceExpression::parse(&dice.die)
        .terms
        .iter()
        .find_map(|term| match term {
            DiceTerm::Dice { sides, .. } => Some(*sides),
            DiceTerm::Modifier { .. } => None,
        })
        .unwrap_or(fallback)
}

fn restore_slots(slots: &mut [SpellSlot]) -> u32 {
    slots
        .iter_mut()
        .map(|slot| {
            let missing = slot.max.saturating_sub(slot.current);
            slot.restore_all();
            missing
        })
        .sum()
}
