//! Spell slots and known spells on the character sheet

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::common::lenient;
use crate::error::DomainError;

/// Highest spell level a slot can have.
pub const MAX_SPELL_LEVEL: u8 = 9;

/// Slots available at one spell level.
///
/// `current` is spent and regained by the player; `max` comes from the class
/// table. `current` never exceeds `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpellSlot {
    #[serde(default, deserialize_with = "lenient::number")]
    pub level: u8,
    #[serde(default, deserialize_with = "lenient::number")]
    pub max: u32,
    #[serde(default, deserialize_with = "lenient::number")]
    pub current: u32,
}

impl SpellSlot {
    /// A full block of slots.
    pub fn new(level: u8, max: u32) -> Self {
        Self {
            level,
            max,
            current: max,
        }
    }

    pub fn has_slots(&self) -> bool {
        self.current > 0
    }

    /// Spend one slot. Fails when none are left.
    pub fn expend(&mut self) -> Result<(), DomainError> {
        if self.current == 0 {
            return Err(DomainError::no_spell_slots(self.level));
        }
        self.current -= 1;
        Ok(())
    }

    /// Regain up to `amount` slots.
    pub fn restore(&mut self, amount: u32) {
        self.current = self.current.saturating_add(amount).min(self.max);
    }

    pub fn restore_all(&mut self) {
        self.current = self.max;
    }

    /// Pull `current` back under `max`.
    pub fn clamp(&mut self) {
        self.current = self.current.min(self.max);
    }
}

/// Build slot blocks from a level -> max table, full.
pub fn slots_from_table(table: &BTreeMap<u8, u32>) -> Vec<SpellSlot> {
    table
        .iter()
        .filter(|(_, max)| **max > 0)
        .map(|(level, max)| SpellSlot::new(*level, *max))
        .collect()
}

/// Rebuild slot maxima from a new table, keeping the number of slots already
/// spent at each level.
pub fn rebuild_slots(existing: &[SpellSlot], table: &BTreeMap<u8, u32>) -> Vec<SpellSlot> {
    slots_from_table(table)
        .into_iter()
        .map(|mut slot| {
            if let Some(old) = existing.iter().find(|s| s.level == slot.level) {
                let spent = old.max.saturating_sub(old.current);
                slot.current = slot.max.saturating_sub(spent);
            }
            slot
        })
        .collect()
}

/// A spell the character knows or has prepared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spell {
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    /// 0 for cantrips
    #[serde(default, deserialize_with = "lenient::number")]
    pub level: u8,
    #[serde(
        default,
        deserialize_with = "lenient::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub school: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub casting_time: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub prepared: bool,
}

impl Spell {
    pub fn is_cantrip(&self) -> bool {
        self.level == 0
    }
}
