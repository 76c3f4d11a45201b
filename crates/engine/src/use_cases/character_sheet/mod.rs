//! Character sheet use cases.
//!
//! Handles character creation, recalculation of derived values, and the
//! bookkeeping that happens between sessions: levelling, spell slots, rests.

mod create;
mod progression;

pub use create::{CreateCharacter, NewCharacter, STANDARD_ARRAY};
pub use progression::{LevelUp, LevelUpOutcome, Rest, RestOutcome};

use std::sync::Arc;

use grimsheet_domain::{recalculate_with, CharacterRecord, DomainError, GameSystem, SpellSlot};
use serde_json::Value;
use tracing::instrument;

use crate::error::EngineError;

// =============================================================================
// Use Cases
// =============================================================================

/// Container for character sheet use cases.
pub struct CharacterSheetUseCases {
    pub create: Arc<CreateCharacter>,
    pub recalculate: Arc<RecalculateCharacter>,
    pub level_up: Arc<LevelUp>,
    pub spell_slots: Arc<SpellSlots>,
    pub rest: Arc<Rest>,
}

impl CharacterSheetUseCases {
    pub fn new(
        create: Arc<CreateCharacter>,
        recalculate: Arc<RecalculateCharacter>,
        level_up: Arc<LevelUp>,
        spell_slots: Arc<SpellSlots>,
        rest: Arc<Rest>,
    ) -> Self {
        Self {
            create,
            recalculate,
            level_up,
            spell_slots,
            rest,
        }
    }
}

/// Bring every derived value of a sheet in line with its raw values.
pub struct RecalculateCharacter {
    system: Arc<dyn GameSystem>,
}

impl RecalculateCharacter {
    pub fn new(system: Arc<dyn GameSystem>) -> Self {
        Self { system }
    }

    #[instrument(skip(self, record), fields(character_id = %record.id))]
    pub fn execute(&self, record: &CharacterRecord) -> CharacterRecord {
        let out = recalculate_with(self.system.as_ref(), record);
        tracing::debug!(
            level = out.level,
            ac = out.ac,
            initiative = out.initiative,
            "Recalculated character"
        );
        out
    }

    /// Recalculate a stored document.
    ///
    /// A document that is not a JSON object cannot be a character; it is
    /// replaced by a default sheet so the caller always has something to show.
    pub fn execute_json(&self, value: Value) -> CharacterRecord {
        let record = match CharacterRecord::from_json_value(value) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(error = %e, "Stored character unusable, starting from defaults");
                CharacterRecord::default()
            }
        };
        self.execute(&record)
    }

    /// Recalculate raw JSON text. Text that is not JSON at all is an error.
    pub fn execute_json_str(&self, json: &str) -> Result<CharacterRecord, EngineError> {
        let value: Value = serde_json::from_str(json)?;
        Ok(self.execute_json(value))
    }
}

/// Spend and regain spell slots.
pub struct SpellSlots;

impl SpellSlots {
    pub fn new() -> Self {
        Self
    }

    /// Spend one slot of `level`, returning the slot as it now stands.
    #[instrument(skip(self, record), fields(character_id = %record.id))]
    pub fn expend(&self, record: &mut CharacterRecord, level: u8) -> Result<SpellSlot, EngineError> {
        let slot = record
            .spell_slot_mut(level)
            .ok_or(DomainError::no_spell_slots(level))?;
        slot.expend()?;

        tracing::debug!(remaining = slot.current, "Expended spell slot");
        Ok(*slot)
    }

    /// Regain one slot of `level`; a full block stays full.
    #[instrument(skip(self, record), fields(character_id = %record.id))]
    pub fn restore(&self, record: &mut CharacterRecord, level: u8) -> Result<SpellSlot, EngineError> {
        let slot = record
            .spell_slot_mut(level)
            .ok_or(DomainError::no_spell_slots(level))?;
        slot.restore(1);
        Ok(*slot)
    }
}

impl Default for SpellSlots {
    fn default() -> Self {
        Self::new()
    }
}
