//! Domain entities - The character record and its parts

mod ability;
mod character;
mod item;
mod skill;
mod spell;

pub use ability::{
    Ability, AbilityScore, AbilityScores, DEFAULT_ABILITY_SCORE, MAX_ABILITY_SCORE,
    MIN_ABILITY_SCORE,
};
pub use character::{
    CarryLoad, CharacterRecord, Feature, FeatureSource, HitDice, HitPoints, Inventory,
    JournalEntry, JournalEntryType, DEFAULT_LEVEL, DEFAULT_MAX_HP, DEFAULT_SPEED, MAX_LEVEL,
};
pub use item::{Attack, EquipmentItem, ItemType};
pub use skill::{Skill, SkillProficiency, UNNAMED_SKILL};
pub use spell::{rebuild_slots, slots_from_table, Spell, SpellSlot, MAX_SPELL_LEVEL};
