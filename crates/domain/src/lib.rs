//! Grimsheet domain: the character record, the stat resolver, and the dice
//! engine. Pure and synchronous; randomness comes in through [`DieRoller`].

pub mod character_sheet;
pub mod common;
pub mod entities;
pub mod error;
pub mod game_systems;
pub mod value_objects;

// Re-export all entities (explicit list in entities/mod.rs)
pub use entities::{
    rebuild_slots, slots_from_table, Ability, AbilityScore, AbilityScores, Attack, CarryLoad,
    CharacterRecord, EquipmentItem, Feature, FeatureSource, HitDice, HitPoints, Inventory,
    ItemType, JournalEntry, JournalEntryType, Skill, SkillProficiency, Spell, SpellSlot,
    DEFAULT_ABILITY_SCORE, DEFAULT_LEVEL, DEFAULT_MAX_HP, DEFAULT_SPEED, MAX_ABILITY_SCORE,
    MAX_LEVEL, MAX_SPELL_LEVEL, MIN_ABILITY_SCORE, UNNAMED_SKILL,
};

pub use error::DomainError;

// Re-export game system traits and types
pub use game_systems::{
    average_hit_die, dnd5e_skill_ability, ArmorCategory, ArmorProfile, CalculationEngine,
    CasterType, Dnd5eSystem, GameSystem, RestType, SpellcastingSystem, UnarmoredDefense,
    WeaponProfile, DND5E_SKILLS,
};

// The resolver
pub use character_sheet::{recalculate, recalculate_with, sanitize_level};

// Dice engine
pub use value_objects::{
    parse_expression, roll, roll_batch, roll_die, roll_expression, roll_hit_die, BatchRollEntry,
    DiceExpression, DiceGroup, DiceParseError, DiceTerm, DieRoller, HitDieRoll, RollMode,
    RollResult, MAX_DICE_PER_TERM, MAX_DIE_SIDES,
};
