//! Game system traits for rules-specific calculations.
//!
//! The resolver is written against these traits rather than against a
//! concrete rules table, so the formulas and lookup tables of a system live
//! in one place.

use std::collections::BTreeMap;

use crate::entities::{Ability, AbilityScores, Attack, EquipmentItem, SkillProficiency};
use crate::game_systems::armor::{ArmorProfile, UnarmoredDefense};

/// Core trait all game systems must implement.
pub trait GameSystem: Send + Sync {
    /// Get the calculation engine for this system.
    fn calculation_engine(&self) -> &dyn CalculationEngine;

    /// Optional: Get the spellcasting system if this system has spellcasting.
    fn spellcasting_system(&self) -> Option<&dyn SpellcastingSystem> {
        None
    }
}

/// Calculation rules that vary per game system.
pub trait CalculationEngine: Send + Sync {
    /// Calculate ability modifier from score.
    fn ability_modifier(&self, score: i32) -> i32;

    /// Calculate proficiency bonus from character level.
    fn proficiency_bonus(&self, level: u32) -> i32;

    /// Governing ability of a known skill, `None` for unknown names.
    fn skill_ability(&self, skill_name: &str) -> Option<Ability>;

    /// Calculate skill check modifier.
    fn skill_modifier(
        &self,
        ability_modifier: i32,
        proficiency_bonus: i32,
        proficiency: SkillProficiency,
    ) -> i32 {
        ability_modifier + proficiency_bonus * proficiency.multiplier()
    }

    /// Calculate saving throw modifier.
    fn saving_throw_modifier(
        &self,
        ability_modifier: i32,
        proficiency_bonus: i32,
        proficient: bool,
    ) -> i32 {
        if proficient {
            ability_modifier + proficiency_bonus
        } else {
            ability_modifier
        }
    }

    /// Identify a worn armor item.
    ///
    /// Returns a fallback profile for armor the tables do not know, so a
    /// character in unrecognized armor still counts as armored.
    fn armor_profile(&self, item: &EquipmentItem) -> ArmorProfile;

    /// Class feature granting AC from a secondary ability when unarmored.
    fn unarmored_defense(&self, class_name: &str) -> Option<UnarmoredDefense>;

    /// Calculate Armor Class.
    ///
    /// `stats` must already carry derived modifiers.
    fn calculate_ac(
        &self,
        stats: &AbilityScores,
        armor: Option<&ArmorProfile>,
        shield: bool,
        unarmored: Option<UnarmoredDefense>,
    ) -> i32;

    /// The baseline attack every character has.
    fn unarmed_strike(&self, stats: &AbilityScores, proficiency_bonus: i32) -> Attack;

    /// Attack line for an equipped weapon.
    fn weapon_attack(
        &self,
        weapon: &EquipmentItem,
        stats: &AbilityScores,
        proficiency_bonus: i32,
    ) -> Attack;

    /// Calculate passive perception from the Perception check modifier.
    fn passive_perception(&self, perception_modifier: i32) -> i32 {
        10 + perception_modifier
    }

    /// Get the hit die size for a class.
    fn hit_die(&self, class_name: &str) -> u32;

    /// Calculate max HP for a character taking average rolls after level 1.
    fn calculate_max_hp(
        &self,
        level: u32,
        class_name: &str,
        constitution_modifier: i32,
        additional_hp: i32,
    ) -> i32;
}

/// For systems with spellcasting.
pub trait SpellcastingSystem: Send + Sync {
    /// Get the caster type for a class (if it has spellcasting).
    fn caster_type(&self, class: &str) -> Option<CasterType>;

    /// Spell slot maxima by spell level for a class at a given level.
    fn spell_slots(&self, class: &str, level: u32) -> BTreeMap<u8, u32>;
}

/// Type of spellcaster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CasterType {
    /// Full caster (Wizard, Cleric, Druid, Sorcerer, Bard)
    Full,
    /// Half caster (Paladin, Ranger)
    Half,
    /// Third caster (Eldritch Knight, Arcane Trickster)
    Third,
    /// Pact magic (Warlock)
    Pact,
}

/// Rest type for resource recovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RestType {
    /// Short rest (typically 1 hour)
    Short,
    /// Long rest (typically 8 hours)
    Long,
}
