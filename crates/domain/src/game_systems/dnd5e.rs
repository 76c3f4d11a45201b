//! D&D 5th Edition rules tables and formulas.

use std::collections::BTreeMap;

use super::armor::{self, ArmorProfile, UnarmoredDefense, SHIELD_BONUS, UNARMORED_BASE_AC};
use super::traits::{CalculationEngine, CasterType, GameSystem, SpellcastingSystem};
use super::weapons::WeaponProfile;
use crate::entities::{Ability, AbilityScores, Attack, EquipmentItem, MAX_LEVEL};

/// The eighteen standard skills and their governing abilities.
pub const DND5E_SKILLS: &[(&str, Ability)] = &[
    ("Acrobatics", Ability::Dex),
    ("Animal Handling", Ability::Wis),
    ("Arcana", Ability::Int),
    ("Athletics", Ability::Str),
    ("Deception", Ability::Cha),
    ("History", Ability::Int),
    ("Insight", Ability::Wis),
    ("Intimidation", Ability::Cha),
    ("Investigation", Ability::Int),
    ("Medicine", Ability::Wis),
    ("Nature", Ability::Int),
    ("Perception", Ability::Wis),
    ("Performance", Ability::Cha),
    ("Persuasion", Ability::Cha),
    ("Religion", Ability::Int),
    ("Sleight of Hand", Ability::Dex),
    ("Stealth", Ability::Dex),
    ("Survival", Ability::Wis),
];

/// D&D 5th Edition game system.
pub struct Dnd5eSystem;

impl Default for Dnd5eSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Dnd5eSystem {
    /// Create a new D&D 5e system instance.
    pub fn new() -> Self {
        Self
    }
}

impl GameSystem for Dnd5eSystem {
    fn calculation_engine(&self) -> &dyn CalculationEngine {
        self
    }

    fn spellcasting_system(&self) -> Option<&dyn SpellcastingSystem> {
        Some(self)
    }
}

impl CalculationEngine for Dnd5eSystem {
    fn ability_modifier(&self, score: i32) -> i32 {
        // Floor division: 9 -> -1, not 0
        (score - 10).div_euclid(2)
    }

    fn proficiency_bonus(&self, level: u32) -> i32 {
        let level = level.clamp(1, MAX_LEVEL) as i32;
        (level + 3) / 4 + 1
    }

    fn skill_ability(&self, skill_name: &str) -> Option<Ability> {
        skill_ability(skill_name)
    }

    fn armor_profile(&self, item: &EquipmentItem) -> ArmorProfile {
        armor::lookup_armor(item)
    }

    fn unarmored_defense(&self, class_name: &str) -> Option<UnarmoredDefense> {
        armor::unarmored_defense_for(class_name)
    }

    fn calculate_ac(
        &self,
        stats: &AbilityScores,
        armor: Option<&ArmorProfile>,
        shield: bool,
        unarmored: Option<UnarmoredDefense>,
    ) -> i32 {
        let dex_mod = stats.modifier(Ability::Dex);

        let base_ac = match (armor, unarmored) {
            (Some(armor), _) => armor.armor_class(dex_mod),
            (None, Some(feature)) if !shield || feature.allows_shield => {
                UNARMORED_BASE_AC + dex_mod + stats.modifier(feature.secondary)
            }
            (None, _) => UNARMORED_BASE_AC + dex_mod,
        };

        if shield {
            base_ac + SHIELD_BONUS
        } else {
            base_ac
        }
    }

    fn unarmed_strike(&self, stats: &AbilityScores, proficiency_bonus: i32) -> Attack {
        let str_mod = stats.modifier(Ability::Str);
        Attack {
            name: "Unarmed Strike".to_string(),
            bonus: str_mod + proficiency_bonus,
            damage: (1 + str_mod).max(1).to_string(),
            damage_type: "Bludgeoning".to_string(),
            range: None,
            properties: Vec::new(),
        }
    }

    fn weapon_attack(
        &self,
        weapon: &EquipmentItem,
        stats: &AbilityScores,
        proficiency_bonus: i32,
    ) -> Attack {
        let profile = WeaponProfile::from_item(weapon);
        let str_mod = stats.modifier(Ability::Str);
        let dex_mod = stats.modifier(Ability::Dex);

        let ability_mod = if (profile.finesse || profile.ranged) && dex_mod >= str_mod {
            dex_mod
        } else {
            str_mod
        };

        Attack {
            name: weapon.name.clone(),
            bonus: ability_mod + proficiency_bonus,
            damage: format!("{}{:+}", profile.damage_dice, ability_mod),
            damage_type: profile.damage_type,
            range: Some(profile.range),
            properties: profile.properties,
        }
    }

    fn hit_die(&self, class_name: &str) -> u32 {
        match class_name.trim().to_lowercase().as_str() {
            "barbarian" => 12,
            "fighter" | "paladin" | "ranger" => 10,
            "bard" | "cleric" | "druid" | "monk" | "rogue" | "warlock" => 8,
            "sorcerer" | "wizard" => 6,
            _ => 8, // Default to d8
        }
    }

    fn calculate_max_hp(
        &self,
        level: u32,
        class_name: &str,
        constitution_modifier: i32,
        additional_hp: i32,
    ) -> i32 {
        let hit_die = self.hit_die(class_name) as i32;
        let level = level.clamp(1, MAX_LEVEL) as i32;
        // First level: max hit die + CON mod
        // Subsequent levels: average (rounded up) + CON mod per level
        let first_level_hp = hit_die + constitution_modifier;
        let subsequent_hp = (level - 1) * (average_hit_die(hit_die) + constitution_modifier);

        (first_level_hp + subsequent_hp + additional_hp).max(1)
    }
}

impl SpellcastingSystem for Dnd5eSystem {
    fn caster_type(&self, class: &str) -> Option<CasterType> {
        match class.trim().to_lowercase().as_str() {
            "wizard" | "cleric" | "druid" | "sorcerer" | "bard" => Some(CasterType::Full),
            "paladin" | "ranger" => Some(CasterType::Half),
            "warlock" => Some(CasterType::Pact),
            "eldritch knight" | "arcane trickster" => Some(CasterType::Third),
            _ => None,
        }
    }

    fn spell_slots(&self, class: &str, level: u32) -> BTreeMap<u8, u32> {
        match self.caster_type(class) {
            Some(CasterType::Full) => table_slots(FULL_CASTER_SLOTS, level),
            Some(CasterType::Half) => table_slots(HALF_CASTER_SLOTS, level),
            Some(CasterType::Third) => table_slots(THIRD_CASTER_SLOTS, level),
            Some(CasterType::Pact) => warlock_slots(level),
            None => BTreeMap::new(),
        }
    }
}

/// Average of a hit die, rounded up (d8 -> 5).
pub fn average_hit_die(sides: i32) -> i32 {
    sides / 2 + 1
}

// Spell slot progression tables: character level -> slots per spell level

type SlotTable = &'static [(u32, &'static [u32])];

const FULL_CASTER_SLOTS: SlotTable = &[
    (1, &[2]),
    (2, &[3]),
    (3, &[4, 2]),
    (4, &[4, 3]),
    (5, &[4, 3, 2]),
    (6, &[4, 3, 3]),
    (7, &[4, 3, 3, 1]),
    (8, &[4, 3, 3, 2]),
    (9, &[4, 3, 3, 3, 1]),
    (10, &[4, 3, 3, 3, 2]),
    (11, &[4, 3, 3, 3, 2, 1]),
    (12, &[4, 3, 3, 3, 2, 1]),
    (13, &[4, 3, 3, 3, 2, 1, 1]),
    (14, &[4, 3, 3, 3, 2, 1, 1]),
    (15, &[4, 3, 3, 3, 2, 1, 1, 1]),
    (16, &[4, 3, 3, 3, 2, 1, 1, 1]),
    (17, &[4, 3, 3, 3, 2, 1, 1, 1, 1]),
    (18, &[4, 3, 3, 3, 3, 1, 1, 1, 1]),
    (19, &[4, 3, 3, 3, 3, 2, 1, 1, 1]),
    (20, &[4, 3, 3, 3, 3, 2, 2, 1, 1]),
];

// Half casters get slots at half rate (starting at level 2)
const HALF_CASTER_SLOTS: SlotTable = &[
    (2, &[2]),
    (3, &[3]),
    (4, &[3]),
    (5, &[4, 2]),
    (6, &[4, 2]),
    (7, &[4, 3]),
    (8, &[4, 3]),
    (9, &[4, 3, 2]),
    (10, &[4, 3, 2]),
    (11, &[4, 3, 3]),
    (12, &[4, 3, 3]),
    (13, &[4, 3, 3, 1]),
    (14, &[4, 3, 3, 1]),
    (15, &[4, 3, 3, 2]),
    (16, &[4, 3, 3, 2]),
    (17, &[4, 3, 3, 3, 1]),
    (18, &[4, 3, 3, 3, 1]),
    (19, &[4, 3, 3, 3, 2]),
    (20, &[4, 3, 3, 3, 2]),
];

const THIRD_CASTER_SLOTS: SlotTable = &[
    (3, &[2]),
    (4, &[3]),
    (5, &[3]),
    (6, &[3]),
    (7, &[4, 2]),
    (8, &[4, 2]),
    (9, &[4, 2]),
    (10, &[4, 3]),
    (11, &[4, 3]),
    (12, &[4, 3]),
    (13, &[4, 3, 2]),
    (14, &[4, 3, 2]),
    (15, &[4, 3, 2]),
    (16, &[4, 3, 3]),
    (17, &[4, 3, 3]),
    (18, &[4, 3, 3]),
    (19, &[4, 3, 3, 1]),
    (20, &[4, 3, 3, 1]),
];

fn table_slots(table: SlotTable, level: u32) -> BTreeMap<u8, u32> {
    table
        .iter()
        .find(|(l, _)| *l == level)
        .map(|(_, slots)| {
            slots
                .iter()
                .zip(1u8..)
                .map(|(&count, spell_level)| (spell_level, count))
                .collect()
        })
        .unwrap_or_default()
}

fn warlock_slots(level: u32) -> BTreeMap<u8, u32> {
    // Pact magic: few slots, all of the highest available level
    let (count, slot_level) = match level {
        1 => (1, 1),
        2 => (2, 1),
        3..=4 => (2, 2),
        5..=6 => (2, 3),
        7..=8 => (2, 4),
        9..=10 => (2, 5),
        11..=16 => (3, 5),
        17..=20 => (4, 5),
        _ => (0, 0),
    };

    if count > 0 {
        BTreeMap::from([(slot_level, count)])
    } else {
        BTreeMap::new()
    }
}

/// Get the skill's governing ability for D&D 5e.
pub fn skill_ability(skill: &str) -> Option<Ability> {
    let skill = skill.trim();
    DND5E_SKILLS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(skill))
        .map(|(_, ability)| *ability)
}
