//! Game system rules.
//!
//! The resolver only talks to the traits in `traits.rs`; `dnd5e` supplies
//! the formulas and tables, with armor and weapon heuristics split out into
//! their own modules.

mod armor;
mod dnd5e;
mod traits;
mod weapons;

pub use armor::{
    lookup_armor, normalize_armor_name, unarmored_defense_for, ArmorCategory, ArmorProfile,
    UnarmoredDefense, MEDIUM_ARMOR_DEX_CAP, SHIELD_BONUS, UNARMORED_BASE_AC,
};
pub use dnd5e::{average_hit_die, skill_ability as dnd5e_skill_ability, Dnd5eSystem, DND5E_SKILLS};
pub use traits::{CalculationEngine, CasterType, GameSystem, RestType, SpellcastingSystem};
pub use weapons::{
    WeaponProfile, DEFAULT_DAMAGE_DICE, DEFAULT_DAMAGE_TYPE, DEFAULT_RANGED_RANGE, MELEE_RANGE,
};
