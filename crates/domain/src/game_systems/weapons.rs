//! Weapon hints read from an item's free-text notes.
//!
//! Notes look like "1d8 slashing, Versatile" or
//! "1d6 piercing, Ammunition, Range 80/320, Two-Handed".

use std::sync::OnceLock;

use regex_lite::Regex;

use crate::entities::EquipmentItem;

/// Damage dice used when the notes name none.
pub const DEFAULT_DAMAGE_DICE: &str = "1d4";
/// Damage type used when the notes name none.
pub const DEFAULT_DAMAGE_TYPE: &str = "Damage";
/// Reach of a melee weapon, in feet.
pub const MELEE_RANGE: &str = "5";
/// Normal/long range of a ranged weapon without an explicit range.
pub const DEFAULT_RANGED_RANGE: &str = "80/320";

const DAMAGE_TYPES: [&str; 3] = ["slashing", "piercing", "bludgeoning"];

static DAMAGE_DICE_REGEX: OnceLock<Regex> = OnceLock::new();
static RANGE_REGEX: OnceLock<Regex> = OnceLock::new();
static RANGE_MARKER_REGEX: OnceLock<Regex> = OnceLock::new();
static BOW_NAME_REGEX: OnceLock<Regex> = OnceLock::new();

fn damage_dice_regex() -> &'static Regex {
    DAMAGE_DICE_REGEX.get_or_init(|| {
        Regex::new(r"(?i)\b(\d+d\d+)\b").expect("DAMAGE_DICE_REGEX pattern is invalid")
    })
}

fn range_regex() -> &'static Regex {
    RANGE_REGEX
        .get_or_init(|| Regex::new(r"\b(\d+/\d+)\b").expect("RANGE_REGEX pattern is invalid"))
}

fn range_marker_regex() -> &'static Regex {
    RANGE_MARKER_REGEX.get_or_init(|| {
        Regex::new(r"(?i)\brange\b").expect("RANGE_MARKER_REGEX pattern is invalid")
    })
}

/// Bow, Longbow, Shortbow, Crossbow, Hand Crossbow.
fn bow_name_regex() -> &'static Regex {
    BOW_NAME_REGEX.get_or_init(|| {
        Regex::new(r"(?i)\b(long|short|cross)?bows?\b")
            .expect("BOW_NAME_REGEX pattern is invalid")
    })
}

/// What the notes say about a weapon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeaponProfile {
    pub finesse: bool,
    pub ranged: bool,
    /// Dice part of the damage, e.g. "1d8"
    pub damage_dice: String,
    /// Capitalized damage type, e.g. "Piercing"
    pub damage_type: String,
    pub range: String,
    /// Remaining comma-separated note segments
    pub properties: Vec<String>,
}

impl WeaponProfile {
    /// Read a weapon's notes.
    pub fn from_item(item: &EquipmentItem) -> Self {
        let notes = item.notes_text();
        let lower_notes = notes.to_lowercase();

        let explicit_range = range_regex()
            .captures(notes)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string());

        let finesse = lower_notes.contains("finesse");
        let ranged = bow_name_regex().is_match(&item.name)
            || range_marker_regex().is_match(notes)
            || explicit_range.is_some();

        let damage_dice = damage_dice_regex()
            .captures(notes)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_lowercase())
            .unwrap_or_else(|| DEFAULT_DAMAGE_DICE.to_string());

        let damage_type = DAMAGE_TYPES
            .iter()
            .find(|kind| lower_notes.contains(*kind))
            .map(|kind| capitalize(kind))
            .unwrap_or_else(|| DEFAULT_DAMAGE_TYPE.to_string());

        let range = explicit_range.unwrap_or_else(|| {
            if ranged {
                DEFAULT_RANGED_RANGE.to_string()
            } else {
                MELEE_RANGE.to_string()
            }
        });

        let properties = notes
            .split(',')
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .filter(|segment| {
                !damage_dice_regex().is_match(segment) && !range_regex().is_match(segment)
            })
            .map(str::to_string)
            .collect();

        Self {
            finesse,
            ranged,
            damage_dice,
            damage_type,
            range,
            properties,
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_melee_weapon_notes() {
        let sword = EquipmentItem::weapon("Longsword", "1d8 slashing, Versatile");
        let profile = WeaponProfile::from_item(&sword);

        assert!(!profile.finesse);
        assert!(!profile.ranged);
        assert_eq!(profile.damage_dice, "1d8");
        assert_eq!(profile.damage_type, "Slashing");
        assert_eq!(profile.range, "5");
        assert_eq!(profile.properties, vec!["Versatile".to_string()]);
    }

    #[test]
    fn bow_in_name_marks_ranged() {
        let bow = EquipmentItem::weapon("Light Crossbow", "1D8 piercing, Loading");
        let profile = WeaponProfile::from_item(&bow);

        assert!(profile.ranged);
        assert_eq!(profile.damage_dice, "1d8");
        assert_eq!(profile.range, "80/320");
    }

    #[test]
    fn range_must_be_a_whole_word() {
        let axe = EquipmentItem::weapon("Greataxe", "1d12 slashing, Heavy, strange runes");
        let profile = WeaponProfile::from_item(&axe);

        assert!(!profile.ranged);
        assert_eq!(profile.range, "5");

        let javelin = EquipmentItem::weapon("Javelin", "1d6 piercing, Thrown (range)");
        assert!(WeaponProfile::from_item(&javelin).ranged);
    }

    #[test]
    fn only_bow_names_mark_ranged() {
        for name in ["Longbow", "Shortbow", "Hand Crossbow", "Bow"] {
            let item = EquipmentItem::weapon(name, "1d6 piercing");
            assert!(WeaponProfile::from_item(&item).ranged, "{name}");
        }
        for name in ["Elbow Spike", "Rainbow Blade", "Bowl"] {
            let item = EquipmentItem::weapon(name, "1d4 bludgeoning");
            assert!(!WeaponProfile::from_item(&item).ranged, "{name}");
        }
    }

    #[test]
    fn explicit_range_is_kept_and_not_a_property() {
        let dagger = EquipmentItem::weapon(
            "Dagger",
            "1d4 piercing, Finesse, Light, Thrown, Range 20/60",
        );
        let profile = WeaponProfile::from_item(&dagger);

        assert!(profile.finesse);
        assert!(profile.ranged);
        assert_eq!(profile.range, "20/60");
        assert_eq!(profile.properties, vec!["Finesse", "Light", "Thrown"]);
    }

    #[test]
    fn empty_notes_use_defaults() {
        let club = EquipmentItem::new("Club");
        let profile = WeaponProfile::from_item(&club);

        assert_eq!(profile.damage_dice, "1d4");
        assert_eq!(profile.damage_type, "Damage");
        assert_eq!(profile.range, "5");
        assert!(profile.properties.is_empty());
    }
}
