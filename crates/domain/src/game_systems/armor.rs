//! Armor lookup by item name.
//!
//! Armor is identified by matching canonical substrings of the normalized item
//! name against a fixed table. This is a best-effort heuristic: items are
//! free-text, so a name the table does not recognize falls back to an "AC N"
//! hint in the notes, and failing that to a base of 10 with full DEX.

use std::sync::OnceLock;

use regex_lite::Regex;

use crate::entities::{Ability, EquipmentItem};

/// Flat AC added by an equipped shield.
pub const SHIELD_BONUS: i32 = 2;
/// DEX cap for medium armor.
pub const MEDIUM_ARMOR_DEX_CAP: i32 = 2;
/// Base AC with no armor.
pub const UNARMORED_BASE_AC: i32 = 10;

/// Weight class of body armor, deciding how much DEX applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArmorCategory {
    /// Full DEX modifier
    Light,
    /// DEX modifier capped at +2
    Medium,
    /// No DEX modifier
    Heavy,
}

impl ArmorCategory {
    pub fn dex_bonus(&self, dex_modifier: i32) -> i32 {
        match self {
            Self::Light => dex_modifier,
            Self::Medium => dex_modifier.min(MEDIUM_ARMOR_DEX_CAP),
            Self::Heavy => 0,
        }
    }
}

/// Resolved AC contribution of a piece of body armor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArmorProfile {
    /// Table key that matched, or "unrecognized"
    pub key: &'static str,
    pub base_ac: i32,
    pub category: ArmorCategory,
}

impl ArmorProfile {
    pub fn armor_class(&self, dex_modifier: i32) -> i32 {
        self.base_ac + self.category.dex_bonus(dex_modifier)
    }
}

/// Unarmored defense: 10 + DEX + a secondary ability while wearing no armor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnarmoredDefense {
    pub secondary: Ability,
    /// Whether the feature survives carrying a shield
    pub allows_shield: bool,
}

/// Ordered so longer names win over names they contain ("studded leather"
/// before "leather", "half plate" and "breastplate" before "plate").
const ARMOR_TABLE: &[(&str, ArmorCategory, i32)] = &[
    ("studded", ArmorCategory::Light, 12),
    ("padded", ArmorCategory::Light, 11),
    ("leather", ArmorCategory::Light, 11),
    ("chain shirt", ArmorCategory::Medium, 13),
    ("breastplate", ArmorCategory::Medium, 14),
    ("half plate", ArmorCategory::Medium, 15),
    ("scale", ArmorCategory::Medium, 14),
    ("hide", ArmorCategory::Medium, 12),
    ("ring mail", ArmorCategory::Heavy, 14),
    ("chain mail", ArmorCategory::Heavy, 16),
    ("splint", ArmorCategory::Heavy, 17),
    ("plate", ArmorCategory::Heavy, 18),
];

static AC_HINT_REGEX: OnceLock<Regex> = OnceLock::new();

fn ac_hint_regex() -> &'static Regex {
    AC_HINT_REGEX.get_or_init(|| {
        Regex::new(r"(?i)\bAC\s*:?\s*(\d{1,2})\b").expect("AC hint pattern is invalid")
    })
}

/// Lowercase, treat '-' and '_' as spaces, collapse runs of whitespace.
pub fn normalize_armor_name(name: &str) -> String {
    name.to_lowercase()
        .replace(['-', '_'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Look up a piece of body armor.
pub fn lookup_armor(item: &EquipmentItem) -> ArmorProfile {
    let normalized = normalize_armor_name(&item.name);

    if let Some(&(key, category, base_ac)) = ARMOR_TABLE
        .iter()
        .find(|(key, _, _)| normalized.contains(key))
    {
        return ArmorProfile {
            key,
            base_ac,
            category,
        };
    }

    let hinted = ac_hint_regex()
        .captures(item.notes_text())
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<i32>().ok());

    ArmorProfile {
        key: "unrecognized",
        base_ac: hinted.unwrap_or(UNARMORED_BASE_AC),
        category: ArmorCategory::Light,
    }
}

/// Unarmored defense features by class.
pub fn unarmored_defense_for(class_name: &str) -> Option<UnarmoredDefense> {
    match class_name.trim().to_lowercase().as_str() {
        "barbarian" => Some(UnarmoredDefense {
            secondary: Ability::Con,
            allows_shield: true,
        }),
        "monk" => Some(UnarmoredDefense {
            secondary: Ability::Wis,
            allows_shield: false,
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn armor(name: &str) -> EquipmentItem {
        EquipmentItem::armor(name).equipped()
    }

    #[test]
    fn longer_names_win() {
        assert_eq!(lookup_armor(&armor("Studded Leather")).base_ac, 12);
        assert_eq!(lookup_armor(&armor("Leather Armor")).base_ac, 11);
        assert_eq!(lookup_armor(&armor("Half-Plate")).base_ac, 15);
        assert_eq!(lookup_armor(&armor("Breastplate")).base_ac, 14);
        assert_eq!(lookup_armor(&armor("Plate Armor")).base_ac, 18);
        assert_eq!(lookup_armor(&armor("Chain Shirt")).base_ac, 13);
        assert_eq!(lookup_armor(&armor("Chain Mail")).base_ac, 16);
    }

    #[test]
    fn categories_cap_dex() {
        assert_eq!(lookup_armor(&armor("Leather")).armor_class(4), 15);
        assert_eq!(lookup_armor(&armor("Scale Mail")).armor_class(4), 16);
        assert_eq!(lookup_armor(&armor("Scale Mail")).armor_class(-1), 13);
        assert_eq!(lookup_armor(&armor("Splint")).armor_class(3), 17);
        assert_eq!(lookup_armor(&armor("Plate")).armor_class(-2), 18);
    }

    #[test]
    fn unknown_armor_uses_notes_hint() {
        let mithral = armor("Elven Mithral Coat").with_notes("Magical, AC 15");
        let profile = lookup_armor(&mithral);
        assert_eq!(profile.key, "unrecognized");
        assert_eq!(profile.armor_class(2), 17);

        let robe = armor("Robe of Stars");
        assert_eq!(lookup_armor(&robe).armor_class(2), 12);
    }

    #[test]
    fn unarmored_defense_classes() {
        assert_eq!(
            unarmored_defense_for(" Barbarian ").map(|u| u.secondary),
            Some(Ability::Con)
        );
        assert!(!unarmored_defense_for("monk").unwrap().allows_shield);
        assert!(unarmored_defense_for("Fighter").is_none());
    }
}
