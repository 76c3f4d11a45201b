//! Character record - the aggregate the sheet is built around
//!
//! A `CharacterRecord` carries both raw, player-authored values (scores,
//! level, class, inventory) and the values the resolver derives from them
//! (modifiers, saves, skills, armor class, attacks, passive perception).
//! Records loaded from storage go through the lenient field helpers, so a
//! partial or corrupted document still produces a usable sheet.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::common::lenient;
use crate::entities::skill::skills_or_roster;
use crate::entities::{
    Ability, AbilityScores, Attack, EquipmentItem, ItemType, Skill, Spell, SpellSlot,
};
use crate::error::DomainError;

/// Level used when a stored level is missing or unusable.
pub const DEFAULT_LEVEL: u32 = 1;
/// Highest character level.
pub const MAX_LEVEL: u32 = 20;
/// Hit points used when a stored maximum is missing or not positive.
pub const DEFAULT_MAX_HP: i32 = 10;
/// Walking speed in feet used when none is stored.
pub const DEFAULT_SPEED: i32 = 30;

/// Current and maximum hit points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HitPoints {
    #[serde(default = "default_max_hp", deserialize_with = "hit_point_value")]
    pub current: i32,
    #[serde(default = "default_max_hp", deserialize_with = "hit_point_value")]
    pub max: i32,
}

impl Default for HitPoints {
    fn default() -> Self {
        Self::full(DEFAULT_MAX_HP)
    }
}

impl HitPoints {
    pub fn full(max: i32) -> Self {
        Self { current: max, max }
    }

    /// Heal up to the maximum, returning the amount actually restored.
    pub fn heal(&mut self, amount: i32) -> i32 {
        let before = self.current;
        self.current = self.current.saturating_add(amount.max(0)).min(self.max);
        self.current - before
    }
}

fn default_max_hp() -> i32 {
    DEFAULT_MAX_HP
}

/// Garbage hit points load as the default pool, not as an unconscious 0.
fn hit_point_value<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(lenient::number_or(&value, DEFAULT_MAX_HP))
}

/// Pool of hit dice spent on short rests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HitDice {
    #[serde(default, deserialize_with = "lenient::number")]
    pub current: u32,
    #[serde(default, deserialize_with = "lenient::number")]
    pub max: u32,
    /// Die descriptor, e.g. "1d10"
    #[serde(default, deserialize_with = "lenient::text")]
    pub die: String,
}

impl HitDice {
    /// A full pool for a character of `level` with `sides`-sided hit dice.
    pub fn for_level(level: u32, sides: u32) -> Self {
        Self {
            current: level,
            max: level,
            die: format!("1d{}", sides),
        }
    }
}

/// Encumbrance band derived from carried weight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CarryLoad {
    #[default]
    Light,
    Medium,
    Heavy,
}

impl CarryLoad {
    /// Band for `weight` pounds carried by a character with `strength` score.
    pub fn for_weight(weight: f64, strength: i32) -> Self {
        let strength = f64::from(strength.max(0));
        if weight > strength * 10.0 {
            Self::Heavy
        } else if weight > strength * 5.0 {
            Self::Medium
        } else {
            Self::Light
        }
    }
}

impl fmt::Display for CarryLoad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Light => write!(f, "Light"),
            Self::Medium => write!(f, "Medium"),
            Self::Heavy => write!(f, "Heavy"),
        }
    }
}

impl FromStr for CarryLoad {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "medium" => Ok(Self::Medium),
            "heavy" => Ok(Self::Heavy),
            _ => Err(DomainError::parse(format!("Unknown carry load: {}", s))),
        }
    }
}

/// Gold, items, and the derived load band.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inventory {
    #[serde(default, deserialize_with = "lenient::number")]
    pub gold: i64,
    #[serde(default, deserialize_with = "lenient::list")]
    pub items: Vec<EquipmentItem>,
    #[serde(default, deserialize_with = "lenient::parsed")]
    pub load: CarryLoad,
}

impl Inventory {
    pub fn total_weight(&self) -> f64 {
        self.items.iter().map(EquipmentItem::total_weight).sum()
    }

    /// Equipped items of the given type, in inventory order.
    pub fn equipped(&self, item_type: ItemType) -> impl Iterator<Item = &EquipmentItem> {
        self.items
            .iter()
            .filter(move |item| item.is_equipped_as(item_type))
    }
}

/// Where a feature comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeatureSource {
    Race,
    Class,
    Background,
    Feat,
}

impl FromStr for FeatureSource {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "race" => Ok(Self::Race),
            "class" => Ok(Self::Class),
            "background" => Ok(Self::Background),
            "feat" => Ok(Self::Feat),
            _ => Err(DomainError::parse(format!("Unknown feature source: {}", s))),
        }
    }
}

/// A racial trait, class feature, background feature, or feat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feature {
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(
        default,
        deserialize_with = "lenient::optional_parsed",
        skip_serializing_if = "Option::is_none"
    )]
    pub source: Option<FeatureSource>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub full_text: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JournalEntryType {
    #[default]
    Note,
    Npc,
    Location,
    Summary,
}

impl FromStr for JournalEntryType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "note" => Ok(Self::Note),
            "npc" => Ok(Self::Npc),
            "location" => Ok(Self::Location),
            "summary" => Ok(Self::Summary),
            _ => Err(DomainError::parse(format!("Unknown journal entry type: {}", s))),
        }
    }
}

/// A campaign journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    #[serde(default, deserialize_with = "lenient::text")]
    pub id: String,
    /// Milliseconds since the Unix epoch
    #[serde(default, deserialize_with = "lenient::number")]
    pub timestamp: i64,
    #[serde(rename = "type", default, deserialize_with = "lenient::parsed")]
    pub entry_type: JournalEntryType,
    #[serde(default, deserialize_with = "lenient::text")]
    pub content: String,
    #[serde(default, deserialize_with = "lenient::list")]
    pub tags: Vec<String>,
}

/// The full character sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterRecord {
    // Identity
    #[serde(default, deserialize_with = "lenient::text")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub nickname: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub race: String,
    #[serde(rename = "class", default, deserialize_with = "lenient::text")]
    pub class_name: String,
    #[serde(
        default,
        deserialize_with = "lenient::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub background: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub alignment: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub campaign: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub portrait_url: String,
    #[serde(default = "default_level", deserialize_with = "lenient::number")]
    pub level: u32,

    // Abilities and vitals
    #[serde(default, deserialize_with = "lenient::record")]
    pub stats: AbilityScores,
    #[serde(default, deserialize_with = "lenient::record")]
    pub hp: HitPoints,
    #[serde(default, deserialize_with = "lenient::number")]
    pub ac: i32,
    #[serde(default, deserialize_with = "lenient::number")]
    pub initiative: i32,
    #[serde(default = "default_speed", deserialize_with = "lenient::number")]
    pub speed: i32,
    #[serde(default, deserialize_with = "lenient::number")]
    pub passive_perception: i32,

    // Lists
    #[serde(default = "Skill::standard_roster", deserialize_with = "skills_or_roster")]
    pub skills: Vec<Skill>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub attacks: Vec<Attack>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub features: Vec<Feature>,
    #[serde(default, deserialize_with = "lenient::record")]
    pub inventory: Inventory,
    #[serde(default, deserialize_with = "lenient::list")]
    pub spell_slots: Vec<SpellSlot>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub spells: Vec<Spell>,
    #[serde(
        default,
        deserialize_with = "lenient::optional_record",
        skip_serializing_if = "Option::is_none"
    )]
    pub hit_dice: Option<HitDice>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub journal: Vec<JournalEntry>,

    /// Fields this crate does not model, kept so they survive a save
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_level() -> u32 {
    DEFAULT_LEVEL
}

fn default_speed() -> i32 {
    DEFAULT_SPEED
}

impl Default for CharacterRecord {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            nickname: String::new(),
            race: String::new(),
            class_name: String::new(),
            background: None,
            alignment: None,
            campaign: None,
            portrait_url: String::new(),
            level: DEFAULT_LEVEL,
            stats: AbilityScores::default(),
            hp: HitPoints::default(),
            ac: 0,
            initiative: 0,
            speed: DEFAULT_SPEED,
            passive_perception: 0,
            skills: Skill::standard_roster(),
            attacks: Vec::new(),
            features: Vec::new(),
            inventory: Inventory::default(),
            spell_slots: Vec::new(),
            spells: Vec::new(),
            hit_dice: None,
            journal: Vec::new(),
            extra: Map::new(),
        }
    }
}

impl CharacterRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_class(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = class_name.into();
        self
    }

    pub fn with_race(mut self, race: impl Into<String>) -> Self {
        self.race = race.into();
        self
    }

    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    pub fn with_stats(mut self, stats: AbilityScores) -> Self {
        self.stats = stats;
        self
    }

    pub fn with_item(mut self, item: EquipmentItem) -> Self {
        self.inventory.items.push(item);
        self
    }

    /// Load a stored document, coercing bad fields to defaults.
    ///
    /// Only a document that is not a JSON object at all is rejected.
    pub fn from_json_value(value: Value) -> Result<Self, DomainError> {
        if !value.is_object() {
            return Err(DomainError::parse("character record must be a JSON object"));
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Parse and load a stored document from text.
    pub fn from_json_str(json: &str) -> Result<Self, DomainError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_json_value(value)
    }

    /// Stored modifier of an ability.
    pub fn modifier(&self, ability: Ability) -> i32 {
        self.stats.modifier(ability)
    }

    /// Skill entry by case-insensitive name.
    pub fn skill(&self, name: &str) -> Option<&Skill> {
        self.skills
            .iter()
            .find(|skill| skill.name.eq_ignore_ascii_case(name))
    }

    pub fn spell_slot(&self, level: u8) -> Option<&SpellSlot> {
        self.spell_slots.iter().find(|slot| slot.level == level)
    }

    pub fn spell_slot_mut(&mut self, level: u8) -> Option<&mut SpellSlot> {
        self.spell_slots.iter_mut().find(|slot| slot.level == level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn garbage_hit_points_load_as_default_pool() {
        let record = CharacterRecord::from_json_value(json!({
            "hp": { "current": "x", "max": 30 }
        }))
        .unwrap();
        assert_eq!(record.hp, HitPoints { current: 10, max: 30 });

        let downed = CharacterRecord::from_json_value(json!({
            "hp": { "current": "0", "max": 30 }
        }))
        .unwrap();
        assert_eq!(downed.hp.current, 0);
    }

    #[test]
    fn empty_object_loads_with_defaults() {
        let record = CharacterRecord::from_json_value(json!({})).unwrap();

        assert_eq!(record.level, 1);
        assert_eq!(record.speed, 30);
        assert_eq!(record.hp, HitPoints::full(10));
        assert_eq!(record.stats.dex.score, 10);
        assert_eq!(record.skills.len(), 18);
        assert_eq!(record.inventory.gold, 0);
        assert!(record.hit_dice.is_none());
    }

    #[test]
    fn non_object_is_rejected() {
        assert!(CharacterRecord::from_json_value(json!([1, 2])).is_err());
        assert!(CharacterRecord::from_json_value(json!(null)).is_err());
        assert!(CharacterRecord::from_json_str("not json").is_err());
    }

    #[test]
    fn adversarial_fields_are_coerced() {
        let record = CharacterRecord::from_json_value(json!({
            "name": "Vex",
            "class": "Rogue",
            "level": "3",
            "stats": { "DEX": { "score": "18" }, "STR": 12 },
            "skills": "none",
            "features": null,
            "journal": [{ "content": "Met the duke", "type": "npc" }, 42],
            "inventory": { "gold": "lots", "items": [{ "name": "Dagger", "type": "Weapon" }, null] },
            "hitDice": "d8"
        }))
        .unwrap();

        assert_eq!(record.class_name, "Rogue");
        assert_eq!(record.level, 3);
        assert_eq!(record.stats.dex.score, 18);
        assert_eq!(record.stats.str.score, 10);
        assert_eq!(record.skills.len(), 18);
        assert!(record.features.is_empty());
        assert_eq!(record.journal.len(), 1);
        assert_eq!(record.journal[0].entry_type, JournalEntryType::Npc);
        assert_eq!(record.inventory.gold, 0);
        assert_eq!(record.inventory.items.len(), 1);
        assert!(record.hit_dice.is_none());
    }

    #[test]
    fn unknown_fields_survive_a_round_trip() {
        let record = CharacterRecord::from_json_value(json!({
            "name": "Vex",
            "ownerUid": "abc123",
            "sharedWith": ["p1", "p2"]
        }))
        .unwrap();

        assert_eq!(record.extra.get("ownerUid"), Some(&json!("abc123")));

        let saved = serde_json::to_value(&record).unwrap();
        assert_eq!(saved["ownerUid"], json!("abc123"));
        assert_eq!(saved["sharedWith"], json!(["p1", "p2"]));
        assert_eq!(saved["class"], json!(""));
    }

    #[test]
    fn carry_load_bands() {
        assert_eq!(CarryLoad::for_weight(75.0, 15), CarryLoad::Light);
        assert_eq!(CarryLoad::for_weight(76.0, 15), CarryLoad::Medium);
        assert_eq!(CarryLoad::for_weight(151.0, 15), CarryLoad::Heavy);
    }

    #[test]
    fn heal_caps_at_max() {
        let mut hp = HitPoints { current: 3, max: 10 };
        assert_eq!(hp.heal(4), 4);
        assert_eq!(hp.heal(20), 3);
        assert_eq!(hp.current, 10);
    }
}
