//! Equipment items carried in a character's inventory
//!
//! Rules hints (damage dice, damage type, range, armor class) live in the
//! free-text `notes`, e.g. "1d8 slashing, Finesse, Range 80/320". The game
//! system reads them with best-effort pattern matching.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::common::lenient;
use crate::error::DomainError;

/// Broad category of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemType {
    Weapon,
    Armor,
    Gear,
    Consumable,
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Weapon => write!(f, "Weapon"),
            Self::Armor => write!(f, "Armor"),
            Self::Gear => write!(f, "Gear"),
            Self::Consumable => write!(f, "Consumable"),
        }
    }
}

impl FromStr for ItemType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "weapon" => Ok(Self::Weapon),
            "armor" | "armour" => Ok(Self::Armor),
            "gear" => Ok(Self::Gear),
            "consumable" => Ok(Self::Consumable),
            _ => Err(DomainError::parse(format!("Unknown item type: {}", s))),
        }
    }
}

/// An item in the inventory.
///
/// Only `equipped` items typed `Armor` or `Weapon` feed armor class and attacks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentItem {
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(default = "default_quantity", deserialize_with = "lenient::number")]
    pub quantity: u32,
    #[serde(
        default,
        deserialize_with = "lenient::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub notes: Option<String>,
    /// Cost in gold pieces
    #[serde(
        default,
        deserialize_with = "lenient::optional_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub cost: Option<f64>,
    /// Weight in pounds, per unit
    #[serde(
        default,
        deserialize_with = "lenient::optional_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub weight: Option<f64>,
    #[serde(
        rename = "type",
        default,
        deserialize_with = "lenient::optional_parsed",
        skip_serializing_if = "Option::is_none"
    )]
    pub item_type: Option<ItemType>,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub equipped: bool,
}

fn default_quantity() -> u32 {
    1
}

impl EquipmentItem {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity: 1,
            notes: None,
            cost: None,
            weight: None,
            item_type: None,
            equipped: false,
        }
    }

    pub fn weapon(name: impl Into<String>, notes: impl Into<String>) -> Self {
        Self::new(name)
            .with_type(ItemType::Weapon)
            .with_notes(notes)
    }

    pub fn armor(name: impl Into<String>) -> Self {
        Self::new(name).with_type(ItemType::Armor)
    }

    pub fn with_type(mut self, item_type: ItemType) -> Self {
        self.item_type = Some(item_type);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn equipped(mut self) -> Self {
        self.equipped = true;
        self
    }

    /// Equipped and of the given type.
    pub fn is_equipped_as(&self, item_type: ItemType) -> bool {
        self.equipped && self.item_type == Some(item_type)
    }

    pub fn is_shield(&self) -> bool {
        self.name.to_ascii_lowercase().contains("shield")
    }

    /// Notes text, empty when absent.
    pub fn notes_text(&self) -> &str {
        self.notes.as_deref().unwrap_or_default()
    }

    /// Total carried weight for the stack.
    pub fn total_weight(&self) -> f64 {
        self.weight.unwrap_or(0.0).max(0.0) * f64::from(self.quantity)
    }
}

/// An attack line derived from equipment.
///
/// Attack lists are regenerated on every recalculation; edits do not stick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attack {
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    /// To-hit modifier
    #[serde(default, deserialize_with = "lenient::number")]
    pub bonus: i32,
    /// Damage dice and signed modifier, e.g. "1d8+3"
    #[serde(default, deserialize_with = "lenient::text")]
    pub damage: String,
    /// Damage type, e.g. "Slashing"
    #[serde(rename = "type", default, deserialize_with = "lenient::text")]
    pub damage_type: String,
    #[serde(
        default,
        deserialize_with = "lenient::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub range: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::list",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub properties: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn item_type_parses_case_insensitively() {
        assert_eq!("weapon".parse::<ItemType>().unwrap(), ItemType::Weapon);
        assert_eq!("Armour".parse::<ItemType>().unwrap(), ItemType::Armor);
        assert!("trinket".parse::<ItemType>().is_err());
    }

    #[test]
    fn item_loads_with_type_key_and_defaults() {
        let item: EquipmentItem = serde_json::from_value(json!({
            "name": "Longsword",
            "type": "Weapon",
            "notes": "1d8 slashing, Versatile",
            "equipped": true
        }))
        .unwrap();

        assert_eq!(item.quantity, 1);
        assert!(item.is_equipped_as(ItemType::Weapon));
        assert!(!item.is_equipped_as(ItemType::Armor));
    }

    #[test]
    fn unknown_type_loads_as_untyped() {
        let item: EquipmentItem = serde_json::from_value(json!({
            "name": "Lucky Coin",
            "type": "Trinket",
            "weight": "0.1"
        }))
        .unwrap();

        assert_eq!(item.item_type, None);
        assert_eq!(item.weight, Some(0.1));
    }

    #[test]
    fn total_weight_multiplies_quantity() {
        let arrows = EquipmentItem::new("Arrows")
            .with_quantity(20)
            .with_weight(0.05);
        assert!((arrows.total_weight() - 1.0).abs() < 1e-9);
        assert_eq!(EquipmentItem::new("Rope").total_weight(), 0.0);
    }
}
