//! A character from creation through a few sessions of play.

use std::sync::Arc;

use grimsheet_domain::{recalculate, CharacterRecord, EquipmentItem, ItemType, RestType};
use grimsheet_engine::infrastructure::config::EngineConfig;
use grimsheet_engine::infrastructure::ports::RandomPort;
use grimsheet_engine::infrastructure::random::SeededRandom;
use grimsheet_engine::use_cases::character_sheet::NewCharacter;
use grimsheet_engine::App;
use serde_json::json;
use uuid::Uuid;

/// Always rolls the same face, clamped to the requested range.
struct Constant(i32);

impl RandomPort for Constant {
    fn gen_range(&self, min: i32, max: i32) -> i32 {
        self.0.clamp(min, max.max(min))
    }

    fn gen_uuid(&self) -> Uuid {
        Uuid::nil()
    }
}

fn app(random: impl RandomPort + 'static) -> App {
    App::with_random(EngineConfig::default(), Arc::new(random))
}

#[test]
fn cleric_levels_rests_and_casts() {
    let app = app(Constant(5));
    let sheet = &app.character_sheet;

    let mut record = sheet.create.execute(
        NewCharacter::named("Sister Ama")
            .with_class("Cleric")
            .with_race("Dwarf")
            .with_scores([12, 10, 14, 10, 16, 13]),
    );
    // d8 + CON 2
    assert_eq!(record.hp.max, 10);
    assert_eq!(record.spell_slot(1).map(|s| s.max), Some(2));

    let outcome = sheet.level_up.execute(&mut record);
    assert_eq!(outcome.new_level, 2);
    assert_eq!(outcome.hp_gained, 7);
    assert_eq!(record.hp.max, 17);
    assert_eq!(record.spell_slot(1).map(|s| s.max), Some(3));

    sheet.spell_slots.expend(&mut record, 1).unwrap();
    sheet.spell_slots.expend(&mut record, 1).unwrap();
    assert_eq!(record.spell_slot(1).map(|s| s.current), Some(1));

    record.hp.current = 3;
    let short = sheet.rest.execute(&mut record, RestType::Short);
    // 5 + CON 2
    assert_eq!(short.hp_restored, 7);
    assert_eq!(record.hp.current, 10);
    assert_eq!(record.spell_slot(1).map(|s| s.current), Some(1));

    let long = sheet.rest.execute(&mut record, RestType::Long);
    assert_eq!(long.slots_restored, 2);
    assert_eq!(record.hp.current, record.hp.max);
    assert_eq!(record.hit_dice.as_ref().map(|d| d.current), Some(2));
}

#[test]
fn equipping_gear_changes_derived_values() {
    let app = app(Constant(10));
    let mut record = app.character_sheet.create.execute(
        NewCharacter::named("Ryn")
            .with_class("Ranger")
            .with_scores([10, 16, 12, 10, 14, 8]),
    );
    assert_eq!(record.ac, 13);
    assert_eq!(record.attacks.len(), 1);

    record.inventory.items.push(
        EquipmentItem::weapon("Shortbow", "1d6 piercing, range 80/320").equipped(),
    );
    record
        .inventory
        .items
        .push(EquipmentItem::armor("Studded Leather").equipped());

    let record = app.character_sheet.recalculate.execute(&record);
    assert_eq!(record.ac, 15);

    let bow = &record.attacks[1];
    assert_eq!(bow.name, "Shortbow");
    assert_eq!(bow.bonus, 3 + 2);
    assert_eq!(bow.damage, "1d6+3");
    assert_eq!(bow.range.as_deref(), Some("80/320"));
    assert_eq!(record.inventory.equipped(ItemType::Weapon).count(), 1);
}

#[test]
fn stored_json_round_trips_through_the_engine() {
    let app = app(Constant(1));
    let stored = json!({
        "id": "abc",
        "name": "Old Save",
        "class": "Monk",
        "level": 0,
        "stats": { "DEX": { "score": 16 }, "WIS": { "score": "14" }, "CON": null },
        "skills": "not a list",
        "inventory": { "gold": "12", "items": [null, { "name": "Rope", "weight": 10 }] },
        "themeColor": "teal"
    });

    let record = app.character_sheet.recalculate.execute_json(stored);
    assert_eq!(record.level, 1);
    assert_eq!(record.ac, 10 + 3 + 2);
    assert_eq!(record.inventory.gold, 12);
    assert_eq!(record.inventory.items.len(), 1);
    assert_eq!(record.skills.len(), 18);
    assert_eq!(record.extra.get("themeColor"), Some(&json!("teal")));

    let saved = serde_json::to_value(&record).unwrap();
    assert_eq!(saved["themeColor"], json!("teal"));

    let reloaded = CharacterRecord::from_json_value(saved).unwrap();
    assert_eq!(recalculate(&reloaded), record);
}

#[test]
fn seeded_engines_create_identical_characters() {
    let a = app(SeededRandom::new(2024));
    let b = app(SeededRandom::new(2024));

    let first = a.character_sheet.create.execute(NewCharacter::named("Twin"));
    let second = b.character_sheet.create.execute(NewCharacter::named("Twin"));

    assert_eq!(first, second);
    assert_ne!(first.id, Uuid::nil().to_string());
}
