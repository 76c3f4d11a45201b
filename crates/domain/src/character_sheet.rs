//! Stat resolver - derives every dependent field of a character sheet
//!
//! `recalculate` takes a record with raw values (scores, level, class,
//! inventory) and possibly stale derived values, and returns a record in
//! which every derived value agrees with the raw ones. It never fails:
//! unusable input is replaced by safe defaults, and running it on its own
//! output changes nothing.
//!
//! The steps run in a fixed order because later ones read what earlier ones
//! wrote (skills read modifiers, passive perception reads skills, and so on).

use crate::entities::{
    slots_from_table, Ability, AbilityScore, CarryLoad, CharacterRecord, HitDice, ItemType,
    SpellSlot, DEFAULT_LEVEL, DEFAULT_MAX_HP, MAX_LEVEL, UNNAMED_SKILL,
};
use crate::game_systems::{CalculationEngine, Dnd5eSystem, GameSystem};

/// Recalculate with the D&D 5e rules.
pub fn recalculate(record: &CharacterRecord) -> CharacterRecord {
    recalculate_with(&Dnd5eSystem::new(), record)
}

/// Recalculate with the given rules.
pub fn recalculate_with(system: &dyn GameSystem, record: &CharacterRecord) -> CharacterRecord {
    let engine = system.calculation_engine();
    let mut out = record.clone();

    out.level = sanitize_level(out.level);
    let proficiency = engine.proficiency_bonus(out.level);

    derive_abilities(engine, &mut out, proficiency);
    derive_skills(engine, &mut out, proficiency);
    out.ac = derive_armor_class(engine, &out);
    derive_attacks(engine, &mut out, proficiency);
    derive_spell_slots(system, &mut out);

    out.passive_perception = engine.passive_perception(
        out.skill("Perception")
            .map(|skill| skill.modifier)
            .unwrap_or_else(|| out.modifier(Ability::Wis)),
    );
    out.initiative = out.modifier(Ability::Dex);

    derive_vitals(engine, &mut out);

    out.inventory.load = CarryLoad::for_weight(out.inventory.total_weight(), out.stats.str.score);

    out
}

/// Missing or zero levels become 1; anything past the cap is clamped.
pub fn sanitize_level(level: u32) -> u32 {
    if level == 0 {
        DEFAULT_LEVEL
    } else {
        level.min(MAX_LEVEL)
    }
}

fn derive_abilities(engine: &dyn CalculationEngine, record: &mut CharacterRecord, proficiency: i32) {
    for ability in Ability::ALL {
        let stat = record.stats.get_mut(ability);
        stat.score = AbilityScore::sanitize_score(stat.score);
        stat.modifier = engine.ability_modifier(stat.score);
        stat.save = engine.saving_throw_modifier(stat.modifier, proficiency, stat.proficient_save);
    }
}

fn derive_skills(engine: &dyn CalculationEngine, record: &mut CharacterRecord, proficiency: i32) {
    let stats = record.stats.clone();
    for skill in &mut record.skills {
        if skill.name.trim().is_empty() {
            skill.name = UNNAMED_SKILL.to_string();
        }
        // Known skills always use the canonical ability
        if let Some(ability) = engine.skill_ability(&skill.name) {
            skill.ability = ability;
        }
        skill.modifier =
            engine.skill_modifier(stats.modifier(skill.ability), proficiency, skill.proficiency);
    }
}

fn derive_armor_class(engine: &dyn CalculationEngine, record: &CharacterRecord) -> i32 {
    let mut shield = false;
    let mut body_armor = None;

    for item in record.inventory.equipped(ItemType::Armor) {
        if item.is_shield() {
            shield = true;
        } else if body_armor.is_none() {
            body_armor = Some(engine.armor_profile(item));
        }
    }

    let unarmored = engine.unarmored_defense(&record.class_name);
    engine.calculate_ac(&record.stats, body_armor.as_ref(), shield, unarmored)
}

fn derive_attacks(engine: &dyn CalculationEngine, record: &mut CharacterRecord, proficiency: i32) {
    let mut attacks = vec![engine.unarmed_strike(&record.stats, proficiency)];
    attacks.extend(
        record
            .inventory
            .equipped(ItemType::Weapon)
            .map(|weapon| engine.weapon_attack(weapon, &record.stats, proficiency)),
    );
    record.attacks = attacks;
}

fn derive_spell_slots(system: &dyn GameSystem, record: &mut CharacterRecord) {
    if record.spell_slots.is_empty() {
        if record.class_name.trim().is_empty() {
            return;
        }
        if let Some(spellcasting) = system.spellcasting_system() {
            let table = spellcasting.spell_slots(&record.class_name, record.level);
            record.spell_slots = slots_from_table(&table);
        }
    } else {
        record.spell_slots.iter_mut().for_each(SpellSlot::clamp);
    }
}

fn derive_vitals(engine: &dyn CalculationEngine, record: &mut CharacterRecord) {
    if record.hp.max <= 0 {
        record.hp.max = DEFAULT_MAX_HP;
    }
    record.hp.current = record.hp.current.clamp(0, record.hp.max);

    let hit_die = engine.hit_die(&record.class_name);
    match record.hit_dice.as_mut() {
        None => record.hit_dice = Some(HitDice::for_level(record.level, hit_die)),
        Some(dice) => {
            dice.current = dice.current.min(dice.max);
            if dice.die.trim().is_empty() {
                dice.die = format!("1d{}", hit_die);
            }
        }
    }
}
