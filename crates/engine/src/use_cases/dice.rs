//! Dice use cases: free-form rolls, batches, and initiative order.

use std::str::FromStr;
use std::sync::Arc;

use grimsheet_domain::{
    roll_batch, roll_die, roll_expression, BatchRollEntry, DiceExpression, DomainError, RollMode,
    RollResult,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::port_roller;
use crate::error::EngineError;
use crate::infrastructure::ports::RandomPort;

/// Container for dice use cases.
pub struct DiceUseCases {
    pub roll: Arc<RollDice>,
    pub initiative: Arc<RollInitiative>,
}

impl DiceUseCases {
    pub fn new(roll: Arc<RollDice>, initiative: Arc<RollInitiative>) -> Self {
        Self { roll, initiative }
    }
}

/// Roll dice expressions against the injected random source.
///
/// In strict mode an expression with any unparseable token is rejected
/// instead of being rolled without it.
pub struct RollDice {
    random: Arc<dyn RandomPort>,
    max_batch_size: usize,
    strict: bool,
}

impl RollDice {
    pub fn new(random: Arc<dyn RandomPort>, max_batch_size: usize, strict: bool) -> Self {
        Self {
            random,
            max_batch_size,
            strict,
        }
    }

    pub fn parse(&self, expression: &str) -> Result<DiceExpression, EngineError> {
        if self.strict {
            let parsed = DiceExpression::parse_strict(expression).map_err(DomainError::from)?;
            Ok(parsed)
        } else {
            Ok(DiceExpression::parse(expression))
        }
    }

    #[instrument(skip(self))]
    pub fn roll(
        &self,
        expression: &str,
        base_modifier: i32,
        mode: RollMode,
    ) -> Result<RollResult, EngineError> {
        let parsed = self.parse(expression)?;
        let mut roller = port_roller(self.random.as_ref());
        let result = roll_expression(&parsed, &parsed.original, base_modifier, mode, &mut roller);

        tracing::debug!(total = result.total, breakdown = %result.breakdown(), "Rolled dice");
        Ok(result)
    }

    /// Roll every entry in order. Nothing is rolled if any entry is rejected.
    #[instrument(skip(self, entries), fields(count = entries.len()))]
    pub fn roll_batch(&self, entries: &[BatchRollEntry]) -> Result<Vec<RollResult>, EngineError> {
        if entries.len() > self.max_batch_size {
            tracing::warn!(max = self.max_batch_size, "Rejected oversized batch roll");
            return Err(EngineError::BatchTooLarge {
                len: entries.len(),
                max: self.max_batch_size,
            });
        }
        if self.strict {
            for entry in entries {
                self.parse(&entry.expression)?;
            }
        }

        let mut roller = port_roller(self.random.as_ref());
        let results = roll_batch(entries, &mut roller);

        tracing::debug!(count = results.len(), "Rolled batch");
        Ok(results)
    }

    /// A single die, always in `[1, sides]`.
    pub fn roll_die(&self, sides: u32) -> u32 {
        let mut roller = port_roller(self.random.as_ref());
        roll_die(sides, &mut roller)
    }
}

/// A creature joining initiative, e.g. `Goblin:+2`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combatant {
    pub name: String,
    #[serde(default)]
    pub bonus: i32,
}

impl Combatant {
    pub fn new(name: impl Into<String>, bonus: i32) -> Self {
        Self {
            name: name.into(),
            bonus,
        }
    }
}

impl FromStr for Combatant {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, bonus) = match s.rsplit_once(':') {
            Some((name, bonus)) => {
                let bonus = bonus
                    .trim()
                    .parse::<i32>()
                    .map_err(|_| DomainError::parse(format!("Invalid initiative bonus: {s}")))?;
                (name, bonus)
            }
            None => (s, 0),
        };

        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("Combatant name cannot be empty"));
        }
        Ok(Self::new(name, bonus))
    }
}

/// One line of the initiative order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitiativeEntry {
    pub name: String,
    pub bonus: i32,
    pub total: i32,
    pub roll: RollResult,
}

/// Roll initiative for a group and sort it into turn order.
pub struct RollInitiative {
    dice: Arc<RollDice>,
}

impl RollInitiative {
    pub fn new(dice: Arc<RollDice>) -> Self {
        Self { dice }
    }

    /// Highest total first; ties go to the higher bonus, then to whoever was
    /// listed first.
    #[instrument(skip(self, combatants), fields(count = combatants.len()))]
    pub fn execute(&self, combatants: &[Combatant]) -> Result<Vec<InitiativeEntry>, EngineError> {
        let entries: Vec<BatchRollEntry> = combatants
            .iter()
            .map(|c| BatchRollEntry::new(c.name.clone(), "1d20").with_modifier(c.bonus))
            .collect();

        let mut order: Vec<InitiativeEntry> = combatants
            .iter()
            .zip(self.dice.roll_batch(&entries)?)
            .map(|(combatant, roll)| InitiativeEntry {
                name: combatant.name.clone(),
                bonus: combatant.bonus,
                total: roll.total,
                roll,
            })
            .collect();

        // Stable sort keeps input order for full ties
        order.sort_by(|a, b| b.total.cmp(&a.total).then(b.bonus.cmp(&a.bonus)));

        tracing::debug!(
            first = order.first().map(|e| e.name.as_str()).unwrap_or(""),
            "Rolled initiative"
        );
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::MockRandomPort;
    use crate::infrastructure::random::{FixedRandom, SequenceRandom};
    use mockall::predicate::eq;

    fn dice(random: impl RandomPort + 'static, strict: bool) -> RollDice {
        RollDice::new(Arc::new(random), 64, strict)
    }

    #[test]
    fn roll_adds_modifier_to_forced_die() {
        let result = dice(FixedRandom(15), false)
            .roll("1d20", 4, RollMode::Normal)
            .unwrap();

        assert_eq!(result.total, 19);
        assert_eq!(result.breakdown(), "1d20[15] + 4 = 19");
    }

    #[test]
    fn advantage_asks_for_exactly_two_d20s() {
        let mut random = MockRandomPort::new();
        let mut rolls = vec![16, 7].into_iter();
        random
            .expect_gen_range()
            .with(eq(1), eq(20))
            .times(2)
            .returning(move |_, _| rolls.next().unwrap_or(1));

        let result = dice(random, false)
            .roll("1d20", 0, RollMode::Advantage)
            .unwrap();

        assert_eq!(result.total, 16);
        assert_eq!(result.dice_groups[0].dropped, Some(7));
    }

    #[test]
    fn lenient_mode_skips_garbage_strict_mode_rejects_it() {
        let lenient = dice(FixedRandom(3), false).roll("1d6+banana", 0, RollMode::Normal);
        assert_eq!(lenient.unwrap().total, 3);

        let strict = dice(FixedRandom(3), true).roll("1d6+banana", 0, RollMode::Normal);
        assert!(strict.unwrap_err().is_dice_parse());
    }

    #[test]
    fn batch_keeps_order_and_labels() {
        let roller = dice(SequenceRandom::new([4, 11]), false);
        let results = roller
            .roll_batch(&[
                BatchRollEntry::new("A", "1d6"),
                BatchRollEntry::new("B", "1d20").with_modifier(2),
            ])
            .unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].label, "A");
        assert_eq!(results[0].total, 4);
        assert_eq!(results[1].label, "B");
        assert_eq!(results[1].total, 13);
    }

    #[test]
    fn batch_limit_is_enforced_before_rolling() {
        let mut random = MockRandomPort::new();
        random.expect_gen_range().never();
        let roller = RollDice::new(Arc::new(random), 2, false);

        let entries = vec![BatchRollEntry::new("x", "1d6"); 3];
        let err = roller.roll_batch(&entries).unwrap_err();
        assert!(matches!(err, EngineError::BatchTooLarge { len: 3, max: 2 }));
    }

    #[test]
    fn strict_batch_rolls_nothing_when_one_entry_is_bad() {
        let mut random = MockRandomPort::new();
        random.expect_gen_range().never();
        let roller = dice(random, true);

        let err = roller
            .roll_batch(&[
                BatchRollEntry::new("ok", "1d6"),
                BatchRollEntry::new("bad", "1d6+x"),
            ])
            .unwrap_err();
        assert!(err.is_dice_parse());
    }

    #[test]
    fn roll_die_is_clamped() {
        assert_eq!(dice(FixedRandom(99), false).roll_die(6), 6);
        assert_eq!(dice(FixedRandom(-5), false).roll_die(6), 1);
    }

    #[test]
    fn combatant_parsing() {
        assert_eq!("Goblin:+2".parse::<Combatant>().unwrap(), Combatant::new("Goblin", 2));
        assert_eq!("Ogre:-1".parse::<Combatant>().unwrap(), Combatant::new("Ogre", -1));
        assert_eq!("Mira".parse::<Combatant>().unwrap(), Combatant::new("Mira", 0));
        assert!("Bandit:lots".parse::<Combatant>().is_err());
        assert!(":3".parse::<Combatant>().is_err());
    }

    #[test]
    fn initiative_sorts_by_total_then_bonus_then_input_order() {
        // Rolls in input order: 10, 12, 11, 12
        let roller = Arc::new(dice(SequenceRandom::new([10, 12, 11, 12]), false));
        let initiative = RollInitiative::new(roller);

        let order = initiative
            .execute(&[
                Combatant::new("Ana", 3),   // 13
                Combatant::new("Bo", 1),    // 13
                Combatant::new("Cy", 2),    // 13
                Combatant::new("Dee", 1),   // 13
            ])
            .unwrap();

        let names: Vec<&str> = order.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["Ana", "Cy", "Bo", "Dee"]);
        assert!(order.iter().all(|e| e.total == 13));
    }

    #[test]
    fn initiative_respects_batch_limit() {
        let roller = Arc::new(RollDice::new(Arc::new(FixedRandom(10)), 1, false));
        let err = RollInitiative::new(roller)
            .execute(&[Combatant::new("A", 0), Combatant::new("B", 0)])
            .unwrap_err();
        assert!(matches!(err, EngineError::BatchTooLarge { .. }));
    }
}
