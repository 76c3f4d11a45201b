//! Value objects - Immutable objects defined by their attributes

mod dice;

pub use dice::{
    parse_expression, roll, roll_batch, roll_die, roll_expression, roll_hit_die, BatchRollEntry,
    DiceExpression, DiceGroup, DiceParseError, DiceTerm, DieRoller, HitDieRoll, RollMode,
    RollResult, MAX_DICE_PER_TERM, MAX_DIE_SIDES,
};
