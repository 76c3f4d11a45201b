//! Use cases - User story orchestration.
//!
//! Each module contains use cases for a specific domain area. Randomness
//! always arrives through [`RandomPort`]; the domain never sees the process
//! generator.

pub mod character_sheet;
pub mod dice;

pub use character_sheet::CharacterSheetUseCases;
pub use dice::DiceUseCases;

use crate::infrastructure::ports::RandomPort;

/// Adapt a random port to the domain's die-rolling closure.
pub(crate) fn port_roller(random: &dyn RandomPort) -> impl FnMut(u32) -> u32 + '_ {
    move |sides| {
        let max = i32::try_from(sides).unwrap_or(i32::MAX);
        u32::try_from(random.gen_range(1, max)).unwrap_or(1)
    }
}
