//! Application composition.

use std::sync::Arc;

use grimsheet_domain::{Dnd5eSystem, GameSystem};

use crate::infrastructure::config::EngineConfig;
use crate::infrastructure::ports::RandomPort;
use crate::use_cases::{self, character_sheet, dice};

/// Every use case, wired to one random source and one rules system.
pub struct App {
    pub config: EngineConfig,
    pub character_sheet: use_cases::CharacterSheetUseCases,
    pub dice: use_cases::DiceUseCases,
}

impl App {
    /// Wire up with the random source the config asks for.
    pub fn new(config: EngineConfig) -> Self {
        let random = config.random();
        Self::with_random(config, random)
    }

    pub fn with_random(config: EngineConfig, random: Arc<dyn RandomPort>) -> Self {
        let system: Arc<dyn GameSystem> = Arc::new(Dnd5eSystem::new());

        let character_sheet = use_cases::CharacterSheetUseCases::new(
            Arc::new(character_sheet::CreateCharacter::new(
                random.clone(),
                system.clone(),
            )),
            Arc::new(character_sheet::RecalculateCharacter::new(system.clone())),
            Arc::new(character_sheet::LevelUp::new(system.clone())),
            Arc::new(character_sheet::SpellSlots::new()),
            Arc::new(character_sheet::Rest::new(random.clone(), system)),
        );

        let roll = Arc::new(dice::RollDice::new(
            random,
            config.max_batch_size,
            config.strict_dice,
        ));
        let dice = use_cases::DiceUseCases::new(
            roll.clone(),
            Arc::new(dice::RollInitiative::new(roll)),
        );

        tracing::debug!(
            seeded = config.dice_seed.is_some(),
            strict_dice = config.strict_dice,
            "Engine wired"
        );

        Self {
            config,
            character_sheet,
            dice,
        }
    }
}
