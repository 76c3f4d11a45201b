//! Grimsheet - command line entry point.
//!
//! Every command prints JSON on stdout; logs go to stderr.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use grimsheet_domain::RollMode;
use grimsheet_engine::infrastructure::config::EngineConfig;
use grimsheet_engine::use_cases::character_sheet::NewCharacter;
use grimsheet_engine::use_cases::dice::Combatant;
use grimsheet_engine::App;
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Character sheet and dice tools
#[derive(Parser, Debug)]
#[command(name = "grimsheet")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Recalculate every derived value of a stored character
    Recalc {
        /// Character JSON file
        path: PathBuf,
    },
    /// Create a new level 1 character
    Create {
        name: String,
        #[arg(short, long = "class")]
        class_name: Option<String>,
        #[arg(short, long)]
        race: Option<String>,
    },
    /// Roll a dice expression, e.g. "2d6+3"
    Roll {
        expression: String,
        /// Added to the total
        #[arg(default_value_t = 0, allow_negative_numbers = true)]
        modifier: i32,
        #[arg(long, conflicts_with = "disadvantage")]
        advantage: bool,
        #[arg(long)]
        disadvantage: bool,
    },
    /// Roll initiative, e.g. "Goblin:+2 Mira:3"
    Initiative {
        #[arg(required = true, allow_hyphen_values = true)]
        combatants: Vec<Combatant>,
    },
}

fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let config = EngineConfig::from_env()?;

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let app = App::new(config);

    match args.command {
        Command::Recalc { path } => {
            tracing::info!(path = %path.display(), "Recalculating character");
            let json = std::fs::read_to_string(&path)?;
            let record = app.character_sheet.recalculate.execute_json_str(&json)?;
            print_json(&record)
        }
        Command::Create {
            name,
            class_name,
            race,
        } => {
            let request = NewCharacter {
                name,
                class_name,
                race,
                scores: None,
            };
            print_json(&app.character_sheet.create.execute(request))
        }
        Command::Roll {
            expression,
            modifier,
            advantage,
            disadvantage,
        } => {
            let mode = match (advantage, disadvantage) {
                (true, _) => RollMode::Advantage,
                (_, true) => RollMode::Disadvantage,
                _ => RollMode::Normal,
            };
            let result = app.dice.roll.roll(&expression, modifier, mode)?;
            print_json(&result)
        }
        Command::Initiative { combatants } => {
            print_json(&app.dice.initiative.execute(&combatants)?)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
