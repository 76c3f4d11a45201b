//! Engine configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! - `GRIMSHEET_LOG` - tracing filter (default: `grimsheet_engine=info`)
//! - `GRIMSHEET_DICE_SEED` - seed for reproducible rolls and ids (default: unset, system randomness)
//! - `GRIMSHEET_MAX_BATCH_SIZE` - max entries in one batch roll (default: 64)
//! - `GRIMSHEET_STRICT_DICE` - reject expressions with unparseable tokens (default: false)

use std::str::FromStr;
use std::sync::Arc;

use crate::error::EngineError;
use crate::infrastructure::ports::RandomPort;
use crate::infrastructure::random::{SeededRandom, SystemRandom};

pub const DEFAULT_LOG_FILTER: &str = "grimsheet_engine=info";
pub const DEFAULT_MAX_BATCH_SIZE: usize = 64;

/// Runtime settings for the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub log_filter: String,
    pub dice_seed: Option<u64>,
    pub max_batch_size: usize,
    pub strict_dice: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            dice_seed: None,
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
            strict_dice: false,
        }
    }
}

impl EngineConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, EngineError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from any key lookup. Missing keys take their defaults.
    ///
    /// A seed that is present but not a `u64` is an error rather than a
    /// silent fall back to unseeded rolls.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, EngineError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let dice_seed = match env("GRIMSHEET_DICE_SEED") {
            Some(raw) => Some(raw.parse::<u64>().map_err(|_| {
                EngineError::invalid_config(format!("GRIMSHEET_DICE_SEED is not a u64: {raw}"))
            })?),
            None => None,
        };

        let max_batch_size = env_or(&env, "GRIMSHEET_MAX_BATCH_SIZE", DEFAULT_MAX_BATCH_SIZE);
        if max_batch_size == 0 {
            return Err(EngineError::invalid_config(
                "GRIMSHEET_MAX_BATCH_SIZE must be at least 1",
            ));
        }

        let strict_dice = env("GRIMSHEET_STRICT_DICE")
            .map(|raw| parse_flag(&raw))
            .unwrap_or(false);

        Ok(Self {
            log_filter: env("GRIMSHEET_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
            dice_seed,
            max_batch_size,
            strict_dice,
        })
    }

    /// The random source these settings ask for.
    pub fn random(&self) -> Arc<dyn RandomPort> {
        match self.dice_seed {
            Some(seed) => Arc::new(SeededRandom::new(seed)),
            None => Arc::new(SystemRandom::new()),
        }
    }
}

/// Helper function to read a setting with default fallback
fn env_or<T, F>(env: &F, key: &str, default: T) -> T
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match env(key) {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "Unparseable setting, using default");
            default
        }),
        None => default,
    }
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = EngineConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.log_filter, "grimsheet_engine=info");
        assert_eq!(config.max_batch_size, 64);
        assert!(!config.strict_dice);
        assert!(config.dice_seed.is_none());
    }

    #[test]
    fn reads_every_key() {
        let config = EngineConfig::from_lookup(lookup(&[
            ("GRIMSHEET_LOG", "grimsheet_engine=debug"),
            ("GRIMSHEET_DICE_SEED", " 1234 "),
            ("GRIMSHEET_MAX_BATCH_SIZE", "8"),
            ("GRIMSHEET_STRICT_DICE", "TRUE"),
        ]))
        .unwrap();

        assert_eq!(config.log_filter, "grimsheet_engine=debug");
        assert_eq!(config.dice_seed, Some(1234));
        assert_eq!(config.max_batch_size, 8);
        assert!(config.strict_dice);
    }

    #[test]
    fn garbage_batch_size_falls_back() {
        let config =
            EngineConfig::from_lookup(lookup(&[("GRIMSHEET_MAX_BATCH_SIZE", "lots")])).unwrap();
        assert_eq!(config.max_batch_size, DEFAULT_MAX_BATCH_SIZE);
    }

    #[test]
    fn rejects_bad_seed_and_zero_batch() {
        let err = EngineConfig::from_lookup(lookup(&[("GRIMSHEET_DICE_SEED", "abc")])).unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfig(_)));

        let err =
            EngineConfig::from_lookup(lookup(&[("GRIMSHEET_MAX_BATCH_SIZE", "0")])).unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfig(_)));
    }

    #[test]
    fn seeded_config_gives_reproducible_random() {
        let config = EngineConfig {
            dice_seed: Some(7),
            ..EngineConfig::default()
        };
        let a = config.random();
        let b = config.random();
        assert_eq!(a.gen_range(1, 100), b.gen_range(1, 100));
    }
}
