//! Dice expression parsing and rolling
//!
//! Supports multi-term expressions like "2d6+1d4+2", "1d20-3", "d8" or a
//! bare "4", advantage/disadvantage on single d20 terms, and batch rolls.
//!
//! Randomness is never drawn here directly: every die goes through a
//! [`DieRoller`] supplied by the caller, so tests can pass fixed sequences.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Most dice a single term may roll.
pub const MAX_DICE_PER_TERM: u32 = 1000;
/// Largest die size accepted.
pub const MAX_DIE_SIDES: u32 = 1000;

/// Error when parsing a dice expression strictly
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiceParseError {
    /// The expression has no tokens at all
    #[error("Empty dice expression")]
    Empty,
    /// A token is neither a dice term nor a flat modifier
    #[error("Invalid dice token: '{0}'")]
    InvalidToken(String),
    /// Die size must be between 1 and MAX_DIE_SIDES
    #[error("Die size must be between 1 and 1000")]
    InvalidDieSize,
    /// A term asks for more dice than the roller accepts
    #[error("Too many dice in one term: {count} (max {max})")]
    TooManyDice { count: u64, max: u32 },
}

/// Source of die results.
///
/// Implementations must return a value in `[1, sides]`; [`roll_die`] clamps
/// anything else back into range.
pub trait DieRoller {
    fn roll_die(&mut self, sides: u32) -> u32;
}

impl<F> DieRoller for F
where
    F: FnMut(u32) -> u32,
{
    fn roll_die(&mut self, sides: u32) -> u32 {
        self(sides)
    }
}

/// One parsed term of an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DiceTerm {
    /// `count` dice of `sides` faces; `sign` is +1 or -1
    Dice { count: u32, sides: u32, sign: i32 },
    /// Flat modifier; `value` is the magnitude, `sign` is +1 or -1
    Modifier { value: i32, sign: i32 },
}

impl DiceTerm {
    pub fn dice(count: u32, sides: u32, sign: i32) -> Self {
        Self::Dice {
            count,
            sides,
            sign: sign.signum(),
        }
    }

    pub fn modifier(value: i32) -> Self {
        Self::Modifier {
            value: value.saturating_abs(),
            sign: if value < 0 { -1 } else { 1 },
        }
    }

    /// Classify a single token such as "+2d6", "-3" or "4".
    fn from_token(token: &str) -> Result<Self, DiceParseError> {
        if let Some(caps) = dice_token_regex().captures(token) {
            let sign = sign_of(caps.get(1).map_or("", |m| m.as_str()));
            let count_str = caps.get(2).map_or("", |m| m.as_str());
            let sides_str = caps.get(3).map_or("", |m| m.as_str());

            let count = if count_str.is_empty() {
                1
            } else {
                let count: u64 = count_str.parse().map_err(|_| DiceParseError::TooManyDice {
                    count: u64::MAX,
                    max: MAX_DICE_PER_TERM,
                })?;
                if count > u64::from(MAX_DICE_PER_TERM) {
                    return Err(DiceParseError::TooManyDice {
                        count,
                        max: MAX_DICE_PER_TERM,
                    });
                }
                // "0d6" is read as a single die
                (count as u32).max(1)
            };

            let sides = sides_str
                .parse::<u32>()
                .ok()
                .filter(|sides| (1..=MAX_DIE_SIDES).contains(sides))
                .ok_or(DiceParseError::InvalidDieSize)?;

            return Ok(Self::dice(count, sides, sign));
        }

        if let Some(caps) = modifier_token_regex().captures(token) {
            let sign = sign_of(caps.get(1).map_or("", |m| m.as_str()));
            let value = caps
                .get(2)
                .and_then(|m| m.as_str().parse::<i32>().ok())
                .ok_or_else(|| DiceParseError::InvalidToken(token.to_string()))?;
            return Ok(Self::Modifier { value, sign });
        }

        Err(DiceParseError::InvalidToken(token.to_string()))
    }
}

impl fmt::Display for DiceTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = |s: i32| if s < 0 { "-" } else { "+" };
        match self {
            Self::Dice { count, sides, sign: s } => write!(f, "{}{}d{}", sign(*s), count, sides),
            Self::Modifier { value, sign: s } => write!(f, "{}{}", sign(*s), value),
        }
    }
}

static DICE_TOKEN_REGEX: OnceLock<Regex> = OnceLock::new();
static MODIFIER_TOKEN_REGEX: OnceLock<Regex> = OnceLock::new();

fn dice_token_regex() -> &'static Regex {
    DICE_TOKEN_REGEX.get_or_init(|| {
        Regex::new(r"^([+-]?)(\d*)[dD](\d+)$").expect("DICE_TOKEN_REGEX pattern is invalid")
    })
}

fn modifier_token_regex() -> &'static Regex {
    // A bare integer with no sign is a positive modifier
    MODIFIER_TOKEN_REGEX.get_or_init(|| {
        Regex::new(r"^([+-]?)(\d+)$").expect("MODIFIER_TOKEN_REGEX pattern is invalid")
    })
}

fn sign_of(symbol: &str) -> i32 {
    if symbol == "-" {
        -1
    } else {
        1
    }
}

/// Strip whitespace and split before every '+' or '-' that follows
/// something, keeping the sign with the token it introduces.
fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();

    for ch in text.chars().filter(|c| !c.is_whitespace()) {
        if (ch == '+' || ch == '-') && !current.is_empty() {
            tokens.push(std::mem::take(&mut current));
        }
        current.push(ch);
    }
    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}

/// A parsed dice expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiceExpression {
    pub terms: Vec<DiceTerm>,
    /// The text as given
    pub original: String,
}

impl DiceExpression {
    /// Parse leniently: tokens that are not dice or modifiers are dropped.
    ///
    /// Never fails; an expression with nothing usable has no terms.
    pub fn parse(text: &str) -> Self {
        let terms = tokenize(text)
            .iter()
            .filter_map(|token| DiceTerm::from_token(token).ok())
            .collect();

        Self {
            terms,
            original: text.trim().to_string(),
        }
    }

    /// Parse strictly: any unusable token is an error.
    pub fn parse_strict(text: &str) -> Result<Self, DiceParseError> {
        let tokens = tokenize(text);
        if tokens.is_empty() {
            return Err(DiceParseError::Empty);
        }

        let terms = tokens
            .iter()
            .map(|token| DiceTerm::from_token(token))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            terms,
            original: text.trim().to_string(),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Total of the flat modifier terms.
    pub fn flat_modifier(&self) -> i32 {
        self.terms.iter().fold(0i32, |acc, term| match term {
            DiceTerm::Modifier { value, sign } => acc.saturating_add(sign * value),
            DiceTerm::Dice { .. } => acc,
        })
    }
}

impl fmt::Display for DiceExpression {
    /// Normalized form, e.g. "2d6+1d4+2"
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, term) in self.terms.iter().enumerate() {
            let text = term.to_string();
            let text = if i == 0 {
                text.strip_prefix('+').unwrap_or(&text)
            } else {
                &text
            };
            f.write_str(text)?;
        }
        Ok(())
    }
}

impl FromStr for DiceExpression {
    type Err = DiceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_strict(s)
    }
}

/// How a single d20 term is rolled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RollMode {
    #[default]
    Normal,
    /// Roll two d20s, keep the higher
    Advantage,
    /// Roll two d20s, keep the lower
    Disadvantage,
}

impl fmt::Display for RollMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => write!(f, "normal"),
            Self::Advantage => write!(f, "advantage"),
            Self::Disadvantage => write!(f, "disadvantage"),
        }
    }
}

impl FromStr for RollMode {
    type Err = DiceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" | "" => Ok(Self::Normal),
            "advantage" | "adv" => Ok(Self::Advantage),
            "disadvantage" | "dis" => Ok(Self::Disadvantage),
            _ => Err(DiceParseError::InvalidToken(s.to_string())),
        }
    }
}

/// Dice rolled for one term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiceGroup {
    pub sides: u32,
    pub sign: i32,
    /// Kept results
    pub rolls: Vec<u32>,
    /// The d20 discarded by advantage or disadvantage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dropped: Option<u32>,
}

impl DiceGroup {
    /// Signed sum of the kept rolls.
    pub fn subtotal(&self) -> i32 {
        let sum = self
            .rolls
            .iter()
            .fold(0i32, |acc, r| acc.saturating_add(*r as i32));
        sum.saturating_mul(self.sign)
    }

    fn describe(&self) -> String {
        let rolls = self
            .rolls
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        match self.dropped {
            Some(dropped) => format!(
                "{}d{}[{}; dropped {}]",
                self.rolls.len(),
                self.sides,
                rolls,
                dropped
            ),
            None => format!("{}d{}[{}]", self.rolls.len(), self.sides, rolls),
        }
    }
}

/// Outcome of one roll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollResult {
    pub label: String,
    pub total: i32,
    /// The expression that was rolled, as given
    pub expression: String,
    pub dice_groups: Vec<DiceGroup>,
    /// Flat modifiers plus the caller's base modifier
    pub modifier: i32,
    pub mode: RollMode,
}

impl RollResult {
    /// Format as a breakdown string (e.g., "1d20[15] + 4 = 19")
    pub fn breakdown(&self) -> String {
        let mut out = String::new();

        for (i, group) in self.dice_groups.iter().enumerate() {
            match (i, group.sign < 0) {
                (0, true) => out.push('-'),
                (0, false) => {}
                (_, true) => out.push_str(" - "),
                (_, false) => out.push_str(" + "),
            }
            out.push_str(&group.describe());
        }

        if out.is_empty() {
            out.push_str(&self.modifier.to_string());
        } else if self.modifier > 0 {
            out.push_str(&format!(" + {}", self.modifier));
        } else if self.modifier < 0 {
            out.push_str(&format!(" - {}", self.modifier.unsigned_abs()));
        }

        format!("{} = {}", out, self.total)
    }

    fn single_d20(&self) -> Option<u32> {
        match self.dice_groups.as_slice() {
            [group] if group.sides == 20 && group.rolls.len() == 1 => group.rolls.first().copied(),
            _ => None,
        }
    }

    /// Check if this is a natural 20 on a single d20
    pub fn is_natural_20(&self) -> bool {
        self.single_d20() == Some(20)
    }

    /// Check if this is a natural 1 on a single d20
    pub fn is_natural_1(&self) -> bool {
        self.single_d20() == Some(1)
    }
}

/// One entry of a batch roll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchRollEntry {
    pub label: String,
    pub expression: String,
    #[serde(default)]
    pub base_modifier: i32,
    #[serde(default)]
    pub mode: RollMode,
}

impl BatchRollEntry {
    pub fn new(label: impl Into<String>, expression: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            expression: expression.into(),
            base_modifier: 0,
            mode: RollMode::Normal,
        }
    }

    pub fn with_modifier(mut self, base_modifier: i32) -> Self {
        self.base_modifier = base_modifier;
        self
    }

    pub fn with_mode(mut self, mode: RollMode) -> Self {
        self.mode = mode;
        self
    }
}

/// Result of spending a hit die.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HitDieRoll {
    pub roll: u32,
    /// Hit points regained, never negative
    pub total: i32,
}

/// Lenient parse returning just the terms.
pub fn parse_expression(text: &str) -> Vec<DiceTerm> {
    DiceExpression::parse(text).terms
}

/// Roll one die, always in `[1, sides]` (a zero-sided die counts as a d1).
pub fn roll_die<R>(sides: u32, roller: &mut R) -> u32
where
    R: DieRoller + ?Sized,
{
    let sides = sides.max(1);
    roller.roll_die(sides).clamp(1, sides)
}

/// Parse `expression` leniently and roll it.
pub fn roll<R>(expression: &str, base_modifier: i32, mode: RollMode, roller: &mut R) -> RollResult
where
    R: DieRoller + ?Sized,
{
    let parsed = DiceExpression::parse(expression);
    roll_expression(&parsed, &parsed.original, base_modifier, mode, roller)
}

/// Roll an already parsed expression.
pub fn roll_expression<R>(
    expression: &DiceExpression,
    label: &str,
    base_modifier: i32,
    mode: RollMode,
    roller: &mut R,
) -> RollResult
where
    R: DieRoller + ?Sized,
{
    let mut dice_total = 0i32;
    let mut modifier = base_modifier;
    let mut dice_groups = Vec::new();

    for term in &expression.terms {
        match *term {
            DiceTerm::Dice {
                count: 1,
                sides: 20,
                sign,
            } if mode != RollMode::Normal => {
                let first = roll_die(20, roller);
                let second = roll_die(20, roller);
                let (kept, dropped) = match mode {
                    RollMode::Advantage => (first.max(second), first.min(second)),
                    _ => (first.min(second), first.max(second)),
                };
                let group = DiceGroup {
                    sides: 20,
                    sign,
                    rolls: vec![kept],
                    dropped: Some(dropped),
                };
                dice_total = dice_total.saturating_add(group.subtotal());
                dice_groups.push(group);
            }
            DiceTerm::Dice { count, sides, sign } => {
                let rolls = (0..count).map(|_| roll_die(sides, roller)).collect();
                let group = DiceGroup {
                    sides,
                    sign,
                    rolls,
                    dropped: None,
                };
                dice_total = dice_total.saturating_add(group.subtotal());
                dice_groups.push(group);
            }
            DiceTerm::Modifier { value, sign } => {
                modifier = modifier.saturating_add(value.saturating_mul(sign));
            }
        }
    }

    RollResult {
        label: label.to_string(),
        total: dice_total.saturating_add(modifier),
        expression: expression.original.clone(),
        dice_groups,
        modifier,
        mode,
    }
}

/// Roll every entry in order; results line up with `entries`.
pub fn roll_batch<R>(entries: &[BatchRollEntry], roller: &mut R) -> Vec<RollResult>
where
    R: DieRoller + ?Sized,
{
    entries
        .iter()
        .map(|entry| {
            let parsed = DiceExpression::parse(&entry.expression);
            roll_expression(&parsed, &entry.label, entry.base_modifier, entry.mode, roller)
        })
        .collect()
}

/// Spend one hit die: roll it and add the CON modifier, never below zero.
pub fn roll_hit_die<R>(sides: u32, con_modifier: i32, roller: &mut R) -> HitDieRoll
where
    R: DieRoller + ?Sized,
{
    let roll = roll_die(sides, roller);
    HitDieRoll {
        roll,
        total: (roll as i32).saturating_add(con_modifier).max(0),
    }
}
