//! Unified error types for the domain layer
//!
//! The stat resolver is total and never returns these; they surface from the
//! strict dice parser, record loading, and spell-slot bookkeeping.

use thiserror::Error;

use crate::value_objects::DiceParseError;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Validation failed (e.g., invalid field values)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Parse error (for value objects and stored documents)
    #[error("Parse error: {0}")]
    Parse(String),

    /// Spell slot bookkeeping was asked for a level the character lacks
    #[error("No spell slots of level {level}")]
    NoSpellSlots { level: u8 },
}

impl DomainError {
    /// Creates a validation error for business rule violations.
    ///
    /// # Example
    /// ```ignore
    /// if entries.len() > max {
    ///     return Err(DomainError::validation("too many batch entries"));
    /// }
    /// ```
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Creates a parse error for string-to-type conversion failures.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create a missing spell slot error
    pub fn no_spell_slots(level: u8) -> Self {
        Self::NoSpellSlots { level }
    }
}

impl From<DiceParseError> for DomainError {
    fn from(err: DiceParseError) -> Self {
        Self::Parse(err.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}
