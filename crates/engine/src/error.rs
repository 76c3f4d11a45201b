//! Engine error type.

use grimsheet_domain::DomainError;
use thiserror::Error;

/// Errors surfaced by engine use cases and configuration.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A domain rule was violated.
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// A stored document could not be read as JSON at all.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Batch of {len} rolls exceeds the limit of {max}")]
    BatchTooLarge { len: usize, max: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl EngineError {
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Check if this error came from rejecting a dice expression.
    pub fn is_dice_parse(&self) -> bool {
        matches!(self, Self::Domain(DomainError::Parse(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grimsheet_domain::DiceParseError;

    #[test]
    fn dice_parse_errors_pass_through_domain() {
        let err: EngineError = DomainError::from(DiceParseError::InvalidDieSize).into();
        assert!(err.is_dice_parse());
        assert!(err.to_string().starts_with("Domain error: Parse error:"));
    }

    #[test]
    fn batch_limit_message() {
        let err = EngineError::BatchTooLarge { len: 70, max: 64 };
        assert_eq!(err.to_string(), "Batch of 70 rolls exceeds the limit of 64");
        assert!(!err.is_dice_parse());
    }
}
