//! Ruleset errors.
//!
//! Errors raised when the status catalog or a unit's special definition is
//! inconsistent. The engine cannot resolve a battle against broken rules, so
//! these are fatal.

use crate::error::{ErrorSeverity, GameError};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RulesetError {
    /// A status code was referenced that the registry does not define.
    #[error("unknown status '{0}'")]
    UnknownStatus(String),

    /// A target code string could not be parsed.
    #[error("invalid target code '{0}'")]
    UnknownTargetCode(String),

    /// An effect type was used where it cannot be resolved.
    #[error("effect type '{0}' cannot be resolved here")]
    InvalidEffectType(String),

    /// A status effect was declared without a status code.
    #[error("special '{special}' has a status effect without a status code")]
    MissingEffectStatus { special: String },

    /// An attack or heal special was declared without a multiplier.
    #[error("special '{special}' needs an action multiplier")]
    MissingActionMultiplier { special: String },

    /// A status definition violates catalog rules.
    #[error("status '{code}' is invalid: {reason}")]
    InvalidStatusDefinition { code: String, reason: &'static str },
}

impl GameError for RulesetError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        use RulesetError::*;
        match self {
            UnknownStatus(_) => "RULESET_UNKNOWN_STATUS",
            UnknownTargetCode(_) => "RULESET_UNKNOWN_TARGET_CODE",
            InvalidEffectType(_) => "RULESET_INVALID_EFFECT_TYPE",
            MissingEffectStatus { .. } => "RULESET_MISSING_EFFECT_STATUS",
            MissingActionMultiplier { .. } => "RULESET_MISSING_ACTION_MULTIPLIER",
            InvalidStatusDefinition { .. } => "RULESET_INVALID_STATUS_DEFINITION",
        }
    }
}
