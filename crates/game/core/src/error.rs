//! Shared error classification for battle-core.
//!
//! Each layer owns its error enum: [`crate::env::RulesetError`] for catalog
//! and special defects, [`crate::state::ValidationError`] for rejected
//! input and replay mismatches, [`crate::engine::EngineError`] for failures
//! while a battle runs. All of them implement [`GameError`], so a caller can
//! tell bad input from a broken ruleset without matching every variant.

/// How a battle error should be treated by the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorSeverity {
    /// The caller's teams, seed or log are wrong; nothing was simulated.
    ///
    /// Examples: empty seed, leader missing from its team, replay mismatch
    Validation,

    /// Battle state contradicts itself. Always an engine bug.
    Internal,

    /// The ruleset cannot resolve the battle.
    ///
    /// Examples: unknown status code, malformed target code, turn ceiling
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Whether fixing the input is enough to make the battle run.
    pub const fn is_caller_fault(&self) -> bool {
        matches!(self, Self::Validation)
    }
}

/// Implemented by every battle-core error enum.
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Stable SCREAMING_SNAKE identifier of the variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
