//! Input validation errors.
//!
//! Raised before simulation starts (malformed teams, empty seed) and when a
//! replayed log disagrees with the log it was rebuilt from.

use crate::env::RulesetError;
use crate::error::{ErrorSeverity, GameError};
use crate::state::UnitId;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("seed must not be empty")]
    EmptySeed,

    #[error("team {team} has no living units")]
    NoLivingUnits { team: u8 },

    #[error("team {team} leader {leader} is not in its formation")]
    LeaderNotFound { team: u8, leader: UnitId },

    #[error("unit {unit} has an invalid special: {source}")]
    InvalidSpecial {
        unit: UnitId,
        #[source]
        source: RulesetError,
    },

    #[error("unit {unit} references unknown status '{status}'")]
    UnknownStatusReference { unit: UnitId, status: String },

    #[error("team {team} starting state references unit {unit} which is not alive in the team")]
    StartingStateUnknownUnit { team: u8, unit: UnitId },

    #[error("could not assign unique unit ids after {attempts} attempts")]
    IdCollision { attempts: u32 },

    // ===== replay verification =====
    #[error("log has no result")]
    MissingResult,

    #[error("log layout references unit {0} missing from the unit list")]
    LayoutUnitMissing(UnitId),

    #[error("log layout is malformed: {0}")]
    MalformedLayout(&'static str),

    #[error("winner mismatch (expected {expected}, got {actual})")]
    WinnerMismatch { expected: u8, actual: u8 },

    #[error("turn count mismatch (expected {expected}, got {actual})")]
    TurnCountMismatch { expected: u32, actual: u32 },

    #[error("winning team size mismatch (expected {expected}, got {actual})")]
    WinningTeamSizeMismatch { expected: usize, actual: usize },

    #[error("winning unit {id} differs in {field}")]
    WinningUnitMismatch { id: UnitId, field: &'static str },
}

impl ValidationError {
    /// Whether this error comes from comparing two logs.
    pub const fn is_replay_mismatch(&self) -> bool {
        matches!(
            self,
            Self::WinnerMismatch { .. }
                | Self::TurnCountMismatch { .. }
                | Self::WinningTeamSizeMismatch { .. }
                | Self::WinningUnitMismatch { .. }
        )
    }
}

impl GameError for ValidationError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        use ValidationError::*;
        match self {
            EmptySeed => "VALIDATION_EMPTY_SEED",
            NoLivingUnits { .. } => "VALIDATION_NO_LIVING_UNITS",
            LeaderNotFound { .. } => "VALIDATION_LEADER_NOT_FOUND",
            InvalidSpecial { .. } => "VALIDATION_INVALID_SPECIAL",
            UnknownStatusReference { .. } => "VALIDATION_UNKNOWN_STATUS_REFERENCE",
            StartingStateUnknownUnit { .. } => "VALIDATION_STARTING_STATE_UNKNOWN_UNIT",
            IdCollision { .. } => "VALIDATION_ID_COLLISION",
            MissingResult => "VALIDATION_MISSING_RESULT",
            LayoutUnitMissing(_) => "VALIDATION_LAYOUT_UNIT_MISSING",
            MalformedLayout(_) => "VALIDATION_MALFORMED_LAYOUT",
            WinnerMismatch { .. } => "VALIDATION_WINNER_MISMATCH",
            TurnCountMismatch { .. } => "VALIDATION_TURN_COUNT_MISMATCH",
            WinningTeamSizeMismatch { .. } => "VALIDATION_WINNING_TEAM_SIZE_MISMATCH",
            WinningUnitMismatch { .. } => "VALIDATION_WINNING_UNIT_MISMATCH",
        }
    }
}
