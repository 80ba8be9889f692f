//! Error types for battle simulation.

use crate::env::RulesetError;
use crate::error::{ErrorSeverity, GameError};
use crate::log::BattleLog;
use crate::state::ValidationError;

use super::targeting::TargetingError;
use super::turns::TurnError;

/// Errors surfaced while resolving a turn.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("ruleset error: {0}")]
    Ruleset(#[from] RulesetError),

    #[error("targeting failed: {0}")]
    Targeting(#[from] TargetingError),

    #[error("turn failed: {0}")]
    Turn(#[from] TurnError),
}

impl GameError for EngineError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Ruleset(error) => error.severity(),
            Self::Targeting(error) => error.severity(),
            Self::Turn(error) => error.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Ruleset(error) => error.error_code(),
            Self::Targeting(error) => error.error_code(),
            Self::Turn(error) => error.error_code(),
        }
    }
}

/// A battle that started but could not finish.
///
/// Carries the partial log (every turn completed before the failure) for
/// diagnosis.
#[derive(Clone, Debug, thiserror::Error)]
#[error("battle failed at turn {turn}: {error}")]
pub struct SimulationFailure {
    pub turn: u32,
    #[source]
    pub error: EngineError,
    pub log: BattleLog,
}

/// Why a battle produced no log.
#[derive(Clone, Debug, thiserror::Error)]
pub enum BattleFailure {
    /// Input was rejected before simulation started.
    #[error("battle rejected: {0}")]
    Rejected(#[from] ValidationError),

    /// Simulation started and failed; the partial log is attached.
    #[error(transparent)]
    Simulation(Box<SimulationFailure>),
}

impl BattleFailure {
    /// Partial log of a failed simulation.
    pub fn partial_log(&self) -> Option<&BattleLog> {
        match self {
            Self::Rejected(_) => None,
            Self::Simulation(failure) => Some(&failure.log),
        }
    }
}

impl From<SimulationFailure> for BattleFailure {
    fn from(failure: SimulationFailure) -> Self {
        Self::Simulation(Box::new(failure))
    }
}

impl GameError for BattleFailure {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Rejected(error) => error.severity(),
            Self::Simulation(failure) => failure.error.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Rejected(error) => error.error_code(),
            Self::Simulation(failure) => failure.error.error_code(),
        }
    }
}
