use tracing::trace;

use crate::env::RngSource;
use crate::error::{ErrorSeverity, GameError};
use crate::state::{UnitRef, UnitRefs};
use crate::stats::advance_action_delay;

use super::{BattleEngine, EngineError};

/// Errors that can occur during turn scheduling.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TurnError {
    #[error("no living units to schedule")]
    NoLivingUnits,

    #[error("battle exceeded {limit} turns")]
    TurnLimitExceeded { limit: u32 },

    #[error("no unit at {0}")]
    DanglingUnitRef(UnitRef),
}

impl GameError for TurnError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::TurnLimitExceeded { .. } => ErrorSeverity::Fatal,
            Self::NoLivingUnits | Self::DanglingUnitRef(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NoLivingUnits => "TURN_NO_LIVING_UNITS",
            Self::TurnLimitExceeded { .. } => "TURN_LIMIT_EXCEEDED",
            Self::DanglingUnitRef(_) => "TURN_DANGLING_UNIT_REF",
        }
    }
}

/// Turn scheduling methods for BattleEngine.
impl<R: RngSource> BattleEngine<'_, R> {
    /// Selects the living unit with the smallest action delay.
    ///
    /// Exact ties go to the lowest effective speed; a remaining tie is broken
    /// with one draw over the tied units in state order.
    pub fn next_actor(&mut self) -> Result<UnitRef, EngineError> {
        let candidates = self.state.all_alive();

        let mut earliest = f64::INFINITY;
        for &at in &candidates {
            earliest = earliest.min(self.unit(at)?.action_delay);
        }

        let mut tied = UnitRefs::new();
        for &at in &candidates {
            if self.unit(at)?.action_delay == earliest {
                tied.push(at);
            }
        }

        match tied.len() {
            0 => return Err(TurnError::NoLivingUnits.into()),
            1 => return Ok(tied[0]),
            _ => {}
        }

        let mut speeds = Vec::with_capacity(tied.len());
        for &at in &tied {
            speeds.push((at, self.effective_stats(at)?.speed));
        }
        let slowest = speeds.iter().map(|(_, speed)| *speed).min().unwrap_or_default();
        let slow: UnitRefs = speeds
            .into_iter()
            .filter(|(_, speed)| *speed == slowest)
            .map(|(at, _)| at)
            .collect();

        if let [only] = slow.as_slice() {
            trace!(actor = %only, delay = earliest, "delay tie broken by speed");
            return Ok(*only);
        }

        let index = self.rng.pick_index(slow.len());
        let chosen = slow
            .get(index)
            .copied()
            .ok_or(TurnError::NoLivingUnits)?;
        trace!(actor = %chosen, tied = slow.len(), "delay tie broken by draw");
        Ok(chosen)
    }

    /// Pushes `at` back by one scheduling tick at its current effective speed.
    pub fn advance_delay(&mut self, at: UnitRef) -> Result<(), EngineError> {
        let speed = self.effective_stats(at)?.speed;
        let unit = self.unit_mut(at)?;
        unit.action_delay = advance_action_delay(unit.action_delay, speed);
        Ok(())
    }
}
