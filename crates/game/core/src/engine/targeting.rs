//! Target resolution for actions and special effects.

use tracing::trace;

use crate::env::{RngSource, TargetCode};
use crate::error::{ErrorSeverity, GameError};
use crate::state::{Row, Side, UnitRef, UnitRefs};

use super::{BattleEngine, EngineError};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TargetingError {
    #[error("no living unit matches target code '{code}'")]
    NoTargetAvailable { code: TargetCode },
}

impl GameError for TargetingError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Internal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NoTargetAvailable { .. } => "TARGETING_NO_TARGET_AVAILABLE",
        }
    }
}

impl<R: RngSource> BattleEngine<'_, R> {
    /// Resolves `code` relative to `actor` into living target positions.
    ///
    /// Random codes consume exactly one draw unless the candidate set is a
    /// single taunting unit. Group codes never draw.
    pub fn resolve_targets(&mut self, code: TargetCode, actor: UnitRef) -> Result<UnitRefs, EngineError> {
        let allies = actor.side;
        let enemies = allies.opponent();

        let targets = match code {
            TargetCode::Caster => {
                let mut refs = UnitRefs::new();
                refs.push(actor);
                refs
            }
            TargetCode::EnemyRandom => self.random_target(enemies, true, code)?,
            TargetCode::AllyRandom => {
                let respect_taunt = self.env.config().ally_random_respects_taunt;
                self.random_target(allies, respect_taunt, code)?
            }
            TargetCode::EnemyFrontRow => self.row_target(enemies, Row::Front, code)?,
            TargetCode::EnemyBackRow => self.row_target(enemies, Row::Back, code)?,
            TargetCode::AllyFrontRow => self.row_target(allies, Row::Front, code)?,
            TargetCode::AllyBackRow => self.row_target(allies, Row::Back, code)?,
            TargetCode::EnemyRowLargest => self.largest_row(enemies),
            TargetCode::AllyRowLargest => self.largest_row(allies),
            TargetCode::AllEnemies => self.state.alive(enemies),
            TargetCode::AllAllies => self.state.alive(allies),
            TargetCode::All => {
                let mut refs = self.state.alive(allies);
                refs.extend(self.state.alive(enemies));
                refs
            }
        };

        if targets.is_empty() {
            return Err(TargetingError::NoTargetAvailable { code }.into());
        }
        trace!(%code, %actor, targets = targets.len(), "targets resolved");
        Ok(targets)
    }

    /// Living taunt holders first, then the front row, then the back row.
    ///
    /// With `respect_taunt` off the pick is uniform over every living unit of
    /// `side`, front row first.
    fn random_target(&mut self, side: Side, respect_taunt: bool, code: TargetCode) -> Result<UnitRefs, EngineError> {
        if !respect_taunt {
            let pool = self.state.alive(side);
            return self.pick_one(pool, code);
        }

        let taunt = &self.env.config().taunt_status;
        let pool: UnitRefs = self
            .state
            .alive(side)
            .into_iter()
            .filter(|at| self.state.unit(*at).is_some_and(|unit| unit.has_status(taunt)))
            .collect();

        let pool = match pool.len() {
            1 => return Ok(pool),
            0 => {
                let front = self.state.alive_in_row(side, Row::Front);
                if front.is_empty() {
                    self.state.alive_in_row(side, Row::Back)
                } else {
                    front
                }
            }
            _ => pool,
        };
        self.pick_one(pool, code)
    }

    fn row_target(&mut self, side: Side, row: Row, code: TargetCode) -> Result<UnitRefs, EngineError> {
        let pool = self.state.alive_in_row(side, row);
        if pool.is_empty() {
            return self.random_target(side, true, code);
        }
        self.pick_one(pool, code)
    }

    fn pick_one(&mut self, pool: UnitRefs, code: TargetCode) -> Result<UnitRefs, EngineError> {
        if pool.is_empty() {
            return Err(TargetingError::NoTargetAvailable { code }.into());
        }
        let index = self.rng.pick_index(pool.len());
        let mut refs = UnitRefs::new();
        refs.extend(pool.get(index).copied());
        Ok(refs)
    }

    fn largest_row(&self, side: Side) -> UnitRefs {
        let front = self.state.alive_in_row(side, Row::Front);
        let back = self.state.alive_in_row(side, Row::Back);
        if back.len() > front.len() { back } else { front }
    }
}
