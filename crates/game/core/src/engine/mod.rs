//! Turn scheduling and action resolution.
//!
//! The [`BattleEngine`] is the authoritative reducer for [`BattleState`].
//! Each call to [`BattleEngine::next_turn`] runs one full turn
//! (scheduling, start-of-turn statuses, the action, delay and special-bar
//! bookkeeping) and returns the turn's log record. Every random decision
//! draws from the engine's single [`RngSource`], so a seed and a ruleset fix
//! the whole battle.

mod action;
mod effects;
mod errors;
mod prepare;
mod runner;
mod status_effects;
mod targeting;
mod turns;

pub use action::{ActionKind, ActionResult};
pub use effects::EffectOutcome;
pub use errors::{BattleFailure, EngineError, SimulationFailure};
pub use prepare::prepare_battle;
pub use runner::{run_battle, run_battle_with_rng};
pub use status_effects::{SkipReason, TurnStart, add_status};
pub use targeting::TargetingError;
pub use turns::TurnError;

use tracing::{debug, trace};

use crate::config::RulesetConfig;
use crate::env::{BattleEnv, RngSource};
use crate::log::{ActionLog, SpecialBarLog, TurnLog};
use crate::state::{BattleState, Side, Unit, UnitRef};
use crate::stats::{StatBlock, effective_stats, round_half_up};

/// Name logged for auto-attacks and skipped turns.
pub const AUTO_ACTION: &str = "auto";

/// Battle engine that owns the state for the duration of a battle.
pub struct BattleEngine<'env, R> {
    state: BattleState,
    env: BattleEnv<'env>,
    rng: R,
    turn: u32,
}

impl<'env, R: RngSource> BattleEngine<'env, R> {
    /// Creates an engine over a prepared state.
    pub fn new(state: BattleState, env: BattleEnv<'env>, rng: R) -> Self {
        Self {
            state,
            env,
            rng,
            turn: 0,
        }
    }

    pub fn state(&self) -> &BattleState {
        &self.state
    }

    pub fn into_state(self) -> BattleState {
        self.state
    }

    pub fn env(&self) -> BattleEnv<'env> {
        self.env
    }

    pub fn rng(&self) -> &R {
        &self.rng
    }

    /// Index of the next turn to run.
    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn is_over(&self) -> bool {
        self.state.is_over()
    }

    pub fn unit(&self, at: UnitRef) -> Result<&Unit, TurnError> {
        self.state.unit(at).ok_or(TurnError::DanglingUnitRef(at))
    }

    pub fn unit_mut(&mut self, at: UnitRef) -> Result<&mut Unit, TurnError> {
        self.state.unit_mut(at).ok_or(TurnError::DanglingUnitRef(at))
    }

    pub fn effective_stats(&self, at: UnitRef) -> Result<StatBlock, EngineError> {
        Ok(effective_stats(self.unit(at)?, self.env)?)
    }

    /// Runs one turn and returns its log record.
    ///
    /// Environment escalations are applied to every living unit before the
    /// turn on the ruleset's escalation turns.
    ///
    /// # Errors
    ///
    /// Returns `TurnError::TurnLimitExceeded` once the ruleset's turn ceiling
    /// is reached; any other error means the battle data is inconsistent.
    pub fn next_turn(&mut self) -> Result<TurnLog, EngineError> {
        let config = self.env.config();
        if self.turn >= config.max_turns {
            return Err(TurnError::TurnLimitExceeded {
                limit: config.max_turns,
            }
            .into());
        }

        let index = self.turn;
        let escalation = config.is_environment_turn(index);
        if escalation {
            for at in self.state.all_alive() {
                self.unit_mut(at)?
                    .environment_effects
                    .push(config.environment_effect.clone());
            }
        }

        let mut log = self.execute_turn(index)?;
        if escalation {
            log.environment_effects.push(config.environment_effect.clone());
        }
        self.turn += 1;

        debug!(
            turn = index,
            actor = log.action.user,
            action = %log.action.name,
            skip = log.skip_turn.as_deref(),
            "turn resolved"
        );
        Ok(log)
    }

    fn execute_turn(&mut self, index: u32) -> Result<TurnLog, EngineError> {
        let actor = self.next_actor()?;
        let user = self.unit(actor)?.id;
        let start = self.apply_turn_effects(actor)?;

        let mut action = ActionLog {
            user,
            name: AUTO_ACTION.to_owned(),
            action_effects: Vec::new(),
            additional_effects: Vec::new(),
        };
        let mut statuses_expired = Vec::new();

        if start.skip.is_some() {
            self.advance_delay(actor)?;
        } else {
            let (name, result) = self.take_action(actor)?;
            action.name = name;
            action.action_effects = result.action_effects;
            action.additional_effects = result.additional_effects;
            statuses_expired = result.statuses_expired;
        }

        Ok(TurnLog {
            index,
            skip_turn: start.skip.map(|skip| skip.code().to_owned()),
            action,
            status_effects: start.ticks,
            statuses_expired,
            special_bars: self.special_bars(),
            environment_effects: Vec::new(),
        })
    }

    /// Uses the special when the bar is full, otherwise auto-attacks.
    ///
    /// A special that was not performed falls through to an auto-attack. Its
    /// bar is kept only when the special can repeat.
    fn take_action(&mut self, actor: UnitRef) -> Result<(String, ActionResult), EngineError> {
        let config = self.env.config();
        let unit = self.unit(actor)?;

        if unit.special_bar >= RulesetConfig::SPECIAL_BAR_FULL {
            let special = unit.special_expanded.clone();
            let result = self.resolve_action(actor, ActionKind::Special)?;
            let reset = config.special_bar_baseline(special.cooldown);

            if result.performed {
                if !result.repeat_attack {
                    self.unit_mut(actor)?.special_bar = reset;
                    self.advance_delay(actor)?;
                }
                return Ok((special.log_name().to_owned(), result));
            }

            trace!(special = %special.code, "special not performed, auto-attacking");
            if special.repeat_effect().is_none() {
                self.unit_mut(actor)?.special_bar = reset;
            }
            let result = self.resolve_action(actor, ActionKind::Auto)?;
            self.advance_delay(actor)?;
            return Ok((AUTO_ACTION.to_owned(), result));
        }

        let result = self.resolve_action(actor, ActionKind::Auto)?;
        let step = config.special_bar_step();
        let unit = self.unit_mut(actor)?;
        let filled = round_half_up(f64::from(unit.special_bar) + step);
        unit.special_bar = (filled as u32).min(RulesetConfig::SPECIAL_BAR_FULL);
        self.advance_delay(actor)?;
        Ok((AUTO_ACTION.to_owned(), result))
    }

    /// Special bars of every unit on both teams, alive or dead.
    fn special_bars(&self) -> Vec<SpecialBarLog> {
        Side::BOTH
            .into_iter()
            .flat_map(|side| self.state.team(side).units())
            .map(|(_, _, unit)| SpecialBarLog {
                id: unit.id,
                val: unit.special_bar,
            })
            .collect()
    }
}
