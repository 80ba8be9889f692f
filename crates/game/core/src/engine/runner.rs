//! Top-level battle entry points.

use tracing::{error, info};

use crate::config::BattleOptions;
use crate::env::{Arc4Rng, BattleEnv, RngSource};
use crate::error::GameError;
use crate::log::BattleLog;
use crate::state::Team;

use super::{BattleEngine, BattleFailure, SimulationFailure, prepare_battle};

/// Runs a battle seeded with `seed` and returns its finished log.
///
/// # Errors
///
/// `BattleFailure::Rejected` when the input is invalid; no turn has run.
/// `BattleFailure::Simulation` when a turn fails; the partial log is
/// attached.
pub fn run_battle(
    team1: Team,
    team2: Team,
    seed: &str,
    options: &BattleOptions,
    env: BattleEnv<'_>,
) -> Result<BattleLog, BattleFailure> {
    run_battle_with_rng(team1, team2, seed, options, env, Arc4Rng::from_seed(seed))
}

/// Runs a battle drawing from `rng`; `seed` is only recorded in the log.
pub fn run_battle_with_rng<R: RngSource>(
    team1: Team,
    team2: Team,
    seed: &str,
    options: &BattleOptions,
    env: BattleEnv<'_>,
    rng: R,
) -> Result<BattleLog, BattleFailure> {
    let state = prepare_battle(team1, team2, seed, env, &mut rand::thread_rng())?;
    let mut log = BattleLog::start(&state, seed, options);
    let mut engine = BattleEngine::new(state, env, rng);

    while !engine.is_over() {
        match engine.next_turn() {
            Ok(turn) => log.record_turn(turn, engine.state()),
            Err(err) => {
                let turn = engine.turn();
                error!(
                    turn,
                    severity = err.severity().as_str(),
                    code = err.error_code(),
                    error = %err,
                    "battle simulation failed"
                );
                return Err(SimulationFailure {
                    turn,
                    error: err,
                    log,
                }
                .into());
            }
        }
    }

    let state = engine.into_state();
    if let Err(err) = log.finish(&state, env) {
        let turn = log.turns.len() as u32;
        error!(turn, error = %err, "battle result could not be written");
        return Err(SimulationFailure {
            turn,
            error: err.into(),
            log,
        }
        .into());
    }

    if let Some(result) = &log.result {
        info!(
            winner = result.winner,
            turns = result.stats.num_of_turns,
            "battle finished"
        );
    }
    Ok(log)
}
