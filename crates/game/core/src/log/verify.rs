//! Replay verification.
//!
//! A log carries everything needed to re-run its battle: the prepared units,
//! the layout and the seed. Rebuilding the input teams from it and running
//! the battle again must yield the same winner, turn count and survivors.

use tracing::{debug, warn};

use crate::config::RulesetConfig;
use crate::engine::{BattleFailure, run_battle};
use crate::env::{BattleEnv, StatItem};
use crate::state::{Formation, Row, Team, Unit, UnitCounters, ValidationError};
use crate::stats::round_half_up;

use super::{BattleLog, LogUnit, TeamLayout};

/// Checks that `replayed` reached the same outcome as `original`.
///
/// # Errors
///
/// Returns the first difference found, in the order: missing result,
/// winner, turn count, winning team size, then per winning unit its id,
/// name and health.
pub fn compare_logs(original: &BattleLog, replayed: &BattleLog) -> Result<(), ValidationError> {
    let (Some(expected), Some(actual)) = (&original.result, &replayed.result) else {
        return Err(ValidationError::MissingResult);
    };

    if expected.winner != actual.winner {
        return Err(ValidationError::WinnerMismatch {
            expected: expected.winner,
            actual: actual.winner,
        });
    }
    if expected.stats.num_of_turns != actual.stats.num_of_turns {
        return Err(ValidationError::TurnCountMismatch {
            expected: expected.stats.num_of_turns,
            actual: actual.stats.num_of_turns,
        });
    }
    if expected.winning_team.len() != actual.winning_team.len() {
        return Err(ValidationError::WinningTeamSizeMismatch {
            expected: expected.winning_team.len(),
            actual: actual.winning_team.len(),
        });
    }

    for (want, got) in expected.winning_team.iter().zip(&actual.winning_team) {
        let field = if want.id != got.id {
            Some("id")
        } else if want.name != got.name {
            Some("name")
        } else if want.health != got.health {
            Some("health")
        } else {
            None
        };
        if let Some(field) = field {
            return Err(ValidationError::WinningUnitMismatch { id: want.id, field });
        }
    }
    Ok(())
}

/// Rebuilds both input teams from a log.
///
/// Item and crystal bonuses are taken back off, health returns to its
/// pre-item value and statuses are cleared; the battle's own preparation
/// applies them again.
///
/// # Errors
///
/// `MalformedLayout` when the log does not hold exactly two teams of at most
/// two rows, `LayoutUnitMissing` when a slot names a unit the log lacks.
pub fn teams_from_log(log: &BattleLog) -> Result<(Team, Team), ValidationError> {
    let [first, second] = log.layout.teams.as_slice() else {
        return Err(ValidationError::MalformedLayout("expected two teams"));
    };
    Ok((rebuild_team(first, &log.gotchis)?, rebuild_team(second, &log.gotchis)?))
}

fn rebuild_team(layout: &TeamLayout, units: &[LogUnit]) -> Result<Team, ValidationError> {
    if layout.rows.len() > 2 {
        return Err(ValidationError::MalformedLayout("more than two rows"));
    }

    let mut formation = Formation::default();
    for (row, slots) in Row::ALL.into_iter().zip(&layout.rows) {
        if slots.slots.len() > RulesetConfig::ROW_SLOTS {
            return Err(ValidationError::MalformedLayout("row has too many slots"));
        }
        for (index, slot) in slots.slots.iter().enumerate() {
            let Some(id) = slot.id else { continue };
            let logged = units
                .iter()
                .find(|unit| unit.id == id)
                .ok_or(ValidationError::LayoutUnitMissing(id))?;
            formation.row_mut(row)[index] = Some(revert_unit(logged));
        }
    }

    Ok(Team {
        name: layout.name.clone(),
        owner: layout.owner.clone(),
        leader: layout.leader_id,
        formation,
        starting_state: layout.starting_state.clone(),
    })
}

/// Undoes item preparation on a logged unit.
///
/// Units that entered the battle fallen (`full_health` of zero) never had
/// their items applied, so they come back unchanged.
fn revert_unit(logged: &LogUnit) -> Unit {
    let mut base = logged.base;
    let mut health = logged.full_health;
    if logged.full_health > 0 {
        let items = logged.item.iter().chain(&logged.crystals);
        for StatItem { stat, stat_value, .. } in items {
            match stat.combat() {
                Some(stat) => base.add(stat, -stat.normalize(*stat_value)),
                None => health -= round_half_up(*stat_value) as i64,
            }
        }
    }

    Unit {
        id: logged.id,
        name: logged.name.clone(),
        base,
        health,
        special_expanded: logged.special_expanded.clone(),
        leader_skill_expanded: logged.leader_skill_expanded.clone(),
        item: logged.item.clone(),
        crystals: logged.crystals.clone(),
        statuses: Vec::new(),
        action_delay: 0.0,
        special_bar: 0,
        full_health: 0,
        environment_effects: Vec::new(),
        counters: UnitCounters::default(),
    }
}

/// Runs the battle recorded in `log` again with its seed and metadata.
///
/// # Errors
///
/// Anything [`run_battle`] can return, plus a rejection when the log's
/// layout cannot be turned back into teams.
pub fn replay_log(log: &BattleLog, env: BattleEnv<'_>) -> Result<BattleLog, BattleFailure> {
    let (team1, team2) = teams_from_log(log)?;
    let options = log.meta.options(log.debug.is_some());
    debug!(seed = %log.meta.seed, "replaying battle");
    run_battle(team1, team2, &log.meta.seed, &options, env)
}

/// Replays `log` and checks the outcome matches.
///
/// Returns the replayed log on success.
pub fn replay_and_verify(log: &BattleLog, env: BattleEnv<'_>) -> Result<BattleLog, BattleFailure> {
    let replayed = replay_log(log, env)?;
    if let Err(mismatch) = compare_logs(log, &replayed) {
        warn!(error = %mismatch, "replay diverged from log");
        return Err(mismatch.into());
    }
    Ok(replayed)
}
