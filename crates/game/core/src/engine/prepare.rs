//! Pre-battle validation and unit initialization.

use rand::Rng;
use tracing::warn;

use crate::config::RulesetConfig;
use crate::env::{BattleEnv, StatItem};
use crate::state::{BattleState, Side, Team, Unit, UnitCounters, ValidationError};
use crate::stats::{action_delay_tick, round_half_up};

use super::status_effects::add_status;

/// Validates both teams and initializes every unit for turn 0.
///
/// `id_rng` is only consulted when the two teams share unit ids; it is not
/// part of the replayed draw sequence.
///
/// # Errors
///
/// Returns a [`ValidationError`] for an empty seed, a team without living
/// units, a missing leader, an invalid special, an unknown status reference,
/// a starting state for a unit the team does not have, or ids that stay
/// duplicated after every scramble attempt.
pub fn prepare_battle(
    team1: Team,
    team2: Team,
    seed: &str,
    env: BattleEnv<'_>,
    id_rng: &mut impl Rng,
) -> Result<BattleState, ValidationError> {
    if seed.is_empty() {
        return Err(ValidationError::EmptySeed);
    }

    let mut state = BattleState::new(team1, team2);
    for side in Side::BOTH {
        validate_team(state.team(side), side, env)?;
    }

    if state.has_duplicate_ids() {
        scramble_ids(&mut state, env.config(), id_rng)?;
    }

    let config = env.config();
    for side in Side::BOTH {
        let team = state.team_mut(side);
        for unit in team.units_mut() {
            if unit.is_alive() {
                apply_items(unit);
            }
            initialize(unit, config);
        }
        apply_opening_statuses(team, config);
    }

    Ok(state)
}

fn validate_team(team: &Team, side: Side, env: BattleEnv<'_>) -> Result<(), ValidationError> {
    let number = side.number();
    if !team.has_living_units() {
        return Err(ValidationError::NoLivingUnits { team: number });
    }
    if team.find(team.leader).is_none() {
        return Err(ValidationError::LeaderNotFound {
            team: number,
            leader: team.leader,
        });
    }

    for (_, _, unit) in team.units() {
        unit.special_expanded
            .validate()
            .map_err(|source| ValidationError::InvalidSpecial {
                unit: unit.id,
                source,
            })?;

        let leader_statuses = unit
            .leader_skill_expanded
            .iter()
            .flat_map(|skill| skill.statuses.iter().map(|entry| entry.status.as_str()));
        for status in unit.special_expanded.referenced_statuses().chain(leader_statuses) {
            if !env.has_status(status) {
                return Err(ValidationError::UnknownStatusReference {
                    unit: unit.id,
                    status: status.to_owned(),
                });
            }
        }
    }

    for entry in &team.starting_state {
        if team.find(entry.id).is_none() {
            return Err(ValidationError::StartingStateUnknownUnit {
                team: number,
                unit: entry.id,
            });
        }
        if let Some(status) = entry.statuses.iter().find(|status| !env.has_status(status)) {
            return Err(ValidationError::UnknownStatusReference {
                unit: entry.id,
                status: status.clone(),
            });
        }
    }
    Ok(())
}

/// Reassigns every unit id until both teams are collision free.
///
/// Leader ids and starting-state entries follow their unit.
fn scramble_ids(
    state: &mut BattleState,
    config: &RulesetConfig,
    id_rng: &mut impl Rng,
) -> Result<(), ValidationError> {
    let attempts = config.id_scramble_attempts;
    for attempt in 1..=attempts {
        warn!(attempt, "duplicate unit ids across teams, scrambling");
        for side in Side::BOTH {
            let team = state.team_mut(side);
            let mut leader_moved = false;
            let mut renamed = Vec::new();
            for unit in team.units_mut() {
                let fresh = id_rng.gen_range(0..config.id_range.max(1));
                renamed.push((unit.id, fresh));
                unit.id = fresh;
            }
            for (old, fresh) in renamed {
                if !leader_moved && team.leader == old {
                    team.leader = fresh;
                    leader_moved = true;
                }
                if let Some(entry) = team.starting_state.iter_mut().find(|entry| entry.id == old) {
                    entry.id = fresh;
                }
            }
        }
        if !state.has_duplicate_ids() {
            return Ok(());
        }
    }
    Err(ValidationError::IdCollision { attempts })
}

fn apply_item(unit: &mut Unit, item: &StatItem) {
    match item.stat.combat() {
        Some(stat) => unit.base.add(stat, item.stat_value),
        None => unit.health += round_half_up(item.stat_value) as i64,
    }
}

fn apply_items(unit: &mut Unit) {
    let mut items: Vec<StatItem> = unit.item.iter().cloned().collect();
    items.extend(unit.crystals.iter().cloned());
    for item in &items {
        apply_item(unit, item);
    }
}

fn initialize(unit: &mut Unit, config: &RulesetConfig) {
    unit.statuses.clear();
    unit.action_delay = action_delay_tick(unit.base.speed);
    unit.special_bar = config.special_bar_baseline(unit.special_expanded.initial_cooldown);
    unit.full_health = unit.health;
    unit.environment_effects.clear();
    unit.counters = UnitCounters::default();
}

/// Starting state when the team carries one, leader skill statuses otherwise.
fn apply_opening_statuses(team: &mut Team, config: &RulesetConfig) {
    if !team.starting_state.is_empty() {
        let entries = team.starting_state.clone();
        for entry in entries {
            if let Some(unit) = team.find_mut(entry.id) {
                unit.health = entry.health;
                unit.statuses = entry.statuses;
            }
        }
        return;
    }

    let Some(skill) = team
        .find(team.leader)
        .and_then(|leader| leader.leader_skill_expanded.clone())
    else {
        return;
    };
    for unit in team.units_mut().filter(|unit| unit.is_alive()) {
        for entry in &skill.statuses {
            add_status(unit, &entry.status, entry.stack_count, config.max_status_stacks);
        }
    }
}
