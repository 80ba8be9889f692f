//! Effective stats - base stats adjusted by held statuses.
//!
//! Formula, per stat:
//! - flat modifier: `delta = value`
//! - percent modifier: `delta = base * value / 100`
//! - each delta is rounded (integers) or rounded to 2 decimals (crit stats)
//! - deltas from every held status are summed
//! - a negative total clamps the result at 0
//! - speed and defense never drop below 1

use std::collections::BTreeMap;

use super::core::{StatBlock, StatName};
use super::rounding::{round_half_up, round_to};
use crate::env::{BattleEnv, RulesetError, ValueType};
use crate::state::Unit;

/// Computes a unit's effective stats from its base stats and statuses.
///
/// # Errors
///
/// Returns `RulesetError::UnknownStatus` if the unit holds a status the
/// catalog does not define.
pub fn effective_stats(unit: &Unit, env: BattleEnv<'_>) -> Result<StatBlock, RulesetError> {
    let base = unit.base;
    let mut deltas: BTreeMap<StatName, f64> = BTreeMap::new();

    for code in &unit.statuses {
        let status = env.status(code)?;
        for modifier in status.active_modifiers() {
            let raw = match modifier.value_type {
                ValueType::Flat => modifier.value,
                ValueType::Percent => base.get(modifier.stat_name) * (modifier.value / 100.0),
            };
            let delta = if modifier.stat_name.is_decimal() {
                round_to(raw, 2)
            } else {
                round_half_up(raw)
            };
            *deltas.entry(modifier.stat_name).or_insert(0.0) += delta;
        }
    }

    let mut effective = base;
    for (stat, delta) in deltas {
        let value = base.get(stat) + delta;
        effective.set(stat, if delta < 0.0 { value.max(0.0) } else { value });
    }
    for stat in StatName::ALL {
        if stat.has_unit_floor() && effective.get(stat) < 1.0 {
            effective.set(stat, 1.0);
        }
    }
    Ok(effective)
}
