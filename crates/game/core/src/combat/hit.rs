//! Critical hit and focus check probabilities.

use crate::config::RulesetConfig;
use crate::stats::StatBlock;

/// Probability that an action lands a critical hit.
///
/// # Formula
///
/// ```text
/// chance = clamp(critical_rate / 100, crit_chance_floor, 1)
/// ```
pub fn crit_chance(attacker: &StatBlock, config: &RulesetConfig) -> f64 {
    (attacker.critical_rate / 100.0)
        .max(config.crit_chance_floor)
        .min(1.0)
}

/// Damage or heal multiplier applied on a critical hit.
pub fn crit_multiplier(attacker: &StatBlock) -> f64 {
    1.0 + attacker.critical_damage / 100.0
}

/// Probability that an effect lands on an enemy.
///
/// # Formula
///
/// ```text
/// chance = clamp(base + (focus - resist) / divisor, min, max)
/// ```
pub fn focus_chance(attacker: &StatBlock, defender: &StatBlock, config: &RulesetConfig) -> f64 {
    let divisor = if config.focus_divisor == 0.0 {
        1.0
    } else {
        config.focus_divisor
    };
    let raw = config.focus_base_chance + (attacker.focus - defender.resist) as f64 / divisor;
    raw.max(config.focus_min_chance).min(config.focus_max_chance)
}
