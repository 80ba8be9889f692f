//! Damage and heal calculation.

use crate::config::RulesetConfig;
use crate::stats::{StatBlock, round_half_up};

// ============================================================================
// Damage Calculation
// ============================================================================

/// Calculate damage from one unit hitting another.
///
/// # Formula
///
/// ```text
/// base   = round(attack / defense * 100)
/// damage = rounding(base * multiplier)
///
/// if environment_effects > 0:
///     damage = rounding(damage * (1 + step * environment_effects))
/// ```
///
/// `rounding` is the ruleset's [`crate::config::DamageRounding`]. Defense is
/// at least 1 because effective stats floor it there.
///
/// # Arguments
///
/// * `attacker` - Effective stats of the attacking unit
/// * `defender` - Effective stats of the defending unit
/// * `multiplier` - Action multiplier, including any crit multiplier
/// * `environment_effects` - Environment effects held by the defender
pub fn calculate_damage(
    attacker: &StatBlock,
    defender: &StatBlock,
    multiplier: f64,
    environment_effects: usize,
    config: &RulesetConfig,
) -> i64 {
    let defense = defender.defense.max(1) as f64;
    let base = round_half_up(attacker.attack as f64 / defense * 100.0);
    let mut damage = config.damage_rounding.apply(base * multiplier);

    if environment_effects > 0 {
        let scale = 1.0 + config.environment_damage_step * environment_effects as f64;
        damage = config.damage_rounding.apply(damage * scale);
    }

    damage.max(0.0) as i64
}

/// Calculate a heal, capped at the target's missing health.
///
/// # Formula
///
/// ```text
/// heal = min(round(full_health * multiplier), full_health - health)
/// ```
pub fn calculate_heal(full_health: i64, health: i64, multiplier: f64) -> i64 {
    let amount = round_half_up(full_health as f64 * multiplier).max(0.0) as i64;
    amount.min((full_health - health).max(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DamageRounding;

    fn stats(attack: i64, defense: i64) -> StatBlock {
        StatBlock {
            attack,
            defense,
            ..StatBlock::default()
        }
    }

    #[test]
    fn unit_multiplier_doubles_with_half_defense() {
        let config = RulesetConfig::new();
        assert_eq!(calculate_damage(&stats(100, 0), &stats(0, 50), 1.0, 0, &config), 200);
    }

    #[test]
    fn rounding_mode_applies_to_multiplied_damage() {
        let mut config = RulesetConfig::new();
        // base = round(77 / 100 * 100) = 77; 77 * 0.85 = 65.45
        let attacker = stats(77, 0);
        let defender = stats(0, 100);
        assert_eq!(calculate_damage(&attacker, &defender, 0.85, 0, &config), 65);
        config.damage_rounding = DamageRounding::Round;
        assert_eq!(calculate_damage(&attacker, &defender, 0.9, 0, &config), 69);
    }

    #[test]
    fn environment_effects_scale_damage() {
        let config = RulesetConfig::new();
        let attacker = stats(100, 0);
        let defender = stats(0, 100);
        assert_eq!(calculate_damage(&attacker, &defender, 1.0, 1, &config), 150);
        assert_eq!(calculate_damage(&attacker, &defender, 1.0, 2, &config), 200);
    }

    #[test]
    fn heal_is_capped_at_missing_health() {
        assert_eq!(calculate_heal(1000, 900, 0.5), 100);
        assert_eq!(calculate_heal(1000, 200, 0.5), 500);
        assert_eq!(calculate_heal(1000, 1000, 0.5), 0);
    }
}
