//! Status bookkeeping and start-of-turn status ticks.

use tracing::trace;

use super::{BattleEngine, EngineError};
use crate::combat::StatusTick;
use crate::env::{RngSource, TurnEffect, TurnEffectKind, ValueType};
use crate::state::{Unit, UnitRef};
use crate::stats::round_half_up;

/// Why the acting unit forfeits its action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// The actor died from start-of-turn effects.
    AttackerDead,
    /// A whole team died from start-of-turn effects.
    TeamDead,
    /// The actor held a skip-turn status, which was consumed.
    Status(String),
}

impl SkipReason {
    /// Code recorded in the turn log.
    pub fn code(&self) -> &str {
        match self {
            Self::AttackerDead => "attacker_dead",
            Self::TeamDead => "team_dead",
            Self::Status(code) => code,
        }
    }
}

/// Result of start-of-turn processing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TurnStart {
    pub ticks: Vec<StatusTick>,
    pub skip: Option<SkipReason>,
}

/// Adds up to `count` stacks of `code`, never exceeding `max_stacks` copies.
///
/// Returns the number of stacks actually added.
pub fn add_status(unit: &mut Unit, code: &str, count: u32, max_stacks: usize) -> u32 {
    let mut added = 0;
    for _ in 0..count {
        if unit.status_count(code) >= max_stacks {
            break;
        }
        unit.statuses.push(code.to_owned());
        added += 1;
    }
    added
}

fn tick_amount(effect: &TurnEffect, full_health: i64) -> i64 {
    match effect.value_type {
        ValueType::Flat => effect.value as i64,
        ValueType::Percent => round_half_up(full_health as f64 * effect.value / 100.0) as i64,
    }
}

impl<R: RngSource> BattleEngine<'_, R> {
    /// Applies heal and damage ticks to every living unit, then decides
    /// whether `actor` skips its action.
    ///
    /// Units of the acting team tick first. A unit reduced to 0 health stops
    /// ticking for the rest of this turn.
    pub fn apply_turn_effects(&mut self, actor: UnitRef) -> Result<TurnStart, EngineError> {
        let mut ticks = Vec::new();

        let mut order = self.state.alive(actor.side);
        order.extend(self.state.alive(actor.side.opponent()));
        for at in order {
            self.tick_unit(at, &mut ticks)?;
        }

        let skip = self.skip_reason(actor, &mut ticks)?;
        Ok(TurnStart { ticks, skip })
    }

    fn tick_unit(&mut self, at: UnitRef, ticks: &mut Vec<StatusTick>) -> Result<(), EngineError> {
        let env = self.env;
        let codes = self.unit(at)?.statuses.clone();

        for code in &codes {
            let status = env.status(code)?;
            for effect in &status.turn_effects {
                let unit = self.unit_mut(at)?;
                if !unit.is_alive() {
                    return Ok(());
                }
                match effect.kind {
                    TurnEffectKind::Heal => {
                        let amount = tick_amount(effect, unit.full_health).min(unit.missing_health());
                        if amount > 0 {
                            unit.health += amount;
                            ticks.push(StatusTick {
                                target: unit.id,
                                status: code.clone(),
                                damage: -amount,
                                remove: false,
                            });
                        }
                    }
                    TurnEffectKind::Damage => {
                        let amount = tick_amount(effect, unit.full_health).max(0);
                        unit.take_damage(amount);
                        unit.counters.dmg_received += amount;
                        trace!(unit = unit.id, status = %code, amount, "status damage tick");
                        ticks.push(StatusTick {
                            target: unit.id,
                            status: code.clone(),
                            damage: amount,
                            remove: false,
                        });
                    }
                    TurnEffectKind::SkipTurn => {}
                }
            }
        }
        Ok(())
    }

    fn skip_reason(
        &mut self,
        actor: UnitRef,
        ticks: &mut Vec<StatusTick>,
    ) -> Result<Option<SkipReason>, EngineError> {
        if !self.unit(actor)?.is_alive() {
            return Ok(Some(SkipReason::AttackerDead));
        }
        if self.state.is_over() {
            return Ok(Some(SkipReason::TeamDead));
        }

        let env = self.env;
        let unit = self.unit(actor)?;
        let mut skip_at = None;
        for (index, code) in unit.statuses.iter().enumerate() {
            if env.status(code)?.skips_turn() {
                skip_at = Some(index);
                break;
            }
        }

        let Some(index) = skip_at else {
            return Ok(None);
        };
        let unit = self.unit_mut(actor)?;
        let code = unit.statuses.remove(index);
        ticks.push(StatusTick {
            target: unit.id,
            status: code.clone(),
            damage: 0,
            remove: true,
        });
        Ok(Some(SkipReason::Status(code)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RulesetConfig;
    use crate::env::{BattleEnv, ConstantRng, StatusCategory, StatusDefinition, StatusRegistry};
    use crate::state::fixtures::unit;
    use crate::state::test_support::team;
    use crate::state::{BattleState, Row, Side};

    fn ticking(code: &str, kind: TurnEffectKind, value: f64, value_type: ValueType) -> StatusDefinition {
        StatusDefinition {
            code: code.into(),
            name: String::new(),
            category: StatusCategory::TurnEffect,
            stat_modifiers: Vec::new(),
            turn_effects: vec![TurnEffect {
                kind,
                value,
                value_type,
            }],
            attack_effects: Vec::new(),
            is_buff: kind == TurnEffectKind::Heal,
            is_debuff: kind != TurnEffectKind::Heal,
        }
    }

    fn registry() -> StatusRegistry {
        StatusRegistry::from_definitions([
            ticking("bleed", TurnEffectKind::Damage, 100.0, ValueType::Flat),
            ticking("regen", TurnEffectKind::Heal, 10.0, ValueType::Percent),
            ticking("stun", TurnEffectKind::SkipTurn, 0.0, ValueType::Flat),
        ])
        .expect("valid catalog")
    }

    const ACTOR: UnitRef = UnitRef::new(Side::Two, Row::Front, 0);

    #[test]
    fn acting_team_ticks_first_and_heals_are_capped() {
        let registry = registry();
        let config = RulesetConfig::new();
        let env = BattleEnv::new(&registry, &config);
        let mut ally = unit(1);
        ally.statuses = vec!["bleed".into()];
        let mut actor = unit(2);
        actor.health = 950;
        actor.statuses = vec!["regen".into()];
        let state = BattleState::new(team("a", vec![ally]), team("b", vec![actor]));
        let mut engine = BattleEngine::new(state, env, ConstantRng::new(0.5));

        let start = engine.apply_turn_effects(ACTOR).expect("known statuses");
        assert_eq!(start.skip, None);
        assert_eq!(start.ticks.len(), 2);
        assert_eq!(start.ticks[0].target, 2);
        assert_eq!(start.ticks[0].damage, -50);
        assert_eq!(start.ticks[1].target, 1);
        assert_eq!(start.ticks[1].damage, 100);
        assert_eq!(engine.state().unit(ACTOR).map(|u| u.health), Some(1000));
    }

    #[test]
    fn skip_status_is_consumed() {
        let registry = registry();
        let config = RulesetConfig::new();
        let env = BattleEnv::new(&registry, &config);
        let mut actor = unit(2);
        actor.statuses = vec!["regen".into(), "stun".into(), "stun".into()];
        let state = BattleState::new(team("a", vec![unit(1)]), team("b", vec![actor]));
        let mut engine = BattleEngine::new(state, env, ConstantRng::new(0.5));

        let start = engine.apply_turn_effects(ACTOR).expect("known statuses");
        assert_eq!(start.skip, Some(SkipReason::Status("stun".into())));
        let last = start.ticks.last().expect("skip tick");
        assert!(last.remove);
        assert_eq!(last.damage, 0);
        assert_eq!(
            engine.state().unit(ACTOR).map(|u| u.statuses.clone()),
            Some(vec!["regen".to_string(), "stun".to_string()])
        );
    }

    #[test]
    fn lethal_tick_skips_the_turn() {
        let registry = registry();
        let config = RulesetConfig::new();
        let env = BattleEnv::new(&registry, &config);
        let mut actor = unit(2);
        actor.health = 150;
        actor.statuses = vec!["bleed".into(), "bleed".into(), "bleed".into()];
        let state = BattleState::new(team("a", vec![unit(1)]), team("b", vec![actor]));
        let mut engine = BattleEngine::new(state, env, ConstantRng::new(0.5));

        let start = engine.apply_turn_effects(ACTOR).expect("known statuses");
        assert_eq!(start.skip, Some(SkipReason::AttackerDead));
        // the third stack does not tick on a dead unit
        assert_eq!(start.ticks.len(), 2);
        assert_eq!(engine.state().unit(ACTOR).map(|u| u.health), Some(0));
    }

    #[test]
    fn team_wipe_from_ticks_skips_the_turn() {
        let registry = registry();
        let config = RulesetConfig::new();
        let env = BattleEnv::new(&registry, &config);
        let mut victim = unit(1);
        victim.health = 100;
        victim.statuses = vec!["bleed".into()];
        let state = BattleState::new(team("a", vec![victim]), team("b", vec![unit(2)]));
        let mut engine = BattleEngine::new(state, env, ConstantRng::new(0.5));

        let start = engine.apply_turn_effects(ACTOR).expect("known statuses");
        assert_eq!(start.skip, Some(SkipReason::TeamDead));
    }

    #[test]
    fn add_status_respects_stack_cap() {
        let mut target = unit(1);
        assert_eq!(add_status(&mut target, "atk_up", 5, 3), 3);
        assert_eq!(add_status(&mut target, "atk_up", 1, 3), 0);
        assert_eq!(target.status_count("atk_up"), 3);
    }
}
