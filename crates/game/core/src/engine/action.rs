//! Action resolution: auto-attacks and specials.

use tracing::trace;

use crate::combat::{
    EffectRecord, ExpiredStatus, Outcome, calculate_damage, crit_chance, crit_multiplier,
};
use crate::env::{ActionType, EffectTarget, RngSource, SpecialEffect, TargetCode};
use crate::state::{UnitRef, UnitRefs};

use super::{BattleEngine, EngineError};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionKind {
    /// The basic attack every unit falls back to.
    Auto,
    /// The unit's special; requires a full special bar.
    Special,
}

/// Everything one action did.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ActionResult {
    /// One record per main-action target.
    pub action_effects: Vec<EffectRecord>,
    pub additional_effects: Vec<EffectRecord>,
    pub statuses_expired: Vec<ExpiredStatus>,
    /// The actor acts again without advancing its delay.
    pub repeat_attack: bool,
    /// False when a status-only special achieved nothing because every
    /// status it tried to apply was already at the stack cap.
    pub performed: bool,
}

/// Counts effect attempts so a fully stack-capped special can be detected.
#[derive(Default)]
struct Attempts {
    total: usize,
    capped: usize,
}

impl Attempts {
    fn all_capped(&self) -> bool {
        self.total > 0 && self.capped == self.total
    }
}

impl<R: RngSource> BattleEngine<'_, R> {
    /// Resolves an auto-attack or special for `actor`.
    ///
    /// # Draw order
    ///
    /// 1. Main-action targets
    /// 2. `repeat_attack`, once per special use
    /// 3. Per target: crit, then same-as-attack effects (specials) or
    ///    attack effects (auto-attacks)
    /// 4. Effects with their own target codes, in declaration order
    pub fn resolve_action(&mut self, actor: UnitRef, kind: ActionKind) -> Result<ActionResult, EngineError> {
        let config = self.env.config();
        let special = self.unit(actor)?.special_expanded.clone();

        let (action_type, target_code, multiplier) = match kind {
            ActionKind::Auto => (
                ActionType::Attack,
                Some(TargetCode::EnemyRandom),
                config.auto_attack_multiplier,
            ),
            ActionKind::Special => (
                special.action_type,
                special.main_target()?,
                special.action_multiplier.unwrap_or(match special.action_type {
                    ActionType::Heal => 0.0,
                    _ => 1.0,
                }),
            ),
        };

        let targets = match target_code {
            Some(code) => self.resolve_targets(code, actor)?,
            None => UnitRefs::new(),
        };

        let mut result = ActionResult::default();
        let mut attempts = Attempts::default();

        let (same_as_attack, independent): (Vec<_>, Vec<_>) = match kind {
            ActionKind::Auto => (Vec::new(), Vec::new()),
            ActionKind::Special => special
                .targeted_effects()?
                .into_iter()
                .partition(|(target, _)| *target == EffectTarget::SameAsAttack),
        };

        if kind == ActionKind::Special {
            if let Some(repeat) = special.repeat_effect() {
                result.repeat_attack = self.rng.next_f64() <= repeat.chance;
            }
        }

        for &target in &targets {
            let crit = self.roll_crit(actor)?;
            let multiplier = multiplier * crit;
            let is_crit = crit > 1.0;

            let mut main = match action_type {
                ActionType::Attack => Some(self.strike(actor, target, multiplier, is_crit)?),
                ActionType::Heal => {
                    let amount = self.heal(actor, target, multiplier)?;
                    Some(EffectRecord::new(self.unit(target)?.id, Outcome::Success).with_damage(-amount))
                }
                ActionType::None if !same_as_attack.is_empty() => {
                    Some(EffectRecord::new(self.unit(target)?.id, Outcome::Success))
                }
                ActionType::None => None,
            };
            let mut additional = Vec::new();

            match kind {
                ActionKind::Special => {
                    for (_, effect) in &same_as_attack {
                        self.same_as_attack_effect(
                            actor,
                            target,
                            effect,
                            &mut main,
                            &mut additional,
                            &mut result,
                            &mut attempts,
                        )?;
                    }
                }
                ActionKind::Auto => {
                    if let Some(main) = main.as_mut() {
                        self.apply_attack_effects(
                            actor,
                            target,
                            main,
                            &mut additional,
                            &mut result.statuses_expired,
                        )?;
                    }
                    additional.extend(self.counter_attack(actor, target)?);
                }
            }

            result.action_effects.extend(main);
            result.additional_effects.append(&mut additional);
        }

        for (effect_target, effect) in &independent {
            let EffectTarget::Code(code) = *effect_target else {
                continue;
            };
            let targets = match self.resolve_targets(code, actor) {
                Ok(targets) => targets,
                Err(EngineError::Targeting(error)) => {
                    trace!(%error, "effect has no target left");
                    continue;
                }
                Err(error) => return Err(error),
            };
            for target in targets {
                let outcome = self.apply_special_effect(actor, target, effect)?;
                attempts.total += 1;
                attempts.capped += usize::from(outcome.stack_capped);
                result.additional_effects.push(outcome.record);
                result.statuses_expired.extend(outcome.expired);
            }
        }

        result.performed = !(kind == ActionKind::Special
            && action_type == ActionType::None
            && attempts.all_capped());
        Ok(result)
    }

    /// Rolls a critical hit for `actor`, returning the multiplier to apply.
    ///
    /// A crit with no bonus damage returns 1 and does not count as a crit.
    fn roll_crit(&mut self, actor: UnitRef) -> Result<f64, EngineError> {
        let stats = self.effective_stats(actor)?;
        let chance = crit_chance(&stats, self.env.config());
        if self.rng.next_f64() < chance {
            Ok(crit_multiplier(&stats))
        } else {
            Ok(1.0)
        }
    }

    /// Deals damage from `actor` to `target` and updates both counters.
    fn strike(&mut self, actor: UnitRef, target: UnitRef, multiplier: f64, is_crit: bool) -> Result<EffectRecord, EngineError> {
        let attacker = self.effective_stats(actor)?;
        let defender = self.effective_stats(target)?;
        let env_effects = self.unit(target)?.environment_effects.len();
        let damage = calculate_damage(&attacker, &defender, multiplier, env_effects, self.env.config());

        let unit = self.unit_mut(target)?;
        unit.take_damage(damage);
        unit.counters.dmg_received += damage;
        let target_id = unit.id;

        let unit = self.unit_mut(actor)?;
        unit.counters.hits += 1;
        unit.counters.dmg_given += damage;
        if is_crit {
            unit.counters.crits += 1;
        }

        let outcome = if is_crit { Outcome::Critical } else { Outcome::Success };
        Ok(EffectRecord::new(target_id, outcome).with_damage(damage))
    }

    /// A surviving taunt holder strikes back once, without a crit roll.
    fn counter_attack(&mut self, actor: UnitRef, target: UnitRef) -> Result<Option<EffectRecord>, EngineError> {
        let taunt = &self.env.config().taunt_status;
        let defender = self.unit(target)?;
        if !defender.is_alive() || !defender.has_status(taunt) {
            return Ok(None);
        }

        let multiplier = self.env.config().counter_attack_multiplier;
        let striker = self.effective_stats(target)?;
        let struck = self.effective_stats(actor)?;
        let env_effects = self.unit(actor)?.environment_effects.len();
        let damage = calculate_damage(&striker, &struck, multiplier, env_effects, self.env.config());

        let unit = self.unit_mut(actor)?;
        unit.take_damage(damage);
        unit.counters.dmg_received += damage;
        let actor_id = unit.id;

        let unit = self.unit_mut(target)?;
        unit.counters.counters += 1;
        unit.counters.dmg_given += damage;
        trace!(source = unit.id, target = actor_id, damage, "counter attack");

        Ok(Some(
            EffectRecord::new(actor_id, Outcome::Counter)
                .with_source(unit.id)
                .with_damage(damage),
        ))
    }

    /// Applies one same-as-attack effect to `target`, merging applied
    /// statuses into the main record when it targets the same unit.
    #[allow(clippy::too_many_arguments)]
    fn same_as_attack_effect(
        &mut self,
        actor: UnitRef,
        target: UnitRef,
        effect: &SpecialEffect,
        main: &mut Option<EffectRecord>,
        additional: &mut Vec<EffectRecord>,
        result: &mut ActionResult,
        attempts: &mut Attempts,
    ) -> Result<(), EngineError> {
        let outcome = self.apply_special_effect(actor, target, effect)?;
        attempts.total += 1;
        attempts.capped += usize::from(outcome.stack_capped);
        result.statuses_expired.extend(outcome.expired);

        match main {
            Some(main) if !outcome.record.statuses.is_empty() && main.target == outcome.record.target => {
                main.statuses.extend(outcome.record.statuses);
            }
            _ => additional.push(outcome.record),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RulesetConfig;
    use crate::env::{
        BattleEnv, ConstantRng, EffectType, SequenceRng, StatusCategory, StatusDefinition,
        StatusRegistry,
    };
    use crate::state::fixtures::unit;
    use crate::state::test_support::team;
    use crate::state::{BattleState, Row, Side, Unit};

    const CASTER: UnitRef = UnitRef::new(Side::One, Row::Front, 0);
    const DEFENDER: UnitRef = UnitRef::new(Side::Two, Row::Front, 0);

    fn marker(code: &str, is_buff: bool) -> StatusDefinition {
        StatusDefinition {
            code: code.into(),
            name: String::new(),
            category: StatusCategory::Custom,
            stat_modifiers: Vec::new(),
            turn_effects: Vec::new(),
            attack_effects: Vec::new(),
            is_buff,
            is_debuff: !is_buff,
        }
    }

    fn registry() -> StatusRegistry {
        StatusRegistry::from_definitions([
            marker("foc_down", false),
            marker("spd_down", false),
            marker("fortify", true),
            marker("taunt", true),
        ])
        .expect("valid catalog")
    }

    fn effect(effect_type: EffectType, target: Option<&str>, status: Option<&str>, chance: f64) -> SpecialEffect {
        SpecialEffect {
            effect_type,
            value: None,
            chance,
            target: target.map(str::to_owned),
            status: status.map(str::to_owned),
        }
    }

    fn against_five(caster: Unit) -> BattleState {
        let enemies = (2..7).map(unit).collect();
        BattleState::new(team("a", vec![caster]), team("b", enemies))
    }

    fn debuffer() -> Unit {
        let mut caster = unit(1);
        caster.special_expanded.target = Some("enemy_row_largest".into());
        caster.special_expanded.effects = vec![
            effect(EffectType::Status, Some("same_as_attack"), Some("foc_down"), 1.0),
            effect(EffectType::Status, Some("same_as_attack"), Some("spd_down"), 1.0),
        ];
        caster
    }

    #[test]
    fn landed_debuffs_merge_into_placeholder_records() {
        let registry = registry();
        let config = RulesetConfig::new();
        let env = BattleEnv::new(&registry, &config);
        let mut engine = BattleEngine::new(against_five(debuffer()), env, ConstantRng::new(0.1));

        let result = engine
            .resolve_action(CASTER, ActionKind::Special)
            .expect("special resolves");
        assert_eq!(result.action_effects.len(), 5);
        for record in &result.action_effects {
            assert_eq!(record.damage, None);
            assert_eq!(record.outcome, Outcome::Success);
            assert_eq!(record.statuses, vec!["foc_down".to_string(), "spd_down".to_string()]);
        }
        assert!(result.additional_effects.is_empty());
        assert!(result.performed);
    }

    #[test]
    fn resisted_debuffs_are_logged_separately() {
        let registry = registry();
        let config = RulesetConfig::new();
        let env = BattleEnv::new(&registry, &config);
        let mut engine = BattleEngine::new(against_five(debuffer()), env, ConstantRng::new(0.9));

        let result = engine
            .resolve_action(CASTER, ActionKind::Special)
            .expect("special resolves");
        assert_eq!(result.action_effects.len(), 5);
        assert!(result.action_effects.iter().all(|r| r.statuses.is_empty()));
        assert_eq!(result.additional_effects.len(), 10);
        for record in &result.additional_effects {
            assert_eq!(record.outcome, Outcome::Resisted);
            assert_eq!(record.damage, None);
            assert_eq!(record.source, Some(1));
        }
        assert_eq!(engine.unit(CASTER).map(|u| u.counters.focuses), Ok(0));
    }

    fn sweeper(repeat_chance: f64) -> Unit {
        let mut caster = unit(1);
        caster.special_expanded.action_type = ActionType::Attack;
        caster.special_expanded.action_multiplier = Some(1.0);
        caster.special_expanded.target = Some("all_enemies".into());
        caster.special_expanded.effects = vec![effect(EffectType::RepeatAttack, None, None, repeat_chance)];
        caster
    }

    #[test]
    fn repeat_is_drawn_once_before_the_strikes() {
        let registry = registry();
        let config = RulesetConfig::new();
        let env = BattleEnv::new(&registry, &config);

        let rng = SequenceRng::new(vec![0.6, 0.9, 0.9, 0.9, 0.9, 0.9]);
        let mut engine = BattleEngine::new(against_five(sweeper(0.5)), env, rng);
        let result = engine
            .resolve_action(CASTER, ActionKind::Special)
            .expect("special resolves");
        assert!(!result.repeat_attack);
        assert_eq!(engine.rng().draws(), 6);
        assert_eq!(result.action_effects.len(), 5);
        assert!(result.action_effects.iter().all(|r| r.damage == Some(100)));

        let rng = SequenceRng::new(vec![0.4, 0.9, 0.9, 0.9, 0.9, 0.9]);
        let mut engine = BattleEngine::new(against_five(sweeper(0.5)), env, rng);
        let result = engine
            .resolve_action(CASTER, ActionKind::Special)
            .expect("special resolves");
        assert!(result.repeat_attack);
        assert_eq!(engine.rng().draws(), 6);
    }

    #[test]
    fn fully_stacked_self_buff_is_not_performed() {
        let registry = registry();
        let config = RulesetConfig::new();
        let env = BattleEnv::new(&registry, &config);
        let mut caster = unit(1);
        caster.statuses = vec!["fortify".into(); 3];
        caster.special_expanded.effects = vec![effect(EffectType::Status, Some("self"), Some("fortify"), 1.0)];
        let state = BattleState::new(team("a", vec![caster]), team("b", vec![unit(2)]));
        let mut engine = BattleEngine::new(state, env, ConstantRng::new(0.5));

        let result = engine
            .resolve_action(CASTER, ActionKind::Special)
            .expect("special resolves");
        assert!(!result.performed);
        assert!(result.action_effects.is_empty());
        assert_eq!(result.additional_effects.len(), 1);
        assert_eq!(result.additional_effects[0].outcome, Outcome::Failed);
        assert_eq!(engine.unit(CASTER).map(|u| u.status_count("fortify")), Ok(3));
    }

    #[test]
    fn taunt_holder_counters_an_auto_attack() {
        let registry = registry();
        let config = RulesetConfig::new();
        let env = BattleEnv::new(&registry, &config);
        let mut guard = unit(2);
        guard.statuses = vec!["taunt".into()];
        let state = BattleState::new(team("a", vec![unit(1)]), team("b", vec![guard, unit(3)]));
        let mut engine = BattleEngine::new(state, env, ConstantRng::new(0.5));

        let result = engine
            .resolve_action(CASTER, ActionKind::Auto)
            .expect("auto-attack resolves");
        assert_eq!(result.action_effects.len(), 1);
        assert_eq!(result.action_effects[0].target, 2);
        assert_eq!(result.action_effects[0].damage, Some(85));
        assert_eq!(
            result.additional_effects,
            vec![EffectRecord::new(1, Outcome::Counter).with_source(2).with_damage(50)]
        );

        let caster = engine.unit(CASTER).expect("caster");
        assert_eq!(caster.health, 950);
        assert_eq!(caster.counters.dmg_received, 50);
        let guard = engine.unit(DEFENDER).expect("guard");
        assert_eq!(guard.counters.counters, 1);
        assert_eq!(guard.counters.dmg_given, 50);
    }
}
