//! Special-effect and attack-effect resolution.
//!
//! Every function here consumes draws in a fixed order: chance gate, then
//! focus check, then any random pick. Reordering them changes replays.

use crate::combat::{EffectRecord, ExpiredStatus, Outcome, calculate_heal, focus_chance};
use crate::env::{
    AttackEffectKind, EffectType, RngSource, RulesetError, SpecialEffect, StatusDefinition,
};
use crate::state::UnitRef;

use super::status_effects::add_status;
use super::{BattleEngine, EngineError};

/// Result of applying one special effect to one target.
#[derive(Clone, Debug, PartialEq)]
pub struct EffectOutcome {
    pub record: EffectRecord,
    pub expired: Vec<ExpiredStatus>,
    /// The effect passed every check but the status was already at the stack cap.
    pub stack_capped: bool,
}

/// Which statuses a removal effect may take away.
#[derive(Clone, Copy)]
enum Polarity {
    Buff,
    /// Anything that is not a buff, neutral statuses included.
    NonBuff,
    /// Only statuses flagged as debuffs.
    Debuff,
}

impl Polarity {
    fn matches(self, status: &StatusDefinition) -> bool {
        match self {
            Self::Buff => status.is_buff,
            Self::NonBuff => !status.is_buff,
            Self::Debuff => status.is_debuff,
        }
    }
}

impl<R: RngSource> BattleEngine<'_, R> {
    /// Chance gate shared by special and attack effects.
    ///
    /// Chances of 1 or more pass and chances of 0 or less fail, both without
    /// drawing.
    pub(super) fn passes_chance(&mut self, chance: f64) -> bool {
        if chance >= 1.0 {
            return true;
        }
        if chance <= 0.0 {
            return false;
        }
        self.rng.next_f64() <= chance
    }

    /// Focus versus resist check for an effect aimed at `target`.
    ///
    /// Always succeeds against the actor's own team without drawing. Otherwise
    /// a success counts as a focus for the actor and a failure as a resist for
    /// the target.
    pub fn focus_check(&mut self, actor: UnitRef, target: UnitRef) -> Result<bool, EngineError> {
        if actor.side == target.side {
            return Ok(true);
        }
        let chance = focus_chance(
            &self.effective_stats(actor)?,
            &self.effective_stats(target)?,
            self.env.config(),
        );
        let landed = self.rng.next_f64() < chance;
        if landed {
            self.unit_mut(actor)?.counters.focuses += 1;
        } else {
            self.unit_mut(target)?.counters.resists += 1;
        }
        Ok(landed)
    }

    /// Heals `target` by a share of its full health, crediting both counters.
    ///
    /// Dead units are never healed.
    pub(super) fn heal(&mut self, actor: UnitRef, target: UnitRef, multiplier: f64) -> Result<i64, EngineError> {
        let unit = self.unit_mut(target)?;
        let amount = if unit.is_alive() {
            calculate_heal(unit.full_health, unit.health, multiplier)
        } else {
            0
        };
        unit.health += amount;
        unit.counters.heal_received += amount;
        self.unit_mut(actor)?.counters.heal_given += amount;
        Ok(amount)
    }

    /// Removes one random status of the given polarity from `at`.
    fn remove_random(&mut self, at: UnitRef, polarity: Polarity) -> Result<Option<ExpiredStatus>, EngineError> {
        let candidates = self.matching_statuses(at, polarity)?;
        if candidates.is_empty() {
            return Ok(None);
        }
        let index = self.rng.pick_index(candidates.len());
        let Some(code) = candidates.get(index).cloned() else {
            return Ok(None);
        };
        let unit = self.unit_mut(at)?;
        unit.remove_status(&code);
        Ok(Some(ExpiredStatus {
            target: unit.id,
            status: code,
        }))
    }

    /// Removes every status of the given polarity from `at`.
    fn remove_all(&mut self, at: UnitRef, polarity: Polarity) -> Result<Vec<ExpiredStatus>, EngineError> {
        let removed = self.matching_statuses(at, polarity)?;
        if removed.is_empty() {
            return Ok(Vec::new());
        }
        let env = self.env;
        let unit = self.unit_mut(at)?;
        let mut kept = Vec::with_capacity(unit.statuses.len());
        for code in unit.statuses.drain(..) {
            if !polarity.matches(env.status(&code)?) {
                kept.push(code);
            }
        }
        unit.statuses = kept;
        let id = unit.id;
        Ok(removed
            .into_iter()
            .map(|status| ExpiredStatus { target: id, status })
            .collect())
    }

    fn matching_statuses(&self, at: UnitRef, polarity: Polarity) -> Result<Vec<String>, EngineError> {
        let mut matching = Vec::new();
        for code in &self.unit(at)?.statuses {
            if polarity.matches(self.env.status(code)?) {
                matching.push(code.clone());
            }
        }
        Ok(matching)
    }

    /// Applies one special effect from `actor` to `target`.
    ///
    /// The record starts as `failed` with no damage; each effect type
    /// overwrites the outcome once its checks have run.
    pub fn apply_special_effect(
        &mut self,
        actor: UnitRef,
        target: UnitRef,
        effect: &SpecialEffect,
    ) -> Result<EffectOutcome, EngineError> {
        let source = self.unit(actor)?.id;
        let target_id = self.unit(target)?.id;
        let mut outcome = EffectOutcome {
            record: EffectRecord::new(target_id, Outcome::Failed).with_source(source),
            expired: Vec::new(),
            stack_capped: false,
        };

        if !self.passes_chance(effect.chance) {
            return Ok(outcome);
        }

        let max_stacks = self.env.config().max_status_stacks;
        match effect.effect_type {
            EffectType::Status => {
                let code = effect
                    .status
                    .as_deref()
                    .ok_or_else(|| RulesetError::UnknownStatus(String::from("null")))?;
                self.env.status(code)?;
                if self.focus_check(actor, target)? {
                    if add_status(self.unit_mut(target)?, code, 1, max_stacks) > 0 {
                        outcome.record.statuses.push(code.to_owned());
                        outcome.record.outcome = Outcome::Success;
                    } else {
                        outcome.stack_capped = true;
                    }
                } else {
                    outcome.record.outcome = Outcome::Resisted;
                }
            }
            EffectType::Heal => {
                let amount = self.heal(actor, target, effect.value.unwrap_or_default())?;
                outcome.record.damage = Some(-amount);
                outcome.record.outcome = Outcome::Success;
            }
            EffectType::RemoveBuff => {
                if self.focus_check(actor, target)? {
                    outcome.expired.extend(self.remove_random(target, Polarity::Buff)?);
                    outcome.record.outcome = Outcome::Success;
                } else {
                    outcome.record.outcome = Outcome::Resisted;
                }
            }
            EffectType::RemoveDebuff => {
                outcome.expired.extend(self.remove_random(target, Polarity::NonBuff)?);
                outcome.record.outcome = Outcome::Success;
            }
            EffectType::RemoveAllBuffs => {
                if self.focus_check(actor, target)? {
                    outcome.expired = self.remove_all(target, Polarity::Buff)?;
                    outcome.record.outcome = Outcome::Success;
                } else {
                    outcome.record.outcome = Outcome::Resisted;
                }
            }
            EffectType::RemoveAllDebuffs => {
                outcome.expired = self.remove_all(target, Polarity::NonBuff)?;
                outcome.record.outcome = Outcome::Success;
            }
            EffectType::RepeatAttack => {
                return Err(RulesetError::InvalidEffectType(effect.effect_type.to_string()).into());
            }
        }
        Ok(outcome)
    }

    /// Fires the attack effects of every status the actor holds.
    ///
    /// Runs once per auto-attack target. Statuses applied to the target are
    /// merged into `main`; self-buffs are logged in `additional`.
    pub fn apply_attack_effects(
        &mut self,
        actor: UnitRef,
        target: UnitRef,
        main: &mut EffectRecord,
        additional: &mut Vec<EffectRecord>,
        expired: &mut Vec<ExpiredStatus>,
    ) -> Result<(), EngineError> {
        let env = self.env;
        let max_stacks = env.config().max_status_stacks;
        let held = self.unit(actor)?.statuses.clone();

        for code in &held {
            for effect in &env.status(code)?.attack_effects {
                if !self.passes_chance(effect.effect_chance) {
                    continue;
                }
                match effect.kind {
                    AttackEffectKind::ApplyStatus => {
                        let Some(status) = effect.status.as_deref() else {
                            continue;
                        };
                        if self.focus_check(actor, target)?
                            && add_status(self.unit_mut(target)?, status, 1, max_stacks) > 0
                        {
                            main.statuses.push(status.to_owned());
                        }
                    }
                    AttackEffectKind::GainStatus => {
                        let Some(status) = effect.status.as_deref() else {
                            continue;
                        };
                        let unit = self.unit_mut(actor)?;
                        if add_status(unit, status, 1, max_stacks) > 0 {
                            additional.push(EffectRecord::new(unit.id, Outcome::Success).with_status(status));
                        }
                    }
                    AttackEffectKind::RemoveBuff => {
                        if self.focus_check(actor, target)? {
                            expired.extend(self.remove_random(target, Polarity::Buff)?);
                        }
                    }
                    AttackEffectKind::CleanseTarget => {
                        expired.extend(self.remove_random(target, Polarity::Debuff)?);
                    }
                    AttackEffectKind::CleanseSelf => {
                        expired.extend(self.remove_random(actor, Polarity::Debuff)?);
                    }
                }
            }
        }
        Ok(())
    }
}
