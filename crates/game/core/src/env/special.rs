//! Special moves, leader skills and stat items.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use super::RulesetError;
use super::target::{EffectTarget, TargetCode};
use crate::stats::ItemStat;

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    AsRefStr,
    Display,
    EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ActionType {
    Attack,
    Heal,
    /// No damage or heal; the special only carries effects.
    #[default]
    None,
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EffectType {
    Status,
    Heal,
    RemoveBuff,
    RemoveDebuff,
    RemoveAllBuffs,
    RemoveAllDebuffs,
    RepeatAttack,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecialEffect {
    pub effect_type: EffectType,
    /// Heal multiplier for `heal` effects.
    #[serde(default)]
    pub value: Option<f64>,
    /// Probability in `[0, 1]`; values of 1 or more never draw.
    #[serde(default = "always")]
    pub chance: f64,
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

fn always() -> f64 {
    1.0
}

impl SpecialEffect {
    pub fn effect_target(&self) -> Result<EffectTarget, RulesetError> {
        EffectTarget::parse(self.target.as_deref())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecialDefinition {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub name: String,
    /// Auto-attacks needed before the first special.
    pub initial_cooldown: u32,
    /// Auto-attacks needed between specials.
    pub cooldown: u32,
    #[serde(default)]
    pub action_type: ActionType,
    #[serde(default)]
    pub action_multiplier: Option<f64>,
    /// Main action target; only `none` specials may omit it.
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub effects: Vec<SpecialEffect>,
}

impl SpecialDefinition {
    /// Name recorded in the turn log.
    pub fn log_name(&self) -> &str {
        if self.code.is_empty() { &self.name } else { &self.code }
    }

    pub fn main_target(&self) -> Result<Option<TargetCode>, RulesetError> {
        self.target.as_deref().map(TargetCode::parse).transpose()
    }

    pub fn repeat_effect(&self) -> Option<&SpecialEffect> {
        self.effects
            .iter()
            .find(|effect| effect.effect_type == EffectType::RepeatAttack)
    }

    /// Effects other than `repeat_attack`, with their parsed targets.
    pub fn targeted_effects(&self) -> Result<Vec<(EffectTarget, &SpecialEffect)>, RulesetError> {
        self.effects
            .iter()
            .filter(|effect| effect.effect_type != EffectType::RepeatAttack)
            .map(|effect| Ok((effect.effect_target()?, effect)))
            .collect()
    }

    /// Checks target codes and effect shapes without a status registry.
    pub fn validate(&self) -> Result<(), RulesetError> {
        let target = self.main_target()?;
        if target.is_none() && self.action_type != ActionType::None {
            return Err(RulesetError::UnknownTargetCode(String::from("null")));
        }
        if self.action_multiplier.is_none() && self.action_type != ActionType::None {
            return Err(RulesetError::MissingActionMultiplier {
                special: self.code.clone(),
            });
        }
        for (_, effect) in self.targeted_effects()? {
            if effect.effect_type == EffectType::Status && effect.status.is_none() {
                return Err(RulesetError::MissingEffectStatus {
                    special: self.code.clone(),
                });
            }
        }
        Ok(())
    }

    /// Status codes referenced by this special's effects.
    pub fn referenced_statuses(&self) -> impl Iterator<Item = &str> {
        self.effects.iter().filter_map(|effect| effect.status.as_deref())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderSkillStatus {
    pub status: String,
    #[serde(default = "single_stack")]
    pub stack_count: u32,
}

fn single_stack() -> u32 {
    1
}

/// Statuses granted to every living ally of a team's leader at battle start.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderSkill {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub statuses: Vec<LeaderSkillStatus>,
}

/// Equipped item or crystal adding a flat amount to one stat.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatItem {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub name: String,
    pub stat: ItemStat,
    pub stat_value: f64,
}
