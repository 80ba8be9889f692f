//! Status definitions.
//!
//! A status is a named marker carried by a unit. Its definition declares
//! stat modifiers, start-of-turn effects, and effects that trigger when the
//! carrier auto-attacks.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use super::RulesetError;
use crate::stats::StatName;

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StatusCategory {
    /// Contributes stat modifiers while held.
    StatModifier,
    /// Ticks at the start of every turn.
    TurnEffect,
    /// Marker only (taunt, environment effects); behavior lives elsewhere.
    Custom,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    #[default]
    Flat,
    Percent,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatModifier {
    pub stat_name: StatName,
    pub value_type: ValueType,
    pub value: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnEffectKind {
    Heal,
    Damage,
    SkipTurn,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnEffect {
    #[serde(rename = "type")]
    pub kind: TurnEffectKind,
    #[serde(default)]
    pub value: f64,
    /// Percent values are taken of the carrier's full health.
    #[serde(default)]
    pub value_type: ValueType,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackEffectKind {
    /// Focus-checked status on the attack target.
    ApplyStatus,
    /// Status on the attacker itself.
    GainStatus,
    /// Focus-checked removal of one random buff from the target.
    RemoveBuff,
    /// Removes one random debuff from the target.
    CleanseTarget,
    /// Removes one random debuff from the attacker.
    CleanseSelf,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttackEffect {
    #[serde(rename = "type")]
    pub kind: AttackEffectKind,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default = "always")]
    pub effect_chance: f64,
}

fn always() -> f64 {
    1.0
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusDefinition {
    pub code: String,
    #[serde(default)]
    pub name: String,
    pub category: StatusCategory,
    #[serde(default)]
    pub stat_modifiers: Vec<StatModifier>,
    #[serde(default)]
    pub turn_effects: Vec<TurnEffect>,
    #[serde(default)]
    pub attack_effects: Vec<AttackEffect>,
    #[serde(default)]
    pub is_buff: bool,
    #[serde(default)]
    pub is_debuff: bool,
}

impl StatusDefinition {
    /// Whether holding this status forfeits the holder's next action.
    pub fn skips_turn(&self) -> bool {
        self.turn_effects
            .iter()
            .any(|effect| effect.kind == TurnEffectKind::SkipTurn)
    }

    /// Modifiers that contribute to effective stats.
    ///
    /// Only `stat_modifier` statuses contribute.
    pub fn active_modifiers(&self) -> &[StatModifier] {
        match self.category {
            StatusCategory::StatModifier => &self.stat_modifiers,
            _ => &[],
        }
    }

    pub fn validate(&self) -> Result<(), RulesetError> {
        let invalid = |reason| RulesetError::InvalidStatusDefinition {
            code: self.code.clone(),
            reason,
        };

        if self.code.is_empty() {
            return Err(invalid("status code is empty"));
        }
        if self.is_buff && self.is_debuff {
            return Err(invalid("status cannot be both a buff and a debuff"));
        }
        if self.category == StatusCategory::StatModifier && self.stat_modifiers.is_empty() {
            return Err(invalid("stat_modifier status declares no modifiers"));
        }
        if self.category == StatusCategory::TurnEffect && self.turn_effects.is_empty() {
            return Err(invalid("turn_effect status declares no turn effects"));
        }
        if self.stat_modifiers.iter().any(|m| !m.value.is_finite()) {
            return Err(invalid("modifier value is not finite"));
        }
        let needs_status = |effect: &AttackEffect| {
            matches!(
                effect.kind,
                AttackEffectKind::ApplyStatus | AttackEffectKind::GainStatus
            ) && effect.status.is_none()
        };
        if self.attack_effects.iter().any(needs_status) {
            return Err(invalid("attack effect is missing its status code"));
        }
        Ok(())
    }
}
