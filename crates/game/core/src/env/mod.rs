//! Read-only battle rules.
//!
//! The status catalog and the ruleset never change during a battle. The
//! [`BattleEnv`] aggregate bundles them so the engine can reach everything it
//! needs without owning any of it.
mod error;
mod registry;
mod rng;
mod special;
mod status;
mod target;

pub use error::RulesetError;
pub use registry::StatusRegistry;
pub use rng::{Arc4Rng, ConstantRng, RngSource, SequenceRng};
pub use special::{
    ActionType, EffectType, LeaderSkill, LeaderSkillStatus, SpecialDefinition, SpecialEffect,
    StatItem,
};
pub use status::{
    AttackEffect, AttackEffectKind, StatModifier, StatusCategory, StatusDefinition, TurnEffect,
    TurnEffectKind, ValueType,
};
pub use target::{EffectTarget, TargetCode};

use crate::config::RulesetConfig;

/// Source of status definitions.
pub trait StatusOracle {
    fn definition(&self, code: &str) -> Option<&StatusDefinition>;
}

impl StatusOracle for StatusRegistry {
    fn definition(&self, code: &str) -> Option<&StatusDefinition> {
        self.get(code).ok()
    }
}

/// Aggregates the status catalog and ruleset used to resolve a battle.
#[derive(Clone, Copy)]
pub struct BattleEnv<'a> {
    statuses: &'a (dyn StatusOracle + 'a),
    config: &'a RulesetConfig,
}

impl<'a> BattleEnv<'a> {
    pub fn new(statuses: &'a (dyn StatusOracle + 'a), config: &'a RulesetConfig) -> Self {
        Self { statuses, config }
    }

    pub fn config(&self) -> &'a RulesetConfig {
        self.config
    }

    /// Returns the definition for `code`.
    ///
    /// # Errors
    ///
    /// Returns `RulesetError::UnknownStatus` if the catalog has no such code.
    pub fn status(&self, code: &str) -> Result<&'a StatusDefinition, RulesetError> {
        self.statuses
            .definition(code)
            .ok_or_else(|| RulesetError::UnknownStatus(code.to_owned()))
    }

    pub fn has_status(&self, code: &str) -> bool {
        self.statuses.definition(code).is_some()
    }
}

impl core::fmt::Debug for BattleEnv<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BattleEnv")
            .field("config", self.config)
            .finish_non_exhaustive()
    }
}
