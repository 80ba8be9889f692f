//! Records produced while resolving actions and status ticks.

use serde::{Deserialize, Serialize};

use crate::state::UnitId;

/// Outcome of one effect on one target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Success,
    Critical,
    Miss,
    Evade,
    Counter,
    Resisted,
    Failed,
}

/// Effect of an action on one unit.
///
/// Damage is positive for damage dealt and negative for healing. `None`
/// means the effect neither damaged nor healed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectRecord {
    pub target: UnitId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<UnitId>,
    pub damage: Option<i64>,
    pub outcome: Outcome,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub statuses: Vec<String>,
}

impl EffectRecord {
    pub fn new(target: UnitId, outcome: Outcome) -> Self {
        Self {
            target,
            source: None,
            damage: None,
            outcome,
            statuses: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_source(mut self, source: UnitId) -> Self {
        self.source = Some(source);
        self
    }

    #[must_use]
    pub fn with_damage(mut self, damage: i64) -> Self {
        self.damage = Some(damage);
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.statuses.push(status.into());
        self
    }
}

/// A status removed from a unit during an action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpiredStatus {
    pub target: UnitId,
    pub status: String,
}

/// A start-of-turn status tick.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusTick {
    pub target: UnitId,
    pub status: String,
    /// Positive for damage, negative for healing.
    pub damage: i64,
    /// Whether the status was consumed by this tick.
    pub remove: bool,
}
