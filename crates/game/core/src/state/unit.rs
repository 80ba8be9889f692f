use serde::{Deserialize, Serialize};

use crate::env::{LeaderSkill, SpecialDefinition, StatItem};
use crate::stats::StatBlock;

pub type UnitId = u64;

/// Per-unit battle counters reported in the result.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitCounters {
    pub dmg_given: i64,
    pub dmg_received: i64,
    pub heal_given: i64,
    pub heal_received: i64,
    pub crits: u32,
    pub resists: u32,
    pub focuses: u32,
    pub counters: u32,
    pub hits: u32,
}

impl UnitCounters {
    pub fn accumulate(&mut self, other: &UnitCounters) {
        self.dmg_given += other.dmg_given;
        self.dmg_received += other.dmg_received;
        self.heal_given += other.heal_given;
        self.heal_received += other.heal_received;
        self.crits += other.crits;
        self.resists += other.resists;
        self.focuses += other.focuses;
        self.counters += other.counters;
        self.hits += other.hits;
    }
}

/// A combatant.
///
/// The first block of fields is supplied by the caller. The battle fields
/// below are (re)initialized during preparation and evolve while the battle
/// runs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    pub id: UnitId,
    #[serde(default)]
    pub name: String,
    /// Base combat stats, after items once the battle is prepared.
    #[serde(flatten)]
    pub base: StatBlock,
    /// Current health; a unit is alive while this is positive.
    pub health: i64,
    pub special_expanded: SpecialDefinition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leader_skill_expanded: Option<LeaderSkill>,
    #[serde(default, alias = "itemExpanded", skip_serializing_if = "Option::is_none")]
    pub item: Option<StatItem>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub crystals: Vec<StatItem>,

    // ===== battle fields =====
    /// Status codes in application order; duplicates are stacks.
    #[serde(default)]
    pub statuses: Vec<String>,
    #[serde(default)]
    pub action_delay: f64,
    #[serde(default)]
    pub special_bar: u32,
    #[serde(default)]
    pub full_health: i64,
    #[serde(default)]
    pub environment_effects: Vec<String>,
    #[serde(default, rename = "stats")]
    pub counters: UnitCounters,
}

impl Unit {
    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn status_count(&self, code: &str) -> usize {
        self.statuses.iter().filter(|held| held.as_str() == code).count()
    }

    pub fn has_status(&self, code: &str) -> bool {
        self.statuses.iter().any(|held| held == code)
    }

    /// Removes the first instance of `code`; returns whether one was held.
    pub fn remove_status(&mut self, code: &str) -> bool {
        match self.statuses.iter().position(|held| held == code) {
            Some(index) => {
                self.statuses.remove(index);
                true
            }
            None => false,
        }
    }

    /// Subtracts `amount` from health, flooring at zero. Returns the new health.
    pub fn take_damage(&mut self, amount: i64) -> i64 {
        self.health = (self.health - amount).max(0);
        self.health
    }

    /// Health missing from full.
    pub fn missing_health(&self) -> i64 {
        (self.full_health - self.health).max(0)
    }
}

/// Health and statuses a unit enters the battle with.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartingState {
    pub id: UnitId,
    pub health: i64,
    #[serde(default)]
    pub statuses: Vec<String>,
}
