//! Battle log.
//!
//! The log is the externally visible result of a battle: metadata, a
//! snapshot of every unit as prepared, the formation layout, one record per
//! turn and the final result. Re-running a battle from the log's teams and
//! seed must reproduce the same turns and result.

pub mod verify;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::combat::{EffectRecord, ExpiredStatus, StatusTick};
use crate::config::BattleOptions;
use crate::env::{BattleEnv, LeaderSkill, RulesetError, SpecialDefinition, StatItem};
use crate::state::{BattleState, Row, Side, StartingState, Team, Unit, UnitCounters, UnitId};
use crate::stats::{StatBlock, effective_stats};

// ============================================================================
// Meta, units and layout
// ============================================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleMeta {
    pub seed: String,
    pub timestamp: String,
    #[serde(rename = "type")]
    pub battle_type: String,
    #[serde(default)]
    pub campaign: serde_json::Value,
    #[serde(default)]
    pub is_boss: bool,
}

impl BattleMeta {
    pub fn new(seed: &str, options: &BattleOptions) -> Self {
        let timestamp = options
            .timestamp
            .clone()
            .unwrap_or_else(|| chrono::Utc::now().to_rfc3339());
        Self {
            seed: seed.to_owned(),
            timestamp,
            battle_type: options.battle_type.clone(),
            campaign: options.campaign.clone(),
            is_boss: options.is_boss,
        }
    }

    /// Options that reproduce this battle's metadata.
    pub fn options(&self, debug: bool) -> BattleOptions {
        BattleOptions {
            debug,
            battle_type: self.battle_type.clone(),
            campaign: self.campaign.clone(),
            is_boss: self.is_boss,
            timestamp: Some(self.timestamp.clone()),
        }
    }
}

/// Snapshot of a prepared unit.
///
/// Scheduler bookkeeping and battle counters are omitted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogUnit {
    pub id: UnitId,
    pub name: String,
    #[serde(flatten)]
    pub base: StatBlock,
    pub health: i64,
    pub full_health: i64,
    pub special_bar: u32,
    pub statuses: Vec<String>,
    pub special_expanded: SpecialDefinition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leader_skill_expanded: Option<LeaderSkill>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<StatItem>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub crystals: Vec<StatItem>,
}

impl From<&Unit> for LogUnit {
    fn from(unit: &Unit) -> Self {
        Self {
            id: unit.id,
            name: unit.name.clone(),
            base: unit.base,
            health: unit.health,
            full_health: unit.full_health,
            special_bar: unit.special_bar,
            statuses: unit.statuses.clone(),
            special_expanded: unit.special_expanded.clone(),
            leader_skill_expanded: unit.leader_skill_expanded.clone(),
            item: unit.item.clone(),
            crystals: unit.crystals.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotLayout {
    pub is_active: bool,
    pub id: Option<UnitId>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowLayout {
    pub slots: Vec<SlotLayout>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamLayout {
    pub name: String,
    pub owner: String,
    pub leader_id: UnitId,
    /// Front row, then back row.
    pub rows: Vec<RowLayout>,
    /// Slot ids interleaved front/back by slot index, for display.
    pub ui_order: Vec<UnitId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub starting_state: Vec<StartingState>,
}

impl From<&Team> for TeamLayout {
    fn from(team: &Team) -> Self {
        let rows = Row::ALL
            .into_iter()
            .map(|row| RowLayout {
                slots: team
                    .formation
                    .row(row)
                    .iter()
                    .map(|slot| SlotLayout {
                        is_active: slot.is_some(),
                        id: slot.as_ref().map(|unit| unit.id),
                    })
                    .collect(),
            })
            .collect();

        let ui_order = team
            .formation
            .front
            .iter()
            .zip(team.formation.back.iter())
            .flat_map(|(front, back)| [front, back])
            .filter_map(|slot| slot.as_ref().map(|unit| unit.id))
            .collect();

        Self {
            name: team.name.clone(),
            owner: team.owner.clone(),
            leader_id: team.leader,
            rows,
            ui_order,
            starting_state: team.starting_state.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BattleLayout {
    pub teams: Vec<TeamLayout>,
}

// ============================================================================
// Turns
// ============================================================================

/// The action taken in a turn.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionLog {
    pub user: UnitId,
    /// `auto` or the special's code.
    pub name: String,
    pub action_effects: Vec<EffectRecord>,
    pub additional_effects: Vec<EffectRecord>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialBarLog {
    pub id: UnitId,
    pub val: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnLog {
    pub index: u32,
    /// `attacker_dead`, `team_dead` or the skip status code.
    pub skip_turn: Option<String>,
    pub action: ActionLog,
    pub status_effects: Vec<StatusTick>,
    pub statuses_expired: Vec<ExpiredStatus>,
    /// Special bars of every unit, alive or dead, after the turn.
    #[serde(default)]
    pub special_bars: Vec<SpecialBarLog>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub environment_effects: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugEntry {
    pub turn: u32,
    pub user: UnitId,
    #[serde(rename = "move")]
    pub action: String,
    pub team1: Vec<String>,
    pub team2: Vec<String>,
}

impl DebugEntry {
    pub fn capture(turn: &TurnLog, state: &BattleState) -> Self {
        let describe = |side: Side| {
            state
                .alive(side)
                .into_iter()
                .filter_map(|at| state.unit(at))
                .map(|unit| {
                    format!(
                        "Id: {}, Name: {}, Health: {}, Statuses: {}",
                        unit.id,
                        unit.name,
                        unit.health,
                        unit.statuses.join(",")
                    )
                })
                .collect()
        };
        Self {
            turn: turn.index,
            user: turn.action.user,
            action: turn.action.name.clone(),
            team1: describe(Side::One),
            team2: describe(Side::Two),
        }
    }
}

// ============================================================================
// Result
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitStatsLog {
    pub id: UnitId,
    pub name: String,
    #[serde(flatten)]
    pub counters: UnitCounters,
}

/// Team-wide counter totals plus a per-unit breakdown.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamStats {
    #[serde(flatten)]
    pub totals: UnitCounters,
    pub gotchis: Vec<UnitStatsLog>,
}

impl From<&Team> for TeamStats {
    fn from(team: &Team) -> Self {
        let mut totals = UnitCounters::default();
        let gotchis = team
            .units()
            .map(|(_, _, unit)| {
                totals.accumulate(&unit.counters);
                UnitStatsLog {
                    id: unit.id,
                    name: unit.name.clone(),
                    counters: unit.counters,
                }
            })
            .collect();
        Self { totals, gotchis }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleStats {
    pub num_of_turns: u32,
    pub team1: TeamStats,
    pub team2: TeamStats,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WinningUnit {
    pub id: UnitId,
    pub name: String,
    pub health: i64,
    pub statuses: Vec<String>,
    pub original_stats: StatBlock,
    pub modified_stats: StatBlock,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleResult {
    /// 1 or 2.
    pub winner: u8,
    pub winning_team: Vec<WinningUnit>,
    pub stats: BattleStats,
}

// ============================================================================
// Log
// ============================================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleLog {
    pub meta: BattleMeta,
    pub gotchis: Vec<LogUnit>,
    pub layout: BattleLayout,
    pub turns: Vec<TurnLog>,
    /// Absent on a partial log from a failed battle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<BattleResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug: Option<Vec<DebugEntry>>,
}

/// Turns and result, the part of a log that must replay identically.
#[derive(Serialize)]
struct ReplayDigest<'a> {
    turns: &'a [TurnLog],
    result: &'a Option<BattleResult>,
}

impl BattleLog {
    /// Opens a log for a prepared battle.
    pub fn start(state: &BattleState, seed: &str, options: &BattleOptions) -> Self {
        let gotchis = Side::BOTH
            .into_iter()
            .flat_map(|side| state.team(side).units())
            .map(|(_, _, unit)| LogUnit::from(unit))
            .collect();
        Self {
            meta: BattleMeta::new(seed, options),
            gotchis,
            layout: BattleLayout {
                teams: Side::BOTH
                    .into_iter()
                    .map(|side| TeamLayout::from(state.team(side)))
                    .collect(),
            },
            turns: Vec::new(),
            result: None,
            debug: options.debug.then(Vec::new),
        }
    }

    /// Appends a turn, capturing a debug snapshot when enabled.
    pub fn record_turn(&mut self, turn: TurnLog, state: &BattleState) {
        if let Some(debug) = self.debug.as_mut() {
            debug.push(DebugEntry::capture(&turn, state));
        }
        self.turns.push(turn);
    }

    /// Writes the result section for a finished battle.
    ///
    /// # Errors
    ///
    /// Returns `RulesetError::UnknownStatus` if a winning unit holds a status
    /// the catalog does not define.
    pub fn finish(&mut self, state: &BattleState, env: BattleEnv<'_>) -> Result<(), RulesetError> {
        let winner = state.winner();
        let winning_team = state
            .team(winner)
            .units()
            .map(|(_, _, unit)| {
                Ok(WinningUnit {
                    id: unit.id,
                    name: unit.name.clone(),
                    health: unit.health,
                    statuses: unit.statuses.clone(),
                    original_stats: unit.base,
                    modified_stats: effective_stats(unit, env)?,
                })
            })
            .collect::<Result<Vec<_>, RulesetError>>()?;

        self.result = Some(BattleResult {
            winner: winner.number(),
            winning_team,
            stats: BattleStats {
                num_of_turns: self.turns.len() as u32,
                team1: TeamStats::from(state.team(Side::One)),
                team2: TeamStats::from(state.team(Side::Two)),
            },
        });
        Ok(())
    }

    pub fn num_of_turns(&self) -> Option<u32> {
        self.result.as_ref().map(|result| result.stats.num_of_turns)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// SHA-256 over the canonical JSON of turns and result, hex encoded.
    ///
    /// Meta (timestamp) and debug data are excluded, so two runs of the same
    /// battle share a digest.
    pub fn digest(&self) -> Result<String, serde_json::Error> {
        let bytes = serde_json::to_vec(&ReplayDigest {
            turns: &self.turns,
            result: &self.result,
        })?;
        Ok(hex::encode(Sha256::digest(&bytes)))
    }
}
