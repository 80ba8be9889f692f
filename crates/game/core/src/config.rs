use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::stats::round_half_up;

/// How the post-multiplier damage value is rounded.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DamageRounding {
    /// Round toward negative infinity.
    #[default]
    Floor,
    /// Round half toward positive infinity.
    Round,
}

impl DamageRounding {
    pub fn apply(self, value: f64) -> f64 {
        match self {
            Self::Floor => value.floor(),
            Self::Round => round_half_up(value),
        }
    }
}

/// Ruleset constants and tunable parameters.
///
/// Every battle is resolved against one ruleset. Two battles with the same
/// teams, seed and ruleset produce identical logs; changing any field here
/// changes the battle outcome and therefore the replay contract.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesetConfig {
    /// Free-form ruleset identifier recorded alongside content.
    pub version: String,
    pub auto_attack_multiplier: f64,
    pub counter_attack_multiplier: f64,
    /// Maximum copies of one status code a unit may carry.
    pub max_status_stacks: usize,
    /// Number of auto-attacks needed to fill an empty special bar.
    pub special_bar_sections: u32,
    /// Minimum probability of a critical hit.
    pub crit_chance_floor: f64,
    pub focus_base_chance: f64,
    pub focus_divisor: f64,
    pub focus_min_chance: f64,
    pub focus_max_chance: f64,
    /// Turn indices at which every living unit receives the environment effect.
    pub environment_turns: Vec<u32>,
    /// Damage bonus per accumulated environment effect.
    pub environment_damage_step: f64,
    pub environment_effect: String,
    /// Status code that forces targeting and enables counter-attacks.
    pub taunt_status: String,
    pub damage_rounding: DamageRounding,
    /// Whether `ally_random` targeting prefers taunting allies.
    pub ally_random_respects_taunt: bool,
    /// Hard ceiling on turns; reaching it aborts the battle.
    pub max_turns: u32,
    /// Re-roll attempts when teams share unit ids.
    pub id_scramble_attempts: u32,
    /// Exclusive upper bound for scrambled unit ids.
    pub id_range: u64,
}

impl RulesetConfig {
    // ===== compile-time constants used as type parameters =====
    /// Slots per formation row.
    pub const ROW_SLOTS: usize = 5;
    /// Slots per team (front and back rows).
    pub const TEAM_SLOTS: usize = Self::ROW_SLOTS * 2;
    /// Slots across both teams.
    pub const MAX_UNITS: usize = Self::TEAM_SLOTS * 2;
    /// Value of a full special bar.
    pub const SPECIAL_BAR_FULL: u32 = 100;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_AUTO_ATTACK_MULTIPLIER: f64 = 0.85;
    pub const DEFAULT_COUNTER_ATTACK_MULTIPLIER: f64 = 0.5;
    pub const DEFAULT_MAX_STATUS_STACKS: usize = 3;
    pub const DEFAULT_SPECIAL_BAR_SECTIONS: u32 = 6;
    pub const DEFAULT_CRIT_CHANCE_FLOOR: f64 = 0.05;
    pub const DEFAULT_FOCUS_BASE_CHANCE: f64 = 0.5;
    pub const DEFAULT_FOCUS_DIVISOR: f64 = 200.0;
    pub const DEFAULT_FOCUS_MIN_CHANCE: f64 = 0.15;
    pub const DEFAULT_FOCUS_MAX_CHANCE: f64 = 0.95;
    pub const DEFAULT_ENVIRONMENT_TURNS: [u32; 19] = [
        99, 149, 199, 249, 299, 349, 399, 449, 499, 549, 599, 649, 699, 749, 799, 849, 899, 949,
        999,
    ];
    pub const DEFAULT_ENVIRONMENT_DAMAGE_STEP: f64 = 0.5;
    pub const DEFAULT_ENVIRONMENT_EFFECT: &'static str = "damage_up";
    pub const DEFAULT_TAUNT_STATUS: &'static str = "taunt";
    pub const DEFAULT_MAX_TURNS: u32 = 10_000;
    pub const DEFAULT_ID_SCRAMBLE_ATTEMPTS: u32 = 8;
    pub const DEFAULT_ID_RANGE: u64 = 10_000_000;

    pub fn new() -> Self {
        Self {
            version: String::from("default"),
            auto_attack_multiplier: Self::DEFAULT_AUTO_ATTACK_MULTIPLIER,
            counter_attack_multiplier: Self::DEFAULT_COUNTER_ATTACK_MULTIPLIER,
            max_status_stacks: Self::DEFAULT_MAX_STATUS_STACKS,
            special_bar_sections: Self::DEFAULT_SPECIAL_BAR_SECTIONS,
            crit_chance_floor: Self::DEFAULT_CRIT_CHANCE_FLOOR,
            focus_base_chance: Self::DEFAULT_FOCUS_BASE_CHANCE,
            focus_divisor: Self::DEFAULT_FOCUS_DIVISOR,
            focus_min_chance: Self::DEFAULT_FOCUS_MIN_CHANCE,
            focus_max_chance: Self::DEFAULT_FOCUS_MAX_CHANCE,
            environment_turns: Self::DEFAULT_ENVIRONMENT_TURNS.to_vec(),
            environment_damage_step: Self::DEFAULT_ENVIRONMENT_DAMAGE_STEP,
            environment_effect: Self::DEFAULT_ENVIRONMENT_EFFECT.to_owned(),
            taunt_status: Self::DEFAULT_TAUNT_STATUS.to_owned(),
            damage_rounding: DamageRounding::Floor,
            ally_random_respects_taunt: true,
            max_turns: Self::DEFAULT_MAX_TURNS,
            id_scramble_attempts: Self::DEFAULT_ID_SCRAMBLE_ATTEMPTS,
            id_range: Self::DEFAULT_ID_RANGE,
        }
    }

    pub fn is_environment_turn(&self, turn: u32) -> bool {
        self.environment_turns.contains(&turn)
    }

    /// Special bar gained per auto-attack, before rounding.
    pub fn special_bar_step(&self) -> f64 {
        f64::from(Self::SPECIAL_BAR_FULL) / f64::from(self.special_bar_sections.max(1))
    }

    /// Special bar value for a unit whose special is `cooldown` sections away.
    pub fn special_bar_baseline(&self, cooldown: u32) -> u32 {
        let sections = self.special_bar_sections.max(1);
        let filled = sections.saturating_sub(cooldown);
        let value = round_half_up(self.special_bar_step() * f64::from(filled));
        (value.max(0.0) as u32).min(Self::SPECIAL_BAR_FULL)
    }
}

impl Default for RulesetConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Caller-supplied metadata copied into the battle log.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BattleOptions {
    /// Record a per-turn health/status snapshot in the log.
    pub debug: bool,
    #[serde(rename = "type")]
    pub battle_type: String,
    pub campaign: serde_json::Value,
    pub is_boss: bool,
    /// Timestamp written into the log meta; the current time when absent.
    pub timestamp: Option<String>,
}

impl BattleOptions {
    pub const DEFAULT_BATTLE_TYPE: &'static str = "training";

    pub fn new() -> Self {
        Self {
            debug: false,
            battle_type: Self::DEFAULT_BATTLE_TYPE.to_owned(),
            campaign: serde_json::Value::Object(serde_json::Map::new()),
            is_boss: false,
            timestamp: None,
        }
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }
}

impl Default for BattleOptions {
    fn default() -> Self {
        Self::new()
    }
}
