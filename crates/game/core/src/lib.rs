//! Deterministic battle resolution for two teams of gotchis.
//!
//! `battle-core` defines the canonical battle rules (scheduling, damage,
//! statuses, specials) and exposes pure APIs that can be reused by servers
//! and offline verification tools. All state mutation flows through
//! [`engine::BattleEngine`], and every random decision draws from one seeded
//! [`env::RngSource`], so a seed and a ruleset reproduce the whole battle.
pub mod combat;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod log;
pub mod state;
pub mod stats;

pub use combat::{EffectRecord, ExpiredStatus, Outcome, StatusTick};
pub use config::{BattleOptions, DamageRounding, RulesetConfig};
pub use engine::{
    ActionKind, ActionResult, BattleEngine, BattleFailure, EngineError, SimulationFailure,
    TargetingError, TurnError, prepare_battle, run_battle, run_battle_with_rng,
};
pub use env::{
    ActionType, Arc4Rng, BattleEnv, EffectType, LeaderSkill, RngSource, RulesetError,
    SpecialDefinition, SpecialEffect, StatItem, StatusDefinition, StatusOracle, StatusRegistry,
    TargetCode,
};
pub use error::{ErrorSeverity, GameError};
pub use log::verify::{compare_logs, replay_and_verify, replay_log, teams_from_log};
pub use log::{BattleLog, BattleResult, TurnLog};
pub use state::{BattleState, Formation, Row, Side, StartingState, Team, Unit, UnitId, ValidationError};
pub use stats::{ItemStat, StatBlock, StatName};
