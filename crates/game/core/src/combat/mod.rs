//! Combat formulas.
//!
//! Pure functions over effective stats. Random draws and state mutation live
//! in [`crate::engine`]; this module only turns numbers into numbers.
//!
//! # Core Functions
//!
//! - `calculate_damage`: attack/defense ratio with multiplier and environment scaling
//! - `calculate_heal`: full-health scaled heal capped at missing health
//! - `crit_chance` / `crit_multiplier`: critical hit odds and bonus
//! - `focus_chance`: focus versus resist check for effects on enemies

pub mod damage;
pub mod hit;
pub mod result;

pub use damage::{calculate_damage, calculate_heal};
pub use hit::{crit_chance, crit_multiplier, focus_chance};
pub use result::{EffectRecord, ExpiredStatus, Outcome, StatusTick};
