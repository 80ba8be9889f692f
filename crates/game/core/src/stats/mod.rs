//! Stat system.
//!
//! ```text
//! [ Base stats + items ]
//!      ↓
//! [ Status modifiers ]  -> effective stats
//!      ↓
//! [ Action delay ]      -> scheduler order
//! ```
//!
//! Effective stats are never stored; they are recomputed from the unit's
//! base stats and current statuses whenever a formula needs them.

pub mod core;
pub mod modifiers;
pub mod rounding;
pub mod speed;

pub use core::{ItemStat, StatBlock, StatName};
pub use modifiers::effective_stats;
pub use rounding::{round_half_up, round_to};
pub use speed::{action_delay_tick, advance_action_delay};
