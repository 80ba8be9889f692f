//! Data-driven battle content and loaders.
//!
//! This crate houses the bundled ruleset content and loaders for data files:
//! - Status catalogs (RON)
//! - Rulesets (TOML)
//! - Teams (JSON)
//!
//! Content is consumed through `battle_core::BattleEnv` and never appears
//! in battle state.

#[cfg(feature = "loaders")]
pub mod builtin;
#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    ContentFactory, LoadResult, RulesetLoader, StatusCatalog, StatusLoader, TeamLoader,
};
