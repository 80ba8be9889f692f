//! Content loaders for reading battle data from files.
//!
//! Status catalogs are RON, rulesets are TOML and teams are JSON, matching
//! the shapes the core crate serializes.

pub mod config;
pub mod factory;
pub mod statuses;
pub mod team;

pub use config::RulesetLoader;
pub use factory::ContentFactory;
pub use statuses::{StatusCatalog, StatusLoader};
pub use team::TeamLoader;

use std::path::Path;

/// Result type shared by every loader; errors name the offending file.
pub type LoadResult<T> = anyhow::Result<T>;

pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read content file {}: {}", path.display(), e))
}
