//! Content factory for building battle environments from data files.

use std::path::{Path, PathBuf};

use battle_core::{RulesetConfig, StatusRegistry, Team};

use crate::loaders::{LoadResult, RulesetLoader, StatusLoader, TeamLoader};

/// Content factory that loads all battle content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── ruleset.toml
/// ├── statuses.ron
/// └── teams/
///     ├── frens.json
///     └── rivals.json
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load the ruleset from `ruleset.toml`.
    pub fn load_ruleset(&self) -> LoadResult<RulesetConfig> {
        RulesetLoader::load(&self.data_dir.join("ruleset.toml"))
    }

    /// Load the status catalog from `statuses.ron`.
    pub fn load_statuses(&self) -> LoadResult<StatusRegistry> {
        StatusLoader::load(&self.data_dir.join("statuses.ron"))
    }

    /// Load a team from `teams/{name}.json`.
    pub fn load_team(&self, name: &str) -> LoadResult<Team> {
        let path = self.data_dir.join("teams").join(format!("{name}.json"));
        TeamLoader::load(&path)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
