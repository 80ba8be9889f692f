//! Ruleset configuration loader.

use std::path::Path;

use battle_core::RulesetConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for rulesets from TOML files.
pub struct RulesetLoader;

impl RulesetLoader {
    /// Load a ruleset from a TOML file.
    ///
    /// Fields missing from the file keep their [`RulesetConfig::default`]
    /// values.
    pub fn load(path: &Path) -> LoadResult<RulesetConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse ruleset {}: {}", path.display(), e))
    }

    /// Parse a ruleset from TOML text.
    pub fn parse(content: &str) -> LoadResult<RulesetConfig> {
        let config: RulesetConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse ruleset TOML: {}", e))?;
        Ok(config)
    }
}
