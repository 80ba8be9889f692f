//! Content bundled into the crate.
//!
//! The v2.0 ruleset and its status catalog, compiled in so a battle can be
//! resolved without a data directory.

use battle_core::{RulesetConfig, StatusRegistry};

use crate::loaders::{LoadResult, RulesetLoader, StatusLoader};

const RULESET_TOML: &str = include_str!("../data/ruleset.toml");
const STATUSES_RON: &str = include_str!("../data/statuses.ron");

/// The bundled v2.0 ruleset.
pub fn ruleset() -> LoadResult<RulesetConfig> {
    RulesetLoader::parse(RULESET_TOML)
}

/// The bundled v2.0 status catalog.
pub fn statuses() -> LoadResult<StatusRegistry> {
    StatusLoader::parse(STATUSES_RON)
}

#[cfg(test)]
mod tests {
    use super::*;
    use battle_core::DamageRounding;

    #[test]
    fn bundled_ruleset_is_v2() {
        let config = ruleset().expect("bundled ruleset parses");
        assert_eq!(config.version, "v2.0");
        assert_eq!(config.damage_rounding, DamageRounding::Round);
        assert_eq!(config.environment_turns.len(), 19);
        assert_eq!(config.environment_turns.first(), Some(&99));
        assert!(!config.ally_random_respects_taunt);
    }

    #[test]
    fn bundled_catalog_covers_ruleset_markers() {
        let config = ruleset().expect("bundled ruleset parses");
        let registry = statuses().expect("bundled catalog parses");
        assert!(registry.contains(&config.taunt_status));
        assert!(registry.contains(&config.environment_effect));
        assert!(registry.get("stun").map(|s| s.skips_turn()).unwrap_or(false));
    }
}
