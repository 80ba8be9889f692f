//! Status catalog loader.

use std::path::Path;

use battle_core::{StatusDefinition, StatusRegistry};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Status catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusCatalog {
    pub statuses: Vec<StatusDefinition>,
}

/// Loader for status catalogs from RON files.
pub struct StatusLoader;

impl StatusLoader {
    /// Load and validate a status catalog from a RON file.
    pub fn load(path: &Path) -> LoadResult<StatusRegistry> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to load statuses from {}: {}", path.display(), e))
    }

    /// Parse and validate a status catalog from RON text.
    ///
    /// Every definition is validated and duplicate codes are rejected.
    pub fn parse(content: &str) -> LoadResult<StatusRegistry> {
        let catalog: StatusCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse status catalog RON: {}", e))?;
        let registry = StatusRegistry::from_definitions(catalog.statuses)?;
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_turn_and_modifier_statuses() {
        let registry = StatusLoader::parse(
            r#"(
                statuses: [
                    (code: "stun", category: turn_effect, turnEffects: [(type: skip_turn)], isDebuff: true),
                    (
                        code: "atk_up",
                        category: stat_modifier,
                        statModifiers: [(statName: attack, valueType: percent, value: 10.0)],
                        isBuff: true,
                    ),
                ],
            )"#,
        )
        .expect("valid catalog");

        assert_eq!(registry.len(), 2);
        assert!(registry.get("stun").map(|s| s.skips_turn()).unwrap_or(false));
        assert!(registry.get("atk_up").map(|s| s.is_buff).unwrap_or(false));
    }

    #[test]
    fn duplicate_codes_are_rejected() {
        let result = StatusLoader::parse(
            r#"(statuses: [
                (code: "taunt", category: custom),
                (code: "taunt", category: custom),
            ])"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn modifier_status_without_modifiers_is_rejected() {
        let result = StatusLoader::parse(r#"(statuses: [(code: "hollow", category: stat_modifier)])"#);
        assert!(result.is_err());
    }
}
