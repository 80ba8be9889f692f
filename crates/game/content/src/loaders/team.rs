//! Team loader.

use std::path::Path;

use battle_core::Team;

use crate::loaders::{LoadResult, read_file};

/// Loader for team documents from JSON files.
///
/// A team document carries `name`, `owner`, `leader`, a `formation` with
/// five-slot `front` and `back` rows (empty slots are `null`) and an
/// optional `startingState`.
pub struct TeamLoader;

impl TeamLoader {
    pub fn load(path: &Path) -> LoadResult<Team> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to load team from {}: {}", path.display(), e))
    }

    pub fn parse(content: &str) -> LoadResult<Team> {
        let team: Team = serde_json::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse team JSON: {}", e))?;
        Ok(team)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEAM: &str = r#"{
        "name": "Frens",
        "owner": "0xabc",
        "leader": 7,
        "formation": {
            "front": [
                {
                    "id": 7,
                    "name": "Leader",
                    "speed": 100, "attack": 120, "defense": 90,
                    "criticalRate": 10.0, "criticalDamage": 20.0,
                    "resist": 5, "focus": 5,
                    "health": 1500,
                    "specialExpanded": {
                        "code": "cleave",
                        "initialCooldown": 0,
                        "cooldown": 2,
                        "actionType": "attack",
                        "actionMultiplier": 1.25,
                        "target": "enemy_row_largest"
                    }
                },
                null, null, null, null
            ],
            "back": [null, null, null, null, null]
        }
    }"#;

    #[test]
    fn parses_camel_case_team() {
        let team = TeamLoader::parse(TEAM).expect("valid team JSON");
        assert_eq!(team.name, "Frens");
        assert_eq!(team.leader, 7);
        let leader = team.find(7).expect("leader placed");
        assert_eq!(leader.base.attack, 120);
        assert_eq!(leader.special_expanded.log_name(), "cleave");
        assert!(team.starting_state.is_empty());
    }

    #[test]
    fn short_rows_are_rejected() {
        let broken = TEAM.replace(r#""back": [null, null, null, null, null]"#, r#""back": [null]"#);
        assert!(TeamLoader::parse(&broken).is_err());
    }
}
