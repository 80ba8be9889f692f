//! Immutable status catalog.

use std::collections::BTreeMap;

use super::RulesetError;
use super::status::StatusDefinition;

/// Lookup table from status code to definition.
///
/// Built once at load time and shared read-only by every battle.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StatusRegistry {
    statuses: BTreeMap<String, StatusDefinition>,
}

impl StatusRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Validates and indexes definitions. Duplicate codes are rejected.
    pub fn from_definitions(
        definitions: impl IntoIterator<Item = StatusDefinition>,
    ) -> Result<Self, RulesetError> {
        let mut statuses = BTreeMap::new();
        for definition in definitions {
            definition.validate()?;
            if statuses.contains_key(&definition.code) {
                return Err(RulesetError::InvalidStatusDefinition {
                    code: definition.code,
                    reason: "duplicate status code",
                });
            }
            statuses.insert(definition.code.clone(), definition);
        }
        Ok(Self { statuses })
    }

    pub fn get(&self, code: &str) -> Result<&StatusDefinition, RulesetError> {
        self.statuses
            .get(code)
            .ok_or_else(|| RulesetError::UnknownStatus(code.to_owned()))
    }

    pub fn contains(&self, code: &str) -> bool {
        self.statuses.contains_key(code)
    }

    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusDefinition> {
        self.statuses.values()
    }
}
