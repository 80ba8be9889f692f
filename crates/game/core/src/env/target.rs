//! Target codes used by specials and special effects.

use strum::{AsRefStr, Display, EnumString};

use super::RulesetError;

/// Which units an action or effect selects, relative to the acting unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, AsRefStr, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum TargetCode {
    /// The acting unit itself.
    #[strum(serialize = "self")]
    Caster,
    EnemyRandom,
    EnemyFrontRow,
    EnemyBackRow,
    EnemyRowLargest,
    AllEnemies,
    AllyRandom,
    AllyFrontRow,
    AllyBackRow,
    AllyRowLargest,
    AllAllies,
    /// Every living unit, acting team first.
    All,
}

impl TargetCode {
    pub fn parse(code: &str) -> Result<Self, RulesetError> {
        code.parse()
            .map_err(|_| RulesetError::UnknownTargetCode(code.to_owned()))
    }
}

/// Target of a special effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EffectTarget {
    /// Resolve against each target of the main action.
    SameAsAttack,
    Code(TargetCode),
}

impl EffectTarget {
    pub const SAME_AS_ATTACK: &'static str = "same_as_attack";

    pub fn parse(code: Option<&str>) -> Result<Self, RulesetError> {
        match code {
            Some(Self::SAME_AS_ATTACK) => Ok(Self::SameAsAttack),
            Some(code) => TargetCode::parse(code).map(Self::Code),
            None => Err(RulesetError::UnknownTargetCode(String::from("null"))),
        }
    }
}
