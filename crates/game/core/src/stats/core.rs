//! Combat stat block shared by base and effective stats.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use super::rounding::round_half_up;

/// Stats that statuses may modify.
///
/// Health is deliberately absent: current and full health live on the unit
/// and are only touched by damage, heals and stat items.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    AsRefStr,
    Display,
    EnumString,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum StatName {
    Speed,
    Attack,
    Defense,
    CriticalRate,
    CriticalDamage,
    Resist,
    Focus,
}

impl StatName {
    pub const ALL: [StatName; 7] = [
        Self::Speed,
        Self::Attack,
        Self::Defense,
        Self::CriticalRate,
        Self::CriticalDamage,
        Self::Resist,
        Self::Focus,
    ];

    /// Decimal stats keep two fractional digits; the rest are integers.
    pub const fn is_decimal(self) -> bool {
        matches!(self, Self::CriticalRate | Self::CriticalDamage)
    }

    /// The value a stat stores: integer stats round half toward positive
    /// infinity, decimal stats are kept as is.
    pub fn normalize(self, value: f64) -> f64 {
        if self.is_decimal() { value } else { round_half_up(value) }
    }

    /// Stats that never drop below 1 after modifiers.
    pub const fn has_unit_floor(self) -> bool {
        matches!(self, Self::Speed | Self::Defense)
    }
}

/// Stat targeted by an equipped item or crystal.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, Display, EnumString,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum ItemStat {
    Health,
    Speed,
    Attack,
    Defense,
    CriticalRate,
    CriticalDamage,
    Resist,
    Focus,
}

impl ItemStat {
    /// The combat stat this item modifies, `None` for health.
    pub const fn combat(self) -> Option<StatName> {
        match self {
            Self::Health => None,
            Self::Speed => Some(StatName::Speed),
            Self::Attack => Some(StatName::Attack),
            Self::Defense => Some(StatName::Defense),
            Self::CriticalRate => Some(StatName::CriticalRate),
            Self::CriticalDamage => Some(StatName::CriticalDamage),
            Self::Resist => Some(StatName::Resist),
            Self::Focus => Some(StatName::Focus),
        }
    }
}

/// The seven combat stats of a unit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatBlock {
    pub speed: i64,
    pub attack: i64,
    pub defense: i64,
    pub critical_rate: f64,
    pub critical_damage: f64,
    pub resist: i64,
    pub focus: i64,
}

impl StatBlock {
    pub fn get(&self, stat: StatName) -> f64 {
        match stat {
            StatName::Speed => self.speed as f64,
            StatName::Attack => self.attack as f64,
            StatName::Defense => self.defense as f64,
            StatName::CriticalRate => self.critical_rate,
            StatName::CriticalDamage => self.critical_damage,
            StatName::Resist => self.resist as f64,
            StatName::Focus => self.focus as f64,
        }
    }

    /// Overwrites a stat with [`StatName::normalize`] applied.
    ///
    /// A NaN stores 0 in an integer stat.
    pub fn set(&mut self, stat: StatName, value: f64) {
        let value = stat.normalize(value);
        match stat {
            StatName::Speed => self.speed = value as i64,
            StatName::Attack => self.attack = value as i64,
            StatName::Defense => self.defense = value as i64,
            StatName::CriticalRate => self.critical_rate = value,
            StatName::CriticalDamage => self.critical_damage = value,
            StatName::Resist => self.resist = value as i64,
            StatName::Focus => self.focus = value as i64,
        }
    }

    pub fn add(&mut self, stat: StatName, delta: f64) {
        self.set(stat, self.get(stat) + delta);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_stat_maps_to_combat_stat() {
        assert_eq!(ItemStat::Health.combat(), None);
        assert_eq!(ItemStat::CriticalRate.combat(), Some(StatName::CriticalRate));
    }

    #[test]
    fn stat_names_parse_camel_case() {
        assert_eq!("criticalDamage".parse::<StatName>().ok(), Some(StatName::CriticalDamage));
        assert_eq!(StatName::Speed.as_ref(), "speed");
        assert!("health".parse::<StatName>().is_err());
    }

    #[test]
    fn add_updates_integer_and_decimal_stats() {
        let mut block = StatBlock {
            speed: 100,
            critical_rate: 10.5,
            ..StatBlock::default()
        };
        block.add(StatName::Speed, -10.0);
        block.add(StatName::CriticalRate, 2.25);
        assert_eq!(block.speed, 90);
        assert_eq!(block.critical_rate, 12.75);
    }

    #[test]
    fn integer_stats_round_half_up() {
        let mut block = StatBlock {
            attack: 7,
            defense: 7,
            ..StatBlock::default()
        };
        block.add(StatName::Attack, -0.5);
        block.add(StatName::Defense, 2.5);
        block.set(StatName::Focus, 3.49);
        block.set(StatName::Resist, f64::NAN);
        assert_eq!(block.attack, 7);
        assert_eq!(block.defense, 10);
        assert_eq!(block.focus, 3);
        assert_eq!(block.resist, 0);
        assert_eq!(StatName::CriticalRate.normalize(0.125), 0.125);
    }
}
