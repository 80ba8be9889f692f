use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use super::unit::{StartingState, Unit, UnitId};
use crate::config::RulesetConfig;

/// One of the two opposing teams.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Side {
    One,
    Two,
}

impl Side {
    /// Iteration order used everywhere a deterministic side order matters.
    pub const BOTH: [Side; 2] = [Side::One, Side::Two];

    pub const fn opponent(self) -> Side {
        match self {
            Side::One => Side::Two,
            Side::Two => Side::One,
        }
    }

    pub const fn index(self) -> usize {
        match self {
            Side::One => 0,
            Side::Two => 1,
        }
    }

    /// Team number as recorded in logs (1 or 2).
    pub const fn number(self) -> u8 {
        match self {
            Side::One => 1,
            Side::Two => 2,
        }
    }
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Row {
    Front,
    Back,
}

impl Row {
    pub const ALL: [Row; 2] = [Row::Front, Row::Back];
}

/// Position of a unit: side, row and slot index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct UnitRef {
    pub side: Side,
    pub row: Row,
    pub slot: usize,
}

impl UnitRef {
    pub const fn new(side: Side, row: Row, slot: usize) -> Self {
        Self { side, row, slot }
    }
}

impl core::fmt::Display for UnitRef {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "team{}:{}[{}]", self.side.number(), self.row, self.slot)
    }
}

pub type RowSlots = [Option<Unit>; RulesetConfig::ROW_SLOTS];

/// Two rows of five optional slots.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Formation {
    pub front: RowSlots,
    pub back: RowSlots,
}

impl Formation {
    pub fn row(&self, row: Row) -> &RowSlots {
        match row {
            Row::Front => &self.front,
            Row::Back => &self.back,
        }
    }

    pub fn row_mut(&mut self, row: Row) -> &mut RowSlots {
        match row {
            Row::Front => &mut self.front,
            Row::Back => &mut self.back,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub name: String,
    #[serde(default)]
    pub owner: String,
    /// Id of the unit whose leader skill applies to the team.
    pub leader: UnitId,
    pub formation: Formation,
    /// Overrides leader skill statuses and starting health when non-empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub starting_state: Vec<StartingState>,
}

impl Team {
    /// Every occupied slot, front row first, in slot order.
    pub fn units(&self) -> impl Iterator<Item = (Row, usize, &Unit)> {
        Row::ALL.into_iter().flat_map(move |row| {
            self.formation
                .row(row)
                .iter()
                .enumerate()
                .filter_map(move |(slot, unit)| unit.as_ref().map(|unit| (row, slot, unit)))
        })
    }

    pub fn units_mut(&mut self) -> impl Iterator<Item = &mut Unit> {
        let Formation { front, back } = &mut self.formation;
        front.iter_mut().chain(back.iter_mut()).flatten()
    }

    pub fn find(&self, id: UnitId) -> Option<&Unit> {
        self.units().map(|(_, _, unit)| unit).find(|unit| unit.id == id)
    }

    pub fn find_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units_mut().find(|unit| unit.id == id)
    }

    pub fn has_living_units(&self) -> bool {
        self.units().any(|(_, _, unit)| unit.is_alive())
    }
}
