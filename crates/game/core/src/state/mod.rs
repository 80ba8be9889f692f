//! Authoritative battle state.
//!
//! Two teams of up to ten units each. Units are addressed by [`UnitRef`]
//! (side, row, slot); all iteration helpers walk team 1 before team 2 and the
//! front row before the back row, which fixes the order of random draws.
mod error;
mod team;
mod unit;

pub use error::ValidationError;
pub use team::{Formation, Row, RowSlots, Side, Team, UnitRef};
pub use unit::{StartingState, Unit, UnitCounters, UnitId};

#[cfg(test)]
pub(crate) use unit::fixtures;

use arrayvec::ArrayVec;

use crate::config::RulesetConfig;

/// Bounded list of unit positions across both teams.
pub type UnitRefs = ArrayVec<UnitRef, { RulesetConfig::MAX_UNITS }>;

#[derive(Clone, Debug, PartialEq)]
pub struct BattleState {
    teams: [Team; 2],
}

impl BattleState {
    pub fn new(team1: Team, team2: Team) -> Self {
        Self {
            teams: [team1, team2],
        }
    }

    pub fn team(&self, side: Side) -> &Team {
        &self.teams[side.index()]
    }

    pub fn team_mut(&mut self, side: Side) -> &mut Team {
        &mut self.teams[side.index()]
    }

    pub fn unit(&self, at: UnitRef) -> Option<&Unit> {
        self.team(at.side)
            .formation
            .row(at.row)
            .get(at.slot)
            .and_then(Option::as_ref)
    }

    pub fn unit_mut(&mut self, at: UnitRef) -> Option<&mut Unit> {
        self.team_mut(at.side)
            .formation
            .row_mut(at.row)
            .get_mut(at.slot)
            .and_then(Option::as_mut)
    }

    /// Occupied slots of `side` (alive or not), front row first.
    pub fn occupied(&self, side: Side) -> UnitRefs {
        self.team(side)
            .units()
            .map(|(row, slot, _)| UnitRef::new(side, row, slot))
            .collect()
    }

    pub fn alive_in_row(&self, side: Side, row: Row) -> UnitRefs {
        self.team(side)
            .formation
            .row(row)
            .iter()
            .enumerate()
            .filter(|(_, unit)| unit.as_ref().is_some_and(Unit::is_alive))
            .map(|(slot, _)| UnitRef::new(side, row, slot))
            .collect()
    }

    /// Living units of `side`, front row first.
    pub fn alive(&self, side: Side) -> UnitRefs {
        let mut refs = self.alive_in_row(side, Row::Front);
        refs.extend(self.alive_in_row(side, Row::Back));
        refs
    }

    /// Living units of both teams, team 1 first.
    pub fn all_alive(&self) -> UnitRefs {
        let mut refs = self.alive(Side::One);
        refs.extend(self.alive(Side::Two));
        refs
    }

    pub fn is_alive(&self, at: UnitRef) -> bool {
        self.unit(at).is_some_and(Unit::is_alive)
    }

    pub fn side_alive(&self, side: Side) -> bool {
        self.team(side).has_living_units()
    }

    /// The battle ends once either side has no living units.
    pub fn is_over(&self) -> bool {
        !self.side_alive(Side::One) || !self.side_alive(Side::Two)
    }

    /// Team 1 wins while it has a living unit; otherwise team 2.
    pub fn winner(&self) -> Side {
        if self.side_alive(Side::One) {
            Side::One
        } else {
            Side::Two
        }
    }

    pub fn find(&self, id: UnitId) -> Option<UnitRef> {
        Side::BOTH
            .into_iter()
            .flat_map(|side| self.occupied(side))
            .find(|at| self.unit(*at).is_some_and(|unit| unit.id == id))
    }

    pub fn has_duplicate_ids(&self) -> bool {
        let mut ids: ArrayVec<UnitId, { RulesetConfig::MAX_UNITS }> = Side::BOTH
            .into_iter()
            .flat_map(|side| self.team(side).units().map(|(_, _, unit)| unit.id))
            .collect();
        ids.sort_unstable();
        ids.windows(2).any(|pair| pair[0] == pair[1])
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::team;
    use super::*;
    use crate::state::fixtures::unit;

    #[test]
    fn alive_skips_dead_and_empty_slots() {
        let mut dead = unit(3);
        dead.health = 0;
        let mut state = BattleState::new(
            team("a", vec![unit(1), dead, unit(5), unit(6), unit(7), unit(4)]),
            team("b", vec![unit(2)]),
        );
        let alive = state.alive(Side::One);
        assert_eq!(alive.len(), 5);
        assert_eq!(alive[4], UnitRef::new(Side::One, Row::Back, 0));
        assert_eq!(state.all_alive().len(), 6);

        if let Some(unit) = state.unit_mut(UnitRef::new(Side::Two, Row::Front, 0)) {
            unit.health = 0;
        }
        assert!(state.is_over());
        assert_eq!(state.winner(), Side::One);
    }

    #[test]
    fn duplicate_ids_are_detected_across_teams() {
        let state = BattleState::new(team("a", vec![unit(1)]), team("b", vec![unit(1)]));
        assert!(state.has_duplicate_ids());
        assert!(!test_support::duel().has_duplicate_ids());
        assert_eq!(
            state.find(1),
            Some(UnitRef::new(Side::One, Row::Front, 0))
        );
    }
}
