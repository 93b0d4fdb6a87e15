//! A player's fleet, expanded from a rule set.

use crate::common::{Coords, GameError, ShotResult};
use crate::ship::{FleetRule, Ship};

/// Ordered collection of ships built from [`FleetRule`]s. Ship ids are
/// `"{kind}-{index}"` with a 1-based index per rule, so no two ships share
/// an id within one fleet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fleet {
    ships: Vec<Ship>,
}

impl Fleet {
    pub fn new(rules: &[FleetRule]) -> Self {
        let mut ships = Vec::new();
        for rule in rules {
            for i in 1..=rule.count {
                let id = format!("{}-{}", rule.kind, i);
                ships.push(Ship::new(id, rule.kind.clone(), rule.size));
            }
        }
        Self { ships }
    }

    pub fn ships(&self) -> &[Ship] {
        &self.ships
    }

    pub fn ship_by_id(&self, ship_id: &str) -> Option<&Ship> {
        self.ships.iter().find(|s| s.id() == ship_id)
    }

    fn ship_by_id_mut(&mut self, ship_id: &str) -> Option<&mut Ship> {
        self.ships.iter_mut().find(|s| s.id() == ship_id)
    }

    pub fn is_ship_sunk(&self, ship_id: &str) -> bool {
        self.ship_by_id(ship_id).is_some_and(Ship::is_sunk)
    }

    pub fn are_all_ships_sunk(&self) -> bool {
        self.ships.iter().all(Ship::is_sunk)
    }

    pub fn are_all_ships_placed(&self) -> bool {
        self.ships.iter().all(Ship::is_placed)
    }

    /// Hand a validated cell run to a ship.
    pub fn assign_cells_to_ship(
        &mut self,
        ship_id: &str,
        coords: Vec<Coords>,
    ) -> Result<(), GameError> {
        let ship = self.ship_by_id_mut(ship_id).ok_or(GameError::ShipNotFound)?;
        ship.assign_cells(coords);
        Ok(())
    }

    /// Record a hit against the identified ship and report whether that
    /// hit sank it. The id comes from a cell back-reference, so a lookup
    /// miss means the board and fleet disagree.
    pub fn process_shot(&mut self, ship_id: &str) -> ShotResult {
        let ship = self
            .ship_by_id_mut(ship_id)
            .expect("cell references a ship missing from the fleet");
        ship.record_hit();
        if ship.is_sunk() {
            ShotResult::Sunk
        } else {
            ShotResult::Hit
        }
    }
}
