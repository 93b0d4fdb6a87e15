//! One seat at the table: a board and a fleet with readiness and
//! connection flags.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::cell::CellShot;
use crate::common::{Coords, GameError, PlayerId, ShotResult};
use crate::fleet::Fleet;
use crate::ship::{FleetRule, Orientation};

/// Request to place one ship: walk `size` cells from `start_coords` in the
/// given orientation (horizontal grows x, vertical grows y).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub ship_id: String,
    pub start_coords: Coords,
    pub orientation: Orientation,
}

#[derive(Debug, Clone)]
pub struct Player {
    player_id: PlayerId,
    is_ready: bool,
    is_connected: bool,
    board: Board,
    fleet: Fleet,
    // last applied settings, used to roll back a failed batch placement
    board_size: u8,
    fleet_config: Vec<FleetRule>,
}

impl Player {
    pub fn new(player_id: PlayerId, board_size: u8, fleet_config: Vec<FleetRule>) -> Self {
        Self {
            player_id,
            is_ready: false,
            is_connected: true,
            board: Board::new(board_size),
            fleet: Fleet::new(&fleet_config),
            board_size,
            fleet_config,
        }
    }

    pub fn player_id(&self) -> PlayerId {
        self.player_id
    }

    pub fn is_ready(&self) -> bool {
        self.is_ready
    }

    pub fn is_connected(&self) -> bool {
        self.is_connected
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn fleet(&self) -> &Fleet {
        &self.fleet
    }

    pub(crate) fn set_connected(&mut self, connected: bool) {
        self.is_connected = connected;
    }

    pub(crate) fn clear_ready(&mut self) {
        self.is_ready = false;
    }

    /// Replace the board wholesale, remembering the size for rollback.
    pub fn rebuild_board(&mut self, size: u8) {
        self.board = Board::new(size);
        self.board_size = size;
        log::debug!("player {} board rebuilt to size {}", self.player_id, size);
    }

    /// Replace the fleet wholesale, remembering the rules for rollback.
    pub fn rebuild_fleet(&mut self, fleet_config: &[FleetRule]) {
        self.fleet = Fleet::new(fleet_config);
        self.fleet_config = fleet_config.to_vec();
        log::debug!("player {} fleet rebuilt", self.player_id);
    }

    /// Place the whole fleet in one batch. Any failure rolls both the
    /// board and the fleet back to the last applied settings, so a failed
    /// batch never leaves partial placements behind.
    pub fn place_fleet(&mut self, placements: &[Placement]) -> Result<(), GameError> {
        if let Err(err) = self.try_place_fleet(placements) {
            self.rebuild_board(self.board_size);
            let config = self.fleet_config.clone();
            self.rebuild_fleet(&config);
            return Err(err);
        }
        log::debug!("player {} placed their fleet", self.player_id);
        Ok(())
    }

    fn try_place_fleet(&mut self, placements: &[Placement]) -> Result<(), GameError> {
        for placement in placements {
            let ship = self
                .fleet
                .ship_by_id(&placement.ship_id)
                .ok_or(GameError::ShipNotFound)?;
            if ship.is_placed() {
                return Err(GameError::ShipAlreadyPlaced);
            }
            let coords = ship_coords(placement, ship.size());
            if !self.board.validate_coords(&coords) {
                return Err(GameError::InvalidPlacement);
            }
            self.fleet.assign_cells_to_ship(&placement.ship_id, coords.clone())?;
            self.board.assign_ship_to_cells(&placement.ship_id, &coords);
        }
        if !self.fleet.are_all_ships_placed() {
            return Err(GameError::NotAllShipsPlaced);
        }
        Ok(())
    }

    /// Flip readiness. Becoming ready requires a fully placed fleet;
    /// un-readying has no precondition.
    pub fn toggle_ready(&mut self) -> Result<(), GameError> {
        if !self.is_ready && !self.fleet.are_all_ships_placed() {
            return Err(GameError::NotAllShipsPlaced);
        }
        self.is_ready = !self.is_ready;
        Ok(())
    }

    /// Resolve an incoming shot against this player's board and fleet.
    pub fn receive_shot(&mut self, coords: Coords) -> Result<ShotResult, GameError> {
        match self.board.process_shot(coords)? {
            CellShot::Miss => Ok(ShotResult::Miss),
            CellShot::Hit { ship_id } => Ok(self.fleet.process_shot(&ship_id)),
        }
    }

    pub fn is_fleet_sunk(&self) -> bool {
        self.fleet.are_all_ships_sunk()
    }

    /// Fresh board and fleet from the last applied settings, ready flag
    /// cleared. Connection state is untouched.
    pub fn reset_for_new_game(&mut self) {
        self.rebuild_board(self.board_size);
        let config = self.fleet_config.clone();
        self.rebuild_fleet(&config);
        self.is_ready = false;
    }
}

fn ship_coords(placement: &Placement, size: u8) -> Vec<Coords> {
    // saturating: an overflowing walk lands off-grid and fails validation
    (0..size)
        .map(|i| match placement.orientation {
            Orientation::Horizontal => Coords::new(
                placement.start_coords.x.saturating_add(i),
                placement.start_coords.y,
            ),
            Orientation::Vertical => Coords::new(
                placement.start_coords.x,
                placement.start_coords.y.saturating_add(i),
            ),
        })
        .collect()
}

/// Generate a full valid layout for a fleet built from `rules` on a board
/// of `board_size`, in fleet order.
pub fn random_fleet_layout<R: Rng>(
    rng: &mut R,
    board_size: u8,
    rules: &[FleetRule],
) -> Result<Vec<Placement>, GameError> {
    let fleet = Fleet::new(rules);
    let mut scratch = Board::new(board_size);
    let mut placements = Vec::with_capacity(fleet.ships().len());
    for ship in fleet.ships() {
        let (start, orientation) = scratch.random_placement(rng, ship.size())?;
        let placement = Placement {
            ship_id: ship.id().to_string(),
            start_coords: start,
            orientation,
        };
        scratch.assign_ship_to_cells(ship.id(), &ship_coords(&placement, ship.size()));
        placements.push(placement);
    }
    Ok(placements)
}
