//! One grid square: occupancy and shot state.

use serde::{Deserialize, Serialize};

use crate::common::{Coords, GameError};

/// Shot state of a single cell. `Hit` and `Miss` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CellStatus {
    Empty,
    Ship,
    Hit,
    Miss,
}

/// Outcome of shooting a single cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellShot {
    /// The cell carried a ship segment; the owning ship id is reported so
    /// the fleet can record the hit.
    Hit { ship_id: String },
    Miss,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    coords: Coords,
    status: CellStatus,
    assigned_ship_id: Option<String>,
}

impl Cell {
    pub fn new(coords: Coords) -> Self {
        Self {
            coords,
            status: CellStatus::Empty,
            assigned_ship_id: None,
        }
    }

    pub fn coords(&self) -> Coords {
        self.coords
    }

    pub fn status(&self) -> CellStatus {
        self.status
    }

    pub fn assigned_ship_id(&self) -> Option<&str> {
        self.assigned_ship_id.as_deref()
    }

    /// Put a ship segment on this cell. The id stays after a hit so shot
    /// resolution can find the owning ship.
    pub(crate) fn assign_ship(&mut self, ship_id: &str) {
        self.assigned_ship_id = Some(ship_id.to_string());
        self.status = CellStatus::Ship;
    }

    /// Resolve a shot against this cell. A cell may be shot at most once.
    pub(crate) fn receive_shot(&mut self) -> Result<CellShot, GameError> {
        match self.status {
            CellStatus::Hit | CellStatus::Miss => Err(GameError::CellAlreadyShot),
            CellStatus::Ship => {
                self.status = CellStatus::Hit;
                let ship_id = self
                    .assigned_ship_id
                    .clone()
                    .expect("SHIP cell without an assigned ship id");
                Ok(CellShot::Hit { ship_id })
            }
            CellStatus::Empty => {
                self.status = CellStatus::Miss;
                Ok(CellShot::Miss)
            }
        }
    }
}
