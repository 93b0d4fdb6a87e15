//! Square grid of cells: placement validation and shot resolution.

use rand::Rng;

use crate::cell::{Cell, CellShot, CellStatus};
use crate::common::{Coords, GameError};
use crate::ship::Orientation;

/// A `size×size` grid of [`Cell`]s, owned by exactly one player and
/// replaced wholesale when settings change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    size: u8,
    grid: Vec<Vec<Cell>>,
}

impl Board {
    /// Create an all-empty board. Size bounds are enforced by the settings
    /// path before a board is ever built.
    pub fn new(size: u8) -> Self {
        let grid = (0..size)
            .map(|y| (0..size).map(|x| Cell::new(Coords::new(x, y))).collect())
            .collect();
        Self { size, grid }
    }

    pub fn size(&self) -> u8 {
        self.size
    }

    pub fn grid(&self) -> &[Vec<Cell>] {
        &self.grid
    }

    pub fn cell(&self, coords: Coords) -> Option<&Cell> {
        self.grid
            .get(coords.y as usize)
            .and_then(|row| row.get(coords.x as usize))
    }

    fn cell_mut(&mut self, coords: Coords) -> Option<&mut Cell> {
        self.grid
            .get_mut(coords.y as usize)
            .and_then(|row| row.get_mut(coords.x as usize))
    }

    fn is_on_grid(&self, coords: Coords) -> bool {
        coords.x < self.size && coords.y < self.size
    }

    /// Check a candidate cell run: every coordinate must be on the grid,
    /// and neither the cell nor any of its 8 neighbors may already carry a
    /// ship. Ships may not touch, not even diagonally.
    pub fn validate_coords(&self, coords: &[Coords]) -> bool {
        coords.iter().all(|&c| {
            if !self.is_on_grid(c) {
                return false;
            }
            for dy in -1i16..=1 {
                for dx in -1i16..=1 {
                    let nx = c.x as i16 + dx;
                    let ny = c.y as i16 + dy;
                    if nx < 0 || ny < 0 {
                        continue;
                    }
                    let neighbor = Coords::new(nx as u8, ny as u8);
                    if let Some(cell) = self.cell(neighbor) {
                        if cell.status() == CellStatus::Ship {
                            return false;
                        }
                    }
                }
            }
            true
        })
    }

    /// Mark a validated cell run as carrying the given ship.
    pub fn assign_ship_to_cells(&mut self, ship_id: &str, coords: &[Coords]) {
        for &c in coords {
            self.cell_mut(c)
                .expect("ship coordinates validated before assignment")
                .assign_ship(ship_id);
        }
    }

    /// Resolve an incoming shot. Shooting outside the grid or a cell that
    /// was already shot is rejected, not ignored.
    pub fn process_shot(&mut self, coords: Coords) -> Result<CellShot, GameError> {
        self.cell_mut(coords)
            .ok_or(GameError::OutOfBounds)?
            .receive_shot()
    }

    /// Pick a random valid start and orientation for a ship of `ship_size`
    /// cells, respecting the one-cell buffer around ships already placed.
    pub fn random_placement<R: Rng>(
        &self,
        rng: &mut R,
        ship_size: u8,
    ) -> Result<(Coords, Orientation), GameError> {
        if ship_size == 0 || ship_size > self.size {
            return Err(GameError::UnableToPlaceShip);
        }
        let mut attempts = 0;
        while attempts < 1000 {
            attempts += 1;
            let orientation = if rng.random() {
                Orientation::Horizontal
            } else {
                Orientation::Vertical
            };
            let (max_x, max_y) = match orientation {
                Orientation::Horizontal => (self.size - ship_size, self.size - 1),
                Orientation::Vertical => (self.size - 1, self.size - ship_size),
            };
            let start = Coords::new(rng.random_range(0..=max_x), rng.random_range(0..=max_y));
            let coords: Vec<Coords> = (0..ship_size)
                .map(|i| match orientation {
                    Orientation::Horizontal => Coords::new(start.x + i, start.y),
                    Orientation::Vertical => Coords::new(start.x, start.y + i),
                })
                .collect();
            if self.validate_coords(&coords) {
                return Ok((start, orientation));
            }
        }
        Err(GameError::UnableToPlaceShip)
    }
}
