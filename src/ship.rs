//! Fleet units and the rules they are built from.

use serde::{Deserialize, Serialize};

use crate::common::Coords;

/// Orientation of a ship on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// Build recipe: how many ships of a given type and size a fleet contains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FleetRule {
    pub kind: String,
    pub size: u8,
    pub count: u8,
}

impl FleetRule {
    pub fn new(kind: &str, size: u8, count: u8) -> Self {
        Self {
            kind: kind.to_string(),
            size,
            count,
        }
    }
}

/// A single fleet unit with a hit counter and its assigned cell run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ship {
    id: String,
    kind: String,
    size: u8,
    hits: u8,
    occupied_cells: Vec<Coords>,
}

impl Ship {
    pub fn new(id: String, kind: String, size: u8) -> Self {
        Self {
            id,
            kind,
            size,
            hits: 0,
            occupied_cells: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn size(&self) -> u8 {
        self.size
    }

    pub fn hits(&self) -> u8 {
        self.hits
    }

    pub fn occupied_cells(&self) -> &[Coords] {
        &self.occupied_cells
    }

    /// A ship is sunk once every segment has been hit.
    pub fn is_sunk(&self) -> bool {
        self.hits >= self.size
    }

    /// A ship is placed once it owns exactly `size` cells.
    pub fn is_placed(&self) -> bool {
        self.occupied_cells.len() == self.size as usize
    }

    pub(crate) fn assign_cells(&mut self, coords: Vec<Coords>) {
        self.occupied_cells = coords;
    }

    pub(crate) fn record_hit(&mut self) {
        if self.hits < self.size {
            self.hits += 1;
        }
    }
}
