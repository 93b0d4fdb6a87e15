//! Shared types for the session engine: coordinates, identifiers, shot
//! results and the engine error taxonomy.

use core::fmt;
use core::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Coordinates on a board, zero-indexed from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coords {
    pub x: u8,
    pub y: u8,
}

impl Coords {
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Coords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Result of a resolved shot, as reported back to the shooter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShotResult {
    Hit,
    Miss,
    Sunk,
}

macro_rules! id_type {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(u128);

        impl $name {
            /// Draw a fresh random identifier.
            pub fn generate<R: Rng>(rng: &mut R) -> Self {
                Self(rng.random())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{:032x}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = core::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                u128::from_str_radix(s, 16).map(Self)
            }
        }

        // ids travel as 32-hex-digit strings on every wire format
        impl Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

id_type!(
    /// Opaque session identifier shared with joining players.
    GameId
);
id_type!(
    /// Opaque per-player identifier, private to one client.
    PlayerId
);

/// Errors returned by engine operations.
///
/// Every variant is an expected domain failure that the transport boundary
/// turns into a user-visible error response. Broken internal invariants are
/// not represented here; those panic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameError {
    /// No game with the given id in the repository.
    GameNotFound,
    /// The player id is not part of the game's roster.
    PlayerNotFound,
    /// A third player tried to join.
    GameFull,
    /// A host-only operation was attempted by the guest.
    NotHost,
    /// The operation is not allowed in the game's current status.
    InvalidStatus,
    /// `process_turn` called by a player who does not hold the turn.
    NotYourTurn,
    /// Not enough players to start the game.
    NotEnoughPlayers,
    /// Start requested while a player has not confirmed readiness.
    PlayersNotReady,
    /// Readiness or batch completion requires every ship to be placed.
    NotAllShipsPlaced,
    /// A placement referenced a ship id absent from the fleet.
    ShipNotFound,
    /// A placement referenced a ship that already sits on the board.
    ShipAlreadyPlaced,
    /// Placement coordinates leave the grid, overlap or touch another ship.
    InvalidPlacement,
    /// No free spot found for a ship during random layout generation.
    UnableToPlaceShip,
    /// Board size outside the accepted range.
    InvalidBoardSize,
    /// A fleet rule with a zero size or count.
    InvalidFleetRule,
    /// A fleet rule whose ship would not fit on the board.
    ShipTooLarge,
    /// Shot coordinates outside the grid.
    OutOfBounds,
    /// The targeted cell has already been shot.
    CellAlreadyShot,
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::GameNotFound => write!(f, "Game not found"),
            GameError::PlayerNotFound => write!(f, "Player not found in the game"),
            GameError::GameFull => write!(f, "Game is full"),
            GameError::NotHost => write!(f, "Only the host can perform this operation"),
            GameError::InvalidStatus => {
                write!(f, "Operation not allowed in the current game status")
            }
            GameError::NotYourTurn => write!(f, "It's not your turn"),
            GameError::NotEnoughPlayers => write!(f, "Not enough players to start"),
            GameError::PlayersNotReady => write!(f, "All players must be ready to start"),
            GameError::NotAllShipsPlaced => write!(f, "Not all ships have been placed"),
            GameError::ShipNotFound => write!(f, "Ship not found in fleet"),
            GameError::ShipAlreadyPlaced => write!(f, "Ship has already been placed"),
            GameError::InvalidPlacement => write!(
                f,
                "Invalid ship placement: off the board or too close to another ship"
            ),
            GameError::UnableToPlaceShip => write!(f, "Unable to find a valid spot for the ship"),
            GameError::InvalidBoardSize => write!(f, "Board size outside the accepted range"),
            GameError::InvalidFleetRule => {
                write!(f, "Fleet rule must have a positive size and count")
            }
            GameError::ShipTooLarge => write!(f, "Ship size exceeds the board size"),
            GameError::OutOfBounds => write!(f, "Coordinates are outside the board"),
            GameError::CellAlreadyShot => write!(f, "Cell has already been shot at"),
        }
    }
}

impl std::error::Error for GameError {}
