use core::time::Duration;

use crate::ship::FleetRule;

pub const MIN_BOARD_SIZE: u8 = 5;
pub const MAX_BOARD_SIZE: u8 = 20;
pub const DEFAULT_BOARD_SIZE: u8 = 10;
pub const MAX_PLAYERS: usize = 2;

/// How long a disconnected player may stay away before forfeiting.
pub const DISCONNECT_GRACE: Duration = Duration::from_secs(30);

/// Standard fleet for a 10×10 board: one size-4 ship down to four size-1 ships.
pub fn default_fleet_rules() -> Vec<FleetRule> {
    vec![
        FleetRule::new("carrier", 4, 1),
        FleetRule::new("battleship", 3, 2),
        FleetRule::new("cruiser", 2, 3),
        FleetRule::new("destroyer", 1, 4),
    ]
}
