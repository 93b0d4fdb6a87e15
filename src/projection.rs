//! Per-viewer read projection of a game with fog-of-war redaction.

use serde::{Deserialize, Serialize};

use crate::cell::CellStatus;
use crate::common::{Coords, GameError, GameId, PlayerId};
use crate::game::{Game, GameStatus, LastTurn};
use crate::player::Player;
use crate::ship::Ship;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellView {
    pub coords: Coords,
    pub status: CellStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardView {
    pub size: u8,
    pub cells: Vec<Vec<CellView>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipView {
    pub id: String,
    pub kind: String,
    pub size: u8,
    pub hits: u8,
    pub is_sunk: bool,
    pub is_placed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerInfoView {
    pub player_id: PlayerId,
    pub is_ready: bool,
    pub is_connected: bool,
}

/// What one player is allowed to see. The opponent's board is redacted:
/// unsunk `SHIP` cells are reported as `EMPTY`, while hits and misses stay
/// visible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStateView {
    pub game_id: GameId,
    pub my_player_id: PlayerId,
    pub players: Vec<PlayerInfoView>,
    pub my_board: BoardView,
    pub enemy_board: Option<BoardView>,
    pub my_fleet: Vec<ShipView>,
    pub status: GameStatus,
    pub host_player_id: Option<PlayerId>,
    pub current_player_id: Option<PlayerId>,
    pub winner_player_id: Option<PlayerId>,
    pub last_turn: Option<LastTurn>,
}

impl GameStateView {
    /// Project `game` as seen by `viewer`.
    pub fn for_player(game: &Game, viewer: PlayerId) -> Result<Self, GameError> {
        let me = game.player(viewer).ok_or(GameError::PlayerNotFound)?;
        Ok(Self {
            game_id: game.game_id(),
            my_player_id: viewer,
            players: game.players().iter().map(player_info).collect(),
            my_board: board_view(me, false),
            enemy_board: game.opponent(viewer).map(|enemy| board_view(enemy, true)),
            my_fleet: me.fleet().ships().iter().map(ship_view).collect(),
            status: game.status(),
            host_player_id: game.host_player_id(),
            current_player_id: game.current_player_id(),
            winner_player_id: game.winner_player_id(),
            last_turn: game.last_turn().copied(),
        })
    }
}

fn player_info(player: &Player) -> PlayerInfoView {
    PlayerInfoView {
        player_id: player.player_id(),
        is_ready: player.is_ready(),
        is_connected: player.is_connected(),
    }
}

fn board_view(player: &Player, redact: bool) -> BoardView {
    let cells = player
        .board()
        .grid()
        .iter()
        .map(|row| {
            row.iter()
                .map(|cell| {
                    let status = if redact && cell.status() == CellStatus::Ship {
                        CellStatus::Empty
                    } else {
                        cell.status()
                    };
                    CellView {
                        coords: cell.coords(),
                        status,
                    }
                })
                .collect()
        })
        .collect();
    BoardView {
        size: player.board().size(),
        cells,
    }
}

fn ship_view(ship: &Ship) -> ShipView {
    ShipView {
        id: ship.id().to_string(),
        kind: ship.kind().to_string(),
        size: ship.size(),
        hits: ship.hits(),
        is_sunk: ship.is_sunk(),
        is_placed: ship.is_placed(),
    }
}
