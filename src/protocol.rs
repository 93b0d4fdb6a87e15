//! Transport-facing message types and frame helpers.
//!
//! The engine does not own a socket; the transport collaborator decodes
//! one [`ClientRequest`] at a time, calls the matching session-service
//! operation and broadcasts [`ServerEvent`]s built from per-viewer
//! projections. Frames are length-prefixed bincode with a bounded size.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::common::{Coords, GameId, PlayerId, ShotResult};
use crate::game::GameSettings;
use crate::player::Placement;
use crate::projection::GameStateView;

pub const PROTOCOL_VERSION: u16 = 1;

/// Maximum frame size (1 MB); a 20×20 board state is far below this.
pub const MAX_FRAME_SIZE: u32 = 1_000_000;

/// Inbound operations, one per session-service entry point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ClientRequest {
    CreateGame,
    JoinGame {
        game_id: GameId,
    },
    Reconnect {
        player_id: PlayerId,
        game_id: GameId,
    },
    UpdateSettings {
        game_id: GameId,
        settings: GameSettings,
    },
    PlaceFleet {
        game_id: GameId,
        placements: Vec<Placement>,
    },
    PlayerReady {
        game_id: GameId,
    },
    StartGame {
        game_id: GameId,
    },
    MakeTurn {
        game_id: GameId,
        coords: Coords,
    },
    Surrender {
        game_id: GameId,
    },
    ResetGame {
        game_id: GameId,
    },
    ExitGame {
        game_id: GameId,
    },
}

/// Outbound events carrying a per-viewer projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ServerEvent {
    GameCreated {
        state: GameStateView,
    },
    GameStateUpdate {
        state: GameStateView,
    },
    TurnResult {
        coords: Coords,
        result: ShotResult,
        state: GameStateView,
    },
    GameOver {
        winner_player_id: PlayerId,
    },
    Error {
        message: String,
    },
}

/// Serialize a message into a 4-byte big-endian length prefix plus
/// bincode body.
pub fn encode_frame<T: Serialize>(msg: &T) -> anyhow::Result<Vec<u8>> {
    let body = bincode::serialize(msg).map_err(|e| anyhow::anyhow!("Serialization error: {}", e))?;
    if body.len() as u32 > MAX_FRAME_SIZE {
        return Err(anyhow::anyhow!(
            "Frame too large: {} bytes (max: {})",
            body.len(),
            MAX_FRAME_SIZE
        ));
    }
    let mut frame = Vec::with_capacity(4 + body.len());
    frame.extend_from_slice(&(body.len() as u32).to_be_bytes());
    frame.extend_from_slice(&body);
    Ok(frame)
}

/// Decode one framed message, returning it and the bytes consumed.
pub fn decode_frame<T: DeserializeOwned>(buf: &[u8]) -> anyhow::Result<(T, usize)> {
    if buf.len() < 4 {
        return Err(anyhow::anyhow!("Frame truncated: missing length prefix"));
    }
    let len = u32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]);
    if len == 0 {
        return Err(anyhow::anyhow!("Invalid frame length: 0"));
    }
    if len > MAX_FRAME_SIZE {
        return Err(anyhow::anyhow!(
            "Frame too large: {} bytes (max: {})",
            len,
            MAX_FRAME_SIZE
        ));
    }
    let end = 4 + len as usize;
    let body = buf
        .get(4..end)
        .ok_or_else(|| anyhow::anyhow!("Frame truncated: expected {} bytes", len))?;
    let msg =
        bincode::deserialize(body).map_err(|e| anyhow::anyhow!("Deserialization error: {}", e))?;
    Ok((msg, end))
}
