//! Two-player naval-battle session engine: entities, placement
//! validation, the turn-resolution state machine and the
//! disconnect/reconnect grace-period lifecycle.

mod board;
mod cell;
mod common;
mod config;
mod fleet;
mod game;
mod logging;
mod player;
mod projection;
pub mod protocol;
mod repository;
mod service;
mod ship;

pub use board::*;
pub use cell::*;
pub use common::*;
pub use config::*;
pub use fleet::*;
pub use game::*;
pub use logging::init_logging;
pub use player::*;
pub use projection::*;
pub use protocol::*;
pub use repository::*;
pub use service::*;
pub use ship::*;
