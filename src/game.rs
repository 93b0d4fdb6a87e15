//! The session aggregate: two seats, a status state machine, host/turn
//! /winner pointers and the last-turn record.

use rand::rngs::SmallRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::common::{Coords, GameError, GameId, PlayerId, ShotResult};
use crate::config::{
    default_fleet_rules, DEFAULT_BOARD_SIZE, MAX_BOARD_SIZE, MAX_PLAYERS, MIN_BOARD_SIZE,
};
use crate::player::{Placement, Player};
use crate::ship::FleetRule;

/// Lifecycle of a session. `Finished` goes back to `Setup` only through an
/// explicit reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameStatus {
    Setup,
    InProgress,
    Finished,
}

/// Who takes the first turn. Seats are in join order: `Player1` is the
/// creator's seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TurnOrder {
    Player1,
    Player2,
    Random,
}

/// Record of the most recent resolved turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastTurn {
    pub player_id: PlayerId,
    pub coords: Coords,
    pub result: ShotResult,
}

/// Host-supplied settings update; absent fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSettings {
    pub board_size: Option<u8>,
    pub fleet_config: Option<Vec<FleetRule>>,
    pub first_player: Option<TurnOrder>,
}

#[derive(Debug, Clone)]
pub struct Game {
    game_id: GameId,
    status: GameStatus,
    host_player_id: Option<PlayerId>,
    current_player_id: Option<PlayerId>,
    winner_player_id: Option<PlayerId>,
    last_turn: Option<LastTurn>,
    board_size: u8,
    fleet_rules: Vec<FleetRule>,
    first_player: TurnOrder,
    players: Vec<Player>,
}

impl Game {
    pub fn new(game_id: GameId) -> Self {
        Self {
            game_id,
            status: GameStatus::Setup,
            host_player_id: None,
            current_player_id: None,
            winner_player_id: None,
            last_turn: None,
            board_size: DEFAULT_BOARD_SIZE,
            fleet_rules: default_fleet_rules(),
            first_player: TurnOrder::Random,
            players: Vec::new(),
        }
    }

    pub fn game_id(&self) -> GameId {
        self.game_id
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn host_player_id(&self) -> Option<PlayerId> {
        self.host_player_id
    }

    pub fn current_player_id(&self) -> Option<PlayerId> {
        self.current_player_id
    }

    pub fn winner_player_id(&self) -> Option<PlayerId> {
        self.winner_player_id
    }

    pub fn last_turn(&self) -> Option<&LastTurn> {
        self.last_turn.as_ref()
    }

    pub fn board_size(&self) -> u8 {
        self.board_size
    }

    pub fn fleet_rules(&self) -> &[FleetRule] {
        &self.fleet_rules
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, player_id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.player_id() == player_id)
    }

    fn player_mut(&mut self, player_id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.player_id() == player_id)
    }

    /// The other seat, if occupied.
    pub fn opponent(&self, player_id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.player_id() != player_id)
    }

    pub fn is_host(&self, player_id: PlayerId) -> bool {
        self.host_player_id == Some(player_id)
    }

    /// True while at least one player is still connected.
    pub fn is_alive(&self) -> bool {
        self.players.iter().any(Player::is_connected)
    }

    /// Seat a new player. The first player seated becomes the host.
    pub fn add_player(&mut self, player_id: PlayerId) -> Result<(), GameError> {
        if self.status != GameStatus::Setup {
            return Err(GameError::InvalidStatus);
        }
        if self.players.len() >= MAX_PLAYERS {
            return Err(GameError::GameFull);
        }
        self.players.push(Player::new(
            player_id,
            self.board_size,
            self.fleet_rules.clone(),
        ));
        if self.host_player_id.is_none() {
            self.host_player_id = Some(player_id);
        }
        Ok(())
    }

    pub fn mark_player_connected(&mut self, player_id: PlayerId) -> Result<(), GameError> {
        self.player_mut(player_id)
            .ok_or(GameError::PlayerNotFound)?
            .set_connected(true);
        Ok(())
    }

    pub fn mark_player_disconnected(&mut self, player_id: PlayerId) -> Result<(), GameError> {
        self.player_mut(player_id)
            .ok_or(GameError::PlayerNotFound)?
            .set_connected(false);
        Ok(())
    }

    /// Apply a host settings update. Validation runs up front so a
    /// rejected update leaves every setting untouched; on success all
    /// boards and fleets are rebuilt, ready flags drop and the first turn
    /// is re-selected.
    pub fn update_settings(
        &mut self,
        player_id: PlayerId,
        settings: GameSettings,
        rng: &mut SmallRng,
    ) -> Result<(), GameError> {
        if !self.is_host(player_id) {
            return Err(GameError::NotHost);
        }
        if self.status != GameStatus::Setup {
            return Err(GameError::InvalidStatus);
        }

        let board_size = settings.board_size.unwrap_or(self.board_size);
        if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&board_size) {
            return Err(GameError::InvalidBoardSize);
        }
        let fleet_rules = settings
            .fleet_config
            .unwrap_or_else(|| self.fleet_rules.clone());
        if fleet_rules.is_empty() || fleet_rules.iter().any(|r| r.size == 0 || r.count == 0) {
            return Err(GameError::InvalidFleetRule);
        }
        if fleet_rules.iter().any(|r| r.size > board_size) {
            return Err(GameError::ShipTooLarge);
        }

        self.board_size = board_size;
        self.fleet_rules = fleet_rules;
        if let Some(order) = settings.first_player {
            self.first_player = order;
        }
        for player in &mut self.players {
            player.rebuild_board(self.board_size);
            player.rebuild_fleet(&self.fleet_rules);
            player.clear_ready();
        }
        self.select_first_player(rng);
        log::info!(
            "game {}: settings updated, board size {}",
            self.game_id,
            self.board_size
        );
        Ok(())
    }

    /// Delegate a batch placement to the owning player.
    pub fn place_fleet(
        &mut self,
        player_id: PlayerId,
        placements: &[Placement],
    ) -> Result<(), GameError> {
        if self.status != GameStatus::Setup {
            return Err(GameError::InvalidStatus);
        }
        self.player_mut(player_id)
            .ok_or(GameError::PlayerNotFound)?
            .place_fleet(placements)
    }

    pub fn player_ready_change(&mut self, player_id: PlayerId) -> Result<(), GameError> {
        if self.status != GameStatus::Setup {
            return Err(GameError::InvalidStatus);
        }
        self.player_mut(player_id)
            .ok_or(GameError::PlayerNotFound)?
            .toggle_ready()
    }

    /// Host starts the match once both seats are taken and ready.
    pub fn start_game(&mut self, player_id: PlayerId, rng: &mut SmallRng) -> Result<(), GameError> {
        if !self.is_host(player_id) {
            return Err(GameError::NotHost);
        }
        if self.status != GameStatus::Setup {
            return Err(GameError::InvalidStatus);
        }
        if self.players.len() < MAX_PLAYERS {
            return Err(GameError::NotEnoughPlayers);
        }
        if !self.players.iter().all(Player::is_ready) {
            return Err(GameError::PlayersNotReady);
        }
        // re-select when unset, or when the pre-selected seat has left
        let preselected = self
            .current_player_id
            .is_some_and(|id| self.player(id).is_some());
        if !preselected {
            self.select_first_player(rng);
        }
        self.status = GameStatus::InProgress;
        log::info!("game {}: started", self.game_id);
        Ok(())
    }

    /// Resolve one shot by the current player against the opponent. A miss
    /// passes the turn; a hit or sink keeps it. Sinking the last ship
    /// finishes the game.
    pub fn process_turn(
        &mut self,
        player_id: PlayerId,
        coords: Coords,
    ) -> Result<ShotResult, GameError> {
        if self.status != GameStatus::InProgress {
            return Err(GameError::InvalidStatus);
        }
        if self.current_player_id != Some(player_id) {
            return Err(GameError::NotYourTurn);
        }
        let opponent = self
            .players
            .iter_mut()
            .find(|p| p.player_id() != player_id)
            .expect("a game in progress has two players");
        let opponent_id = opponent.player_id();

        let result = opponent.receive_shot(coords)?;
        let opponent_sunk = opponent.is_fleet_sunk();

        self.last_turn = Some(LastTurn {
            player_id,
            coords,
            result,
        });
        if opponent_sunk {
            self.status = GameStatus::Finished;
            self.winner_player_id = Some(player_id);
            log::info!("game {}: won by {}", self.game_id, player_id);
        } else if result == ShotResult::Miss {
            self.current_player_id = Some(opponent_id);
        }
        Ok(result)
    }

    /// Concede the match; the other player wins.
    pub fn surrender(&mut self, player_id: PlayerId) -> Result<(), GameError> {
        if self.status != GameStatus::InProgress {
            return Err(GameError::InvalidStatus);
        }
        let winner = self
            .opponent(player_id)
            .ok_or(GameError::PlayerNotFound)?
            .player_id();
        self.status = GameStatus::Finished;
        self.winner_player_id = Some(winner);
        log::info!("game {}: {} surrendered", self.game_id, player_id);
        Ok(())
    }

    /// Host-only: back to setup with fresh boards and fleets from the last
    /// applied settings.
    pub fn reset_game(&mut self, player_id: PlayerId) -> Result<(), GameError> {
        if !self.is_host(player_id) {
            return Err(GameError::NotHost);
        }
        self.status = GameStatus::Setup;
        self.current_player_id = None;
        self.winner_player_id = None;
        self.last_turn = None;
        for player in &mut self.players {
            player.reset_for_new_game();
        }
        log::info!("game {}: reset to setup", self.game_id);
        Ok(())
    }

    /// Drop a player from the roster. Host authority passes to the
    /// remaining player when the host leaves.
    pub fn remove_player(&mut self, player_id: PlayerId) -> Result<(), GameError> {
        let idx = self
            .players
            .iter()
            .position(|p| p.player_id() == player_id)
            .ok_or(GameError::PlayerNotFound)?;
        self.players.remove(idx);
        if self.host_player_id == Some(player_id) {
            self.host_player_id = self.players.first().map(Player::player_id);
        }
        Ok(())
    }

    fn select_first_player(&mut self, rng: &mut SmallRng) {
        self.current_player_id = if self.players.len() < MAX_PLAYERS {
            // a seat is still empty; start_game will pick once both are in
            None
        } else {
            let seat = match self.first_player {
                TurnOrder::Player1 => 0,
                TurnOrder::Player2 => 1,
                TurnOrder::Random => rng.random_range(0..MAX_PLAYERS),
            };
            self.players.get(seat).map(Player::player_id)
        };
    }
}
