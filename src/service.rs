//! Session orchestration: the sole entry point used by the transport
//! layer. Owns the repository and the disconnect grace-period timers.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use tokio::task::JoinHandle;

use crate::common::{Coords, GameError, GameId, PlayerId};
use crate::config::DISCONNECT_GRACE;
use crate::game::{Game, GameSettings, GameStatus};
use crate::player::Placement;
use crate::repository::GameRepository;

/// Callback surface the transport layer implements to hear about
/// timer-driven changes, where no player request triggered the mutation.
#[async_trait::async_trait]
pub trait SessionNotifier: Send + Sync {
    /// A game changed without a triggering request (grace-period expiry).
    async fn game_updated(&self, game: Game);
    /// A game was dropped from the repository.
    async fn game_deleted(&self, game_id: GameId);
}

/// Notifier that discards every notification.
pub struct NoopNotifier;

#[async_trait::async_trait]
impl SessionNotifier for NoopNotifier {
    async fn game_updated(&self, _game: Game) {}
    async fn game_deleted(&self, _game_id: GameId) {}
}

struct ServiceState {
    repository: GameRepository,
    rng: SmallRng,
}

enum CleanupAction {
    Updated(Game),
    Deleted(GameId),
}

/// Orchestrates [`GameRepository`] and [`Game`]. All operations lock one
/// state mutex, so regular requests and fired grace timers mutate games on
/// a single serialized path. Mutating operations return the updated
/// aggregate for the caller to project per viewer.
pub struct SessionService {
    // handle to ourselves for spawned grace timers
    weak: Weak<SessionService>,
    state: Mutex<ServiceState>,
    timers: Mutex<HashMap<PlayerId, JoinHandle<()>>>,
    grace_period: Duration,
    notifier: Arc<dyn SessionNotifier>,
}

impl SessionService {
    /// Service with the default 30s grace period and no notifier. Pass a
    /// seed to make generated ids and turn selection reproducible.
    pub fn new(seed: Option<u64>) -> Arc<Self> {
        Self::with_config(seed, DISCONNECT_GRACE, Arc::new(NoopNotifier))
    }

    pub fn with_config(
        seed: Option<u64>,
        grace_period: Duration,
        notifier: Arc<dyn SessionNotifier>,
    ) -> Arc<Self> {
        let rng = match seed {
            Some(s) => SmallRng::seed_from_u64(s),
            None => {
                let mut seed_rng = rand::rng();
                SmallRng::from_rng(&mut seed_rng)
            }
        };
        Arc::new_cyclic(|weak| Self {
            weak: weak.clone(),
            state: Mutex::new(ServiceState {
                repository: GameRepository::new(),
                rng,
            }),
            timers: Mutex::new(HashMap::new()),
            grace_period,
            notifier,
        })
    }

    /// Number of games currently stored.
    pub fn game_count(&self) -> usize {
        self.state.lock().unwrap().repository.len()
    }

    /// Fetch a snapshot of a game without mutating it.
    pub fn find_game(&self, game_id: GameId) -> Result<Game, GameError> {
        let state = self.state.lock().unwrap();
        state
            .repository
            .find_by_game_id(game_id)
            .cloned()
            .ok_or(GameError::GameNotFound)
    }

    /// Create a game with its host player seated.
    pub fn create_game(&self) -> Game {
        let mut state = self.state.lock().unwrap();
        let ServiceState { repository, rng } = &mut *state;
        let game_id = GameId::generate(rng);
        let player_id = PlayerId::generate(rng);
        let mut game = Game::new(game_id);
        game.add_player(player_id)
            .expect("a fresh game seats its first player");
        log::info!("game {} created by player {}", game_id, player_id);
        let snapshot = game.clone();
        repository.save(game);
        snapshot
    }

    /// Seat a second player in an existing game.
    pub fn join_game(&self, game_id: GameId) -> Result<Game, GameError> {
        let mut state = self.state.lock().unwrap();
        let ServiceState { repository, rng } = &mut *state;
        let player_id = PlayerId::generate(rng);
        let game = repository
            .find_by_game_id_mut(game_id)
            .ok_or(GameError::GameNotFound)?;
        game.add_player(player_id)?;
        log::info!("player {} joined game {}", player_id, game_id);
        Ok(game.clone())
    }

    /// Restore a player's connection and cancel any pending grace timer.
    /// Fails when the game or player is unknown — "not reconnectable".
    pub fn reconnect_player(&self, player_id: PlayerId, game_id: GameId) -> Result<Game, GameError> {
        let game = {
            let mut state = self.state.lock().unwrap();
            let game = state
                .repository
                .find_by_game_id_mut(game_id)
                .ok_or(GameError::GameNotFound)?;
            game.mark_player_connected(player_id)?;
            game.clone()
        };
        // safe with no pending timer; a timer that already fired re-checks
        // the connection flag before acting
        if let Some(timer) = self.timers.lock().unwrap().remove(&player_id) {
            timer.abort();
        }
        log::info!("player {} reconnected to game {}", player_id, game_id);
        Ok(game)
    }

    /// Mark a player disconnected and (re)arm their grace timer. Must be
    /// called from within a tokio runtime.
    pub fn client_disconnect(&self, player_id: PlayerId) -> Result<Game, GameError> {
        let game = {
            let mut state = self.state.lock().unwrap();
            let game = state
                .repository
                .find_by_player_id_mut(player_id)
                .ok_or(GameError::GameNotFound)?;
            game.mark_player_disconnected(player_id)?;
            game.clone()
        };
        let service = self.weak.upgrade().expect("service is alive while borrowed");
        let handle = tokio::spawn(service.run_grace_timer(player_id));
        if let Some(prev) = self.timers.lock().unwrap().insert(player_id, handle) {
            prev.abort();
        }
        log::info!(
            "player {} disconnected, grace timer armed for {:?}",
            player_id,
            self.grace_period
        );
        Ok(game)
    }

    pub fn update_settings(
        &self,
        player_id: PlayerId,
        game_id: GameId,
        settings: GameSettings,
    ) -> Result<Game, GameError> {
        let mut state = self.state.lock().unwrap();
        let ServiceState { repository, rng } = &mut *state;
        let game = repository
            .find_by_game_id_mut(game_id)
            .ok_or(GameError::GameNotFound)?;
        game.update_settings(player_id, settings, rng)?;
        Ok(game.clone())
    }

    pub fn place_fleet(
        &self,
        game_id: GameId,
        player_id: PlayerId,
        placements: &[Placement],
    ) -> Result<Game, GameError> {
        let mut state = self.state.lock().unwrap();
        let game = state
            .repository
            .find_by_game_id_mut(game_id)
            .ok_or(GameError::GameNotFound)?;
        game.place_fleet(player_id, placements)?;
        Ok(game.clone())
    }

    pub fn player_ready_change(
        &self,
        player_id: PlayerId,
        game_id: GameId,
    ) -> Result<Game, GameError> {
        let mut state = self.state.lock().unwrap();
        let game = state
            .repository
            .find_by_game_id_mut(game_id)
            .ok_or(GameError::GameNotFound)?;
        game.player_ready_change(player_id)?;
        Ok(game.clone())
    }

    pub fn start_game(&self, player_id: PlayerId, game_id: GameId) -> Result<Game, GameError> {
        let mut state = self.state.lock().unwrap();
        let ServiceState { repository, rng } = &mut *state;
        let game = repository
            .find_by_game_id_mut(game_id)
            .ok_or(GameError::GameNotFound)?;
        game.start_game(player_id, rng)?;
        Ok(game.clone())
    }

    pub fn make_turn(
        &self,
        player_id: PlayerId,
        game_id: GameId,
        coords: Coords,
    ) -> Result<Game, GameError> {
        let mut state = self.state.lock().unwrap();
        let game = state
            .repository
            .find_by_game_id_mut(game_id)
            .ok_or(GameError::GameNotFound)?;
        game.process_turn(player_id, coords)?;
        Ok(game.clone())
    }

    pub fn surrender(&self, player_id: PlayerId, game_id: GameId) -> Result<Game, GameError> {
        let mut state = self.state.lock().unwrap();
        let game = state
            .repository
            .find_by_game_id_mut(game_id)
            .ok_or(GameError::GameNotFound)?;
        game.surrender(player_id)?;
        Ok(game.clone())
    }

    pub fn reset_game(&self, player_id: PlayerId, game_id: GameId) -> Result<Game, GameError> {
        let mut state = self.state.lock().unwrap();
        let game = state
            .repository
            .find_by_game_id_mut(game_id)
            .ok_or(GameError::GameNotFound)?;
        game.reset_game(player_id)?;
        Ok(game.clone())
    }

    /// Leave the game for good; the game is deleted once its roster is
    /// empty.
    pub fn exit_game(&self, player_id: PlayerId, game_id: GameId) -> Result<Game, GameError> {
        let mut state = self.state.lock().unwrap();
        let game = state
            .repository
            .find_by_game_id_mut(game_id)
            .ok_or(GameError::GameNotFound)?;
        game.remove_player(player_id)?;
        let snapshot = game.clone();
        if snapshot.players().is_empty() {
            state.repository.delete(game_id);
            log::info!("game {} deleted, roster empty", game_id);
        }
        Ok(snapshot)
    }

    async fn run_grace_timer(self: Arc<Self>, player_id: PlayerId) {
        tokio::time::sleep(self.grace_period).await;
        let action = self.cleanup_disconnected_player(player_id);
        self.timers.lock().unwrap().remove(&player_id);
        match action {
            Some(CleanupAction::Updated(game)) => self.notifier.game_updated(game).await,
            Some(CleanupAction::Deleted(game_id)) => self.notifier.game_deleted(game_id).await,
            None => {}
        }
    }

    /// Grace-period expiry. Runs under the same state lock as every other
    /// operation and re-verifies the player is still disconnected: a timer
    /// racing a reconnect is not canceled synchronously, so the winner is
    /// decided here.
    fn cleanup_disconnected_player(&self, player_id: PlayerId) -> Option<CleanupAction> {
        let mut state = self.state.lock().unwrap();
        let game = state.repository.find_by_player_id_mut(player_id)?;
        match game.player(player_id) {
            None => return None,
            Some(p) if p.is_connected() => return None,
            Some(_) => {}
        }
        let game_id = game.game_id();

        let action = if !game.is_alive() {
            // nobody left connected
            CleanupAction::Deleted(game_id)
        } else if game.status() == GameStatus::InProgress {
            // abandoning a live game is a surrender
            game.surrender(player_id)
                .expect("surrender of a roster player during a live game");
            game.remove_player(player_id)
                .expect("player found in this game above");
            log::info!(
                "game {}: player {} forfeited after grace period",
                game_id,
                player_id
            );
            if game.players().is_empty() {
                CleanupAction::Deleted(game_id)
            } else {
                CleanupAction::Updated(game.clone())
            }
        } else {
            game.remove_player(player_id)
                .expect("player found in this game above");
            if game.players().is_empty() || !game.is_alive() {
                CleanupAction::Deleted(game_id)
            } else {
                CleanupAction::Updated(game.clone())
            }
        };

        if let CleanupAction::Deleted(id) = &action {
            state.repository.delete(*id);
            log::info!("game {} deleted after grace period", id);
        }
        Some(action)
    }
}
