//! Process-wide keyed store of game aggregates.

use std::collections::HashMap;

use crate::common::{GameId, PlayerId};
use crate::game::Game;

/// In-memory store, explicitly constructed and handed to the session
/// service at startup. Its lifetime is the process lifetime.
#[derive(Debug, Default)]
pub struct GameRepository {
    games: HashMap<GameId, Game>,
}

impl GameRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn save(&mut self, game: Game) {
        self.games.insert(game.game_id(), game);
    }

    pub fn find_by_game_id(&self, game_id: GameId) -> Option<&Game> {
        self.games.get(&game_id)
    }

    pub fn find_by_game_id_mut(&mut self, game_id: GameId) -> Option<&mut Game> {
        self.games.get_mut(&game_id)
    }

    pub fn find_by_player_id(&self, player_id: PlayerId) -> Option<&Game> {
        self.games.values().find(|g| g.player(player_id).is_some())
    }

    pub fn find_by_player_id_mut(&mut self, player_id: PlayerId) -> Option<&mut Game> {
        self.games
            .values_mut()
            .find(|g| g.player(player_id).is_some())
    }

    pub fn delete(&mut self, game_id: GameId) -> Option<Game> {
        self.games.remove(&game_id)
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}
