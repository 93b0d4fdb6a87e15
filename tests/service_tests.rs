use std::sync::{Arc, Mutex};
use std::time::Duration;

use sea_battle::{
    Coords, FleetRule, Game, GameError, GameId, GameSettings, GameStatus, Orientation, Placement,
    PlayerId, SessionNotifier, SessionService, TurnOrder,
};
use tokio::time::sleep;

const GRACE: Duration = Duration::from_millis(100);
const PAST_GRACE: Duration = Duration::from_millis(400);

#[derive(Default)]
struct RecordingNotifier {
    updated: Mutex<Vec<GameId>>,
    deleted: Mutex<Vec<GameId>>,
}

#[async_trait::async_trait]
impl SessionNotifier for RecordingNotifier {
    async fn game_updated(&self, game: Game) {
        self.updated.lock().unwrap().push(game.game_id());
    }

    async fn game_deleted(&self, game_id: GameId) {
        self.deleted.lock().unwrap().push(game_id);
    }
}

fn service_with_notifier(seed: u64) -> (Arc<SessionService>, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::default());
    let service = SessionService::with_config(Some(seed), GRACE, notifier.clone());
    (service, notifier)
}

fn small_layout() -> Vec<Placement> {
    vec![
        Placement {
            ship_id: "cruiser-1".to_string(),
            start_coords: Coords::new(0, 0),
            orientation: Orientation::Horizontal,
        },
        Placement {
            ship_id: "destroyer-1".to_string(),
            start_coords: Coords::new(0, 3),
            orientation: Orientation::Horizontal,
        },
    ]
}

/// Create, join and bring a two-player game to IN_PROGRESS with a small
/// fleet. Returns (game_id, host, guest).
fn running_game(service: &Arc<SessionService>) -> (GameId, PlayerId, PlayerId) {
    let game = service.create_game();
    let game_id = game.game_id();
    let host = game.host_player_id().unwrap();
    let game = service.join_game(game_id).unwrap();
    let guest = game.opponent(host).unwrap().player_id();

    service
        .update_settings(
            host,
            game_id,
            GameSettings {
                board_size: Some(10),
                fleet_config: Some(vec![
                    FleetRule::new("cruiser", 2, 1),
                    FleetRule::new("destroyer", 1, 1),
                ]),
                first_player: Some(TurnOrder::Player1),
            },
        )
        .unwrap();
    for player_id in [host, guest] {
        service.place_fleet(game_id, player_id, &small_layout()).unwrap();
        service.player_ready_change(player_id, game_id).unwrap();
    }
    service.start_game(host, game_id).unwrap();
    (game_id, host, guest)
}

#[tokio::test(flavor = "multi_thread")]
async fn test_create_join_exit_lifecycle() {
    let service = SessionService::new(Some(1));
    let game = service.create_game();
    let game_id = game.game_id();
    let host = game.host_player_id().unwrap();
    assert_eq!(service.game_count(), 1);

    let game = service.join_game(game_id).unwrap();
    assert_eq!(game.players().len(), 2);
    let guest = game.opponent(host).unwrap().player_id();

    let game = service.exit_game(guest, game_id).unwrap();
    assert_eq!(game.players().len(), 1);
    assert_eq!(service.game_count(), 1);

    service.exit_game(host, game_id).unwrap();
    assert_eq!(service.game_count(), 0);
    assert_eq!(
        service.find_game(game_id).unwrap_err(),
        GameError::GameNotFound
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_join_unknown_game_fails() {
    let service = SessionService::new(Some(2));
    let game = service.create_game();
    service.exit_game(game.host_player_id().unwrap(), game.game_id()).unwrap();
    assert_eq!(
        service.join_game(game.game_id()).unwrap_err(),
        GameError::GameNotFound
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_reconnect_within_grace_cancels_forfeit() {
    let (service, notifier) = service_with_notifier(3);
    let (game_id, _host, guest) = running_game(&service);

    let game = service.client_disconnect(guest).unwrap();
    assert!(!game.player(guest).unwrap().is_connected());

    sleep(Duration::from_millis(10)).await;
    let game = service.reconnect_player(guest, game_id).unwrap();
    assert!(game.player(guest).unwrap().is_connected());

    // a raced timer must re-check state and do nothing
    sleep(PAST_GRACE).await;
    let game = service.find_game(game_id).unwrap();
    assert_eq!(game.status(), GameStatus::InProgress);
    assert_eq!(game.players().len(), 2);
    assert!(notifier.updated.lock().unwrap().is_empty());
    assert!(notifier.deleted.lock().unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_reconnect_unknown_player_not_reconnectable() {
    let service = SessionService::new(Some(4));
    let game = service.create_game();
    let game_id = game.game_id();
    let host = game.host_player_id().unwrap();

    let other_game = service.create_game();
    let stranger = other_game.host_player_id().unwrap();
    assert_eq!(
        service.reconnect_player(stranger, game_id).unwrap_err(),
        GameError::PlayerNotFound
    );

    service.exit_game(host, game_id).unwrap();
    assert_eq!(
        service.reconnect_player(host, game_id).unwrap_err(),
        GameError::GameNotFound
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_grace_expiry_in_progress_forfeits() {
    let (service, notifier) = service_with_notifier(5);
    let (game_id, host, guest) = running_game(&service);

    service.client_disconnect(guest).unwrap();
    sleep(PAST_GRACE).await;

    // the remaining player won and keeps the finished game around
    let game = service.find_game(game_id).unwrap();
    assert_eq!(game.status(), GameStatus::Finished);
    assert_eq!(game.winner_player_id(), Some(host));
    assert_eq!(game.players().len(), 1);
    assert!(game.player(guest).is_none());
    assert_eq!(*notifier.updated.lock().unwrap(), vec![game_id]);

    service.exit_game(host, game_id).unwrap();
    assert_eq!(service.game_count(), 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_grace_expiry_during_setup_removes_player() {
    let (service, notifier) = service_with_notifier(6);
    let game = service.create_game();
    let game_id = game.game_id();
    let host = game.host_player_id().unwrap();
    let game = service.join_game(game_id).unwrap();
    let guest = game.opponent(host).unwrap().player_id();

    service.client_disconnect(guest).unwrap();
    sleep(PAST_GRACE).await;

    let game = service.find_game(game_id).unwrap();
    assert_eq!(game.status(), GameStatus::Setup);
    assert_eq!(game.players().len(), 1);
    assert!(game.player(guest).is_none());
    assert_eq!(*notifier.updated.lock().unwrap(), vec![game_id]);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_grace_expiry_with_nobody_connected_deletes_game() {
    let (service, notifier) = service_with_notifier(7);
    let game = service.create_game();
    let game_id = game.game_id();
    let host = game.host_player_id().unwrap();
    let game = service.join_game(game_id).unwrap();
    let guest = game.opponent(host).unwrap().player_id();

    service.client_disconnect(host).unwrap();
    service.client_disconnect(guest).unwrap();
    sleep(PAST_GRACE).await;

    assert_eq!(service.game_count(), 0);
    assert!(!notifier.deleted.lock().unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_repeated_disconnect_rearms_single_timer() {
    let (service, notifier) = service_with_notifier(8);
    let (game_id, _host, guest) = running_game(&service);

    service.client_disconnect(guest).unwrap();
    sleep(Duration::from_millis(20)).await;
    service.client_disconnect(guest).unwrap();
    sleep(PAST_GRACE).await;

    let game = service.find_game(game_id).unwrap();
    assert_eq!(game.status(), GameStatus::Finished);
    // the re-armed timer fired exactly once
    assert_eq!(*notifier.updated.lock().unwrap(), vec![game_id]);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_make_turn_through_service() {
    let service = SessionService::new(Some(9));
    let (game_id, host, guest) = running_game(&service);

    let game = service.make_turn(host, game_id, Coords::new(9, 9)).unwrap();
    assert_eq!(game.current_player_id(), Some(guest));
    let last = game.last_turn().unwrap();
    assert_eq!(last.player_id, host);

    assert_eq!(
        service
            .make_turn(host, game_id, Coords::new(0, 0))
            .unwrap_err(),
        GameError::NotYourTurn
    );
}
