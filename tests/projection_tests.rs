use rand::rngs::SmallRng;
use rand::SeedableRng;
use sea_battle::protocol::{decode_frame, encode_frame, ClientRequest, ServerEvent};
use sea_battle::{
    CellStatus, Coords, FleetRule, Game, GameError, GameId, GameSettings, GameStateView,
    GameStatus, Orientation, Placement, PlayerId, ShotResult, TurnOrder,
};

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

fn running_game(seed: u64) -> (Game, PlayerId, PlayerId) {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut game = Game::new(GameId::generate(&mut rng));
    let host = PlayerId::generate(&mut rng);
    let guest = PlayerId::generate(&mut rng);
    game.add_player(host).unwrap();
    game.add_player(guest).unwrap();
    game.update_settings(
        host,
        GameSettings {
            board_size: Some(10),
            fleet_config: Some(vec![
                FleetRule::new("cruiser", 2, 1),
                FleetRule::new("destroyer", 1, 1),
            ]),
            first_player: Some(TurnOrder::Player1),
        },
        &mut rng,
    )
    .unwrap();
    game.place_fleet(host, &small_layout()).unwrap();
    game.place_fleet(guest, &small_layout()).unwrap();
    game.player_ready_change(host).unwrap();
    game.player_ready_change(guest).unwrap();
    game.start_game(host, &mut rng).unwrap();
    (game, host, guest)
}

fn cell_status(view: &sea_battle::BoardView, x: u8, y: u8) -> CellStatus {
    view.cells[y as usize][x as usize].status
}

#[test]
fn test_enemy_ship_cells_are_redacted() {
    let (game, host, guest) = running_game(1);

    let view = GameStateView::for_player(&game, guest).unwrap();
    let enemy = view.enemy_board.as_ref().unwrap();
    // the host's cruiser at (0,0)-(1,0) must read as empty water
    assert_eq!(cell_status(enemy, 0, 0), CellStatus::Empty);
    assert_eq!(cell_status(enemy, 1, 0), CellStatus::Empty);

    // while the host sees their own ships
    let view = GameStateView::for_player(&game, host).unwrap();
    assert_eq!(cell_status(&view.my_board, 0, 0), CellStatus::Ship);
}

#[test]
fn test_hits_and_misses_stay_visible() {
    let (mut game, host, guest) = running_game(2);
    // host on turn: hit the guest's cruiser, then miss
    assert_eq!(
        game.process_turn(host, Coords::new(0, 0)).unwrap(),
        ShotResult::Hit
    );
    assert_eq!(
        game.process_turn(host, Coords::new(9, 9)).unwrap(),
        ShotResult::Miss
    );

    let view = GameStateView::for_player(&game, host).unwrap();
    let enemy = view.enemy_board.as_ref().unwrap();
    assert_eq!(cell_status(enemy, 0, 0), CellStatus::Hit);
    assert_eq!(cell_status(enemy, 9, 9), CellStatus::Miss);
    // the unhit half of the cruiser stays hidden
    assert_eq!(cell_status(enemy, 1, 0), CellStatus::Empty);

    let last = view.last_turn.unwrap();
    assert_eq!(last.result, ShotResult::Miss);
    assert_eq!(view.current_player_id, Some(guest));
}

#[test]
fn test_projection_before_opponent_joins() {
    let mut rng = SmallRng::seed_from_u64(3);
    let mut game = Game::new(GameId::generate(&mut rng));
    let host = PlayerId::generate(&mut rng);
    game.add_player(host).unwrap();

    let view = GameStateView::for_player(&game, host).unwrap();
    assert!(view.enemy_board.is_none());
    assert_eq!(view.players.len(), 1);
    assert_eq!(view.status, GameStatus::Setup);

    let stranger = PlayerId::generate(&mut rng);
    assert_eq!(
        GameStateView::for_player(&game, stranger).unwrap_err(),
        GameError::PlayerNotFound
    );
}

#[test]
fn test_view_roundtrip_never_reveals_ships() {
    let (game, _host, guest) = running_game(4);

    let view = GameStateView::for_player(&game, guest).unwrap();
    let json = serde_json::to_string(&view).unwrap();
    let back: GameStateView = serde_json::from_str(&json).unwrap();
    assert_eq!(back, view);

    let enemy = back.enemy_board.unwrap();
    for row in &enemy.cells {
        for cell in row {
            assert_ne!(cell.status, CellStatus::Ship);
        }
    }
}

#[test]
fn test_frame_roundtrip() {
    let (game, host, _guest) = running_game(5);
    let view = GameStateView::for_player(&game, host).unwrap();
    let event = ServerEvent::GameStateUpdate { state: view };

    let frame = encode_frame(&event).unwrap();
    let (decoded, consumed): (ServerEvent, usize) = decode_frame(&frame).unwrap();
    assert_eq!(consumed, frame.len());
    assert_eq!(decoded, event);

    let request = ClientRequest::MakeTurn {
        game_id: game.game_id(),
        coords: Coords::new(3, 7),
    };
    let frame = encode_frame(&request).unwrap();
    let (decoded, _): (ClientRequest, usize) = decode_frame(&frame).unwrap();
    assert_eq!(decoded, request);
}

#[test]
fn test_malformed_frames_rejected() {
    // missing length prefix
    assert!(decode_frame::<ClientRequest>(&[0u8, 0]).is_err());
    // zero-length body
    assert!(decode_frame::<ClientRequest>(&[0, 0, 0, 0]).is_err());
    // length prefix beyond the cap
    let huge = [0xff, 0xff, 0xff, 0xff, 0, 0];
    assert!(decode_frame::<ClientRequest>(&huge).is_err());
    // truncated body
    let mut frame = encode_frame(&ClientRequest::CreateGame).unwrap();
    frame.truncate(frame.len() - 1);
    assert!(decode_frame::<ClientRequest>(&frame).is_err());
}
