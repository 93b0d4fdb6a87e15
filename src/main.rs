use std::collections::HashMap;

use clap::Parser;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use sea_battle::{
    init_logging, random_fleet_layout, Coords, GameSettings, GameStatus, PlayerId, SessionService,
    TurnOrder, DEFAULT_BOARD_SIZE,
};
use serde_json::json;

/// Drive a scripted two-player session through the public session API and
/// print a JSON summary of the result.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Fix RNG seed for reproducible sessions (e.g., --seed 12345)
    #[arg(long)]
    seed: Option<u64>,

    /// Board size for the demo game
    #[arg(long, default_value_t = DEFAULT_BOARD_SIZE)]
    board_size: u8,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();
    if let Some(s) = cli.seed {
        println!("Using fixed seed: {} (session will be reproducible)", s);
    }

    let mut rng = match cli.seed {
        Some(s) => SmallRng::seed_from_u64(s.wrapping_add(1)),
        None => {
            let mut seed_rng = rand::rng();
            SmallRng::from_rng(&mut seed_rng)
        }
    };

    let service = SessionService::new(cli.seed);

    // Host creates, guest joins.
    let game = service.create_game();
    let game_id = game.game_id();
    let host = game
        .host_player_id()
        .ok_or_else(|| anyhow::anyhow!("created game has no host"))?;
    let game = service.join_game(game_id)?;
    let guest = game
        .opponent(host)
        .ok_or_else(|| anyhow::anyhow!("no second player joined"))?
        .player_id();

    let game = service.update_settings(
        host,
        game_id,
        GameSettings {
            board_size: Some(cli.board_size),
            fleet_config: None,
            first_player: Some(TurnOrder::Player1),
        },
    )?;
    let rules = game.fleet_rules().to_vec();

    // Both players place random fleets and confirm readiness.
    for player_id in [host, guest] {
        let layout = random_fleet_layout(&mut rng, cli.board_size, &rules)?;
        service.place_fleet(game_id, player_id, &layout)?;
        service.player_ready_change(player_id, game_id)?;
    }
    service.start_game(host, game_id)?;

    // Each player shoots the whole board in a private shuffled order.
    let mut targets: HashMap<PlayerId, Vec<Coords>> = HashMap::new();
    for player_id in [host, guest] {
        let mut all: Vec<Coords> = (0..cli.board_size)
            .flat_map(|y| (0..cli.board_size).map(move |x| Coords::new(x, y)))
            .collect();
        all.shuffle(&mut rng);
        targets.insert(player_id, all);
    }

    let mut turns = 0usize;
    loop {
        let game = service.find_game(game_id)?;
        if game.status() == GameStatus::Finished {
            break;
        }
        let current = game
            .current_player_id()
            .ok_or_else(|| anyhow::anyhow!("game in progress without a current player"))?;
        let coords = targets
            .get_mut(&current)
            .and_then(Vec::pop)
            .ok_or_else(|| anyhow::anyhow!("ran out of targets before the game finished"))?;
        service.make_turn(current, game_id, coords)?;
        turns += 1;
    }

    let game = service.find_game(game_id)?;
    let winner = game.winner_player_id().map(|id| id.to_string());
    let result = json!({
        "game_id": game_id.to_string(),
        "host": host.to_string(),
        "guest": guest.to_string(),
        "turns": turns,
        "winner": winner,
    });
    println!("{}", serde_json::to_string(&result)?);
    Ok(())
}
