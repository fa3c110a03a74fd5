use chess_rules::{GameSession, SessionConfig};
use rand::seq::SliceRandom;

const MAX_MOVES: usize = 300;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chess_rules=info".into()),
        )
        .init();

    let save = std::env::args().any(|a| a == "--save");
    let mut session = GameSession::new(SessionConfig::from_env());
    let mut rng = rand::thread_rng();
    let mut move_count = 0;

    while !session.game_over().is_over && move_count < MAX_MOVES {
        let moves = session.state().find_all_player_moves();
        let Some(mv) = moves.choose(&mut rng) else {
            break;
        };
        if !session.play(mv.from, mv.to) {
            tracing::warn!(mv = %mv.notation(), "generated move was rejected");
            break;
        }
        move_count += 1;
    }

    print!("{}", session.state());
    let over = session.game_over();
    match (over.winner, over.end_type) {
        (Some(winner), Some(end_type)) => {
            eprintln!("Game over after {move_count} half-moves: {end_type}, winner {winner}")
        }
        _ => eprintln!("No result after {move_count} half-moves"),
    }

    if save {
        match session.save_game() {
            Ok(path) => eprintln!("Saved to {}", path.display()),
            Err(e) => {
                eprintln!("Save failed: {e}");
                std::process::exit(1);
            }
        }
    }
}
