use cubeblast::{Engine, GreedyPlayer, LevelConfig, Outcome, Player};
use rand::{rngs::SmallRng, SeedableRng};
use serde_json::json;

fn main() -> anyhow::Result<()> {
    cubeblast::init_logging();
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: {} <seed>", args[0]);
        std::process::exit(1);
    }
    let seed: u64 = args[1].parse()?;

    let mut player_rng = SmallRng::seed_from_u64(seed);
    let engine_rng = SmallRng::seed_from_u64(seed.wrapping_add(1));
    let mut engine = Engine::new_session(LevelConfig::default(), engine_rng)?;
    let mut player = GreedyPlayer::new();

    let mut stuck = false;
    while engine.outcome() == Outcome::InProgress {
        let moves = engine.available_moves();
        let Some(pos) = player.select_click(&mut player_rng, &moves, &engine.goals()) else {
            stuck = true;
            break;
        };
        engine.click(pos.x, pos.y)?;
    }

    let result = json!({
        "seed": seed,
        "outcome": format!("{:?}", engine.outcome()),
        "turns": engine.turns_played(),
        "moves_remaining": engine.moves_remaining(),
        "stuck": stuck,
        "goals": engine.goals(),
    });

    println!("{}", serde_json::to_string(&result)?);
    Ok(())
}
