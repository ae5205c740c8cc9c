#[cfg(not(feature = "std"))]
fn main() {}

#[cfg(feature = "std")]
use cubeblast::{
    host::{self, LogPresenter},
    init_logging, Engine, GreedyPlayer, IgnoreReason, LevelConfig, Outcome, Player, RandomPlayer,
    TurnOutcome,
};

#[cfg(feature = "std")]
use anyhow::Context;
#[cfg(feature = "std")]
use clap::{Parser, ValueEnum};
#[cfg(feature = "std")]
use rand::rngs::SmallRng;
#[cfg(feature = "std")]
use rand::SeedableRng;
#[cfg(feature = "std")]
use std::path::PathBuf;
#[cfg(feature = "std")]
use tokio::io::{AsyncBufReadExt, BufReader};
#[cfg(feature = "std")]
use tokio::time::Duration;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[cfg(feature = "std")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
#[cfg(feature = "std")]
enum PlayerType {
    Greedy,
    Random,
}

#[derive(Parser)]
#[cfg(feature = "std")]
enum Commands {
    /// Play a level interactively: type `x y` to click a cell.
    Play {
        #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
        seed: Option<u64>,
        #[arg(long, help = "JSON level file; defaults to the built-in level")]
        level: Option<PathBuf>,
    },
    /// Let an automated player run a level to the end.
    Auto {
        #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
        seed: Option<u64>,
        #[arg(long, help = "JSON level file; defaults to the built-in level")]
        level: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = PlayerType::Greedy)]
        player: PlayerType,
        #[arg(long, default_value_t = 0, help = "Simulated animation time per turn")]
        frame_ms: u64,
    },
}

#[cfg(feature = "std")]
fn load_level(path: Option<&PathBuf>) -> anyhow::Result<LevelConfig> {
    match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading level {}", path.display()))?;
            LevelConfig::from_json(&json)
                .with_context(|| format!("parsing level {}", path.display()))
        }
        None => Ok(LevelConfig::default()),
    }
}

#[cfg(feature = "std")]
fn make_rng(seed: Option<u64>) -> SmallRng {
    if let Some(s) = seed {
        println!("Using fixed seed: {} (game will be reproducible)", s);
        SmallRng::seed_from_u64(s)
    } else {
        let mut seed_rng = rand::rng();
        SmallRng::from_rng(&mut seed_rng)
    }
}

#[cfg(feature = "std")]
fn print_status(engine: &Engine<SmallRng>) {
    println!("\n{}", engine.snapshot());
    println!("Moves left: {}", engine.moves_remaining());
    for goal in engine.goals() {
        println!("  {}", goal);
    }
}

#[cfg(feature = "std")]
fn print_outcome(outcome: Outcome) {
    match outcome {
        Outcome::Won => println!("\nVICTORY! Every goal is complete."),
        Outcome::Lost => println!("\nDEFEAT. Out of moves."),
        Outcome::InProgress => println!("\nStopped with the level still in progress."),
    }
}

#[cfg(feature = "std")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Play { seed, level } => {
            let config = load_level(level.as_ref())?;
            let mut engine = Engine::new_session(config, make_rng(seed))?;
            run_interactive(&mut engine).await?;
        }
        Commands::Auto {
            seed,
            level,
            player,
            frame_ms,
        } => {
            let config = load_level(level.as_ref())?;
            let mut rng = make_rng(seed);
            let engine_rng = SmallRng::from_rng(&mut rng);
            let (sink, rx) = host::channel();
            let mut engine = Engine::new_session(config, engine_rng)?
                .with_effects(sink.clone())
                .with_audio(sink.clone())
                .with_presentation(sink);

            let presenter = tokio::spawn(async move {
                let mut presenter = LogPresenter::new(Duration::from_millis(frame_ms));
                host::run_presenter(rx, &mut presenter).await
            });

            let mut player: Box<dyn Player> = match player {
                PlayerType::Greedy => Box::new(GreedyPlayer::new()),
                PlayerType::Random => Box::new(RandomPlayer::new()),
            };
            while engine.outcome() == Outcome::InProgress {
                let moves = engine.available_moves();
                let Some(pos) = player.select_click(&mut rng, &moves, &engine.goals()) else {
                    println!("No legal moves left on the board.");
                    break;
                };
                engine.click(pos.x, pos.y)?;
                // Let the presenter keep up with the turns it is animating.
                tokio::task::yield_now().await;
            }
            print_status(&engine);
            print_outcome(engine.outcome());
            println!("Turns played: {}", engine.turns_played());

            drop(engine);
            let presented = presenter.await??;
            log::debug!("presenter handled {} events", presented);
        }
    }
    Ok(())
}

#[cfg(feature = "std")]
async fn run_interactive(engine: &mut Engine<SmallRng>) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("Type `x y` to click, `hint`, `restart` or `quit`.");
    print_status(engine);
    while engine.outcome() == Outcome::InProgress {
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let words: Vec<&str> = line.split_whitespace().collect();
        match words.as_slice() {
            [] => continue,
            ["quit"] | ["q"] => break,
            ["restart"] => {
                engine.restart();
                print_status(engine);
                continue;
            }
            ["hint"] => {
                let moves = engine.available_moves();
                if moves.is_empty() {
                    println!("No legal moves.");
                }
                for candidate in moves {
                    println!("  {:?}", candidate);
                }
                continue;
            }
            [x, y] => {
                let (Ok(x), Ok(y)) = (x.parse::<usize>(), y.parse::<usize>()) else {
                    println!("Coordinates must be numbers.");
                    continue;
                };
                if !engine.board().contains(x, y) {
                    println!("({}, {}) is off the board.", x, y);
                    continue;
                }
                match engine.click(x, y)? {
                    TurnOutcome::Ignored(IgnoreReason::NoMatch) => {
                        println!("Nothing to match there.")
                    }
                    TurnOutcome::Ignored(reason) => println!("Ignored: {:?}", reason),
                    TurnOutcome::Resolved(report) => {
                        println!(
                            "Removed {} tiles, {} refilled.",
                            report.all_removed().len(),
                            report.refilled.len()
                        );
                        print_status(engine);
                    }
                }
            }
            _ => println!("Unknown command: {}", line.trim()),
        }
    }
    print_outcome(engine.outcome());
    Ok(())
}
