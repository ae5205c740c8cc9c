use cubeblast::{
    AudioKind, Board, BoardError, ColorId, ConfigError, Engine, EngineEvent, EventLog, GoalKind,
    GoalSpec, IgnoreReason, LevelConfig, Orientation, Outcome, Phase, Position, TileVariant,
    TurnKind, TurnOutcome,
};
use rand::{rngs::SmallRng, SeedableRng};

const D: TileVariant = TileVariant::Duck;
const B: TileVariant = TileVariant::Balloon;
const E: TileVariant = TileVariant::Empty;
const H: TileVariant = TileVariant::Rocket {
    orientation: Orientation::Horizontal,
};
const V: TileVariant = TileVariant::Rocket {
    orientation: Orientation::Vertical,
};

fn c(color: u8) -> TileVariant {
    TileVariant::cube(color)
}

fn level(
    width: usize,
    height: usize,
    palette: usize,
    moves: u32,
    goals: Vec<GoalSpec>,
) -> LevelConfig {
    LevelConfig {
        width,
        height,
        palette_size: palette,
        min_match_size: 2,
        rocket_trigger_size: 5,
        moves,
        goals,
        ..LevelConfig::default()
    }
}

fn engine(config: LevelConfig, rows: &[Vec<TileVariant>]) -> Engine<SmallRng> {
    Engine::with_board(config, Board::from_rows(rows).unwrap(), SmallRng::seed_from_u64(7))
        .expect("valid level")
}

fn resolved(outcome: TurnOutcome) -> cubeblast::TurnReport {
    match outcome {
        TurnOutcome::Resolved(report) => report,
        TurnOutcome::Ignored(reason) => panic!("turn ignored: {:?}", reason),
    }
}

fn positions(removed: &[cubeblast::RemovedTile]) -> Vec<Position> {
    removed.iter().map(|r| r.position).collect()
}

#[test]
fn scenario_a_simple_match() {
    let config = level(
        4,
        4,
        2,
        10,
        vec![GoalSpec::cube(0, 20), GoalSpec::cube(1, 100)],
    );
    let mut engine = engine(
        config,
        &[
            vec![c(0), c(0), c(1), c(1)],
            vec![c(1), c(1), c(1), c(1)],
            vec![c(1), c(1), c(1), c(1)],
            vec![c(1), c(1), c(1), c(1)],
        ],
    );

    let expected: Vec<Position> = vec![Position::new(0, 0), Position::new(1, 0)];
    assert_eq!(
        engine.find_match(0, 0).unwrap().into_iter().collect::<Vec<_>>(),
        expected
    );

    let report = resolved(engine.click(0, 0).unwrap());
    assert_eq!(report.kind, TurnKind::Match { color: ColorId(0), size: 2 });
    assert_eq!(positions(&report.removed), expected);
    assert_eq!(report.credited(GoalKind::Cube(ColorId(0))), 2);
    assert_eq!(report.moved.len(), 6);
    assert_eq!(
        report.refilled.iter().map(|s| s.position).collect::<Vec<_>>(),
        vec![Position::new(0, 3), Position::new(1, 3)]
    );
    assert!(report.spawned_rocket.is_none());
    assert_eq!(report.moves_remaining, 9);
    assert_eq!(engine.moves_remaining(), 9);
    assert_eq!(engine.outcome(), Outcome::InProgress);
    assert_eq!(engine.phase(), Phase::Idle);
    assert_eq!(engine.turns_played(), 1);
    assert_eq!(engine.goals()[0].current, 2);
    assert_eq!(engine.board().count(|t| t.is_empty()), 0);
    // the color-1 cubes dropped one row
    assert_eq!(engine.board().get(0, 0), Ok(c(1)));
    assert_eq!(engine.board().get(1, 2), Ok(c(1)));
}

#[test]
fn scenario_b_large_match_spawns_rocket_at_click() {
    let config = level(5, 5, 3, 10, vec![GoalSpec::cube(0, 50)]);
    let mut engine = engine(
        config,
        &[
            vec![c(1), c(2), c(1), c(2), c(1)],
            vec![c(2), c(1), c(0), c(1), c(2)],
            vec![c(1), c(0), c(0), c(0), c(1)],
            vec![c(2), c(1), c(0), c(1), c(2)],
            vec![c(1), c(2), c(1), c(2), c(1)],
        ],
    );

    let report = resolved(engine.click(2, 2).unwrap());
    assert_eq!(report.removed.len(), 5);
    assert_eq!(report.credited(GoalKind::Cube(ColorId(0))), 5);
    let rocket = report.spawned_rocket.expect("rocket spawned");
    assert_eq!(rocket.position, Position::new(2, 2));
    assert!(matches!(rocket.tile, TileVariant::Rocket { .. }));
    // rockets stay put while the column settles around them
    assert_eq!(engine.board().get(2, 2), Ok(rocket.tile));
    assert!(report
        .moved
        .iter()
        .all(|m| !matches!(m.tile, TileVariant::Rocket { .. })));
    assert!(report.all_spawned().contains(&rocket));
    assert!(engine
        .available_moves()
        .iter()
        .any(|m| m.position() == Position::new(2, 2)));
}

#[test]
fn four_cube_match_spawns_nothing() {
    let config = level(4, 2, 3, 10, vec![GoalSpec::cube(0, 50)]);
    let mut engine = engine(
        config,
        &[
            vec![c(0), c(0), c(0), c(0)],
            vec![c(1), c(2), c(1), c(2)],
        ],
    );
    let report = resolved(engine.click(3, 0).unwrap());
    assert_eq!(report.removed.len(), 4);
    assert!(report.spawned_rocket.is_none());
}

#[test]
fn scenario_c_horizontal_rocket_clears_row() {
    let config = level(
        8,
        4,
        3,
        10,
        vec![GoalSpec::cube(0, 50), GoalSpec::new(GoalKind::Balloon, 1)],
    );
    let mut engine = engine(
        config,
        &[
            vec![c(1), c(2), c(1), c(2), c(1), c(2), c(1), c(2)],
            vec![c(2), c(1), c(2), c(1), c(2), c(1), c(2), c(1)],
            vec![c(1), V, c(2), H, c(1), c(2), B, c(0)],
            vec![c(2), c(1), c(2), c(1), c(2), c(1), c(2), c(1)],
        ],
    );

    let report = resolved(engine.click(3, 2).unwrap());
    assert_eq!(
        report.kind,
        TurnKind::Rocket {
            orientation: Orientation::Horizontal
        }
    );
    assert_eq!(report.removed.len(), 8);
    assert!(report.removed.iter().all(|r| r.position.y == 2));
    assert!(report
        .removed
        .iter()
        .any(|r| r.position == Position::new(1, 2) && r.tile == V));
    assert_eq!(report.credited(GoalKind::Balloon), 1);
    assert_eq!(report.credited(GoalKind::Cube(ColorId(0))), 1);
    assert!(report.spawned_rocket.is_none());
    // the destroyed vertical rocket did not fire: column 1 below survives
    assert_eq!(engine.board().get(1, 0), Ok(c(2)));
    assert_eq!(engine.board().get(1, 1), Ok(c(1)));
    // row 3 fell into the cleared row
    assert_eq!(engine.board().get(0, 2), Ok(c(2)));
    assert_eq!(engine.moves_remaining(), 9);
    assert!(engine.goals()[1].complete);
    assert_eq!(engine.outcome(), Outcome::InProgress);
}

#[test]
fn vertical_rocket_collects_duck_on_its_column() {
    let config = level(
        3,
        3,
        3,
        10,
        vec![GoalSpec::cube(0, 50), GoalSpec::new(GoalKind::Duck, 1)],
    );
    let log = EventLog::new();
    let mut engine = engine(
        config,
        &[
            vec![c(1), V, c(1)],
            vec![c(2), c(0), c(2)],
            vec![c(1), D, c(1)],
        ],
    )
    .with_audio(log.clone());

    let report = resolved(engine.click(1, 0).unwrap());
    assert_eq!(report.removed.len(), 3);
    assert_eq!(report.credited(GoalKind::Duck), 1);
    assert!(report.ducks.is_empty());
    let audio: Vec<EngineEvent> = log.take();
    assert_eq!(
        audio,
        vec![
            EngineEvent::Audio(AudioKind::Explosion),
            EngineEvent::Audio(AudioKind::Duck),
            EngineEvent::Audio(AudioKind::Collect),
        ]
    );
}

#[test]
fn scenario_d_duck_lands_on_bottom_and_is_collected() {
    let config = level(
        4,
        3,
        3,
        10,
        vec![GoalSpec::cube(0, 50), GoalSpec::new(GoalKind::Duck, 1)],
    );
    let mut engine = engine(
        config,
        &[
            vec![c(0), c(0), E, c(1)],
            vec![c(1), c(2), D, c(2)],
            vec![c(2), c(1), c(2), c(1)],
        ],
    );

    let report = resolved(engine.click(0, 0).unwrap());
    assert!(report.moved.iter().any(|m| m.tile == D
        && m.from == Position::new(2, 1)
        && m.to == Position::new(2, 0)));
    assert_eq!(
        report.ducks.iter().map(|r| (r.position, r.tile)).collect::<Vec<_>>(),
        vec![(Position::new(2, 0), D)]
    );
    assert_eq!(report.credited(GoalKind::Duck), 1);
    assert_eq!(engine.board().count(|t| *t == D), 0);
    assert_eq!(engine.board().count(|t| t.is_empty()), 0);
    assert!(engine.goals()[1].complete);
}

#[test]
fn match_pops_adjacent_balloon_once() {
    let config = level(
        3,
        2,
        3,
        10,
        vec![GoalSpec::cube(0, 50), GoalSpec::new(GoalKind::Balloon, 2)],
    );
    let mut engine = engine(
        config,
        &[
            vec![c(0), c(0), c(1)],
            vec![B, B, c(2)],
        ],
    );
    let report = resolved(engine.click(1, 0).unwrap());
    assert_eq!(
        positions(&report.popped),
        vec![Position::new(0, 1), Position::new(1, 1)]
    );
    assert_eq!(report.credited(GoalKind::Balloon), 2);
    assert_eq!(report.all_removed().len(), 4);
    assert_eq!(engine.board().count(|t| *t == B), 0);
}

#[test]
fn scenario_e_last_move_loses() {
    let config = level(3, 2, 3, 1, vec![GoalSpec::cube(0, 50)]);
    let mut engine = engine(
        config,
        &[
            vec![c(0), c(1), c(0)],
            vec![c(2), c(1), c(2)],
        ],
    );

    let missed = engine.click(0, 0).unwrap();
    assert_eq!(missed.ignored(), Some(IgnoreReason::NoMatch));
    assert!(missed.report().is_none());
    assert_eq!(engine.moves_remaining(), 1);
    assert_eq!(engine.outcome(), Outcome::InProgress);

    let last = engine.click(1, 1).unwrap();
    assert_eq!(last.ignored(), None);
    let report = last.report().expect("last move resolves");
    assert_eq!(report.moves_remaining, 0);
    assert_eq!(report.outcome, Outcome::Lost);
    assert_eq!(engine.outcome(), Outcome::Lost);

    let before = engine.snapshot();
    assert_eq!(
        engine.click(1, 0).unwrap(),
        TurnOutcome::Ignored(IgnoreReason::GameOver)
    );
    assert_eq!(engine.snapshot(), before);
}

#[test]
fn out_of_bounds_is_checked_before_game_over() {
    let config = level(3, 2, 3, 1, vec![GoalSpec::cube(0, 50)]);
    let mut engine = engine(
        config,
        &[
            vec![c(0), c(1), c(0)],
            vec![c(2), c(1), c(2)],
        ],
    );
    resolved(engine.click(1, 0).unwrap());
    assert_eq!(engine.outcome(), Outcome::Lost);

    let before = engine.snapshot();
    assert_eq!(
        engine.click(5, 1),
        Err(BoardError::OutOfBounds {
            x: 5,
            y: 1,
            width: 3,
            height: 2
        })
    );
    assert_eq!(engine.snapshot(), before);
    assert_eq!(engine.outcome(), Outcome::Lost);
    assert_eq!(engine.turns_played(), 1);
}

#[test]
fn completing_goals_on_the_last_move_wins() {
    let config = level(3, 2, 3, 1, vec![GoalSpec::cube(1, 2)]);
    let mut engine = engine(
        config,
        &[
            vec![c(0), c(1), c(0)],
            vec![c(2), c(1), c(2)],
        ],
    );
    let report = resolved(engine.click(1, 0).unwrap());
    assert_eq!(report.outcome, Outcome::Won);
    assert_eq!(engine.state().moves_remaining, 0);
    assert_eq!(engine.goals()[0].current, 2);
}

#[test]
fn goal_progress_is_clamped_to_target() {
    let config = level(4, 1, 2, 10, vec![GoalSpec::cube(0, 2), GoalSpec::cube(1, 5)]);
    let mut engine = engine(config, &[vec![c(0), c(0), c(0), c(1)]]);
    let report = resolved(engine.click(0, 0).unwrap());
    assert_eq!(report.credited(GoalKind::Cube(ColorId(0))), 2);
    assert_eq!(engine.goals()[0].current, 2);
    assert!(engine.goals()[0].complete);
}

#[test]
fn non_clickable_tiles_are_ignored() {
    let config = level(
        3,
        2,
        3,
        5,
        vec![GoalSpec::cube(0, 5), GoalSpec::new(GoalKind::Balloon, 1)],
    );
    let mut engine = engine(
        config,
        &[
            vec![c(0), D, E],
            vec![B, c(1), c(2)],
        ],
    );
    for (x, y) in [(1, 0), (2, 0), (0, 1)] {
        assert_eq!(
            engine.click(x, y).unwrap(),
            TurnOutcome::Ignored(IgnoreReason::NotClickable)
        );
    }
    assert_eq!(engine.moves_remaining(), 5);
    assert_eq!(engine.turns_played(), 0);
}

#[test]
fn out_of_bounds_click_is_an_error() {
    let config = level(3, 2, 3, 5, vec![GoalSpec::cube(0, 5)]);
    let mut engine = engine(
        config,
        &[vec![c(0), c(0), c(1)], vec![c(1), c(2), c(2)]],
    );
    assert_eq!(
        engine.click(3, 0),
        Err(BoardError::OutOfBounds {
            x: 3,
            y: 0,
            width: 3,
            height: 2
        })
    );
    assert!(engine.find_match(0, 9).is_err());
    assert_eq!(engine.moves_remaining(), 5);
}

#[test]
fn events_arrive_in_pipeline_order() {
    let config = level(4, 2, 2, 5, vec![GoalSpec::cube(0, 10)]);
    let log = EventLog::new();
    let mut engine = engine(
        config,
        &[vec![c(0), c(0), c(1), c(0)], vec![c(1), c(1), c(0), c(1)]],
    )
    .with_effects(log.clone())
    .with_audio(log.clone())
    .with_presentation(log.clone());

    let report = resolved(engine.click(0, 0).unwrap());
    let events = log.take();
    assert_eq!(events.len(), 4);
    assert_eq!(
        events[0],
        EngineEvent::TilesRemoved {
            positions: vec![Position::new(0, 0), Position::new(1, 0)],
            colors: vec![Some(ColorId(0)), Some(ColorId(0))],
        }
    );
    assert_eq!(events[1], EngineEvent::Audio(AudioKind::Explosion));
    assert_eq!(events[2], EngineEvent::Audio(AudioKind::Collect));
    assert_eq!(
        events[3],
        EngineEvent::turn_resolved(&report.moved, &report.all_spawned(), &report.all_removed())
    );

    // ignored clicks notify nobody
    engine.click(3, 0).unwrap();
    assert!(log.is_empty());
}

#[test]
fn available_moves_lists_rockets_then_groups() {
    let config = level(4, 2, 3, 5, vec![GoalSpec::cube(0, 10)]);
    let engine = engine(
        config,
        &[vec![c(0), c(0), c(1), H], vec![c(2), c(1), c(1), c(0)]],
    );
    let moves = engine.available_moves();
    let anchors: Vec<Position> = moves.iter().map(|m| m.position()).collect();
    assert_eq!(
        anchors,
        vec![Position::new(3, 0), Position::new(0, 0), Position::new(1, 1)]
    );
}

#[test]
fn restart_resets_progress_and_deals_a_full_board() {
    let config = level(4, 4, 2, 10, vec![GoalSpec::cube(0, 20)]);
    let mut engine = engine(
        config,
        &[
            vec![c(0), c(0), c(1), c(1)],
            vec![c(1), c(0), c(1), c(0)],
            vec![c(0), c(1), c(0), c(1)],
            vec![c(1), c(0), c(1), c(0)],
        ],
    );
    resolved(engine.click(0, 0).unwrap());
    assert!(engine.goals()[0].current > 0);

    engine.restart();
    assert_eq!(engine.moves_remaining(), 10);
    assert_eq!(engine.turns_played(), 0);
    assert_eq!(engine.outcome(), Outcome::InProgress);
    assert_eq!(engine.goals()[0].current, 0);
    assert!(engine.goal_tracker().goals().iter().all(|g| g.current == 0));
    assert!(!engine.goal_tracker().is_won());
    assert_eq!(engine.board().count(|t| t.is_empty()), 0);
}

#[test]
fn invalid_levels_are_rejected() {
    let rng = SmallRng::seed_from_u64(1);
    let bad = LevelConfig {
        goals: vec![GoalSpec::cube(9, 3)],
        ..LevelConfig::default()
    };
    assert!(matches!(
        Engine::new_session(bad, rng.clone()),
        Err(ConfigError::ColorOutOfPalette { .. })
    ));

    let config = level(3, 3, 3, 5, vec![GoalSpec::cube(0, 5)]);
    assert!(matches!(
        Engine::with_board(config.clone(), Board::new(2, 3), rng.clone()),
        Err(ConfigError::BoardMismatch { .. })
    ));

    let wants_duck = level(2, 2, 3, 5, vec![GoalSpec::new(GoalKind::Duck, 1)]);
    let no_ducks = Board::from_rows(&[vec![c(0), c(1)], vec![c(1), c(0)]]).unwrap();
    assert!(matches!(
        Engine::with_board(wants_duck, no_ducks, rng),
        Err(ConfigError::UnreachableGoal { .. })
    ));
}

#[test]
fn seeded_sessions_replay_identically() {
    let play = |seed: u64| {
        let mut engine =
            Engine::new_session(LevelConfig::default(), SmallRng::seed_from_u64(seed)).unwrap();
        let mut reports = Vec::new();
        for _ in 0..5 {
            let Some(first) = engine.available_moves().first().map(|m| m.position()) else {
                break;
            };
            reports.push(engine.click(first.x, first.y).unwrap());
        }
        (engine.snapshot(), reports)
    };
    assert_eq!(play(99), play(99));
}
