//! Turn engine: owns the session and runs every click through validation,
//! resolution, settling, refill and terminal evaluation.

use alloc::boxed::Box;
use alloc::collections::{BTreeMap, BTreeSet};
use alloc::vec::Vec;
use core::fmt;
use rand::Rng;

use crate::{
    board::Board,
    cascade::{self, SpawnedTile, TileMove},
    common::{BoardError, ConfigError},
    config::LevelConfig,
    events::{AudioKind, AudioSink, EffectsSink, NullSink, PresentationSink, RemovedTile},
    goals::GoalTracker,
    matching,
    snapshot::{BoardView, GoalView},
    special,
    tile::{ColorId, GoalKind, Orientation, Position, TileVariant},
};

/// Whether the engine is between turns or inside one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    Idle,
    Resolving,
}

/// Current status of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum Outcome {
    InProgress,
    Won,
    Lost,
}

/// Mutable session bookkeeping next to the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct SessionState {
    pub moves_remaining: u32,
    pub phase: Phase,
    pub outcome: Outcome,
}

impl SessionState {
    fn new(moves: u32) -> Self {
        Self {
            moves_remaining: moves,
            phase: Phase::Idle,
            outcome: Outcome::InProgress,
        }
    }
}

/// Why a click did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum IgnoreReason {
    /// The session is already won or lost.
    GameOver,
    /// A turn is still resolving.
    Busy,
    NoMovesLeft,
    /// The clicked cube's group is below the minimum match size.
    NoMatch,
    /// Empty cell, duck or balloon.
    NotClickable,
}

/// What started a resolved turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum TurnKind {
    Match { color: ColorId, size: usize },
    Rocket { orientation: Orientation },
}

/// Goal progress earned during a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct GoalCredit {
    pub kind: GoalKind,
    pub amount: u32,
}

/// Everything that changed during one resolved turn, in pipeline order.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnReport {
    pub origin: Position,
    pub kind: TurnKind,
    /// Matched cubes, or every tile on the rocket's line.
    pub removed: Vec<RemovedTile>,
    /// Balloons popped next to the match.
    pub popped: Vec<RemovedTile>,
    pub spawned_rocket: Option<SpawnedTile>,
    pub moved: Vec<TileMove>,
    /// Ducks collected from the bottom row after settling.
    pub ducks: Vec<RemovedTile>,
    pub refilled: Vec<SpawnedTile>,
    pub credits: Vec<GoalCredit>,
    pub moves_remaining: u32,
    pub outcome: Outcome,
}

impl TurnReport {
    fn new(origin: Position, kind: TurnKind) -> Self {
        Self {
            origin,
            kind,
            removed: Vec::new(),
            popped: Vec::new(),
            spawned_rocket: None,
            moved: Vec::new(),
            ducks: Vec::new(),
            refilled: Vec::new(),
            credits: Vec::new(),
            moves_remaining: 0,
            outcome: Outcome::InProgress,
        }
    }

    /// Every tile removed this turn: line or match, popped balloons, ducks.
    pub fn all_removed(&self) -> Vec<RemovedTile> {
        self.removed
            .iter()
            .chain(&self.popped)
            .chain(&self.ducks)
            .copied()
            .collect()
    }

    /// Every tile created this turn: the spawned rocket, then refills.
    pub fn all_spawned(&self) -> Vec<SpawnedTile> {
        self.spawned_rocket
            .iter()
            .chain(&self.refilled)
            .copied()
            .collect()
    }

    /// Total credited toward goals of `kind` this turn.
    pub fn credited(&self, kind: GoalKind) -> u32 {
        self.credits
            .iter()
            .filter(|c| c.kind == kind)
            .map(|c| c.amount)
            .sum()
    }
}

/// Result of [`Engine::click`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum TurnOutcome {
    Ignored(IgnoreReason),
    Resolved(TurnReport),
}

impl TurnOutcome {
    pub fn is_resolved(&self) -> bool {
        matches!(self, TurnOutcome::Resolved(_))
    }

    pub fn report(&self) -> Option<&TurnReport> {
        match self {
            TurnOutcome::Resolved(report) => Some(report),
            TurnOutcome::Ignored(_) => None,
        }
    }

    pub fn ignored(&self) -> Option<IgnoreReason> {
        match self {
            TurnOutcome::Ignored(reason) => Some(*reason),
            TurnOutcome::Resolved(_) => None,
        }
    }
}

/// A click that would currently resolve a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum CandidateMove {
    Rocket {
        position: Position,
        orientation: Orientation,
    },
    Group {
        position: Position,
        color: ColorId,
        size: usize,
    },
}

impl CandidateMove {
    pub fn position(&self) -> Position {
        match self {
            CandidateMove::Rocket { position, .. } | CandidateMove::Group { position, .. } => {
                *position
            }
        }
    }
}

/// One play session: board, goals, moves and the injected RNG.
///
/// The engine is the only mutator of its board. Collaborators are notified
/// through sinks while a turn resolves; nothing they do feeds back into it.
pub struct Engine<R: Rng> {
    config: LevelConfig,
    board: Board,
    goals: GoalTracker,
    state: SessionState,
    rng: R,
    turns: u64,
    effects: Box<dyn EffectsSink>,
    audio: Box<dyn AudioSink>,
    presentation: Box<dyn PresentationSink>,
}

impl<R: Rng> Engine<R> {
    /// Start a session on a freshly populated board.
    pub fn new_session(config: LevelConfig, mut rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        let board = Board::populate(&config, &mut rng);
        Ok(Self::assemble(config, board, rng))
    }

    /// Start a session on a prepared board.
    ///
    /// The special-tile counts of `config` are replaced by the counts found on
    /// `board`, so goals are validated against what is actually placed and a
    /// restart deals the same mix of tiles.
    pub fn with_board(mut config: LevelConfig, board: Board, rng: R) -> Result<Self, ConfigError> {
        if board.width() != config.width || board.height() != config.height {
            return Err(ConfigError::BoardMismatch {
                width: config.width,
                height: config.height,
                actual_width: board.width(),
                actual_height: board.height(),
            });
        }
        config.ducks = board.count(|t| *t == TileVariant::Duck);
        config.balloons = board.count(|t| *t == TileVariant::Balloon);
        config.rockets = board.count(|t| matches!(t, TileVariant::Rocket { .. }));
        config.validate()?;
        Ok(Self::assemble(config, board, rng))
    }

    fn assemble(config: LevelConfig, board: Board, rng: R) -> Self {
        log::info!(
            "session started: {}x{} grid, {} colors, {} moves, {} goals",
            config.width,
            config.height,
            config.palette_size,
            config.moves,
            config.goals.len()
        );
        Self {
            goals: GoalTracker::new(&config.goals),
            state: SessionState::new(config.moves),
            config,
            board,
            rng,
            turns: 0,
            effects: Box::new(NullSink),
            audio: Box::new(NullSink),
            presentation: Box::new(NullSink),
        }
    }

    pub fn with_effects(mut self, sink: impl EffectsSink + 'static) -> Self {
        self.effects = Box::new(sink);
        self
    }

    pub fn with_audio(mut self, sink: impl AudioSink + 'static) -> Self {
        self.audio = Box::new(sink);
        self
    }

    pub fn with_presentation(mut self, sink: impl PresentationSink + 'static) -> Self {
        self.presentation = Box::new(sink);
        self
    }

    pub fn config(&self) -> &LevelConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn snapshot(&self) -> BoardView {
        BoardView::from(&self.board)
    }

    pub fn goals(&self) -> Vec<GoalView> {
        self.goals.views()
    }

    pub fn goal_tracker(&self) -> &GoalTracker {
        &self.goals
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn outcome(&self) -> Outcome {
        self.state.outcome
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn moves_remaining(&self) -> u32 {
        self.state.moves_remaining
    }

    /// Number of turns resolved since the session (re)started.
    pub fn turns_played(&self) -> u64 {
        self.turns
    }

    /// The match a click at `(x, y)` would resolve, without changing anything.
    pub fn find_match(&self, x: usize, y: usize) -> Result<BTreeSet<Position>, BoardError> {
        self.board.get(x, y)?;
        Ok(matching::find_match(
            &self.board,
            Position::new(x, y),
            self.config.min_match_size,
        ))
    }

    /// Every click that would currently resolve a turn: each rocket, and one
    /// anchor cell per matchable group. Empty when the player is stuck.
    pub fn available_moves(&self) -> Vec<CandidateMove> {
        let rockets = self.board.positions().filter_map(|position| {
            match self.board.at(position) {
                TileVariant::Rocket { orientation } => Some(CandidateMove::Rocket {
                    position,
                    orientation,
                }),
                _ => None,
            }
        });
        let groups = matching::find_groups(&self.board, self.config.min_match_size)
            .into_iter()
            .map(|group| CandidateMove::Group {
                position: group.anchor(),
                color: group.color,
                size: group.len(),
            });
        rockets.chain(groups).collect()
    }

    /// Reset goals and moves and deal a new board from the same level.
    pub fn restart(&mut self) {
        self.board = Board::populate(&self.config, &mut self.rng);
        self.goals.reset();
        self.state = SessionState::new(self.config.moves);
        self.turns = 0;
        log::info!("session restarted");
    }

    fn gate(&self) -> Option<IgnoreReason> {
        if self.state.outcome != Outcome::InProgress {
            Some(IgnoreReason::GameOver)
        } else if self.state.phase != Phase::Idle {
            Some(IgnoreReason::Busy)
        } else if self.state.moves_remaining == 0 {
            Some(IgnoreReason::NoMovesLeft)
        } else {
            None
        }
    }

    /// Handle a player click at `(x, y)`.
    ///
    /// Coordinates outside the grid are a contract violation and return
    /// `Err(OutOfBounds)`. Every player-facing illegal click is reported as
    /// [`TurnOutcome::Ignored`] and leaves the session untouched.
    pub fn click(&mut self, x: usize, y: usize) -> Result<TurnOutcome, BoardError> {
        let tile = self.board.get(x, y)?;
        if let Some(reason) = self.gate() {
            log::debug!("click at ({}, {}) ignored: {:?}", x, y, reason);
            return Ok(TurnOutcome::Ignored(reason));
        }
        let origin = Position::new(x, y);

        let report = match tile {
            TileVariant::Rocket { orientation } => {
                self.begin_turn();
                self.resolve_rocket(origin, orientation)
            }
            TileVariant::Cube { color } => {
                let matched =
                    matching::find_match(&self.board, origin, self.config.min_match_size);
                if matched.is_empty() {
                    log::debug!("click at {} ignored: no match", origin);
                    return Ok(TurnOutcome::Ignored(IgnoreReason::NoMatch));
                }
                self.begin_turn();
                self.resolve_match(origin, color, matched)
            }
            TileVariant::Empty | TileVariant::Duck | TileVariant::Balloon => {
                return Ok(TurnOutcome::Ignored(IgnoreReason::NotClickable));
            }
        };
        Ok(TurnOutcome::Resolved(self.finish_turn(report)))
    }

    fn begin_turn(&mut self) {
        self.state.moves_remaining -= 1;
        self.state.phase = Phase::Resolving;
    }

    fn resolve_match(
        &mut self,
        origin: Position,
        color: ColorId,
        matched: BTreeSet<Position>,
    ) -> TurnReport {
        log::debug!(
            "turn {}: match of {} color-{} cubes at {}",
            self.turns + 1,
            matched.len(),
            color,
            origin
        );
        let mut report = TurnReport::new(
            origin,
            TurnKind::Match {
                color,
                size: matched.len(),
            },
        );
        report.removed = matched
            .iter()
            .map(|&position| RemovedTile {
                position,
                tile: self.board.clear(position),
            })
            .collect();
        report.popped = special::pop_adjacent_balloons(&mut self.board, &matched);

        self.notify_removed(&report.removed);
        self.audio.on_event(AudioKind::Explosion);
        if !report.popped.is_empty() {
            self.notify_removed(&report.popped);
            self.audio.on_event(AudioKind::Balloon);
        }
        let collected = report.all_removed();
        self.credit(&collected, &mut report.credits);

        if special::should_spawn_rocket(matched.len(), self.config.rocket_trigger_size) {
            report.spawned_rocket = Some(special::spawn_rocket(
                &mut self.board,
                origin,
                &mut self.rng,
            ));
        }
        report
    }

    fn resolve_rocket(&mut self, origin: Position, orientation: Orientation) -> TurnReport {
        log::debug!(
            "turn {}: {:?} rocket fired at {}",
            self.turns + 1,
            orientation,
            origin
        );
        let mut report = TurnReport::new(origin, TurnKind::Rocket { orientation });
        report.removed = special::activate_rocket(&mut self.board, origin);
        self.notify_removed(&report.removed);
        self.audio.on_event(AudioKind::Explosion);
        if report
            .removed
            .iter()
            .any(|r| r.tile == TileVariant::Balloon)
        {
            self.audio.on_event(AudioKind::Balloon);
        }
        if report.removed.iter().any(|r| r.tile == TileVariant::Duck) {
            self.audio.on_event(AudioKind::Duck);
        }
        self.credit(&report.removed, &mut report.credits);
        report
    }

    /// Shared tail of every turn: settle, collect ducks, refill, evaluate.
    fn finish_turn(&mut self, mut report: TurnReport) -> TurnReport {
        report.moved = cascade::settle(&mut self.board);

        report.ducks = special::collect_bottom_ducks(&mut self.board);
        if !report.ducks.is_empty() {
            self.notify_removed(&report.ducks);
            self.audio.on_event(AudioKind::Duck);
            self.credit(&report.ducks, &mut report.credits);
        }

        report.refilled = cascade::refill(&mut self.board, self.config.palette_size, &mut self.rng);

        self.state.outcome = if self.goals.is_won() {
            Outcome::Won
        } else if self.goals.is_lost(self.state.moves_remaining) {
            Outcome::Lost
        } else {
            Outcome::InProgress
        };
        self.state.phase = Phase::Idle;
        self.turns += 1;
        report.moves_remaining = self.state.moves_remaining;
        report.outcome = self.state.outcome;

        self.presentation.on_turn_resolved(
            &report.moved,
            &report.all_spawned(),
            &report.all_removed(),
        );
        log::debug!(
            "turn {} resolved: {} removed, {} moved, {} refilled, {} moves left",
            self.turns,
            report.removed.len() + report.popped.len() + report.ducks.len(),
            report.moved.len(),
            report.refilled.len(),
            report.moves_remaining
        );
        match report.outcome {
            Outcome::Won => log::info!("session won after {} turns", self.turns),
            Outcome::Lost => log::info!("session lost after {} turns", self.turns),
            Outcome::InProgress => {}
        }
        report
    }

    /// Credit removed tiles to the goals, one collect call per goal kind.
    fn credit(&mut self, removed: &[RemovedTile], credits: &mut Vec<GoalCredit>) {
        let mut totals: BTreeMap<GoalKind, u32> = BTreeMap::new();
        for kind in removed.iter().filter_map(|r| r.tile.goal_kind()) {
            *totals.entry(kind).or_insert(0) += 1;
        }
        let mut collected = false;
        for (kind, amount) in totals {
            let advanced = self.goals.collect(kind, amount);
            if advanced > 0 {
                credits.push(GoalCredit {
                    kind,
                    amount: advanced,
                });
                collected = true;
            }
        }
        if collected {
            self.audio.on_event(AudioKind::Collect);
        }
    }

    fn notify_removed(&mut self, removed: &[RemovedTile]) {
        let positions: Vec<Position> = removed.iter().map(|r| r.position).collect();
        let colors: Vec<Option<ColorId>> = removed.iter().map(|r| r.tile.color()).collect();
        self.effects.on_tiles_removed(&positions, &colors);
    }
}

impl<R: Rng> fmt::Debug for Engine<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("state", &self.state)
            .field("turns", &self.turns)
            .field("goals", &self.goals)
            .field("board", &self.board)
            .finish_non_exhaustive()
    }
}
