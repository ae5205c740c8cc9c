use rand::rngs::SmallRng;
use rand::Rng;

use crate::{
    game::CandidateMove,
    snapshot::GoalView,
    tile::{GoalKind, Position},
};

/// Interface implemented by automated players.
pub trait Player {
    /// Choose the next cell to click among the currently legal moves.
    /// Returns `None` when `moves` is empty.
    fn select_click(
        &mut self,
        rng: &mut SmallRng,
        moves: &[CandidateMove],
        goals: &[GoalView],
    ) -> Option<Position>;
}

/// Picks uniformly among legal moves.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomPlayer;

impl RandomPlayer {
    pub fn new() -> Self {
        Self
    }
}

impl Player for RandomPlayer {
    fn select_click(
        &mut self,
        rng: &mut SmallRng,
        moves: &[CandidateMove],
        _goals: &[GoalView],
    ) -> Option<Position> {
        if moves.is_empty() {
            return None;
        }
        Some(moves[rng.random_range(0..moves.len())].position())
    }
}

/// Prefers the largest group whose color an unfinished goal still needs,
/// then any rocket, then the largest group overall. Ties go to the first
/// candidate.
#[derive(Debug, Default, Clone, Copy)]
pub struct GreedyPlayer;

impl GreedyPlayer {
    pub fn new() -> Self {
        Self
    }

    fn score(candidate: &CandidateMove, goals: &[GoalView]) -> (u8, usize) {
        match *candidate {
            CandidateMove::Group { color, size, .. } => {
                let wanted = goals
                    .iter()
                    .any(|g| g.kind == GoalKind::Cube(color) && !g.complete);
                (if wanted { 2 } else { 0 }, size)
            }
            CandidateMove::Rocket { .. } => (1, 0),
        }
    }
}

impl Player for GreedyPlayer {
    fn select_click(
        &mut self,
        _rng: &mut SmallRng,
        moves: &[CandidateMove],
        goals: &[GoalView],
    ) -> Option<Position> {
        let mut best: Option<(&CandidateMove, (u8, usize))> = None;
        for candidate in moves {
            let score = Self::score(candidate, goals);
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((candidate, score));
            }
        }
        best.map(|(candidate, _)| candidate.position())
    }
}
