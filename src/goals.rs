//! Goal progress and win/lose evaluation.

use alloc::vec::Vec;

use crate::config::GoalSpec;
use crate::snapshot::GoalView;
use crate::tile::GoalKind;

/// Progress toward one goal. `current` never exceeds `target`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct Goal {
    pub kind: GoalKind,
    pub target: u32,
    pub current: u32,
}

impl Goal {
    pub fn is_complete(&self) -> bool {
        self.current == self.target
    }
}

/// Tracks every goal of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalTracker {
    goals: Vec<Goal>,
}

impl GoalTracker {
    pub fn new(specs: &[GoalSpec]) -> Self {
        let goals = specs
            .iter()
            .map(|spec| Goal {
                kind: spec.kind,
                target: spec.target,
                current: 0,
            })
            .collect();
        Self { goals }
    }

    /// Credit `amount` collected tiles of `kind` to every goal that counts
    /// them, clamped at each goal's target. Returns the largest amount any
    /// goal actually advanced by.
    pub fn collect(&mut self, kind: GoalKind, amount: u32) -> u32 {
        let mut credited = 0;
        for goal in self.goals.iter_mut().filter(|g| g.kind == kind) {
            let before = goal.current;
            goal.current = goal.current.saturating_add(amount).min(goal.target);
            credited = credited.max(goal.current - before);
        }
        if credited > 0 {
            log::trace!("goal {} advanced by {}", kind, credited);
        }
        credited
    }

    /// `true` when every goal has reached its target.
    pub fn is_won(&self) -> bool {
        self.goals.iter().all(Goal::is_complete)
    }

    /// `true` when no moves remain and at least one goal is incomplete.
    pub fn is_lost(&self, moves_remaining: u32) -> bool {
        moves_remaining == 0 && !self.is_won()
    }

    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    pub fn views(&self) -> Vec<GoalView> {
        self.goals.iter().map(GoalView::from).collect()
    }

    /// Zero every goal's progress.
    pub fn reset(&mut self) {
        for goal in &mut self.goals {
            goal.current = 0;
        }
    }
}
