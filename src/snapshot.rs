//! Read-only views handed to the host.

use alloc::vec::Vec;
use core::fmt;

use crate::board::Board;
use crate::goals::Goal;
use crate::tile::{GoalKind, Position, TileVariant};

/// Copy of the board at a point in time. Row-major, bottom row first.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct BoardView {
    pub width: usize,
    pub height: usize,
    pub cells: Vec<TileVariant>,
}

impl BoardView {
    /// Tile at `(x, y)`, or `None` outside the grid.
    pub fn get(&self, x: usize, y: usize) -> Option<TileVariant> {
        if x < self.width && y < self.height {
            Some(self.cells[y * self.width + x])
        } else {
            None
        }
    }

    /// Positions holding tiles that satisfy `pred`.
    pub fn find(&self, pred: impl Fn(&TileVariant) -> bool) -> Vec<Position> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, tile)| pred(tile))
            .map(|(i, _)| Position::new(i % self.width, i / self.width))
            .collect()
    }
}

impl From<&Board> for BoardView {
    fn from(board: &Board) -> Self {
        BoardView {
            width: board.width(),
            height: board.height(),
            cells: board.cells().to_vec(),
        }
    }
}

impl fmt::Display for BoardView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "   ")?;
        for x in 0..self.width {
            write!(f, "{}", x % 10)?;
        }
        writeln!(f)?;
        for y in (0..self.height).rev() {
            write!(f, "{:2} ", y)?;
            for x in 0..self.width {
                write!(f, "{}", self.cells[y * self.width + x].glyph())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Progress of one goal as shown to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct GoalView {
    pub kind: GoalKind,
    pub target: u32,
    pub current: u32,
    pub complete: bool,
}

impl From<&Goal> for GoalView {
    fn from(goal: &Goal) -> Self {
        GoalView {
            kind: goal.kind,
            target: goal.target,
            current: goal.current,
            complete: goal.is_complete(),
        }
    }
}

impl fmt::Display for GoalView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}/{}", self.kind, self.current, self.target)?;
        if self.complete {
            write!(f, " done")?;
        }
        Ok(())
    }
}
