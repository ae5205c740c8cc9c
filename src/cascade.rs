//! Gravity settling and refill of empty cells.

use alloc::vec::Vec;
use rand::Rng;

use crate::board::{random_cube, Board};
use crate::tile::{Position, TileVariant};

/// A tile moved by gravity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct TileMove {
    pub tile: TileVariant,
    pub from: Position,
    pub to: Position,
}

/// A tile created by refill or by a spawn rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct SpawnedTile {
    pub position: Position,
    pub tile: TileVariant,
}

/// Lowest empty cell in column `x` with a movable tile somewhere above it,
/// paired with the lowest such tile.
fn next_fall(board: &Board, x: usize) -> Option<(Position, Position)> {
    let height = board.height();
    for y in 0..height {
        let hole = Position::new(x, y);
        if !board.at(hole).is_empty() {
            continue;
        }
        let source = ((y + 1)..height)
            .map(|above| Position::new(x, above))
            .find(|&p| board.at(p).is_movable());
        if let Some(source) = source {
            return Some((hole, source));
        }
    }
    None
}

/// Let every movable tile fall into the empty cells beneath it.
///
/// Rockets never move; tiles above a rocket fall past it into empty cells
/// below. Runs until a full pass over every column changes nothing. Each
/// tile moves at most once, straight to its resting cell.
pub fn settle(board: &mut Board) -> Vec<TileMove> {
    let mut moves = Vec::new();
    loop {
        let mut changed = false;
        for x in 0..board.width() {
            while let Some((to, from)) = next_fall(board, x) {
                let tile = board.clear(from);
                board.set(to, tile);
                log::trace!("settle: {:?} {} -> {}", tile, from, to);
                moves.push(TileMove { tile, from, to });
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }
    moves
}

/// Spawn a random cube in every empty cell, column by column, top to bottom
/// within a column. `palette_size` is clamped to `1..=255`.
pub fn refill<R: Rng + ?Sized>(
    board: &mut Board,
    palette_size: usize,
    rng: &mut R,
) -> Vec<SpawnedTile> {
    let mut spawned = Vec::new();
    for x in 0..board.width() {
        for y in (0..board.height()).rev() {
            let position = Position::new(x, y);
            if board.at(position).is_empty() {
                let tile = random_cube(rng, palette_size);
                board.set(position, tile);
                spawned.push(SpawnedTile { position, tile });
            }
        }
    }
    spawned
}
