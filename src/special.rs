//! Special tile rules: rocket spawning and line clears, bottom-row duck
//! collection and balloon popping next to a match.

use alloc::collections::BTreeSet;
use alloc::vec::Vec;
use rand::Rng;

use crate::board::{random_orientation, Board};
use crate::cascade::SpawnedTile;
use crate::events::RemovedTile;
use crate::tile::{Orientation, Position, TileVariant};

/// Whether a match of `match_len` cubes earns a rocket.
pub fn should_spawn_rocket(match_len: usize, rocket_trigger_size: usize) -> bool {
    match_len >= rocket_trigger_size
}

/// Place a rocket with a random orientation at `at`, overwriting its cell.
pub fn spawn_rocket<R: Rng + ?Sized>(
    board: &mut Board,
    at: Position,
    rng: &mut R,
) -> SpawnedTile {
    let tile = TileVariant::Rocket {
        orientation: random_orientation(rng),
    };
    board.set(at, tile);
    log::trace!("rocket {:?} spawned at {}", tile, at);
    SpawnedTile { position: at, tile }
}

/// Cells a rocket at `origin` sweeps: its full row or full column.
pub fn rocket_line(board: &Board, origin: Position, orientation: Orientation) -> Vec<Position> {
    match orientation {
        Orientation::Horizontal => board.row(origin.y).collect(),
        Orientation::Vertical => board.column(origin.x).collect(),
    }
}

/// Clear the line of the rocket at `origin`, the rocket itself included.
///
/// Other rockets on the line are destroyed without firing. Returns every
/// removed tile in sweep order; empty cells are skipped. Returns nothing if
/// `origin` does not hold a rocket.
pub fn activate_rocket(board: &mut Board, origin: Position) -> Vec<RemovedTile> {
    let TileVariant::Rocket { orientation } = board.at(origin) else {
        return Vec::new();
    };
    let mut removed = Vec::new();
    for position in rocket_line(board, origin, orientation) {
        let tile = board.clear(position);
        if tile.is_empty() {
            continue;
        }
        if position != origin && matches!(tile, TileVariant::Rocket { .. }) {
            log::trace!("rocket at {} destroyed by line clear", position);
        }
        removed.push(RemovedTile { position, tile });
    }
    removed
}

/// Pop every balloon orthogonally adjacent to a cell of `matched`.
pub fn pop_adjacent_balloons(board: &mut Board, matched: &BTreeSet<Position>) -> Vec<RemovedTile> {
    let (width, height) = (board.width(), board.height());
    let balloons: BTreeSet<Position> = matched
        .iter()
        .flat_map(|pos| pos.neighbors(width, height))
        .filter(|&pos| board.at(pos) == TileVariant::Balloon)
        .collect();
    balloons
        .into_iter()
        .map(|position| RemovedTile {
            position,
            tile: board.clear(position),
        })
        .collect()
}

/// Remove every duck sitting on the bottom row.
pub fn collect_bottom_ducks(board: &mut Board) -> Vec<RemovedTile> {
    let bottom: Vec<Position> = board
        .row(0)
        .filter(|&pos| board.at(pos) == TileVariant::Duck)
        .collect();
    bottom
        .into_iter()
        .map(|position| RemovedTile {
            position,
            tile: board.clear(position),
        })
        .collect()
}
