//! Connected-component search over same-colored cubes.
//!
//! Matching is strictly 4-directional: a cube belongs to a match only if it
//! can be reached from the clicked cube through up/down/left/right steps over
//! cubes of the same color. Diagonal contact never joins two groups.

use alloc::collections::{BTreeSet, VecDeque};
use alloc::vec::Vec;

use crate::board::Board;
use crate::tile::{ColorId, Position, TileVariant};

/// A matchable group of cubes found by [`find_groups`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub color: ColorId,
    pub cells: BTreeSet<Position>,
}

impl Group {
    /// Smallest member position, a stable handle for clicking the group.
    pub fn anchor(&self) -> Position {
        // Groups are never empty.
        self.cells.iter().next().copied().unwrap_or(Position::new(0, 0))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Full connected component of same-colored cubes containing `origin`,
/// regardless of size. Empty when `origin` holds no cube.
fn component(board: &Board, origin: Position) -> BTreeSet<Position> {
    let mut visited = BTreeSet::new();
    let color = match board.at(origin) {
        TileVariant::Cube { color } => color,
        _ => return visited,
    };

    let mut queue = VecDeque::new();
    visited.insert(origin);
    queue.push_back(origin);
    while let Some(pos) = queue.pop_front() {
        for next in pos.neighbors(board.width(), board.height()) {
            if board.at(next).color() == Some(color) && visited.insert(next) {
                queue.push_back(next);
            }
        }
    }
    visited
}

/// The match a click at `origin` would resolve.
///
/// Returns the empty set if `origin` is off the grid, does not hold a cube, or
/// its component is smaller than `min_match_size`.
pub fn find_match(board: &Board, origin: Position, min_match_size: usize) -> BTreeSet<Position> {
    if !board.contains(origin.x, origin.y) {
        return BTreeSet::new();
    }
    let cells = component(board, origin);
    if cells.len() < min_match_size {
        return BTreeSet::new();
    }
    cells
}

/// Every distinct matchable group on the board, ordered by anchor position.
pub fn find_groups(board: &Board, min_match_size: usize) -> Vec<Group> {
    let mut seen = BTreeSet::new();
    let mut groups = Vec::new();
    for pos in board.positions() {
        if seen.contains(&pos) {
            continue;
        }
        let Some(color) = board.at(pos).color() else {
            continue;
        };
        let cells = component(board, pos);
        seen.extend(cells.iter().copied());
        if cells.len() >= min_match_size {
            groups.push(Group { color, cells });
        }
    }
    groups.sort_by_key(Group::anchor);
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn c(color: u8) -> TileVariant {
        TileVariant::cube(color)
    }

    #[test]
    fn diagonal_cubes_do_not_match() {
        let board = Board::from_rows(&[vec![c(0), c(1)], vec![c(1), c(0)]]).unwrap();
        assert!(find_match(&board, Position::new(0, 0), 2).is_empty());
    }

    #[test]
    fn match_stops_at_other_tiles() {
        let board = Board::from_rows(&[vec![c(0), TileVariant::Duck, c(0)]]).unwrap();
        assert!(find_match(&board, Position::new(0, 0), 2).is_empty());
        assert_eq!(find_match(&board, Position::new(0, 0), 1).len(), 1);
    }

    #[test]
    fn groups_are_reported_once() {
        let board = Board::from_rows(&[vec![c(0), c(0), c(1)], vec![c(0), c(1), c(1)]]).unwrap();
        let groups = find_groups(&board, 2);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].color, ColorId(0));
        assert_eq!(groups[0].len(), 3);
        assert_eq!(groups[1].anchor(), Position::new(1, 1));
    }
}
