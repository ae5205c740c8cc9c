//! Grid state: a fixed `width × height` arena of tiles indexed by coordinate.

use alloc::vec::Vec;
use core::fmt;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::common::BoardError;
use crate::config::LevelConfig;
use crate::tile::{ColorId, Orientation, Position, TileVariant};

/// The playing grid. Cells are stored row-major with `y = 0` as the bottom row.
#[derive(Clone, PartialEq, Eq)]
pub struct Board {
    width: usize,
    height: usize,
    cells: Vec<TileVariant>,
}

impl Board {
    /// Create a board with every cell empty.
    pub fn new(width: usize, height: usize) -> Self {
        Board {
            width,
            height,
            cells: alloc::vec![TileVariant::Empty; width * height],
        }
    }

    /// Build a board from rows listed bottom row first.
    ///
    /// Fails with [`BoardError::RaggedRows`] if a row's length differs from
    /// the first row's.
    pub fn from_rows(rows: &[Vec<TileVariant>]) -> Result<Self, BoardError> {
        let height = rows.len();
        let width = rows.first().map_or(0, |row| row.len());
        if let Some((row, ragged)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(BoardError::RaggedRows {
                row,
                expected: width,
                actual: ragged.len(),
            });
        }
        let cells = rows.iter().flat_map(|row| row.iter().copied()).collect();
        Ok(Board {
            width,
            height,
            cells,
        })
    }

    /// Fill every cell with a random cube, then scatter the configured
    /// ducks, balloons and rockets over distinct cells. Ducks never start on
    /// the bottom row.
    pub fn populate<R: Rng + ?Sized>(config: &LevelConfig, rng: &mut R) -> Self {
        let mut board = Board::new(config.width, config.height);
        for cell in board.cells.iter_mut() {
            *cell = random_cube(rng, config.palette_size);
        }

        let mut free: Vec<Position> = board.positions().filter(|p| p.y > 0).collect();
        free.shuffle(rng);
        for pos in free.drain(..config.ducks.min(free.len())) {
            board.set(pos, TileVariant::Duck);
        }
        // Remaining cells, bottom row included, for balloons and rockets.
        let mut free: Vec<Position> = board
            .positions()
            .filter(|&p| !matches!(board.at(p), TileVariant::Duck))
            .collect();
        free.shuffle(rng);
        let mut free = free.into_iter();
        for pos in free.by_ref().take(config.balloons) {
            board.set(pos, TileVariant::Balloon);
        }
        for pos in free.take(config.rockets) {
            let orientation = random_orientation(rng);
            board.set(pos, TileVariant::Rocket { orientation });
        }
        board
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Whether `(x, y)` lies on the grid.
    pub fn contains(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    fn check_bounds(&self, x: usize, y: usize) -> Result<Position, BoardError> {
        if self.contains(x, y) {
            Ok(Position::new(x, y))
        } else {
            Err(BoardError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Tile at `(x, y)`.
    pub fn get(&self, x: usize, y: usize) -> Result<TileVariant, BoardError> {
        let pos = self.check_bounds(x, y)?;
        Ok(self.at(pos))
    }

    /// Returns `true` when the cell holds no tile.
    pub fn is_empty(&self, x: usize, y: usize) -> Result<bool, BoardError> {
        self.get(x, y).map(|tile| tile.is_empty())
    }

    #[inline]
    fn index(&self, pos: Position) -> usize {
        debug_assert!(self.contains(pos.x, pos.y), "{} outside grid", pos);
        pos.y * self.width + pos.x
    }

    /// Unchecked read for positions already known to be on the grid.
    #[inline]
    pub(crate) fn at(&self, pos: Position) -> TileVariant {
        self.cells[self.index(pos)]
    }

    /// Unchecked write. Returns the tile previously in the cell.
    pub(crate) fn set(&mut self, pos: Position, tile: TileVariant) -> TileVariant {
        let idx = self.index(pos);
        core::mem::replace(&mut self.cells[idx], tile)
    }

    /// Unchecked removal. Returns the tile previously in the cell.
    pub(crate) fn clear(&mut self, pos: Position) -> TileVariant {
        self.set(pos, TileVariant::Empty)
    }

    /// Every position, row by row from the bottom.
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        let width = self.width;
        (0..self.height).flat_map(move |y| (0..width).map(move |x| Position::new(x, y)))
    }

    /// Positions of one row, left to right.
    pub fn row(&self, y: usize) -> impl Iterator<Item = Position> {
        (0..self.width).map(move |x| Position::new(x, y))
    }

    /// Positions of one column, bottom to top.
    pub fn column(&self, x: usize) -> impl Iterator<Item = Position> {
        (0..self.height).map(move |y| Position::new(x, y))
    }

    /// Number of cells whose tile satisfies `pred`.
    pub fn count(&self, pred: impl Fn(&TileVariant) -> bool) -> usize {
        self.cells.iter().filter(|tile| pred(tile)).count()
    }

    /// Row-major cell slice, bottom row first.
    pub fn cells(&self) -> &[TileVariant] {
        &self.cells
    }
}

/// Random cube from a palette of `palette_size` colors, clamped to `1..=255`.
pub(crate) fn random_cube<R: Rng + ?Sized>(rng: &mut R, palette_size: usize) -> TileVariant {
    let palette = palette_size.clamp(1, u8::MAX as usize) as u8;
    TileVariant::Cube {
        color: ColorId(rng.random_range(0..palette)),
    }
}

pub(crate) fn random_orientation<R: Rng + ?Sized>(rng: &mut R) -> Orientation {
    if rng.random() {
        Orientation::Horizontal
    } else {
        Orientation::Vertical
    }
}

impl fmt::Display for Board {
    /// Top row first, one glyph per cell.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in (0..self.height).rev() {
            for pos in self.row(y) {
                write!(f, "{}", self.at(pos).glyph())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Board {}x{} {{", self.width, self.height)?;
        for y in (0..self.height).rev() {
            write!(f, "  {:2} ", y)?;
            for pos in self.row(y) {
                write!(f, "{}", self.at(pos).glyph())?;
            }
            writeln!(f)?;
        }
        write!(f, "}}")
    }
}
