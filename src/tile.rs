//! Tile definitions: grid positions, cube colors and the tile variants a cell can hold.

use core::fmt;

/// Orientation of a rocket: which line it clears when activated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// Index into the session palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct ColorId(pub u8);

impl ColorId {
    /// Palette index as `usize`.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ColorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A cell coordinate. `y = 0` is the bottom row; up is `y + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Orthogonal neighbours inside a `width × height` grid (up, down, left, right).
    pub fn neighbors(self, width: usize, height: usize) -> impl Iterator<Item = Position> {
        let Position { x, y } = self;
        let up = (y + 1 < height).then(|| Position::new(x, y + 1));
        let down = (y > 0).then(|| Position::new(x, y - 1));
        let left = (x > 0).then(|| Position::new(x - 1, y));
        let right = (x + 1 < width).then(|| Position::new(x + 1, y));
        [up, down, left, right].into_iter().flatten()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Content of a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum TileVariant {
    #[default]
    Empty,
    Cube { color: ColorId },
    Rocket { orientation: Orientation },
    Duck,
    Balloon,
}

impl TileVariant {
    pub const fn cube(color: u8) -> Self {
        TileVariant::Cube {
            color: ColorId(color),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, TileVariant::Empty)
    }

    /// Tiles that gravity moves. Rockets stay where they were spawned.
    pub fn is_movable(&self) -> bool {
        matches!(
            self,
            TileVariant::Cube { .. } | TileVariant::Duck | TileVariant::Balloon
        )
    }

    pub fn color(&self) -> Option<ColorId> {
        match self {
            TileVariant::Cube { color } => Some(*color),
            _ => None,
        }
    }

    /// Goal this tile counts toward when collected. Rockets count toward nothing.
    pub fn goal_kind(&self) -> Option<GoalKind> {
        match self {
            TileVariant::Cube { color } => Some(GoalKind::Cube(*color)),
            TileVariant::Duck => Some(GoalKind::Duck),
            TileVariant::Balloon => Some(GoalKind::Balloon),
            TileVariant::Empty | TileVariant::Rocket { .. } => None,
        }
    }

    /// Single-character glyph used by text renderers.
    pub fn glyph(&self) -> char {
        match self {
            TileVariant::Empty => '.',
            TileVariant::Cube { color } => match color.0 {
                c @ 0..=9 => (b'0' + c) as char,
                c => (b'a' + (c - 10) % 26) as char,
            },
            TileVariant::Rocket {
                orientation: Orientation::Horizontal,
            } => '-',
            TileVariant::Rocket {
                orientation: Orientation::Vertical,
            } => '|',
            TileVariant::Duck => 'D',
            TileVariant::Balloon => 'B',
        }
    }
}

/// What a goal counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum GoalKind {
    Cube(ColorId),
    Duck,
    Balloon,
}

impl fmt::Display for GoalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GoalKind::Cube(color) => write!(f, "cube {}", color),
            GoalKind::Duck => write!(f, "duck"),
            GoalKind::Balloon => write!(f, "balloon"),
        }
    }
}
