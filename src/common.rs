//! Common error types for the engine: board access and level configuration.

use thiserror::Error;

/// Errors returned by bounds-checked board access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BoardError {
    /// Coordinate outside `0..width` × `0..height`.
    #[error("position ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
    /// A row handed to `Board::from_rows` differs in length from the first row.
    #[error("row {row} has {actual} cells, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        actual: usize,
    },
}

/// Errors returned when a level configuration cannot start a session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("grid must be at least 1x1, got {width}x{height}")]
    EmptyGrid { width: usize, height: usize },
    #[error("a {width}x{height} grid exceeds the {max}-cell limit")]
    GridTooLarge {
        width: usize,
        height: usize,
        max: usize,
    },
    #[error("palette size must be between 1 and 255, got {0}")]
    InvalidPalette(usize),
    #[error("minimum match size must be at least 1")]
    ZeroMinMatch,
    #[error("rocket trigger size must be at least 1")]
    ZeroRocketTrigger,
    #[error("level must allow at least one move")]
    ZeroMoves,
    #[error("level has no goals")]
    NoGoals,
    #[error("goal {index} has a zero target")]
    ZeroTarget { index: usize },
    #[error("goal {index} asks for cube color {color} outside a palette of {palette}")]
    ColorOutOfPalette {
        index: usize,
        color: u8,
        palette: usize,
    },
    /// Ducks and balloons only come from initial placement, so a goal above
    /// the placed count could never complete.
    #[error("goal {index} needs {target} but only {available} are placed")]
    UnreachableGoal {
        index: usize,
        target: u32,
        available: u32,
    },
    #[error("{requested} special tiles do not fit ({capacity} cells available)")]
    TooManySpecials { requested: usize, capacity: usize },
    #[error("board is {actual_width}x{actual_height} but level expects {width}x{height}")]
    BoardMismatch {
        width: usize,
        height: usize,
        actual_width: usize,
        actual_height: usize,
    },
}
