//! Level configuration: grid size, palette, match thresholds, goals and initial special tiles.

#[cfg(not(feature = "std"))]
use alloc::vec;
use alloc::vec::Vec;

use crate::common::ConfigError;
use crate::tile::{ColorId, GoalKind};

pub const DEFAULT_WIDTH: usize = 6;
pub const DEFAULT_HEIGHT: usize = 8;
pub const DEFAULT_PALETTE_SIZE: usize = 5;
pub const DEFAULT_MIN_MATCH_SIZE: usize = 2;
pub const DEFAULT_ROCKET_TRIGGER_SIZE: usize = 5;
pub const DEFAULT_MOVES: u32 = 20;
/// Largest grid a level may ask for, in cells.
pub const MAX_CELLS: usize = 4096;

/// One goal entry of a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct GoalSpec {
    pub kind: GoalKind,
    pub target: u32,
}

impl GoalSpec {
    pub const fn new(kind: GoalKind, target: u32) -> Self {
        Self { kind, target }
    }

    pub const fn cube(color: u8, target: u32) -> Self {
        Self::new(GoalKind::Cube(ColorId(color)), target)
    }
}

/// Everything needed to start a session.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(default))]
pub struct LevelConfig {
    pub width: usize,
    pub height: usize,
    pub palette_size: usize,
    pub min_match_size: usize,
    pub rocket_trigger_size: usize,
    pub moves: u32,
    pub goals: Vec<GoalSpec>,
    /// Ducks placed at session start.
    pub ducks: usize,
    /// Balloons placed at session start.
    pub balloons: usize,
    /// Rockets placed at session start.
    pub rockets: usize,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            palette_size: DEFAULT_PALETTE_SIZE,
            min_match_size: DEFAULT_MIN_MATCH_SIZE,
            rocket_trigger_size: DEFAULT_ROCKET_TRIGGER_SIZE,
            moves: DEFAULT_MOVES,
            goals: vec![
                GoalSpec::cube(0, 15),
                GoalSpec::cube(1, 15),
                GoalSpec::new(GoalKind::Duck, 2),
                GoalSpec::new(GoalKind::Balloon, 3),
            ],
            ducks: 2,
            balloons: 3,
            rockets: 0,
        }
    }
}

impl LevelConfig {
    /// Parse a level from JSON. Missing fields take their defaults.
    #[cfg(feature = "std")]
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Check that a session can be started from this configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptyGrid {
                width: self.width,
                height: self.height,
            });
        }
        let cells = self
            .width
            .checked_mul(self.height)
            .filter(|&cells| cells <= MAX_CELLS)
            .ok_or(ConfigError::GridTooLarge {
                width: self.width,
                height: self.height,
                max: MAX_CELLS,
            })?;
        if self.palette_size == 0 || self.palette_size > u8::MAX as usize {
            return Err(ConfigError::InvalidPalette(self.palette_size));
        }
        if self.min_match_size == 0 {
            return Err(ConfigError::ZeroMinMatch);
        }
        if self.rocket_trigger_size == 0 {
            return Err(ConfigError::ZeroRocketTrigger);
        }
        if self.moves == 0 {
            return Err(ConfigError::ZeroMoves);
        }
        if self.goals.is_empty() {
            return Err(ConfigError::NoGoals);
        }
        for (index, goal) in self.goals.iter().enumerate() {
            if goal.target == 0 {
                return Err(ConfigError::ZeroTarget { index });
            }
            let available = match goal.kind {
                GoalKind::Cube(color) => {
                    if color.index() >= self.palette_size {
                        return Err(ConfigError::ColorOutOfPalette {
                            index,
                            color: color.0,
                            palette: self.palette_size,
                        });
                    }
                    continue;
                }
                GoalKind::Duck => self.ducks,
                GoalKind::Balloon => self.balloons,
            };
            let available = u32::try_from(available).unwrap_or(u32::MAX);
            if goal.target > available {
                return Err(ConfigError::UnreachableGoal {
                    index,
                    target: goal.target,
                    available,
                });
            }
        }

        // height >= 1, so this cannot underflow
        let duck_capacity = cells - self.width;
        if self.ducks > duck_capacity {
            return Err(ConfigError::TooManySpecials {
                requested: self.ducks,
                capacity: duck_capacity,
            });
        }
        let specials = self
            .ducks
            .checked_add(self.balloons)
            .and_then(|n| n.checked_add(self.rockets))
            .unwrap_or(usize::MAX);
        if specials > cells {
            return Err(ConfigError::TooManySpecials {
                requested: specials,
                capacity: cells,
            });
        }
        Ok(())
    }
}
