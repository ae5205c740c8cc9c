#![cfg_attr(not(feature = "std"), no_std)]

//! Rules engine for a tile-blast puzzle: click a group of same-colored
//! cubes, watch the columns settle and refill, and meet every level goal
//! before the moves run out.
//!
//! The core is `no_std` + `alloc`. The `std` feature adds logging setup,
//! serde derives and the tokio host boundary in [`host`].

extern crate alloc;

mod board;
mod cascade;
mod common;
mod config;
pub mod events;
mod game;
mod goals;
#[cfg(feature = "std")]
pub mod host;
#[cfg(feature = "std")]
mod logging;
pub mod matching;
mod player;
mod snapshot;
pub mod special;
mod tile;

pub use board::Board;
pub use cascade::{refill, settle, SpawnedTile, TileMove};
pub use common::{BoardError, ConfigError};
pub use config::*;
pub use events::{
    AudioKind, AudioSink, EffectsSink, EngineEvent, EventLog, NullSink, PresentationSink,
    RemovedTile,
};
pub use game::*;
pub use goals::{Goal, GoalTracker};
#[cfg(feature = "std")]
pub use logging::init_logging;
pub use matching::{find_groups, find_match, Group};
pub use player::*;
pub use snapshot::{BoardView, GoalView};
pub use tile::*;
