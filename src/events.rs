//! Collaborator seams. The engine notifies effects, audio and presentation
//! through these traits and never reads anything back from them.

use alloc::vec::Vec;

use crate::cascade::{SpawnedTile, TileMove};
use crate::tile::{ColorId, Position, TileVariant};

/// A tile taken off the board during a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct RemovedTile {
    pub position: Position,
    pub tile: TileVariant,
}

/// Sound cues emitted by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum AudioKind {
    /// Cubes blown up by a match or a rocket.
    Explosion,
    /// A goal advanced.
    Collect,
    /// A duck reached the bottom row.
    Duck,
    /// A balloon popped.
    Balloon,
}

/// Particle and explosion effects.
pub trait EffectsSink {
    /// `colors` is parallel to `positions`: `Some` for cubes, `None` otherwise.
    fn on_tiles_removed(&mut self, positions: &[Position], colors: &[Option<ColorId>]);
}

/// Sound playback.
pub trait AudioSink {
    fn on_event(&mut self, kind: AudioKind);
}

/// Animation of a resolved turn. Called once per turn after the board has
/// reached its final state.
pub trait PresentationSink {
    fn on_turn_resolved(
        &mut self,
        moved: &[TileMove],
        spawned: &[SpawnedTile],
        removed: &[RemovedTile],
    );
}

/// Sink that discards every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EffectsSink for NullSink {
    fn on_tiles_removed(&mut self, _positions: &[Position], _colors: &[Option<ColorId>]) {}
}

impl AudioSink for NullSink {
    fn on_event(&mut self, _kind: AudioKind) {}
}

impl PresentationSink for NullSink {
    fn on_turn_resolved(
        &mut self,
        _moved: &[TileMove],
        _spawned: &[SpawnedTile],
        _removed: &[RemovedTile],
    ) {
    }
}

/// Owned form of every collaborator notification, for hosts that queue them.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum EngineEvent {
    TilesRemoved {
        positions: Vec<Position>,
        colors: Vec<Option<ColorId>>,
    },
    Audio(AudioKind),
    TurnResolved {
        moved: Vec<TileMove>,
        spawned: Vec<SpawnedTile>,
        removed: Vec<RemovedTile>,
    },
}

impl EngineEvent {
    pub fn tiles_removed(positions: &[Position], colors: &[Option<ColorId>]) -> Self {
        EngineEvent::TilesRemoved {
            positions: positions.to_vec(),
            colors: colors.to_vec(),
        }
    }

    pub fn turn_resolved(
        moved: &[TileMove],
        spawned: &[SpawnedTile],
        removed: &[RemovedTile],
    ) -> Self {
        EngineEvent::TurnResolved {
            moved: moved.to_vec(),
            spawned: spawned.to_vec(),
            removed: removed.to_vec(),
        }
    }
}

/// Sink that records every notification in order. Handy for tests and
/// replay tooling.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: alloc::rc::Rc<core::cell::RefCell<Vec<EngineEvent>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain everything recorded so far.
    pub fn take(&self) -> Vec<EngineEvent> {
        core::mem::take(&mut *self.events.borrow_mut())
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    fn push(&self, event: EngineEvent) {
        self.events.borrow_mut().push(event);
    }
}

impl EffectsSink for EventLog {
    fn on_tiles_removed(&mut self, positions: &[Position], colors: &[Option<ColorId>]) {
        self.push(EngineEvent::tiles_removed(positions, colors));
    }
}

impl AudioSink for EventLog {
    fn on_event(&mut self, kind: AudioKind) {
        self.push(EngineEvent::Audio(kind));
    }
}

impl PresentationSink for EventLog {
    fn on_turn_resolved(
        &mut self,
        moved: &[TileMove],
        spawned: &[SpawnedTile],
        removed: &[RemovedTile],
    ) {
        self.push(EngineEvent::turn_resolved(moved, spawned, removed));
    }
}
