#![cfg(feature = "std")]

//! Host-side boundary for asynchronous presentation.
//!
//! The engine resolves every turn synchronously and pushes notifications into
//! a [`ChannelSink`]. A separate task drains the channel and hands each event
//! to a [`Presenter`], which may take as long as it likes: the engine never
//! waits on it.

use std::time::Duration;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::{
    cascade::{SpawnedTile, TileMove},
    events::{AudioKind, AudioSink, EffectsSink, EngineEvent, PresentationSink, RemovedTile},
    tile::{ColorId, Position},
};

/// Forwards every engine notification into an unbounded tokio channel.
/// Cloning shares the same channel, so one sink can serve all three seams.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: UnboundedSender<EngineEvent>,
}

/// Create a sink and the receiving half a presenter task will drain.
pub fn channel() -> (ChannelSink, UnboundedReceiver<EngineEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ChannelSink { tx }, rx)
}

impl ChannelSink {
    fn send(&self, event: EngineEvent) {
        // A closed channel means the host stopped presenting; the game goes on.
        if self.tx.send(event).is_err() {
            log::warn!("presentation channel closed, dropping event");
        }
    }
}

impl EffectsSink for ChannelSink {
    fn on_tiles_removed(&mut self, positions: &[Position], colors: &[Option<ColorId>]) {
        self.send(EngineEvent::tiles_removed(positions, colors));
    }
}

impl AudioSink for ChannelSink {
    fn on_event(&mut self, kind: AudioKind) {
        self.send(EngineEvent::Audio(kind));
    }
}

impl PresentationSink for ChannelSink {
    fn on_turn_resolved(
        &mut self,
        moved: &[TileMove],
        spawned: &[SpawnedTile],
        removed: &[RemovedTile],
    ) {
        self.send(EngineEvent::turn_resolved(moved, spawned, removed));
    }
}

/// Consumer of engine events on the host side.
#[async_trait::async_trait]
pub trait Presenter: Send {
    async fn present(&mut self, event: EngineEvent) -> anyhow::Result<()>;
}

/// Drain `rx` into `presenter` until every sender is dropped.
/// Returns the number of events presented.
pub async fn run_presenter<P: Presenter + ?Sized>(
    mut rx: UnboundedReceiver<EngineEvent>,
    presenter: &mut P,
) -> anyhow::Result<usize> {
    let mut presented = 0;
    while let Some(event) = rx.recv().await {
        presenter.present(event).await?;
        presented += 1;
    }
    log::debug!("presentation channel drained after {} events", presented);
    Ok(presented)
}

/// Presenter that logs each event and pauses after every resolved turn to
/// stand in for animation time.
#[derive(Debug, Clone, Default)]
pub struct LogPresenter {
    frame_delay: Duration,
}

impl LogPresenter {
    pub fn new(frame_delay: Duration) -> Self {
        Self { frame_delay }
    }
}

#[async_trait::async_trait]
impl Presenter for LogPresenter {
    async fn present(&mut self, event: EngineEvent) -> anyhow::Result<()> {
        match &event {
            EngineEvent::TilesRemoved { positions, .. } => {
                log::info!("effects: {} tiles burst", positions.len());
            }
            EngineEvent::Audio(kind) => log::info!("audio: {:?}", kind),
            EngineEvent::TurnResolved {
                moved,
                spawned,
                removed,
            } => {
                log::info!(
                    "animate: {} removed, {} falling, {} spawned",
                    removed.len(),
                    moved.len(),
                    spawned.len()
                );
                if !self.frame_delay.is_zero() {
                    tokio::time::sleep(self.frame_delay).await;
                }
            }
        }
        Ok(())
    }
}
