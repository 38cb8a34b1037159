//! Renderer capability boundary
//!
//! The simulation never touches presentation objects. It reports entity
//! lifetimes and movement through this trait, keyed by the entity id.

use super::rect::Rect;

/// Implemented by whatever draws the game
///
/// Calls are fire-and-forget: implementations swallow their own failures.
pub trait VisualSink {
    /// A traffic entity appeared
    fn spawn(&mut self, id: u32, rect: Rect);
    /// A traffic entity moved
    fn moved(&mut self, id: u32, rect: Rect);
    /// A traffic entity is gone (retired, destroyed, or session reset)
    fn despawn(&mut self, id: u32);
    /// The player car moved
    fn player_moved(&mut self, _rect: Rect) {}
}

/// Sink that draws nothing (headless runs and tests)
#[derive(Debug, Default, Clone, Copy)]
pub struct NullVisuals;

impl VisualSink for NullVisuals {
    fn spawn(&mut self, _id: u32, _rect: Rect) {}
    fn moved(&mut self, _id: u32, _rect: Rect) {}
    fn despawn(&mut self, _id: u32) {}
}

/// Sink that tracks which handles are alive (headless demo bookkeeping)
#[derive(Debug, Default, Clone)]
pub struct HandleLedger {
    pub live: Vec<u32>,
    pub spawned: u64,
    pub despawned: u64,
}

impl VisualSink for HandleLedger {
    fn spawn(&mut self, id: u32, _rect: Rect) {
        self.live.push(id);
        self.spawned += 1;
    }

    fn moved(&mut self, _id: u32, _rect: Rect) {}

    fn despawn(&mut self, id: u32) {
        if let Some(idx) = self.live.iter().position(|&h| h == id) {
            self.live.remove(idx);
            self.despawned += 1;
        }
    }
}
