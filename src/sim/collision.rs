//! Collision detection between the player car and traffic
//!
//! Both hitboxes are shrunk by the same padding before the overlap test so
//! that sprites whose transparent corners touch don't end the run.

use super::rect::{Insets, Rect};

/// Padded overlap test between two hitboxes
///
/// Each rectangle is inset by `pad` first. If padding collapses either box
/// (`left + pad >= right - pad`, or the vertical equivalent) the pair is
/// treated as non-colliding.
pub fn padded_overlap(a: &Rect, b: &Rect, pad: Insets) -> bool {
    let a = a.inset(pad);
    let b = b.inset(pad);
    if a.is_inverted() || b.is_inverted() {
        return false;
    }
    a.overlaps(&b)
}

/// Result of checking the player against every live traffic entity
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollisionResult {
    /// Ids of entities overlapping the player, in pool order
    pub hits: Vec<u32>,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self { hits: Vec::new() }
    }

    pub fn hit(&self) -> bool {
        !self.hits.is_empty()
    }
}

/// Check a player hitbox against a sequence of `(id, rect)` pairs
pub fn player_vs_traffic<I>(player: &Rect, traffic: I, pad: Insets) -> CollisionResult
where
    I: IntoIterator<Item = (u32, Rect)>,
{
    let hits = traffic
        .into_iter()
        .filter(|(_, rect)| padded_overlap(player, rect, pad))
        .map(|(id, _)| id)
        .collect();
    CollisionResult { hits }
}
