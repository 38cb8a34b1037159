//! Axis-aligned rectangle geometry for the car and traffic hitboxes
//!
//! Screen-space convention: x grows to the right, y grows downward, so
//! `top < bottom` for a well-formed rectangle.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Per-side inward padding applied to a hitbox before overlap tests
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Insets {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Insets {
    /// Same padding on all four sides
    pub const fn uniform(pad: f32) -> Self {
        Self {
            left: pad,
            right: pad,
            top: pad,
            bottom: pad,
        }
    }

    /// Negative padding would grow the box; clamp each side to zero
    pub fn non_negative(self) -> Self {
        Self {
            left: self.left.max(0.0),
            right: self.right.max(0.0),
            top: self.top.max(0.0),
            bottom: self.bottom.max(0.0),
        }
    }
}

/// An axis-aligned rectangle (min = top-left corner, max = bottom-right)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    /// Build from the top-left position and a size
    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self {
            min: pos,
            max: pos + size,
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.min.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.max.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.min.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.max.y
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Shrink each side inward by the given padding
    pub fn inset(&self, pad: Insets) -> Self {
        Self {
            min: Vec2::new(self.min.x + pad.left, self.min.y + pad.top),
            max: Vec2::new(self.max.x - pad.right, self.max.y - pad.bottom),
        }
    }

    /// True when padding has collapsed or flipped the box on either axis
    pub fn is_inverted(&self) -> bool {
        self.min.x >= self.max.x || self.min.y >= self.max.y
    }

    /// Closed-interval overlap: touching edges count as overlapping
    pub fn overlaps(&self, other: &Rect) -> bool {
        !(self.bottom() < other.top()
            || self.top() > other.bottom()
            || self.right() < other.left()
            || self.left() > other.right())
    }

    /// Horizontal center, used by the autopilot
    pub fn center_x(&self) -> f32 {
        (self.min.x + self.max.x) * 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inset_shrinks_each_side() {
        let r = Rect::from_pos_size(Vec2::new(10.0, 20.0), Vec2::new(40.0, 80.0));
        let padded = r.inset(Insets {
            left: 1.0,
            right: 2.0,
            top: 3.0,
            bottom: 4.0,
        });
        assert_eq!(padded.left(), 11.0);
        assert_eq!(padded.right(), 48.0);
        assert_eq!(padded.top(), 23.0);
        assert_eq!(padded.bottom(), 96.0);
    }

    #[test]
    fn test_inverted_detection() {
        let r = Rect::from_pos_size(Vec2::ZERO, Vec2::new(40.0, 80.0));
        assert!(!r.inset(Insets::uniform(19.0)).is_inverted());
        // 20 + 20 eats the full 40px width
        assert!(r.inset(Insets::uniform(20.0)).is_inverted());
    }

    #[test]
    fn test_touching_edges_overlap() {
        let a = Rect::from_pos_size(Vec2::ZERO, Vec2::splat(10.0));
        let b = Rect::from_pos_size(Vec2::new(10.0, 0.0), Vec2::splat(10.0));
        assert!(a.overlaps(&b));
        let c = Rect::from_pos_size(Vec2::new(10.5, 0.0), Vec2::splat(10.0));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_negative_insets_clamped() {
        let pad = Insets {
            left: -3.0,
            right: 2.0,
            top: -0.5,
            bottom: 0.0,
        }
        .non_negative();
        assert_eq!(pad, Insets { left: 0.0, right: 2.0, top: 0.0, bottom: 0.0 });
    }
}
