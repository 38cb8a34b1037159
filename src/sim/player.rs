//! Player car controller
//!
//! Two control schemes are supported:
//! - `Continuous`: held steer input drives an accelerate/friction/clamp integrator
//! - `LaneSnap`: discrete lane changes with exponential easing toward the lane

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;

/// Which control policy drives the car
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ControlScheme {
    #[default]
    Continuous,
    LaneSnap,
}

/// Constants for the continuous steering integrator (per tick)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Steering {
    pub acceleration: f32,
    /// Velocity multiplier applied every tick (0..=1)
    pub friction: f32,
    pub max_speed: f32,
}

impl Default for Steering {
    fn default() -> Self {
        Self {
            acceleration: 0.6,
            friction: 0.9,
            max_speed: 6.0,
        }
    }
}

/// Constants for lane-snap steering
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LaneSnap {
    /// Left edge x of the car for each lane
    pub lanes: Vec<f32>,
    /// Fraction of the remaining distance covered each tick
    pub ease: f32,
    pub start_lane: usize,
}

impl Default for LaneSnap {
    fn default() -> Self {
        Self {
            lanes: vec![25.0, 108.0, 191.0],
            ease: 0.16,
            start_lane: 1,
        }
    }
}

/// Horizontal range the car's left edge may occupy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct XBounds {
    pub min: f32,
    pub max: f32,
}

impl XBounds {
    /// A road narrower than the car collapses to a single valid x
    pub fn new(min: f32, max: f32) -> Self {
        Self {
            min,
            max: max.max(min),
        }
    }

    #[inline]
    pub fn clamp(&self, x: f32) -> f32 {
        if x.is_nan() {
            return self.min;
        }
        x.clamp(self.min, self.max)
    }
}

/// One tick of the continuous integrator; returns `(x, velocity)`
pub fn continuous_step(x: f32, velocity: f32, steer: i8, cfg: &Steering, bounds: XBounds) -> (f32, f32) {
    let steer = steer.signum() as f32;
    let max = cfg.max_speed.abs();
    let mut v = velocity + steer * cfg.acceleration;
    v *= cfg.friction;
    v = v.clamp(-max, max);
    (bounds.clamp(x + v), v)
}

/// One tick of lane easing; returns the new x
pub fn ease_step(x: f32, target_x: f32, ease: f32, bounds: XBounds) -> f32 {
    bounds.clamp(x + (target_x - x) * ease)
}

/// Move a lane index by `dir` (sign only), clamped to the lane table
pub fn shift_lane(lane: usize, dir: i8, lane_count: usize) -> usize {
    if lane_count == 0 {
        return 0;
    }
    let last = lane_count - 1;
    match dir.signum() {
        -1 => lane.min(last).saturating_sub(1),
        1 => (lane + 1).min(last),
        _ => lane.min(last),
    }
}

/// The player's car
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerState {
    /// Left edge x
    pub x: f32,
    /// Top edge y (fixed near the bottom of the playfield)
    pub y: f32,
    pub velocity: f32,
    pub lane: usize,
    pub target_x: f32,
    pub size: Vec2,
}

impl PlayerState {
    /// Car centered horizontally, `bottom_gap` above the bottom edge
    pub fn centered(width: f32, height: f32, size: Vec2, bottom_gap: f32) -> Self {
        let x = width / 2.0 - size.x / 2.0;
        Self {
            x,
            y: height - size.y - bottom_gap,
            velocity: 0.0,
            lane: 0,
            target_x: x,
            size,
        }
    }

    /// Snap onto a lane immediately (used when a level starts in lane mode)
    pub fn place_in_lane(&mut self, lane: usize, cfg: &LaneSnap, bounds: XBounds) {
        if cfg.lanes.is_empty() {
            return;
        }
        self.lane = lane.min(cfg.lanes.len() - 1);
        self.target_x = bounds.clamp(cfg.lanes[self.lane]);
        self.x = self.target_x;
        self.velocity = 0.0;
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(Vec2::new(self.x, self.y), self.size)
    }

    /// Apply one tick of continuous steering
    pub fn steer(&mut self, steer: i8, cfg: &Steering, bounds: XBounds) {
        let (x, v) = continuous_step(self.x, self.velocity, steer, cfg, bounds);
        self.x = x;
        self.velocity = v;
        self.target_x = x;
    }

    /// Apply one tick of lane-snap steering, with an optional lane change
    pub fn lane_snap(&mut self, lane_request: i8, cfg: &LaneSnap, bounds: XBounds) {
        if !cfg.lanes.is_empty() {
            self.lane = shift_lane(self.lane, lane_request, cfg.lanes.len());
            self.target_x = bounds.clamp(cfg.lanes[self.lane]);
        }
        let prev = self.x;
        self.x = ease_step(self.x, self.target_x, cfg.ease, bounds);
        self.velocity = self.x - prev;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn bounds() -> XBounds {
        XBounds::new(10.0, 206.0)
    }

    #[test]
    fn test_steer_accelerates_and_caps() {
        let cfg = Steering::default();
        let mut v = 0.0;
        let mut x = 100.0;
        for _ in 0..200 {
            let (nx, nv) = continuous_step(x, v, 1, &cfg, XBounds::new(-1e6, 1e6));
            x = nx;
            v = nv;
            assert!(v.abs() <= cfg.max_speed + 1e-6);
        }
        // Terminal velocity of (v + a) * f is a*f/(1-f) = 5.4, below the cap
        assert!((v - 5.4).abs() < 0.01);
    }

    #[test]
    fn test_velocity_decays_geometrically_after_release() {
        let cfg = Steering::default();
        let wide = XBounds::new(-1e6, 1e6);
        let (mut x, mut v) = (100.0, 0.0);
        for _ in 0..12 {
            (x, v) = continuous_step(x, v, 1, &cfg, wide);
        }
        assert!(v > 0.0 && v <= cfg.max_speed);

        // Position is irrelevant inside unbounded limits; only velocity is tracked
        for _ in 0..30 {
            let before = v;
            (_, v) = continuous_step(x, v, 0, &cfg, wide);
            assert!((v - before * cfg.friction).abs() < 1e-5);
            assert!(v.abs() <= cfg.max_speed);
        }
        assert!(v < 0.3);
    }

    #[test]
    fn test_position_clamped_at_road_edge() {
        let cfg = Steering::default();
        let mut p = PlayerState::centered(260.0, 520.0, Vec2::new(44.0, 80.0), 20.0);
        for _ in 0..500 {
            p.steer(-1, &cfg, bounds());
        }
        assert_eq!(p.x, 10.0);
        for _ in 0..500 {
            p.steer(1, &cfg, bounds());
        }
        assert_eq!(p.x, 206.0);
    }

    #[test]
    fn test_shift_lane_clamps() {
        assert_eq!(shift_lane(0, -1, 3), 0);
        assert_eq!(shift_lane(0, 1, 3), 1);
        assert_eq!(shift_lane(2, 1, 3), 2);
        assert_eq!(shift_lane(9, 0, 3), 2);
        assert_eq!(shift_lane(9, -1, 3), 1);
        assert_eq!(shift_lane(4, 1, 0), 0);
    }

    #[test]
    fn test_lane_snap_eases_toward_target() {
        let cfg = LaneSnap::default();
        let mut p = PlayerState::centered(260.0, 520.0, Vec2::new(44.0, 80.0), 20.0);
        p.place_in_lane(1, &cfg, bounds());
        assert_eq!(p.x, 108.0);

        p.lane_snap(1, &cfg, bounds());
        assert_eq!(p.lane, 2);
        assert_eq!(p.target_x, 191.0);
        let first_gap = 191.0 - p.x;
        assert!((first_gap - 83.0 * (1.0 - cfg.ease)).abs() < 1e-3);

        for _ in 0..60 {
            p.lane_snap(0, &cfg, bounds());
        }
        assert!((p.x - 191.0).abs() < 0.1);
        assert_eq!(p.lane, 2);
    }

    #[test]
    fn test_empty_lane_table_is_noop() {
        let cfg = LaneSnap {
            lanes: Vec::new(),
            ..Default::default()
        };
        let mut p = PlayerState::centered(260.0, 520.0, Vec2::new(44.0, 80.0), 20.0);
        let x = p.x;
        p.place_in_lane(3, &cfg, bounds());
        p.lane_snap(1, &cfg, bounds());
        assert_eq!(p.x, x);
        assert_eq!(p.lane, 0);
    }

    #[test]
    fn test_narrow_road_bounds_do_not_panic() {
        let b = XBounds::new(50.0, 10.0);
        assert_eq!(b.clamp(0.0), 50.0);
        assert_eq!(b.clamp(100.0), 50.0);
    }

    proptest! {
        #[test]
        fn prop_continuous_position_always_clamped(
            x in -1000.0f32..1000.0,
            v in -100.0f32..100.0,
            steer in -1i8..=1,
        ) {
            let b = bounds();
            let (nx, nv) = continuous_step(x, v, steer, &Steering::default(), b);
            prop_assert!(nx >= b.min && nx <= b.max);
            prop_assert!(nv.abs() <= Steering::default().max_speed);
        }

        #[test]
        fn prop_ease_position_always_clamped(
            x in -1000.0f32..1000.0,
            target in -1000.0f32..1000.0,
            ease in 0.01f32..1.0,
        ) {
            let b = bounds();
            let nx = ease_step(x, target, ease, b);
            prop_assert!(nx >= b.min && nx <= b.max);
        }
    }
}
