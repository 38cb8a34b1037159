//! Data-driven game balance
//!
//! Every constant the simulation uses lives here so level tables and feel
//! variants can be swapped without touching code. Loaded from JSON; any
//! field left out keeps its default.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::BASE_ROAD_SPEED;
use crate::sim::level::{CampaignEnd, LevelConfig, MilestoneRule, Milestones};
use crate::sim::player::{ControlScheme, LaneSnap, Steering, XBounds};
use crate::sim::rect::Insets;
use crate::sim::traffic::{SpawnMode, TrafficConfig};

/// Built-in tuning variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Preset {
    /// Free steering, six traffic lanes, endless with speed-ups every 10 cars
    #[default]
    Classic,
    /// Three-lane snapping with a spawn cooldown
    LaneSnap,
    /// Fixed table of target-score and timed levels
    Campaign,
}

impl Preset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::Classic => "Classic",
            Preset::LaneSnap => "LaneSnap",
            Preset::Campaign => "Campaign",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" => Some(Preset::Classic),
            "lanesnap" | "lane_snap" | "lanes" => Some(Preset::LaneSnap),
            "campaign" => Some(Preset::Campaign),
            _ => None,
        }
    }
}

/// All simulation constants
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Playfield ===
    pub width: f32,
    pub height: f32,
    /// Gap kept between the car and the road edges
    pub road_padding: f32,
    pub car_size: Vec2,
    /// Gap between the car's bottom edge and the playfield bottom
    pub car_bottom_gap: f32,
    /// Inward padding applied to both hitboxes before overlap tests
    pub hitbox_padding: Insets,

    // === Player ===
    pub control: ControlScheme,
    pub steering: Steering,
    pub lane_snap: LaneSnap,

    // === Traffic ===
    pub traffic: TrafficConfig,

    // === Progress ===
    /// Ticks after a level starts during which collisions are ignored (0 = off)
    pub grace_ticks: u32,
    /// Ticks a transient banner ("TIER 3") stays up
    pub banner_ticks: u32,
    pub milestones: Milestones,
    pub levels: Vec<LevelConfig>,
    pub campaign_end: CampaignEnd,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            width: 260.0,
            height: 520.0,
            road_padding: 10.0,
            car_size: Vec2::new(44.0, 80.0),
            car_bottom_gap: 20.0,
            hitbox_padding: Insets::uniform(12.0),

            control: ControlScheme::Continuous,
            steering: Steering::default(),
            lane_snap: LaneSnap::default(),

            traffic: TrafficConfig::default(),

            grace_ticks: 30,
            banner_ticks: 90,
            milestones: Milestones::default(),
            levels: vec![LevelConfig::endless(BASE_ROAD_SPEED)],
            campaign_end: CampaignEnd::Menu,
        }
    }
}

impl Tuning {
    /// Create tuning from a preset
    pub fn from_preset(preset: Preset) -> Self {
        let mut tuning = Self::default();
        match preset {
            Preset::Classic => {}
            Preset::LaneSnap => {
                tuning.control = ControlScheme::LaneSnap;
                tuning.lane_snap = LaneSnap {
                    lanes: vec![25.0, 108.0, 191.0],
                    ease: 0.18,
                    start_lane: 1,
                };
                tuning.traffic.spawn_mode = SpawnMode::Lanes {
                    lanes: vec![28.0, 111.0, 194.0],
                };
                tuning.traffic.density = 0.02;
                tuning.traffic.spawn_cooldown_ticks = 20;
                tuning.hitbox_padding = Insets::uniform(8.0);
            }
            Preset::Campaign => {
                tuning.milestones.rule = MilestoneRule::Off;
                tuning.levels = vec![
                    LevelConfig::target(10, 5.0),
                    LevelConfig::timed(30.0, 5.5),
                    LevelConfig::target(25, 6.5),
                    LevelConfig::endless(7.0),
                ];
            }
        }
        tuning
    }

    /// Parse JSON and sanitize
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut tuning: Tuning = serde_json::from_str(json)?;
        tuning.sanitize();
        Ok(tuning)
    }

    /// Parse JSON, falling back to defaults on malformed input
    pub fn from_json_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(tuning) => {
                log::info!("Loaded tuning ({} levels)", tuning.levels.len());
                tuning
            }
            Err(e) => {
                log::warn!("Invalid tuning JSON ({}), using defaults", e);
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Clamp or default every value the simulation can't work with
    pub fn sanitize(&mut self) {
        let defaults = Tuning::default();

        if !(self.width.is_finite() && self.width > 0.0) {
            log::warn!("width {} invalid, using {}", self.width, defaults.width);
            self.width = defaults.width;
        }
        if !(self.height.is_finite() && self.height > 0.0) {
            log::warn!("height {} invalid, using {}", self.height, defaults.height);
            self.height = defaults.height;
        }

        let pad = self.hitbox_padding.non_negative();
        if pad != self.hitbox_padding {
            log::warn!("Negative hitbox padding clamped to zero");
            self.hitbox_padding = pad;
        }

        if !(0.0..=1.0).contains(&self.steering.friction) {
            let clamped = if self.steering.friction.is_nan() {
                defaults.steering.friction
            } else {
                self.steering.friction.clamp(0.0, 1.0)
            };
            log::warn!("friction {} outside 0..=1, using {}", self.steering.friction, clamped);
            self.steering.friction = clamped;
        }
        if self.steering.max_speed < 0.0 {
            self.steering.max_speed = self.steering.max_speed.abs();
        }

        if !(self.lane_snap.ease > 0.0 && self.lane_snap.ease <= 1.0) {
            log::warn!("lane ease {} outside (0, 1], using {}", self.lane_snap.ease, defaults.lane_snap.ease);
            self.lane_snap.ease = defaults.lane_snap.ease;
        }
        if !self.lane_snap.lanes.is_empty() && self.lane_snap.start_lane >= self.lane_snap.lanes.len() {
            self.lane_snap.start_lane = self.lane_snap.lanes.len() - 1;
        }

        if !(0.0..=1.0).contains(&self.traffic.density) {
            let clamped = if self.traffic.density.is_nan() {
                0.0
            } else {
                self.traffic.density.clamp(0.0, 1.0)
            };
            log::warn!("traffic density {} outside 0..=1, using {}", self.traffic.density, clamped);
            self.traffic.density = clamped;
        }
        let no_lanes = matches!(&self.traffic.spawn_mode, SpawnMode::Lanes { lanes } if lanes.is_empty());
        if no_lanes {
            log::warn!("No traffic lanes configured, spawning free-form");
            self.traffic.spawn_mode = SpawnMode::FreeForm;
        }

        if self.levels.is_empty() {
            log::warn!("Empty level table, adding one endless level");
            self.levels.push(LevelConfig::endless(BASE_ROAD_SPEED));
        }
        for (i, level) in self.levels.iter_mut().enumerate() {
            match level.conditions_set() {
                0 => log::warn!("Level {} has no win condition, playing as endless", i + 1),
                1 => {}
                _ => log::warn!(
                    "Level {} sets several win conditions, using {:?}",
                    i + 1,
                    level.win_condition()
                ),
            }
            if !(level.speed.is_finite() && level.speed >= 0.0) {
                log::warn!("Level {} speed {} invalid, using {}", i + 1, level.speed, BASE_ROAD_SPEED);
                level.speed = BASE_ROAD_SPEED;
            }
        }
    }

    /// Horizontal range for the car's left edge
    pub fn player_bounds(&self) -> XBounds {
        XBounds::new(
            self.road_padding,
            self.width - self.car_size.x - self.road_padding,
        )
    }

    /// Horizontal road range available to free-form traffic
    pub fn road(&self) -> (f32, f32) {
        (self.road_padding, self.width - self.road_padding)
    }

    /// Top-edge y past which traffic is retired
    pub fn retire_y(&self) -> f32 {
        self.height + self.traffic.retire_margin
    }

    /// Level config by index (clamped into the table)
    pub fn level(&self, index: usize) -> LevelConfig {
        match self.levels.len() {
            0 => LevelConfig::endless(BASE_ROAD_SPEED),
            n => self.levels[index.min(n - 1)].clone(),
        }
    }

    pub fn level_count(&self) -> usize {
        self.levels.len().max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::level::WinCondition;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "grace_ticks": 0, "steering": { "friction": 0.85 } }"#)
            .expect("valid json");
        assert_eq!(tuning.grace_ticks, 0);
        assert_eq!(tuning.steering.friction, 0.85);
        assert_eq!(tuning.steering.acceleration, 0.6);
        assert_eq!(tuning.width, 260.0);
        assert_eq!(tuning.levels.len(), 1);
    }

    #[test]
    fn test_level_table_from_json() {
        let json = r#"{
            "levels": [
                { "target_score": 5, "speed": 5.0 },
                { "time_limit_secs": 30.0, "speed": 5.5 },
                { "endless": true, "speed": 6.0 },
                { "speed": 6.5 }
            ],
            "traffic": { "spawn_mode": { "mode": "free_form" }, "safe_distance": null }
        }"#;
        let tuning = Tuning::from_json(json).expect("valid json");
        let conditions: Vec<_> = tuning.levels.iter().map(|l| l.win_condition()).collect();
        assert_eq!(
            conditions,
            vec![
                WinCondition::TargetScore(5),
                WinCondition::TimeLimit(30.0),
                WinCondition::Endless,
                WinCondition::Endless,
            ]
        );
        assert!(matches!(tuning.traffic.spawn_mode, SpawnMode::FreeForm));
        assert!(tuning.traffic.safe_distance.is_none());
    }

    #[test]
    fn test_malformed_json_falls_back() {
        assert!(Tuning::from_json("{ not json").is_err());
        let tuning = Tuning::from_json_or_default("{ not json");
        assert_eq!(tuning.grace_ticks, Tuning::default().grace_ticks);
    }

    #[test]
    fn test_sanitize_clamps_bad_values() {
        let mut tuning = Tuning::default();
        tuning.traffic.density = 4.0;
        tuning.steering.friction = 1.5;
        tuning.hitbox_padding = Insets::uniform(-3.0);
        tuning.lane_snap.ease = 0.0;
        tuning.lane_snap.start_lane = 9;
        tuning.levels.clear();
        tuning.traffic.spawn_mode = SpawnMode::Lanes { lanes: Vec::new() };
        tuning.sanitize();

        assert_eq!(tuning.traffic.density, 1.0);
        assert_eq!(tuning.steering.friction, 1.0);
        assert_eq!(tuning.hitbox_padding, Insets::uniform(0.0));
        assert_eq!(tuning.lane_snap.ease, LaneSnap::default().ease);
        assert_eq!(tuning.lane_snap.start_lane, 2);
        assert_eq!(tuning.levels.len(), 1);
        assert!(matches!(tuning.traffic.spawn_mode, SpawnMode::FreeForm));
    }

    #[test]
    fn test_presets() {
        assert_eq!(Preset::from_str("LANE_SNAP"), Some(Preset::LaneSnap));
        assert_eq!(Preset::from_str("bogus"), None);
        assert_eq!(Preset::Campaign.as_str(), "Campaign");

        let lanes = Tuning::from_preset(Preset::LaneSnap);
        assert_eq!(lanes.control, ControlScheme::LaneSnap);
        assert_eq!(lanes.traffic.spawn_cooldown_ticks, 20);

        let campaign = Tuning::from_preset(Preset::Campaign);
        assert_eq!(campaign.level_count(), 4);
        assert_eq!(campaign.level(99).win_condition(), WinCondition::Endless);
    }

    #[test]
    fn test_round_trip_through_json() {
        let tuning = Tuning::from_preset(Preset::Campaign);
        let json = tuning.to_json().expect("serializable");
        let back = Tuning::from_json(&json).expect("valid json");
        assert_eq!(back.levels, tuning.levels);
    }

    #[test]
    fn test_player_bounds() {
        let tuning = Tuning::default();
        let b = tuning.player_bounds();
        assert_eq!(b.min, 10.0);
        assert_eq!(b.max, 206.0);
        assert_eq!(tuning.retire_y(), 680.0);
    }
}
