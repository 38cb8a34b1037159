//! Oncoming traffic: spawn, advance, retire
//!
//! Entities live in a plain `Vec` kept in insertion order (ids are
//! monotonically increasing), so iteration order is stable every tick.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::{CollisionResult, player_vs_traffic};
use super::rect::{Insets, Rect};

/// Where new traffic may appear horizontally
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SpawnMode {
    /// Fixed lane slots (left edge x of each lane)
    Lanes { lanes: Vec<f32> },
    /// Uniform random x across the road
    FreeForm,
}

impl Default for SpawnMode {
    fn default() -> Self {
        SpawnMode::Lanes {
            lanes: vec![9.0, 50.0, 91.0, 132.0, 173.0, 214.0],
        }
    }
}

/// Traffic spawning and movement tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrafficConfig {
    pub spawn_mode: SpawnMode,
    /// Probability of a spawn attempt per tick (0..=1)
    pub density: f64,
    /// Minimum vertical gap to a same-lane entity at spawn (lane mode only).
    /// `None` disables the guard.
    pub safe_distance: Option<f32>,
    /// Ticks to wait after a successful spawn before the next (0 = none)
    pub spawn_cooldown_ticks: u32,
    /// Top edge y where new traffic appears
    pub spawn_y: f32,
    /// Added to the road speed when an entity spawns
    pub speed_offset: f32,
    /// Distance past the bottom edge before an entity is retired
    pub retire_margin: f32,
    pub size: Vec2,
}

impl Default for TrafficConfig {
    fn default() -> Self {
        Self {
            spawn_mode: SpawnMode::default(),
            density: 0.035,
            safe_distance: Some(140.0),
            spawn_cooldown_ticks: 0,
            spawn_y: -140.0,
            speed_offset: 2.0,
            retire_margin: 160.0,
            size: Vec2::new(38.0, 76.0),
        }
    }
}

/// A single traffic car
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficEntity {
    /// Opaque handle shared with the renderer
    pub id: u32,
    /// Lane slot (None for free-form spawns)
    pub lane: Option<usize>,
    pub x: f32,
    /// Top edge y, increasing toward the player
    pub y: f32,
    /// Pixels per tick
    pub speed: f32,
}

impl TrafficEntity {
    pub fn rect(&self, size: Vec2) -> Rect {
        Rect::from_pos_size(Vec2::new(self.x, self.y), size)
    }
}

/// The live traffic pool
#[derive(Debug, Clone, Default)]
pub struct TrafficPool {
    entities: Vec<TrafficEntity>,
    next_id: u32,
    cooldown: u32,
}

impl TrafficPool {
    pub fn new() -> Self {
        Self {
            entities: Vec::new(),
            next_id: 1,
            cooldown: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrafficEntity> {
        self.entities.iter()
    }

    pub fn get(&self, id: u32) -> Option<&TrafficEntity> {
        self.entities.iter().find(|e| e.id == id)
    }

    /// True if no same-lane entity sits within `safe_distance` of `y`
    pub fn lane_free(&self, lane: usize, y: f32, safe_distance: f32) -> bool {
        !self
            .entities
            .iter()
            .any(|e| e.lane == Some(lane) && (e.y - y).abs() < safe_distance)
    }

    /// Insert an entity directly, bypassing the spawn roll
    pub fn insert(&mut self, lane: Option<usize>, x: f32, y: f32, speed: f32) -> u32 {
        let id = self.next_id.max(1);
        self.next_id = id + 1;
        self.entities.push(TrafficEntity {
            id,
            lane,
            x,
            y,
            speed,
        });
        id
    }

    /// Roll for a spawn this tick
    ///
    /// `road` is the horizontal range (left, right) available to free-form
    /// spawns. Returns the new entity if one was created.
    pub fn try_spawn<R: Rng>(
        &mut self,
        rng: &mut R,
        cfg: &TrafficConfig,
        road_speed: f32,
        road: (f32, f32),
    ) -> Option<&TrafficEntity> {
        if self.cooldown > 0 {
            self.cooldown -= 1;
            return None;
        }

        let density = if cfg.density.is_nan() {
            0.0
        } else {
            cfg.density.clamp(0.0, 1.0)
        };
        if !rng.random_bool(density) {
            return None;
        }

        let speed = road_speed + cfg.speed_offset;
        let (lane, x) = match &cfg.spawn_mode {
            SpawnMode::Lanes { lanes } => {
                if lanes.is_empty() {
                    return None;
                }
                let lane = rng.random_range(0..lanes.len());
                if let Some(safe) = cfg.safe_distance {
                    if !self.lane_free(lane, cfg.spawn_y, safe) {
                        log::trace!("Spawn suppressed: lane {} occupied", lane);
                        return None;
                    }
                }
                (Some(lane), lanes[lane])
            }
            SpawnMode::FreeForm => {
                let (left, right) = road;
                let max_x = right - cfg.size.x;
                let x = if max_x > left {
                    rng.random_range(left..max_x)
                } else {
                    left
                };
                (None, x)
            }
        };

        self.insert(lane, x, cfg.spawn_y, speed);
        self.cooldown = cfg.spawn_cooldown_ticks;
        self.entities.last()
    }

    /// Move every entity down by its own speed
    pub fn advance(&mut self) {
        for entity in &mut self.entities {
            entity.y += entity.speed;
        }
    }

    /// Remove entities whose top edge passed `limit_y`
    ///
    /// Single pass, order preserved for both survivors and retirees.
    pub fn retire(&mut self, limit_y: f32) -> Vec<TrafficEntity> {
        let mut retired = Vec::new();
        self.entities.retain(|e| {
            if e.y > limit_y {
                retired.push(e.clone());
                false
            } else {
                true
            }
        });
        retired
    }

    /// Ids of entities whose padded hitbox overlaps the player's
    pub fn colliding(&self, player: &Rect, size: Vec2, pad: Insets) -> CollisionResult {
        player_vs_traffic(player, self.entities.iter().map(|e| (e.id, e.rect(size))), pad)
    }

    /// Remove one entity by id
    pub fn remove(&mut self, id: u32) -> Option<TrafficEntity> {
        let idx = self.entities.iter().position(|e| e.id == id)?;
        Some(self.entities.remove(idx))
    }

    /// Drop everything; returns the removed ids so visuals can be released
    pub fn clear(&mut self) -> Vec<u32> {
        self.cooldown = 0;
        self.entities.drain(..).map(|e| e.id).collect()
    }
}
