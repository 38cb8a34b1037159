//! Game session state and output types
//!
//! Everything the simulation mutates lives in `GameState`; there are no
//! globals. Resetting a level rebuilds the per-level fields, which also
//! cancels any pending grace or banner countdown.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::level::{GamePhase, Progress, WinCondition};
use super::player::{ControlScheme, PlayerState};
use super::rect::Rect;
use super::traffic::TrafficPool;
use super::visuals::VisualSink;
use crate::consts::TICK_RATE_HZ;
use crate::tuning::Tuning;

/// Phase transitions and per-entity happenings, drained by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    LevelStarted { level: u32 },
    Spawned { id: u32 },
    Retired { id: u32 },
    TierUp { tier: u32, speed: f32 },
    ShieldBroken { id: u32 },
    LevelComplete { level: u32, score: u32 },
    GameOver { level: u32, score: u32 },
    CampaignComplete { total_score: u64 },
}

/// A short-lived on-screen message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Banner {
    pub text: String,
    pub ticks: u32,
}

/// A traffic entity as the renderer sees it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficView {
    pub id: u32,
    pub rect: Rect,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub phase: GamePhase,
    /// 1-based level number
    pub level: u32,
    pub tier: u32,
    pub score: u32,
    pub total_score: u64,
    pub elapsed_secs: f64,
    pub road_offset: f32,
    pub shield: bool,
    pub grace: bool,
    pub banner: Option<String>,
    pub player: Rect,
    pub traffic: Vec<TrafficView>,
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub tuning: Tuning,
    pub phase: GamePhase,
    /// Index into the level table (0-based)
    pub level_index: usize,
    pub progress: Progress,
    /// Points from levels already cleared this run
    pub banked_score: u64,
    /// Ticks since the current level started
    pub level_ticks: u64,
    /// Ticks simulated this session
    pub time_ticks: u64,
    /// Collision checks are skipped while this is non-zero
    pub grace_ticks: u32,
    /// Scroll offset of the road texture, 0..height
    pub road_offset: f32,
    pub player: PlayerState,
    pub traffic: TrafficPool,
    pub shield_active: bool,
    pub banner: Option<Banner>,
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a session sitting at the menu
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let level = tuning.level(0);
        let progress = Progress::new(&level, &tuning.milestones);
        let player = Self::fresh_player(&tuning);
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            phase: GamePhase::Menu,
            level_index: 0,
            progress,
            banked_score: 0,
            level_ticks: 0,
            time_ticks: 0,
            grace_ticks: 0,
            road_offset: 0.0,
            player,
            traffic: TrafficPool::new(),
            shield_active: false,
            banner: None,
            events: Vec::new(),
        }
    }

    fn fresh_player(tuning: &Tuning) -> PlayerState {
        let mut player = PlayerState::centered(
            tuning.width,
            tuning.height,
            tuning.car_size,
            tuning.car_bottom_gap,
        );
        let bounds = tuning.player_bounds();
        player.x = bounds.clamp(player.x);
        player.target_x = player.x;
        if tuning.control == ControlScheme::LaneSnap {
            player.place_in_lane(tuning.lane_snap.start_lane, &tuning.lane_snap, bounds);
        }
        player
    }

    /// Reset per-level state and begin playing `index`
    pub fn start_level<V: VisualSink + ?Sized>(&mut self, index: usize, visuals: &mut V) {
        self.clear_traffic(visuals);
        self.level_index = index.min(self.tuning.level_count() - 1);
        let level = self.tuning.level(self.level_index);
        self.progress = Progress::new(&level, &self.tuning.milestones);
        self.level_ticks = 0;
        self.grace_ticks = self.tuning.grace_ticks;
        self.road_offset = 0.0;
        self.player = Self::fresh_player(&self.tuning);
        self.shield_active = false;
        self.phase = GamePhase::Playing;
        visuals.player_moved(self.player.rect());

        let number = self.level_number();
        self.show_banner(format!("LEVEL {}", number));
        self.events.push(GameEvent::LevelStarted { level: number });
        log::info!(
            "Level {} started ({:?}, speed {})",
            number,
            level.win_condition(),
            level.speed
        );
    }

    /// Drop the run and return to the title screen
    pub fn go_to_menu<V: VisualSink + ?Sized>(&mut self, visuals: &mut V) {
        self.clear_traffic(visuals);
        self.level_index = 0;
        self.banked_score = 0;
        self.progress = Progress::new(&self.tuning.level(0), &self.tuning.milestones);
        self.level_ticks = 0;
        self.grace_ticks = 0;
        self.player = Self::fresh_player(&self.tuning);
        self.shield_active = false;
        self.banner = None;
        self.phase = GamePhase::Menu;
    }

    fn clear_traffic<V: VisualSink + ?Sized>(&mut self, visuals: &mut V) {
        for id in self.traffic.clear() {
            visuals.despawn(id);
        }
    }

    /// 1-based level number for display
    pub fn level_number(&self) -> u32 {
        self.level_index as u32 + 1
    }

    pub fn win_condition(&self) -> WinCondition {
        self.tuning.level(self.level_index).win_condition()
    }

    /// Seconds since the level started (derived from the tick clock)
    pub fn elapsed_secs(&self) -> f64 {
        self.level_ticks as f64 / f64::from(TICK_RATE_HZ)
    }

    pub fn total_score(&self) -> u64 {
        self.banked_score + u64::from(self.progress.score)
    }

    pub fn in_grace(&self) -> bool {
        self.grace_ticks > 0
    }

    /// Arm the shield: the next collision destroys the other car instead
    pub fn grant_shield(&mut self) {
        self.shield_active = true;
    }

    pub fn show_banner(&mut self, text: String) {
        if self.tuning.banner_ticks == 0 {
            return;
        }
        self.banner = Some(Banner {
            text,
            ticks: self.tuning.banner_ticks,
        });
    }

    pub fn player_rect(&self) -> Rect {
        self.player.rect()
    }

    /// Take all events emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        let size = self.tuning.traffic.size;
        FrameSnapshot {
            phase: self.phase,
            level: self.level_number(),
            tier: self.progress.tier,
            score: self.progress.score,
            total_score: self.total_score(),
            elapsed_secs: self.elapsed_secs(),
            road_offset: self.road_offset,
            shield: self.shield_active,
            grace: self.in_grace(),
            banner: self.banner.as_ref().map(|b| b.text.clone()),
            player: self.player_rect(),
            traffic: self
                .traffic
                .iter()
                .map(|e| TrafficView {
                    id: e.id,
                    rect: e.rect(size),
                })
                .collect(),
        }
    }
}
