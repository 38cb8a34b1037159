//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies (visuals go through `VisualSink`)

pub mod collision;
pub mod input;
pub mod level;
pub mod player;
pub mod rect;
pub mod state;
pub mod tick;
pub mod traffic;
pub mod visuals;

pub use collision::{CollisionResult, padded_overlap};
pub use input::InputLatch;
pub use level::{CampaignEnd, GamePhase, LevelConfig, MilestoneRule, Milestones, Progress, WinCondition};
pub use player::{ControlScheme, PlayerState};
pub use rect::{Insets, Rect};
pub use state::{Banner, FrameSnapshot, GameEvent, GameState, TrafficView};
pub use tick::{TickInput, tick, tick_with};
pub use traffic::{SpawnMode, TrafficConfig, TrafficEntity, TrafficPool};
pub use visuals::{HandleLedger, NullVisuals, VisualSink};
