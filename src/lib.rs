//! Highway Rush - A top-down highway driving game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (steering, traffic, collisions, levels)
//! - `tuning`: Data-driven game balance
//! - `web`: Browser binding (wasm32 only)

pub mod sim;
pub mod tuning;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use sim::{FrameSnapshot, GameEvent, GamePhase, GameState, InputLatch, TickInput, tick, tick_with};
pub use tuning::{Preset, Tuning};

/// Game configuration constants
pub mod consts {
    /// Simulation tick rate; all speeds are pixels per tick at this rate
    pub const TICK_RATE_HZ: u32 = 60;
    /// Fixed simulation timestep
    pub const SIM_DT: f32 = 1.0 / TICK_RATE_HZ as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Road speed for levels that don't set one
    pub const BASE_ROAD_SPEED: f32 = 5.0;
}
