//! Fixed timestep simulation tick
//!
//! Core game loop that advances the session one display frame.

use super::level::{CampaignEnd, GamePhase};
use super::player::ControlScheme;
use super::state::{GameEvent, GameState};
use super::visuals::{NullVisuals, VisualSink};

/// How far above the car the autopilot looks for traffic
const AUTOPILOT_LOOKAHEAD: f32 = 260.0;
/// Extra horizontal clearance the autopilot wants around the car
const AUTOPILOT_MARGIN: f32 = 6.0;

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Held steering: -1 left, 0 none, +1 right
    pub steer: i8,
    /// One-shot lane change request (lane-snap scheme)
    pub lane_request: i8,
    /// Leave the menu
    pub start: bool,
    /// Continue to the next level after clearing one
    pub advance: bool,
    /// Replay the current level after a crash
    pub restart: bool,
    /// Return to the menu from any stopped phase
    pub menu: bool,
    /// Pause toggle
    pub pause: bool,
    /// Idle/demo mode - autopilot drives
    pub idle_mode: bool,
}

/// Advance the game state by one tick without a renderer
pub fn tick(state: &mut GameState, input: &TickInput) {
    tick_with(state, input, &mut NullVisuals);
}

/// Advance the game state by one tick, reporting visuals to `visuals`
pub fn tick_with<V: VisualSink + ?Sized>(state: &mut GameState, input: &TickInput, visuals: &mut V) {
    // Phase inputs first; a transition consumes the tick
    match state.phase {
        GamePhase::Menu => {
            if input.start {
                state.banked_score = 0;
                state.start_level(0, visuals);
            }
            return;
        }
        GamePhase::Paused => {
            if input.menu {
                state.go_to_menu(visuals);
            } else if input.pause {
                state.phase = GamePhase::Playing;
            }
            return;
        }
        GamePhase::LevelComplete => {
            if input.menu {
                state.go_to_menu(visuals);
            } else if input.advance {
                advance_level(state, visuals);
            }
            return;
        }
        GamePhase::GameOver => {
            if input.menu {
                state.go_to_menu(visuals);
            } else if input.restart {
                let index = state.level_index;
                state.start_level(index, visuals);
            }
            return;
        }
        GamePhase::Playing => {
            if input.pause {
                state.phase = GamePhase::Paused;
                return;
            }
        }
    }

    state.time_ticks += 1;
    state.level_ticks += 1;

    // Road scroll (cosmetic)
    let height = state.tuning.height;
    state.road_offset = (state.road_offset + state.progress.speed).rem_euclid(height);

    // Player
    let (steer, lane_request) = if input.idle_mode {
        autopilot(state)
    } else {
        (input.steer, input.lane_request)
    };
    let bounds = state.tuning.player_bounds();
    match state.tuning.control {
        ControlScheme::Continuous => state.player.steer(steer, &state.tuning.steering, bounds),
        ControlScheme::LaneSnap => state.player.lane_snap(lane_request, &state.tuning.lane_snap, bounds),
    }
    visuals.player_moved(state.player.rect());

    // Traffic
    let size = state.tuning.traffic.size;
    state.traffic.advance();
    for entity in state.traffic.iter() {
        visuals.moved(entity.id, entity.rect(size));
    }

    let road = state.tuning.road();
    let spawned = state
        .traffic
        .try_spawn(&mut state.rng, &state.tuning.traffic, state.progress.speed, road)
        .map(|e| (e.id, e.rect(size)));
    if let Some((id, rect)) = spawned {
        visuals.spawn(id, rect);
        state.events.push(GameEvent::Spawned { id });
    }

    // Collisions, suppressed during the grace period
    if state.grace_ticks > 0 {
        state.grace_ticks -= 1;
    } else {
        let hits = state
            .traffic
            .colliding(&state.player.rect(), size, state.tuning.hitbox_padding)
            .hits;
        for id in hits {
            if state.shield_active {
                state.shield_active = false;
                state.traffic.remove(id);
                visuals.despawn(id);
                state.events.push(GameEvent::ShieldBroken { id });
                log::debug!("Shield absorbed collision with {}", id);
                continue;
            }
            state.phase = GamePhase::GameOver;
            state.events.push(GameEvent::GameOver {
                level: state.level_number(),
                score: state.progress.score,
            });
            log::info!(
                "Game over on level {} with score {} (total {})",
                state.level_number(),
                state.progress.score,
                state.total_score()
            );
            return;
        }
    }

    // Retire off-screen traffic and score
    let retired = state.traffic.retire(state.tuning.retire_y());
    for entity in retired {
        visuals.despawn(entity.id);
        state.events.push(GameEvent::Retired { id: entity.id });
        if let Some(tier) = state.progress.credit_pass(&state.tuning.milestones) {
            let speed = state.progress.speed;
            state.events.push(GameEvent::TierUp { tier, speed });
            state.show_banner(format!("TIER {}", tier));
            log::debug!("Tier {} reached, road speed {}", tier, speed);
        }
    }

    // Win condition
    if state.win_condition().is_met(state.progress.score, state.level_ticks) {
        state.phase = GamePhase::LevelComplete;
        state.events.push(GameEvent::LevelComplete {
            level: state.level_number(),
            score: state.progress.score,
        });
        log::info!(
            "Level {} complete with score {}",
            state.level_number(),
            state.progress.score
        );
    }

    // Transient banner
    if let Some(banner) = state.banner.as_mut() {
        banner.ticks = banner.ticks.saturating_sub(1);
        if banner.ticks == 0 {
            state.banner = None;
        }
    }
}

/// Move on from a cleared level
fn advance_level<V: VisualSink + ?Sized>(state: &mut GameState, visuals: &mut V) {
    state.banked_score += u64::from(state.progress.score);
    let next = state.level_index + 1;
    if next < state.tuning.level_count() {
        state.start_level(next, visuals);
        return;
    }

    match state.tuning.campaign_end {
        CampaignEnd::Loop => {
            log::info!("Campaign cleared, looping to level 1");
            state.start_level(0, visuals);
        }
        CampaignEnd::Menu => {
            let total_score = state.banked_score;
            log::info!("Campaign cleared with total score {}", total_score);
            state.go_to_menu(visuals);
            state.events.push(GameEvent::CampaignComplete { total_score });
        }
    }
}

/// Pick steering that dodges the closest car ahead
///
/// Returns `(steer, lane_request)` for whichever control scheme is active.
fn autopilot(state: &GameState) -> (i8, i8) {
    let me = state.player.rect();
    let size = state.tuning.traffic.size;
    let ahead = |y: f32| y + size.y > me.top() - AUTOPILOT_LOOKAHEAD && y < me.bottom();

    match state.tuning.control {
        ControlScheme::Continuous => {
            let threat = state
                .traffic
                .iter()
                .filter(|e| ahead(e.y))
                .filter(|e| {
                    e.x < me.right() + AUTOPILOT_MARGIN && e.x + size.x > me.left() - AUTOPILOT_MARGIN
                })
                .max_by(|a, b| a.y.partial_cmp(&b.y).unwrap_or(std::cmp::Ordering::Equal));

            let Some(threat) = threat else {
                return (0, 0);
            };

            let bounds = state.tuning.player_bounds();
            let threat_cx = threat.x + size.x * 0.5;
            let mut steer: i8 = if threat_cx > me.center_x() { -1 } else { 1 };
            // Pinned against a wall: go around the other side
            if steer < 0 && state.player.x <= bounds.min + 1.0 {
                steer = 1;
            } else if steer > 0 && state.player.x >= bounds.max - 1.0 {
                steer = -1;
            }
            (steer, 0)
        }
        ControlScheme::LaneSnap => {
            let lanes = &state.tuning.lane_snap.lanes;
            if lanes.is_empty() {
                return (0, 0);
            }
            // Distance to the nearest car in each lane's column (larger is safer)
            let clearance = |lane: usize| -> f32 {
                let left = lanes[lane];
                let right = left + me.size().x;
                state
                    .traffic
                    .iter()
                    .filter(|e| ahead(e.y) && e.x < right && e.x + size.x > left)
                    .map(|e| me.top() - (e.y + size.y))
                    .fold(f32::INFINITY, f32::min)
            };
            let current = state.player.lane.min(lanes.len() - 1);
            let mut best = current;
            for candidate in [current.saturating_sub(1), (current + 1).min(lanes.len() - 1)] {
                if clearance(candidate) > clearance(best) {
                    best = candidate;
                }
            }
            let request = match best.cmp(&current) {
                std::cmp::Ordering::Less => -1,
                std::cmp::Ordering::Greater => 1,
                std::cmp::Ordering::Equal => 0,
            };
            (0, request)
        }
    }
}
