//! Level table, win conditions, and score progress
//!
//! Two progress mechanisms coexist:
//! - the level's win condition (target score or time limit) ends the level
//! - score milestones bump the tier and road speed without ending anything

use serde::{Deserialize, Serialize};

use crate::consts::TICK_RATE_HZ;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for start
    #[default]
    Menu,
    /// Active driving
    Playing,
    /// Frozen mid-level by the player
    Paused,
    /// Win condition met, waiting for advance
    LevelComplete,
    /// Crashed
    GameOver,
}

impl GamePhase {
    /// Phases in which the simulation does not advance
    pub fn is_frozen(self) -> bool {
        !matches!(self, GamePhase::Playing)
    }
}

/// A level as written in the tuning table
///
/// At most one of `target_score`, `time_limit_secs`, `endless` should be
/// set; see [`LevelConfig::win_condition`] for how conflicts resolve.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    pub target_score: Option<u32>,
    pub time_limit_secs: Option<f32>,
    pub endless: bool,
    /// Road scroll speed (pixels per tick)
    pub speed: f32,
}

/// The single active way a level can be cleared
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum WinCondition {
    TargetScore(u32),
    TimeLimit(f32),
    Endless,
}

impl LevelConfig {
    pub fn target(score: u32, speed: f32) -> Self {
        Self {
            target_score: Some(score),
            speed,
            ..Default::default()
        }
    }

    pub fn timed(secs: f32, speed: f32) -> Self {
        Self {
            time_limit_secs: Some(secs),
            speed,
            ..Default::default()
        }
    }

    pub fn endless(speed: f32) -> Self {
        Self {
            endless: true,
            speed,
            ..Default::default()
        }
    }

    /// Resolve to exactly one win condition
    ///
    /// Precedence: `endless` flag, then target score, then time limit.
    /// A level with nothing usable set plays as endless.
    pub fn win_condition(&self) -> WinCondition {
        if self.endless {
            return WinCondition::Endless;
        }
        if let Some(target) = self.target_score {
            return WinCondition::TargetScore(target);
        }
        match self.time_limit_secs {
            Some(secs) if secs.is_finite() && secs >= 0.0 => WinCondition::TimeLimit(secs),
            _ => WinCondition::Endless,
        }
    }

    /// Number of win conditions set (more than one is a config smell)
    pub fn conditions_set(&self) -> usize {
        usize::from(self.endless)
            + usize::from(self.target_score.is_some())
            + usize::from(self.time_limit_secs.is_some())
    }
}

/// Tick on which a time limit of `secs` runs out
pub fn limit_ticks(secs: f32) -> u64 {
    (f64::from(secs) * f64::from(TICK_RATE_HZ)).round().max(0.0) as u64
}

impl WinCondition {
    /// Checked every tick while playing, against the level's tick clock
    pub fn is_met(&self, score: u32, level_ticks: u64) -> bool {
        match *self {
            WinCondition::TargetScore(target) => score >= target,
            WinCondition::TimeLimit(limit) => level_ticks >= limit_ticks(limit),
            WinCondition::Endless => false,
        }
    }
}

/// How score milestones are spaced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneRule {
    /// No milestones
    Off,
    /// Every `step` points (10, 20, 30, ...)
    #[default]
    Fixed,
    /// Gap grows with the tier: thresholds at step, step+2*step, ...
    Growing,
}

/// What happens after the final level is cleared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CampaignEnd {
    /// Back to the first level
    Loop,
    /// Back to the menu
    #[default]
    Menu,
}

/// Milestone tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Milestones {
    pub rule: MilestoneRule,
    /// Points per milestone (Fixed) or growth step (Growing)
    pub step: u32,
    /// Added to road speed at each milestone
    pub speed_increment: f32,
}

impl Default for Milestones {
    fn default() -> Self {
        Self {
            rule: MilestoneRule::Fixed,
            step: 10,
            speed_increment: 0.6,
        }
    }
}

impl Milestones {
    /// First threshold for a fresh level (None if milestones are off)
    fn first_threshold(&self) -> Option<u32> {
        match self.rule {
            MilestoneRule::Off => None,
            _ if self.step == 0 => None,
            MilestoneRule::Fixed | MilestoneRule::Growing => Some(self.step),
        }
    }

    /// Threshold after `tier` was just reached at `current`
    fn next_threshold(&self, current: u32, tier: u32) -> Option<u32> {
        match self.rule {
            MilestoneRule::Off => None,
            _ if self.step == 0 => None,
            MilestoneRule::Fixed => current.checked_add(self.step),
            MilestoneRule::Growing => current.checked_add(self.step.saturating_mul(tier)),
        }
    }
}

/// Score and progress for the level in play
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    /// Points this level
    pub score: u32,
    /// Milestone tier, starting at 1
    pub tier: u32,
    /// Current road speed (pixels per tick)
    pub speed: f32,
    /// Score at which the next milestone fires
    pub next_milestone: Option<u32>,
}

impl Progress {
    pub fn new(level: &LevelConfig, milestones: &Milestones) -> Self {
        Self {
            score: 0,
            tier: 1,
            speed: level.speed,
            next_milestone: milestones.first_threshold(),
        }
    }

    /// Credit one retired entity. Returns the new tier if a milestone fired.
    pub fn credit_pass(&mut self, milestones: &Milestones) -> Option<u32> {
        self.score = self.score.saturating_add(1);
        let threshold = self.next_milestone?;
        if self.score < threshold {
            return None;
        }
        self.tier += 1;
        self.speed += milestones.speed_increment;
        self.next_milestone = milestones.next_threshold(threshold, self.tier);
        Some(self.tier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_win_condition_precedence() {
        assert_eq!(LevelConfig::target(5, 5.0).win_condition(), WinCondition::TargetScore(5));
        assert_eq!(LevelConfig::timed(30.0, 5.5).win_condition(), WinCondition::TimeLimit(30.0));
        assert_eq!(LevelConfig::endless(5.0).win_condition(), WinCondition::Endless);

        let both = LevelConfig {
            target_score: Some(10),
            time_limit_secs: Some(20.0),
            ..Default::default()
        };
        assert_eq!(both.conditions_set(), 2);
        assert_eq!(both.win_condition(), WinCondition::TargetScore(10));

        let flagged = LevelConfig {
            target_score: Some(10),
            endless: true,
            ..Default::default()
        };
        assert_eq!(flagged.win_condition(), WinCondition::Endless);
    }

    #[test]
    fn test_unset_level_defaults_to_endless() {
        let empty = LevelConfig::default();
        assert_eq!(empty.conditions_set(), 0);
        assert_eq!(empty.win_condition(), WinCondition::Endless);

        let bad_time = LevelConfig {
            time_limit_secs: Some(f32::NAN),
            ..Default::default()
        };
        assert_eq!(bad_time.win_condition(), WinCondition::Endless);
    }

    #[test]
    fn test_target_score_met_exactly() {
        let cond = WinCondition::TargetScore(5);
        assert!(!cond.is_met(4, 6000));
        assert!(cond.is_met(5, 0));
        assert!(cond.is_met(6, 0));
    }

    #[test]
    fn test_time_limit_met() {
        let cond = WinCondition::TimeLimit(30.0);
        assert!(!cond.is_met(0, 1799));
        assert!(cond.is_met(0, 1800));
        assert!(!WinCondition::Endless.is_met(u32::MAX, u64::MAX));
    }

    #[test]
    fn test_inexact_time_limits_round_to_nearest_tick() {
        // None of these are representable exactly as f32
        assert_eq!(limit_ticks(30.1), 1806);
        assert_eq!(limit_ticks(0.1), 6);
        assert_eq!(limit_ticks(12.3), 738);
        assert_eq!(limit_ticks(30.0), 1800);
        assert_eq!(limit_ticks(0.0), 0);

        let cond = WinCondition::TimeLimit(30.1);
        assert!(!cond.is_met(0, 1805));
        assert!(cond.is_met(0, 1806));
    }

    #[test]
    fn test_fixed_milestones_every_ten() {
        let milestones = Milestones::default();
        let mut p = Progress::new(&LevelConfig::endless(5.0), &milestones);
        let mut fired = Vec::new();
        for _ in 0..35 {
            if let Some(tier) = p.credit_pass(&milestones) {
                fired.push((p.score, tier));
            }
        }
        assert_eq!(fired, vec![(10, 2), (20, 3), (30, 4)]);
        assert!((p.speed - (5.0 + 3.0 * 0.6)).abs() < 1e-5);
    }

    #[test]
    fn test_growing_milestones() {
        let milestones = Milestones {
            rule: MilestoneRule::Growing,
            step: 200,
            speed_increment: 1.0,
        };
        let mut p = Progress::new(&LevelConfig::endless(5.0), &milestones);
        let mut fired = Vec::new();
        for _ in 0..1300 {
            if p.credit_pass(&milestones).is_some() {
                fired.push(p.score);
            }
        }
        // 200, then +2*200, then +3*200
        assert_eq!(fired, vec![200, 600, 1200]);
        assert_eq!(p.tier, 4);
    }

    #[test]
    fn test_milestones_disabled() {
        for milestones in [
            Milestones {
                rule: MilestoneRule::Off,
                ..Default::default()
            },
            Milestones {
                step: 0,
                ..Default::default()
            },
        ] {
            let mut p = Progress::new(&LevelConfig::endless(5.0), &milestones);
            for _ in 0..100 {
                assert!(p.credit_pass(&milestones).is_none());
            }
            assert_eq!(p.tier, 1);
            assert_eq!(p.speed, 5.0);
        }
    }

    #[test]
    fn test_phase_helpers() {
        assert!(!GamePhase::Playing.is_frozen());
        assert!(GamePhase::Paused.is_frozen());
        assert!(GamePhase::Menu.is_frozen());
        assert!(GamePhase::GameOver.is_frozen());
    }
}
