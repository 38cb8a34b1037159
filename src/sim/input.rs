//! Input latch between asynchronous event handlers and the tick
//!
//! Key/touch/mouse handlers write here whenever events arrive (last write
//! wins per field); the host copies the latch into a `TickInput` at the start
//! of each tick and one-shot requests are cleared once consumed.

use super::tick::TickInput;

#[derive(Debug, Clone, Default)]
pub struct InputLatch {
    steer: i8,
    lane_request: i8,
    start: bool,
    advance: bool,
    restart: bool,
    menu: bool,
    pause: bool,
    idle_mode: bool,
}

impl InputLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Left control pressed or released
    pub fn steer_left(&mut self, active: bool) {
        self.set_steer(-1, active);
    }

    /// Right control pressed or released
    pub fn steer_right(&mut self, active: bool) {
        self.set_steer(1, active);
    }

    // Any release stops steering, matching a shared "stop" handler
    fn set_steer(&mut self, dir: i8, active: bool) {
        self.steer = if active { dir } else { 0 };
    }

    /// Request a one-lane move (sign of `dir` only)
    pub fn change_lane(&mut self, dir: i8) {
        self.lane_request = dir.signum();
    }

    pub fn start(&mut self) {
        self.start = true;
    }

    pub fn advance(&mut self) {
        self.advance = true;
    }

    pub fn restart(&mut self) {
        self.restart = true;
    }

    pub fn menu(&mut self) {
        self.menu = true;
    }

    pub fn pause(&mut self) {
        self.pause = true;
    }

    pub fn set_idle_mode(&mut self, idle: bool) {
        self.idle_mode = idle;
    }

    /// Drop held steering (window blur, session reset)
    pub fn release_all(&mut self) {
        self.steer = 0;
        self.lane_request = 0;
    }

    /// Snapshot for one tick; one-shot requests are consumed
    pub fn take(&mut self) -> TickInput {
        let input = TickInput {
            steer: self.steer,
            lane_request: self.lane_request,
            start: self.start,
            advance: self.advance,
            restart: self.restart,
            menu: self.menu,
            pause: self.pause,
            idle_mode: self.idle_mode,
        };
        self.lane_request = 0;
        self.start = false;
        self.advance = false;
        self.restart = false;
        self.menu = false;
        self.pause = false;
        input
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_held_steer_persists_across_takes() {
        let mut latch = InputLatch::new();
        latch.steer_right(true);
        assert_eq!(latch.take().steer, 1);
        assert_eq!(latch.take().steer, 1);
        latch.steer_right(false);
        assert_eq!(latch.take().steer, 0);
    }

    #[test]
    fn test_last_write_wins() {
        let mut latch = InputLatch::new();
        latch.steer_left(true);
        latch.steer_right(true);
        assert_eq!(latch.take().steer, 1);
        // Releasing either side stops the car
        latch.steer_left(false);
        assert_eq!(latch.take().steer, 0);
    }

    #[test]
    fn test_one_shots_cleared_after_take() {
        let mut latch = InputLatch::new();
        latch.change_lane(-5);
        latch.start();
        latch.pause();
        let first = latch.take();
        assert_eq!(first.lane_request, -1);
        assert!(first.start && first.pause);

        let second = latch.take();
        assert_eq!(second.lane_request, 0);
        assert!(!second.start && !second.pause);
    }

    #[test]
    fn test_release_all() {
        let mut latch = InputLatch::new();
        latch.steer_left(true);
        latch.change_lane(1);
        latch.release_all();
        let input = latch.take();
        assert_eq!(input.steer, 0);
        assert_eq!(input.lane_request, 0);
    }
}
