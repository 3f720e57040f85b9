//! Keyboard and touch input
//!
//! Raw key/touch events become four direction flags plus a pause command.

use glam::DVec2;

use crate::consts::DOUBLE_TAP_MS;
use crate::platform::{Scheduler, TimerHandle, TimerKind};

/// Logical keys the game binds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    /// Pause toggle
    P,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_dom_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" | "Left" => Some(Key::Left),
            "ArrowRight" | "Right" => Some(Key::Right),
            "ArrowUp" | "Up" => Some(Key::Up),
            "ArrowDown" | "Down" => Some(Key::Down),
            "p" | "P" => Some(Key::P),
            _ => None,
        }
    }

    pub fn is_arrow(&self) -> bool {
        !matches!(self, Key::P)
    }
}

/// Held movement directions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Directions {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl Directions {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn any(&self) -> bool {
        self.left || self.right || self.up || self.down
    }
}

/// What the game should do in response to an input event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputCommand {
    None,
    TogglePause,
}

/// Tracks direction flags, the active touch and the double-tap window
#[derive(Debug, Default)]
pub struct InputTracker {
    directions: Directions,
    touch_origin: Option<DVec2>,
    tap_timer: Option<TimerHandle>,
}

impl InputTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn directions(&self) -> Directions {
        self.directions
    }

    /// Press sets a direction and clears its opposite; `p` toggles pause
    pub fn key_down(&mut self, key: Key) -> InputCommand {
        let d = &mut self.directions;
        match key {
            Key::Left => {
                d.left = true;
                d.right = false;
            }
            Key::Right => {
                d.right = true;
                d.left = false;
            }
            Key::Up => {
                d.up = true;
                d.down = false;
            }
            Key::Down => {
                d.down = true;
                d.up = false;
            }
            Key::P => return InputCommand::TogglePause,
        }
        InputCommand::None
    }

    /// Release clears only that direction
    pub fn key_up(&mut self, key: Key) {
        let d = &mut self.directions;
        match key {
            Key::Left => d.left = false,
            Key::Right => d.right = false,
            Key::Up => d.up = false,
            Key::Down => d.down = false,
            Key::P => {}
        }
    }

    /// Record the touch and run the double-tap window.
    ///
    /// A second start while the window is open cancels its timer and yields
    /// a pause toggle.
    pub fn touch_start<S: Scheduler>(&mut self, point: DVec2, scheduler: &mut S) -> InputCommand {
        self.touch_origin = Some(point);
        match self.tap_timer.take() {
            Some(timer) => {
                scheduler.clear_timeout(timer);
                log::debug!("double tap");
                InputCommand::TogglePause
            }
            None => {
                self.tap_timer = Some(scheduler.set_timeout(DOUBLE_TAP_MS, TimerKind::DoubleTapExpiry));
                InputCommand::None
            }
        }
    }

    /// Steer by the sign of the offset from the touch-start point
    pub fn touch_move(&mut self, point: DVec2) {
        let Some(origin) = self.touch_origin else {
            return;
        };
        let d = &mut self.directions;
        if point.x > origin.x {
            d.right = true;
            d.left = false;
        } else if point.x < origin.x {
            d.left = true;
            d.right = false;
        }
        if point.y > origin.y {
            d.down = true;
            d.up = false;
        } else if point.y < origin.y {
            d.up = true;
            d.down = false;
        }
    }

    pub fn touch_end(&mut self) {
        self.directions.clear();
    }

    /// Double-tap window closed
    pub fn expire_tap(&mut self, timer: TimerHandle) {
        if self.tap_timer == Some(timer) {
            self.tap_timer = None;
        }
    }

    pub fn tap_armed(&self) -> bool {
        self.tap_timer.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::headless::ManualScheduler;

    #[test]
    fn test_key_down_clears_opposite() {
        let mut input = InputTracker::new();
        input.key_down(Key::Left);
        input.key_down(Key::Right);
        input.key_down(Key::Up);

        let d = input.directions();
        assert!(d.right && !d.left);
        assert!(d.up && !d.down);

        input.key_down(Key::Down);
        assert!(input.directions().down && !input.directions().up);
    }

    #[test]
    fn test_key_up_clears_only_that_flag() {
        let mut input = InputTracker::new();
        input.key_down(Key::Left);
        input.key_down(Key::Up);
        input.key_up(Key::Left);

        let d = input.directions();
        assert!(!d.left);
        assert!(d.up);
    }

    #[test]
    fn test_p_toggles_pause() {
        let mut input = InputTracker::new();
        assert_eq!(input.key_down(Key::P), InputCommand::TogglePause);
        assert!(!input.directions().any());
        assert_eq!(Key::from_dom_key("P"), Some(Key::P));
        assert_eq!(Key::from_dom_key("ArrowLeft"), Some(Key::Left));
        assert_eq!(Key::from_dom_key("q"), None);
        assert!(Key::Up.is_arrow() && !Key::P.is_arrow());
    }

    #[test]
    fn test_touch_move_uses_sign_of_delta() {
        let mut sched = ManualScheduler::new(0.0);
        let mut input = InputTracker::new();
        input.touch_start(DVec2::new(100.0, 100.0), &mut sched);

        input.touch_move(DVec2::new(101.0, 40.0));
        let d = input.directions();
        assert!(d.right && d.up && !d.left && !d.down);

        // equal axis leaves that axis alone
        input.touch_move(DVec2::new(20.0, 100.0));
        let d = input.directions();
        assert!(d.left && !d.right);
        assert!(d.up);

        input.touch_end();
        assert!(!input.directions().any());
    }

    #[test]
    fn test_touch_move_without_start_is_ignored() {
        let mut input = InputTracker::new();
        input.touch_move(DVec2::new(5.0, 5.0));
        assert!(!input.directions().any());
    }

    #[test]
    fn test_double_tap_within_window() {
        let mut sched = ManualScheduler::new(0.0);
        let mut input = InputTracker::new();

        assert_eq!(input.touch_start(DVec2::ZERO, &mut sched), InputCommand::None);
        sched.advance(DOUBLE_TAP_MS - 100.0);
        assert_eq!(
            input.touch_start(DVec2::ZERO, &mut sched),
            InputCommand::TogglePause
        );
        assert!(!input.tap_armed());
        assert_eq!(sched.pending_timers(), 0);
    }

    #[test]
    fn test_slow_taps_each_arm_fresh_timer() {
        let mut sched = ManualScheduler::new(0.0);
        let mut input = InputTracker::new();

        assert_eq!(input.touch_start(DVec2::ZERO, &mut sched), InputCommand::None);
        for (handle, _) in sched.advance(DOUBLE_TAP_MS + 50.0) {
            input.expire_tap(handle);
        }
        assert!(!input.tap_armed());

        assert_eq!(input.touch_start(DVec2::ZERO, &mut sched), InputCommand::None);
        assert!(input.tap_armed());
        assert_eq!(sched.pending_timers(), 1);
    }
}
