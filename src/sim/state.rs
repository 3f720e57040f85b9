//! Session and entity state
//!
//! Everything a frame needs lives on the session, owned by the game loop.

use glam::Vec2;

/// Current phase of the loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    Paused,
}

/// Per-session loop state
#[derive(Debug, Clone)]
pub struct Session {
    /// Whether ticks are halted
    pub paused: bool,
    /// Timestamp (ms) of the last frame boundary; never decreases
    pub time: f64,
    /// Target frame rate
    pub fps: u32,
    /// Tileset ready to draw
    pub images_loaded: bool,
}

impl Session {
    pub fn new(fps: u32) -> Self {
        Self {
            paused: false,
            time: 0.0,
            fps: fps.max(1),
            images_loaded: false,
        }
    }

    /// Milliseconds per frame
    pub fn frame_interval(&self) -> f64 {
        1000.0 / self.fps as f64
    }

    pub fn run_state(&self) -> RunState {
        if self.paused {
            RunState::Paused
        } else {
            RunState::Running
        }
    }
}

/// A single drawable entity
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    /// Top-left screen position
    pub pos: Vec2,
    /// Atlas tile name
    pub key: String,
}

impl Sprite {
    pub fn new(key: impl Into<String>, pos: Vec2) -> Self {
        Self {
            pos,
            key: key.into(),
        }
    }

    /// Place a `tile_size` sprite in the middle of a `width` x `height` canvas
    pub fn centered(key: impl Into<String>, width: f32, height: f32, tile_size: f32) -> Self {
        let half = tile_size / 2.0;
        Self::new(key, Vec2::new(width / 2.0 - half, height / 2.0 - half))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_interval() {
        let session = Session::new(30);
        assert!((session.frame_interval() - 33.333).abs() < 0.001);
        assert_eq!(session.run_state(), RunState::Running);
    }

    #[test]
    fn test_centered_sprite() {
        let vase = Sprite::centered("vase", 500.0, 400.0, 32.0);
        assert_eq!(vase.pos, Vec2::new(234.0, 184.0));
    }
}
