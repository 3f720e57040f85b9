//! Vase Arcade - a tiny canvas arcade demo
//!
//! Core modules:
//! - `game`: Update/render loop and pause state machine
//! - `sim`: Pure frame logic (session state, motion, collision helpers)
//! - `atlas`: Named tiles inside one source image
//! - `audio`: Tone gate and sample playback
//! - `input`: Keyboard/touch to direction flags
//! - `events`: Lifecycle notifications
//! - `platform`: Browser/headless backends

pub mod atlas;
pub mod audio;
pub mod error;
pub mod events;
pub mod game;
pub mod input;
pub mod platform;
pub mod settings;
pub mod sim;

pub use atlas::{Atlas, TileRect};
pub use error::{AssetError, AtlasError, GameError};
pub use events::{EventBus, GameEvent};
pub use game::Game;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Default canvas size
    pub const DEFAULT_WIDTH: u32 = 500;
    pub const DEFAULT_HEIGHT: u32 = 400;

    /// Target frame rate
    pub const DEFAULT_FPS: u32 = 30;
    /// Sprite speed (pixels per frame)
    pub const DEFAULT_SPEED: f32 = 5.0;

    /// Sprite tile name and size
    pub const VASE_KEY: &str = "vase";
    pub const VASE_SIZE: u32 = 32;

    /// Pause confirmation tone (A4)
    pub const PAUSE_TONE_HZ: f32 = 440.0;
    /// How long a note holds the tone gate open (ms)
    pub const NOTE_DURATION_MS: f64 = 300.0;
    /// Fixed sample playback volume
    pub const SAMPLE_VOLUME: f32 = 0.3;

    /// Second tap must land within this window (ms)
    pub const DOUBLE_TAP_MS: f64 = 300.0;
}
