//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Time, animation frames and one-shot timers
//! - Drawing surface and image loading
//! - Visibility/focus detection

pub mod headless;
pub mod visibility;
#[cfg(target_arch = "wasm32")]
pub mod web;

use std::future::Future;
use std::pin::Pin;

use glam::Vec2;

use crate::atlas::TileRect;
use crate::error::AssetError;

pub use visibility::{VisibilityChange, VisibilityHooks};

/// Boxed asset future (single-threaded, no `Send`)
pub type AssetFuture<T> = Pin<Box<dyn Future<Output = Result<T, AssetError>>>>;

/// Pixel dimensions of a loaded bitmap
pub trait ImageBounds {
    fn dimensions(&self) -> (u32, u32);
}

/// 2D drawing surface exposing clear + image blit
pub trait Surface {
    type Image: ImageBounds;

    fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64);

    /// Copy `src` out of `image` to `dest` (top-left) at 1:1 scale
    fn blit(&mut self, image: &Self::Image, src: &TileRect, dest: Vec2);
}

/// Fetches and decodes images by path
pub trait ImageLoader {
    type Image;

    fn load(&self, path: &str) -> AssetFuture<Self::Image>;
}

/// Which deferred callback a timer belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Close the tone gate for the oldest sounding note
    NoteEnd,
    /// Double-tap window elapsed
    DoubleTapExpiry,
}

/// Handle for a pending one-shot timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(pub u32);

/// Clock plus frame/timer scheduling.
///
/// Expired timers are delivered back through `Game::on_timer`, animation
/// frames through `Game::on_frame`.
pub trait Scheduler {
    /// Current time in milliseconds
    fn now(&self) -> f64;

    /// Arm one animation-frame callback
    fn request_frame(&mut self);

    fn set_timeout(&mut self, delay_ms: f64, kind: TimerKind) -> TimerHandle;

    fn clear_timeout(&mut self, handle: TimerHandle);
}
