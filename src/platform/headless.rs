//! Headless backend
//!
//! Recording surface, silent audio and a manually advanced clock. Drives the
//! native smoke run and the game tests.

use std::cell::Cell;
use std::collections::{HashMap, HashSet};

use glam::Vec2;

use super::{AssetFuture, ImageBounds, ImageLoader, Scheduler, Surface, TimerHandle, TimerKind};
use crate::atlas::TileRect;
use crate::audio::ToneBackend;
use crate::error::{AssetError, GameError};
use crate::game::Game;

/// In-memory stand-in for a decoded bitmap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlessImage {
    pub path: String,
    pub width: u32,
    pub height: u32,
}

impl ImageBounds for HeadlessImage {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Serves images registered up front; anything else fails to load
#[derive(Debug, Default, Clone)]
pub struct MemoryImageLoader {
    images: HashMap<String, (u32, u32)>,
}

impl MemoryImageLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_image(mut self, path: &str, width: u32, height: u32) -> Self {
        self.images.insert(path.to_string(), (width, height));
        self
    }
}

impl ImageLoader for MemoryImageLoader {
    type Image = HeadlessImage;

    fn load(&self, path: &str) -> AssetFuture<HeadlessImage> {
        let result = match self.images.get(path) {
            Some(&(width, height)) => Ok(HeadlessImage {
                path: path.to_string(),
                width,
                height,
            }),
            None => Err(AssetError::Image {
                path: path.to_string(),
            }),
        };
        Box::pin(std::future::ready(result))
    }
}

/// One recorded drawing command
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Clear { x: f64, y: f64, w: f64, h: f64 },
    Blit { image: String, src: TileRect, dest: Vec2 },
}

/// Surface that records every call
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub calls: Vec<DrawCall>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of clear calls, i.e. render passes
    pub fn passes(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::Clear { .. }))
            .count()
    }

    /// Destination of the most recent blit
    pub fn last_blit(&self) -> Option<Vec2> {
        self.calls.iter().rev().find_map(|c| match c {
            DrawCall::Blit { dest, .. } => Some(*dest),
            DrawCall::Clear { .. } => None,
        })
    }
}

impl Surface for RecordingSurface {
    type Image = HeadlessImage;

    fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.calls.push(DrawCall::Clear { x, y, w, h });
    }

    fn blit(&mut self, image: &HeadlessImage, src: &TileRect, dest: Vec2) {
        self.calls.push(DrawCall::Blit {
            image: image.path.clone(),
            src: *src,
            dest,
        });
    }
}

/// Decoded sample placeholder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlessSample {
    pub path: String,
}

/// Audio backend that records parameter changes instead of making sound
#[derive(Debug, Default)]
pub struct SilentAudio {
    pub frequency: f32,
    pub gain: f32,
    /// Every frequency set, in order
    pub notes: Vec<f32>,
    /// (path, volume) of each sample played
    pub samples_played: Vec<(String, f32)>,
    missing: HashSet<String>,
}

impl SilentAudio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `fetch_sample` fail for `path`
    pub fn with_missing(mut self, path: &str) -> Self {
        self.missing.insert(path.to_string());
        self
    }
}

impl ToneBackend for SilentAudio {
    type Sample = HeadlessSample;

    fn set_frequency(&mut self, hz: f32) {
        self.frequency = hz;
        self.notes.push(hz);
    }

    fn set_gain(&mut self, gain: f32) {
        self.gain = gain;
    }

    fn play_sample(&mut self, sample: &HeadlessSample, volume: f32) {
        self.samples_played.push((sample.path.clone(), volume));
    }

    fn fetch_sample(&self, path: &str) -> AssetFuture<HeadlessSample> {
        let result = if self.missing.contains(path) {
            Err(AssetError::Sample {
                path: path.to_string(),
                reason: "not found".to_string(),
            })
        } else {
            Ok(HeadlessSample {
                path: path.to_string(),
            })
        };
        Box::pin(std::future::ready(result))
    }
}

#[derive(Debug, Clone, Copy)]
struct PendingTimer {
    handle: TimerHandle,
    due: f64,
    kind: TimerKind,
}

/// Scheduler driven by an explicit clock
#[derive(Debug, Default)]
pub struct ManualScheduler {
    now: Cell<f64>,
    frame_requested: bool,
    frames_requested: usize,
    timers: Vec<PendingTimer>,
    next_id: u32,
}

impl ManualScheduler {
    pub fn new(start_ms: f64) -> Self {
        Self {
            now: Cell::new(start_ms),
            ..Default::default()
        }
    }

    pub fn set_now(&self, ms: f64) {
        self.now.set(ms);
    }

    /// Whether an animation frame is waiting
    pub fn frame_pending(&self) -> bool {
        self.frame_requested
    }

    /// Total frame requests seen
    pub fn frames_requested(&self) -> usize {
        self.frames_requested
    }

    pub fn take_frame(&mut self) -> bool {
        std::mem::take(&mut self.frame_requested)
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Move the clock forward and return the timers that came due, oldest first
    pub fn advance(&mut self, ms: f64) -> Vec<(TimerHandle, TimerKind)> {
        let now = self.now.get() + ms;
        self.now.set(now);

        let mut due: Vec<PendingTimer> = Vec::new();
        self.timers.retain(|t| {
            if t.due <= now {
                due.push(*t);
                false
            } else {
                true
            }
        });
        due.sort_by(|a, b| a.due.total_cmp(&b.due));
        due.into_iter().map(|t| (t.handle, t.kind)).collect()
    }
}

impl Scheduler for ManualScheduler {
    fn now(&self) -> f64 {
        self.now.get()
    }

    fn request_frame(&mut self) {
        self.frame_requested = true;
        self.frames_requested += 1;
    }

    fn set_timeout(&mut self, delay_ms: f64, kind: TimerKind) -> TimerHandle {
        self.next_id += 1;
        let handle = TimerHandle(self.next_id);
        self.timers.push(PendingTimer {
            handle,
            due: self.now.get() + delay_ms,
            kind,
        });
        handle
    }

    fn clear_timeout(&mut self, handle: TimerHandle) {
        self.timers.retain(|t| t.handle != handle);
    }
}

/// Game wired to the headless backend
pub type HeadlessGame = Game<RecordingSurface, SilentAudio, ManualScheduler>;

/// Advance the clock by `ms`, fire due timers, then run the pending frame
pub fn step(game: &mut HeadlessGame, ms: f64) -> Result<(), GameError> {
    let due = game.scheduler_mut().advance(ms);
    for (handle, kind) in due {
        game.on_timer(handle, kind);
    }
    if game.scheduler_mut().take_frame() {
        game.on_frame()?;
    }
    Ok(())
}
