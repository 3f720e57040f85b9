//! Error types
//!
//! Asset failures are recoverable (logged, game keeps running degraded).
//! Tile lookup failures are programming mistakes and abort the frame.

use thiserror::Error;

/// Failure to fetch or decode an external asset
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetError {
    /// Image could not be loaded; carries the requested path
    #[error("failed to load image: {path}")]
    Image { path: String },
    /// Audio sample could not be fetched or decoded
    #[error("failed to load sample {path}: {reason}")]
    Sample { path: String, reason: String },
}

/// Atlas insertion errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AtlasError {
    /// Tile rectangle does not fit inside the loaded image
    #[error("tile '{name}' ({x},{y} {w}x{h}) exceeds image bounds {image_w}x{image_h}")]
    OutOfBounds {
        name: String,
        x: u32,
        y: u32,
        w: u32,
        h: u32,
        image_w: u32,
        image_h: u32,
    },
}

/// Errors raised by the game loop
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("Tile not found for key: {0}")]
    TileNotFound(String),
    #[error("tileset image has not been loaded")]
    ImageNotLoaded,
    #[error(transparent)]
    Atlas(#[from] AtlasError),
    #[error(transparent)]
    UnknownEvent(#[from] UnknownEvent),
}

/// Settings could not be parsed
#[derive(Debug, Error)]
#[error("invalid settings: {0}")]
pub struct SettingsError(#[from] pub serde_json::Error);

/// Event name outside the lifecycle vocabulary
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown event: {0}")]
pub struct UnknownEvent(pub String);
