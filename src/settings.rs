//! Game settings
//!
//! Construction parameters for the game. Missing fields fall back to the
//! defaults; values are taken as given without validation.

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_FPS, DEFAULT_HEIGHT, DEFAULT_SPEED, DEFAULT_WIDTH, PAUSE_TONE_HZ};
use crate::error::SettingsError;

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Canvas ===
    /// Canvas width in pixels
    pub width: u32,
    /// Canvas height in pixels
    pub height: u32,
    /// Path of the tileset image
    pub tileset_image: String,

    // === Loop ===
    /// Target frame rate
    pub fps: u32,
    /// Sprite speed in pixels per frame
    pub speed: f32,

    // === Audio ===
    /// Pause confirmation tone (Hz)
    pub pause_tone_hz: f32,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            tileset_image: "img/vase.png".to_string(),

            fps: DEFAULT_FPS,
            speed: DEFAULT_SPEED,

            pause_tone_hz: PAUSE_TONE_HZ,
            master_volume: 1.0,
            muted: false,
        }
    }
}

impl Settings {
    /// Element holding inline JSON settings
    const ELEMENT_ID: &'static str = "settings";

    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read settings from the page's inline JSON block (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let text = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(Self::ELEMENT_ID))
            .and_then(|el| el.text_content());

        if let Some(json) = text {
            match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from #{}", Self::ELEMENT_ID);
                    return settings;
                }
                Err(e) => log::warn!("Ignoring #{}: {}", Self::ELEMENT_ID, e),
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        log::debug!("No #{} block outside the browser", Self::ELEMENT_ID);
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_demo_page() {
        let settings = Settings::default();
        assert_eq!((settings.width, settings.height), (500, 400));
        assert_eq!(settings.tileset_image, "img/vase.png");
        assert_eq!(settings.fps, 30);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings = Settings::from_json(r#"{"width": 320, "tileset_image": "img/jar.png"}"#)
            .unwrap();
        assert_eq!(settings.width, 320);
        assert_eq!(settings.height, DEFAULT_HEIGHT);
        assert_eq!(settings.tileset_image, "img/jar.png");
        assert_eq!(settings.speed, DEFAULT_SPEED);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(Settings::from_json("{width: ").is_err());
        assert!(Settings::from_json(r#"{"fps": "fast"}"#).is_err());
    }
}
