//! Tile atlas: one source image plus named sub-rectangles
//!
//! Tile names keep their first insertion order; overwriting a name replaces
//! its rectangle but not its index.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{AssetError, AtlasError};
use crate::platform::{ImageBounds, ImageLoader};

/// Source region inside the atlas image, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileRect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl TileRect {
    pub const fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    /// Whether the rect lies fully inside a `width` x `height` image
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        let right = self.x.checked_add(self.w);
        let bottom = self.y.checked_add(self.h);
        matches!((right, bottom), (Some(r), Some(b)) if r <= width && b <= height)
    }
}

/// Image atlas with a name -> region table
#[derive(Debug)]
pub struct Atlas<I> {
    image: Option<I>,
    tiles: HashMap<String, TileRect>,
    tile_index: Vec<String>,
}

impl<I> Default for Atlas<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I> Atlas<I> {
    pub fn new() -> Self {
        Self {
            image: None,
            tiles: HashMap::new(),
            tile_index: Vec::new(),
        }
    }

    /// Load the source image through `loader`.
    ///
    /// Resolves to `path` on success; on failure the error carries the same
    /// path and any previously loaded image is kept.
    pub async fn load_image<L>(&mut self, loader: &L, path: &str) -> Result<String, AssetError>
    where
        L: ImageLoader<Image = I>,
    {
        match loader.load(path).await {
            Ok(image) => {
                self.image = Some(image);
                Ok(path.to_string())
            }
            Err(err) => {
                log::debug!("atlas load failed: {}", err);
                Err(AssetError::Image {
                    path: path.to_string(),
                })
            }
        }
    }

    pub fn image(&self) -> Option<&I> {
        self.image.as_ref()
    }

    pub fn tile(&self, name: &str) -> Option<&TileRect> {
        self.tiles.get(name)
    }

    /// Position of `name` in insertion order
    pub fn get_index(&self, name: &str) -> Option<usize> {
        self.tile_index.iter().position(|k| k == name)
    }

    pub fn get_key(&self, index: usize) -> Option<&str> {
        self.tile_index.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tile_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tile_index.is_empty()
    }
}

impl<I: ImageBounds> Atlas<I> {
    /// Insert or overwrite a named tile.
    ///
    /// Once an image is loaded the rect must fit inside it; before that no
    /// check is possible and any rect is accepted.
    pub fn add(&mut self, name: impl Into<String>, rect: TileRect) -> Result<(), AtlasError> {
        let name = name.into();
        if let Some(image) = &self.image {
            let (image_w, image_h) = image.dimensions();
            if !rect.fits_within(image_w, image_h) {
                return Err(AtlasError::OutOfBounds {
                    name,
                    x: rect.x,
                    y: rect.y,
                    w: rect.w,
                    h: rect.h,
                    image_w,
                    image_h,
                });
            }
        }

        if self.tiles.insert(name.clone(), rect).is_none() {
            self.tile_index.push(name);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::headless::{HeadlessImage, MemoryImageLoader};
    use proptest::prelude::*;

    fn loaded_atlas(w: u32, h: u32) -> Atlas<HeadlessImage> {
        let loader = MemoryImageLoader::new().with_image("img/sheet.png", w, h);
        let mut atlas = Atlas::new();
        let path = pollster::block_on(atlas.load_image(&loader, "img/sheet.png"));
        assert_eq!(path.as_deref(), Ok("img/sheet.png"));
        atlas
    }

    #[test]
    fn test_index_and_key_lookup() {
        let mut atlas: Atlas<HeadlessImage> = Atlas::new();
        atlas.add("vase", TileRect::new(0, 0, 32, 32)).unwrap();
        atlas.add("urn", TileRect::new(32, 0, 32, 32)).unwrap();

        assert_eq!(atlas.get_index("vase"), Some(0));
        assert_eq!(atlas.get_index("urn"), Some(1));
        assert_eq!(atlas.get_index("jug"), None);
        assert_eq!(atlas.get_key(1), Some("urn"));
        assert_eq!(atlas.get_key(2), None);
    }

    #[test]
    fn test_overwrite_keeps_position() {
        let mut atlas: Atlas<HeadlessImage> = Atlas::new();
        atlas.add("a", TileRect::new(0, 0, 8, 8)).unwrap();
        atlas.add("b", TileRect::new(8, 0, 8, 8)).unwrap();
        atlas.add("a", TileRect::new(16, 0, 8, 8)).unwrap();

        assert_eq!(atlas.len(), 2);
        assert_eq!(atlas.get_index("a"), Some(0));
        assert_eq!(atlas.tile("a"), Some(&TileRect::new(16, 0, 8, 8)));
    }

    #[test]
    fn test_load_image_failure_reports_path() {
        let loader = MemoryImageLoader::new();
        let mut atlas: Atlas<HeadlessImage> = Atlas::new();

        let result = pollster::block_on(atlas.load_image(&loader, "img/missing.png"));

        assert_eq!(
            result,
            Err(AssetError::Image {
                path: "img/missing.png".to_string()
            })
        );
        assert!(atlas.image().is_none());
    }

    #[test]
    fn test_add_rejects_rect_outside_loaded_image() {
        let mut atlas = loaded_atlas(64, 32);

        assert!(atlas.add("left", TileRect::new(0, 0, 32, 32)).is_ok());
        assert!(atlas.add("right", TileRect::new(32, 0, 32, 32)).is_ok());
        let err = atlas.add("spill", TileRect::new(48, 0, 32, 32)).unwrap_err();
        assert!(matches!(err, AtlasError::OutOfBounds { image_w: 64, .. }));
        assert_eq!(atlas.get_index("spill"), None);
    }

    #[test]
    fn test_fits_within_handles_overflow() {
        assert!(!TileRect::new(u32::MAX, 0, 2, 2).fits_within(u32::MAX, 10));
        assert!(TileRect::new(0, 0, 10, 10).fits_within(10, 10));
    }

    proptest! {
        #[test]
        fn prop_index_key_round_trip(names in prop::collection::vec("[a-d]{1,3}", 0..24)) {
            let mut atlas: Atlas<HeadlessImage> = Atlas::new();
            for (i, name) in names.iter().enumerate() {
                atlas.add(name.clone(), TileRect::new(i as u32, 0, 1, 1)).unwrap();
            }
            for name in &names {
                let index = atlas.get_index(name);
                prop_assert!(index.is_some());
                prop_assert_eq!(atlas.get_key(index.unwrap()), Some(name.as_str()));
            }
            prop_assert_eq!(atlas.get_index("never-added"), None);
        }
    }
}
