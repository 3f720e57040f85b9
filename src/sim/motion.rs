//! Sprite motion
//!
//! Fixed per-frame speed, no acceleration. Positions wrap per axis: leaving
//! one edge re-enters at the opposite one.

use glam::Vec2;

use super::state::Sprite;
use crate::input::Directions;

/// Wrap one coordinate into `[0, max]`.
///
/// Only strictly outside values move; `0` and `max` stay put.
#[inline]
pub fn wrap_axis(value: f32, max: f32) -> f32 {
    if value < 0.0 {
        max
    } else if value > max {
        0.0
    } else {
        value
    }
}

/// Step `sprite` by `speed` in the held directions, then wrap to `bounds`
pub fn advance(sprite: &mut Sprite, dirs: Directions, speed: f32, bounds: Vec2) {
    if dirs.left {
        sprite.pos.x -= speed;
    } else if dirs.right {
        sprite.pos.x += speed;
    }
    if dirs.up {
        sprite.pos.y -= speed;
    } else if dirs.down {
        sprite.pos.y += speed;
    }

    sprite.pos.x = wrap_axis(sprite.pos.x, bounds.x);
    sprite.pos.y = wrap_axis(sprite.pos.y, bounds.y);
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDS: Vec2 = Vec2::new(500.0, 400.0);

    fn held(left: bool, right: bool, up: bool, down: bool) -> Directions {
        Directions {
            left,
            right,
            up,
            down,
        }
    }

    #[test]
    fn test_step_in_held_directions() {
        let mut sprite = Sprite::new("vase", Vec2::new(100.0, 100.0));
        advance(&mut sprite, held(true, false, false, true), 5.0, BOUNDS);
        assert_eq!(sprite.pos, Vec2::new(95.0, 105.0));
    }

    #[test]
    fn test_left_wins_over_right() {
        let mut sprite = Sprite::new("vase", Vec2::new(100.0, 100.0));
        advance(&mut sprite, held(true, true, true, true), 5.0, BOUNDS);
        assert_eq!(sprite.pos, Vec2::new(95.0, 95.0));
    }

    #[test]
    fn test_wraparound_both_edges() {
        let mut sprite = Sprite::new("vase", Vec2::new(4.0, 100.0));
        advance(&mut sprite, held(true, false, false, false), 5.0, BOUNDS);
        assert_eq!(sprite.pos.x, BOUNDS.x);

        let mut sprite = Sprite::new("vase", Vec2::new(BOUNDS.x - 4.0, 100.0));
        advance(&mut sprite, held(false, true, false, false), 5.0, BOUNDS);
        assert_eq!(sprite.pos.x, 0.0);

        let mut sprite = Sprite::new("vase", Vec2::new(10.0, 398.0));
        advance(&mut sprite, held(false, false, false, true), 5.0, BOUNDS);
        assert_eq!(sprite.pos.y, 0.0);
    }

    #[test]
    fn test_wrap_axis_boundaries() {
        assert_eq!(wrap_axis(-1.0, 500.0), 500.0);
        assert_eq!(wrap_axis(501.0, 500.0), 0.0);
        assert_eq!(wrap_axis(0.0, 500.0), 0.0);
        assert_eq!(wrap_axis(500.0, 500.0), 500.0);
    }
}
