//! Collision helpers
//!
//! Axis-aligned box overlap and the 1D-per-axis elastic velocity exchange.
//! Not used by the single-sprite demo loop.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle (top-left origin)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// True unless the boxes are separated on some axis.
///
/// Boxes that only share an edge count as separated.
pub fn collides(source: &Rect, target: &Rect) -> bool {
    !((source.y + source.height) <= target.y
        || source.y >= (target.y + target.height)
        || (source.x + source.width) <= target.x
        || source.x >= (target.x + target.width))
}

/// Run `on_hit` only when the boxes overlap
pub fn check_collision<F>(source: &Rect, target: &Rect, on_hit: F) -> bool
where
    F: FnOnce(&Rect, &Rect),
{
    if collides(source, target) {
        on_hit(source, target);
        true
    } else {
        false
    }
}

/// Body taking part in an elastic collision
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub mass: f32,
    pub velocity: Vec2,
}

/// Post-collision velocities
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElasticResult {
    pub a: Vec2,
    pub b: Vec2,
}

/// Closed-form elastic exchange, applied independently per axis
pub fn elastic_collision(a: &Body, b: &Body) -> ElasticResult {
    let total = a.mass + b.mass;
    ElasticResult {
        a: (a.velocity * (a.mass - b.mass) + 2.0 * b.mass * b.velocity) / total,
        b: (b.velocity * (b.mass - a.mass) + 2.0 * a.mass * a.velocity) / total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_overlapping_boxes_collide() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert!(collides(&a, &b));
    }

    #[test]
    fn test_separated_boxes_miss() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let right = Rect::new(10.5, 0.0, 10.0, 10.0);
        let below = Rect::new(0.0, 11.0, 10.0, 10.0);
        assert!(!collides(&a, &right));
        assert!(!collides(&a, &below));
    }

    #[test]
    fn test_touching_edges_do_not_collide() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let side = Rect::new(10.0, 0.0, 10.0, 10.0);
        let top = Rect::new(0.0, -10.0, 10.0, 10.0);
        assert!(!collides(&a, &side));
        assert!(!collides(&side, &a));
        assert!(!collides(&a, &top));
    }

    #[test]
    fn test_check_collision_callback_only_on_hit() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let near = Rect::new(2.0, 2.0, 2.0, 2.0);
        let far = Rect::new(50.0, 50.0, 2.0, 2.0);

        let mut hits = 0;
        check_collision(&a, &near, |_, _| hits += 1);
        check_collision(&a, &far, |_, _| hits += 1);
        assert_eq!(hits, 1);
    }

    #[test]
    fn test_elastic_equal_mass_swaps_velocities() {
        let a = Body {
            mass: 2.0,
            velocity: Vec2::new(3.0, -1.0),
        };
        let b = Body {
            mass: 2.0,
            velocity: Vec2::new(-4.0, 0.5),
        };
        let out = elastic_collision(&a, &b);
        assert_eq!(out.a, b.velocity);
        assert_eq!(out.b, a.velocity);
    }

    #[test]
    fn test_elastic_conserves_momentum() {
        let a = Body {
            mass: 1.0,
            velocity: Vec2::new(6.0, 2.0),
        };
        let b = Body {
            mass: 3.0,
            velocity: Vec2::new(-2.0, 0.0),
        };
        let out = elastic_collision(&a, &b);
        let before = a.velocity * a.mass + b.velocity * b.mass;
        let after = out.a * a.mass + out.b * b.mass;
        assert!((before - after).length() < 1e-4);
    }

    proptest! {
        #[test]
        fn prop_collides_is_symmetric(
            ax in -100.0f32..100.0, ay in -100.0f32..100.0,
            aw in 0.0f32..50.0, ah in 0.0f32..50.0,
            bx in -100.0f32..100.0, by in -100.0f32..100.0,
            bw in 0.0f32..50.0, bh in 0.0f32..50.0,
        ) {
            let a = Rect::new(ax, ay, aw, ah);
            let b = Rect::new(bx, by, bw, bh);
            prop_assert_eq!(collides(&a, &b), collides(&b, &a));

            let overlap_x = ax < bx + bw && bx < ax + aw;
            let overlap_y = ay < by + bh && by < ay + ah;
            prop_assert_eq!(collides(&a, &b), overlap_x && overlap_y);
        }
    }
}
