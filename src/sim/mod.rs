//! Simulation module
//!
//! Pure frame logic with no rendering or platform dependencies:
//! - Session clock and pause flag
//! - Sprite motion with edge wraparound
//! - Axis-aligned collision helpers

pub mod collision;
pub mod motion;
pub mod state;

pub use collision::{Body, ElasticResult, Rect, check_collision, collides, elastic_collision};
pub use motion::{advance, wrap_axis};
pub use state::{RunState, Session, Sprite};
