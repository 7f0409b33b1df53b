//! Frame-stepped simulation module
//!
//! All engine logic lives here. Single-threaded and synchronous:
//! - One pass per tick: integrate -> collide -> prune merges -> age effects
//! - Seeded RNG only
//! - Stable ball order (spawn order)
//! - No rendering or platform dependencies; the only calls out of the tick
//!   are the explicit event-sink and modifier hooks
pub mod collision;
pub mod state;
pub mod tick;

pub use collision::{CollisionResult, ball_boundary_collision, reflect_velocity};
pub use state::{
    Ball, Boundary, GrowingEffect, Layer, Rgb, SimConfig, TrailLine, TrailSegment, World,
};
pub use tick::{CollisionEvent, TickInput, tick};
