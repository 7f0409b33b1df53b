//! Ring Bounce - a bouncing-ball toy inside a circular boundary
//!
//! Core modules:
//! - `sim`: Frame-stepped simulation (integration, boundary reflection, effects)
//! - `events`: Host-facing hooks (collision sink, modifier registry)
//! - `settings`: Runtime feature toggles with JSON persistence
//!
//! The crate deliberately stops at the simulation surface: rendering and audio
//! consume the state exposed by `sim` but live in the host application.

pub mod events;
pub mod settings;
pub mod sim;

pub use events::{EventSink, HookEvent, ModifierRegistry, NullSink};
pub use settings::Settings;
pub use sim::{Ball, Boundary, GrowingEffect, SimConfig, World, tick};

use glam::DVec2;

/// Simulation configuration constants
pub mod consts {
    use glam::DVec2;

    /// Target frame rate for hosts driving the loop from wall-clock time
    pub const TICK_RATE: f64 = 60.0;
    /// Frame period at the target tick rate
    pub const FRAME_DT: f64 = 1.0 / TICK_RATE;

    /// Arena defaults (a 720x720 canvas with the ring centered in it)
    pub const DEFAULT_BOUNDARY_CENTER: DVec2 = DVec2::new(360.0, 360.0);
    pub const DEFAULT_BOUNDARY_RADIUS: f64 = 300.0;
    pub const DEFAULT_BOUNDARY_THICKNESS: f64 = 10.0;

    /// Physics defaults
    pub const DEFAULT_GRAVITY: DVec2 = DVec2::new(0.0, 300.0);
    /// Velocity is multiplied by this every tick. Values above 1.0 add energy.
    pub const DEFAULT_AIR_RESISTANCE: f64 = 0.9995;

    /// Ball defaults
    pub const DEFAULT_BALL_SIZE: f64 = 100.0;
    pub const SPAWN_SPEED_MIN: f64 = 100.0;
    pub const SPAWN_SPEED_MAX: f64 = 1000.0;

    /// Collision trail lines never fade below this opacity while stored
    pub const LINE_OPACITY_FLOOR: f64 = 90.0;
    /// Opacity all stored lines snap back to on a new collision
    pub const LINE_OPACITY_MAX: f64 = 255.0;
    /// Stored collision points beyond this count are dropped oldest-first
    pub const DEFAULT_MAX_TRAIL_LINES: usize = 64;
    /// Trail-line segments shorter than this are not worth drawing
    pub const LINE_MIN_LENGTH: f64 = 5.0;

    /// Impact burst spawned at the collision point (foreground)
    pub const IMPACT_RADIUS: f64 = 25.0;
    pub const IMPACT_GROWTH: f64 = 10.0;
    /// Background pulse spawned at the boundary center on collision
    pub const PULSE_GROWTH: f64 = 25.0;
    /// Full-strength effect alpha and the default fade rate (alpha units/sec)
    pub const EFFECT_ALPHA: f64 = 255.0;
    pub const EFFECT_FADE: f64 = 255.0;

    /// Continuous trail: a shrinking ghost of the ball left every tick
    pub const TRAIL_GROWTH: f64 = -140.0;
    pub const TRAIL_ALPHA: f64 = 150.0;
    pub const TRAIL_FADE: f64 = 200.0;

    /// Ring hue drift in degrees per second while hue cycling is on
    pub const HUE_CYCLE_RATE: f64 = 10.0;
}

/// Unit vector at the given angle (radians, counter-clockwise from +x)
#[inline]
pub fn unit_from_angle(theta: f64) -> DVec2 {
    DVec2::new(theta.cos(), theta.sin())
}
