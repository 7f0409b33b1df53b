//! Circular-boundary collision detection and response
//!
//! A ball collides when its rim crosses the inner face of the boundary ring.
//! The reflection is elastic: the velocity component along the boundary
//! normal is negated, and the ball is snapped back to the contact radius so
//! it never sinks into the wall.

use glam::DVec2;

use super::state::Boundary;

/// Result of a boundary check
#[derive(Debug, Clone, Copy)]
pub struct CollisionResult {
    pub hit: bool,
    /// Contact point on the wall's inner face
    pub point: DVec2,
    /// Unit normal at the contact, pointing from the boundary center outward
    pub normal: DVec2,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: DVec2::ZERO,
            normal: DVec2::ZERO,
        }
    }
}

/// Check a ball against the inside of the circular boundary.
///
/// A ball sitting exactly on the boundary center has no defined normal; that
/// case reports a miss and the tick proceeds as if nothing happened.
pub fn ball_boundary_collision(pos: DVec2, radius: f64, boundary: &Boundary) -> CollisionResult {
    let to_center = pos - boundary.center;
    let dist = to_center.length();

    if dist + radius <= boundary.inner_limit() {
        return CollisionResult::miss();
    }
    if dist == 0.0 {
        // Degenerate geometry: no normal to reflect across
        return CollisionResult::miss();
    }

    let normal = to_center / dist;
    CollisionResult {
        hit: true,
        point: boundary.center + normal * boundary.inner_limit(),
        normal,
    }
}

/// Reflect velocity off a surface: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: DVec2, normal: DVec2) -> DVec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Ball center position resting exactly at the contact radius
#[inline]
pub fn resolve_position(boundary: &Boundary, normal: DVec2, radius: f64) -> DVec2 {
    boundary.center + normal * (boundary.inner_limit() - radius)
}
