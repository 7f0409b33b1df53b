//! Frame-stepped world update
//!
//! One `tick` is one pass: integrate every ball, resolve boundary collisions
//! and dispatch their effects and notifications, prune merged balls, then age
//! the effect circles. The step is pure apart from the explicit hook calls
//! (event sink and modifier registry) made at defined points.
//!
//! `dt` is used as given, with no sub-stepping: a large spike can tunnel a
//! fast ball through the boundary. That is an accepted limitation of the toy.

use glam::DVec2;

use super::collision::{ball_boundary_collision, reflect_velocity, resolve_position};
use super::state::{Ball, GrowingEffect, Layer, Rgb, World};
use crate::consts::*;
use crate::events::{EventSink, HookEvent, ModifierRegistry};
use crate::settings::Settings;

/// Commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Spawn a new ball at the boundary center
    pub spawn: bool,
    /// Color for the spawned ball; a random hue when `None`
    pub spawn_color: Option<Rgb>,
}

/// One boundary contact for one ball in one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionEvent {
    pub ball_id: u32,
    /// Contact point on the wall's inner face
    pub point: DVec2,
}

/// Advance the world by one frame. Returns the collision events that fired,
/// after all of their side effects have been dispatched.
pub fn tick(
    world: &mut World,
    input: &TickInput,
    settings: &Settings,
    sink: &mut dyn EventSink,
    modifiers: &mut ModifierRegistry,
    dt: f64,
) -> Vec<CollisionEvent> {
    debug_assert!(dt >= 0.0, "tick called with negative dt");

    world.time_ticks += 1;

    if settings.change_hue {
        world.hue = (world.hue + dt * HUE_CYCLE_RATE) % 360.0;
    }

    if input.spawn {
        let id = world.spawn_ball(input.spawn_color);
        if let Some(ball) = world.balls.iter_mut().find(|b| b.id == id) {
            modifiers.apply(HookEvent::Spawn, ball);
            enforce_ball_invariants(ball, world.boundary.center);
        }
    }

    // Integrate and collide. Effect spawns are deferred so the ball loop
    // holds the only mutable borrow.
    let boundary = world.boundary;
    let gravity = world.config.gravity;
    let air_resistance = world.config.air_resistance;

    let mut events: Vec<CollisionEvent> = Vec::new();
    let mut new_effects: Vec<GrowingEffect> = Vec::new();

    for ball in &mut world.balls {
        ball.vel += gravity * dt;
        ball.vel *= air_resistance;
        ball.pos += ball.vel * dt;

        let contact = ball_boundary_collision(ball.pos, ball.radius(), &boundary);
        if contact.hit {
            ball.vel = reflect_velocity(ball.vel, contact.normal);
            ball.pos = resolve_position(&boundary, contact.normal, ball.radius());
            events.push(CollisionEvent {
                ball_id: ball.id,
                point: contact.point,
            });
        }

        ball.tick_invulnerability(dt);

        if settings.show_trail {
            new_effects.push(GrowingEffect::new(
                ball.pos,
                ball.radius(),
                TRAIL_GROWTH,
                ball.color,
                TRAIL_ALPHA,
                TRAIL_FADE,
                Layer::Foreground,
            ));
        }

        ball.fade_lines(dt);
    }
    world.effects.append(&mut new_effects);

    // Dispatch collision side effects in their defined order: trail line,
    // impact burst, background pulse, sink, modifiers.
    for event in &events {
        let Some(idx) = world.balls.iter().position(|b| b.id == event.ball_id) else {
            continue;
        };
        let color = world.balls[idx].color;

        if settings.show_lines {
            let max_lines = world.config.max_trail_lines;
            world.balls[idx].record_collision_line(event.point, max_lines);
        }

        if settings.show_impact_circles {
            world.effects.push(GrowingEffect::new(
                event.point,
                IMPACT_RADIUS,
                IMPACT_GROWTH,
                color,
                EFFECT_ALPHA,
                EFFECT_FADE,
                Layer::Foreground,
            ));
        }

        if settings.show_background_pulse {
            world.effects.push(GrowingEffect::new(
                boundary.center,
                boundary.radius + boundary.thickness / 2.0,
                PULSE_GROWTH,
                color,
                EFFECT_ALPHA,
                EFFECT_FADE,
                Layer::Background,
            ));
        }

        sink.on_bounce(&world.balls[idx]);

        modifiers.apply(HookEvent::Bounce, &mut world.balls[idx]);
        enforce_ball_invariants(&mut world.balls[idx], boundary.center);
    }

    // Merge pruning: a non-invulnerable ball consumes every later ball it
    // overlaps. Invulnerability exempts the initiator, never the target.
    let removed = prune_merged(&mut world.balls);
    for ball in &removed {
        log::debug!("ball {} merged away", ball.id);
        sink.on_ball_removed(ball);
    }

    world.effects.retain_mut(|effect| effect.step(dt));

    events
}

/// Consume-on-contact pruning over a stable (spawn) order. Returns the
/// removed balls so the caller can notify the sink.
fn prune_merged(balls: &mut Vec<Ball>) -> Vec<Ball> {
    let mut removed = Vec::new();
    let mut i = 0;
    while i < balls.len() {
        if balls[i].invulnerable {
            i += 1;
            continue;
        }
        let pos = balls[i].pos;
        let radius = balls[i].radius();
        let mut j = i + 1;
        while j < balls.len() {
            if pos.distance(balls[j].pos) < radius + balls[j].radius() {
                removed.push(balls.remove(j));
            } else {
                j += 1;
            }
        }
        i += 1;
    }
    removed
}

/// Modifiers mutate balls in place; reject anything that would corrupt the
/// simulation rather than crash the tick loop.
fn enforce_ball_invariants(ball: &mut Ball, fallback_pos: DVec2) {
    if !ball.size.is_finite() || ball.size <= 0.0 {
        log::warn!(
            "modifier left ball {} with invalid size {}; clamping",
            ball.id,
            ball.size
        );
        ball.size = 1.0;
    }
    if !ball.pos.is_finite() || !ball.vel.is_finite() {
        log::warn!(
            "modifier left ball {} with non-finite motion; resetting",
            ball.id
        );
        ball.pos = fallback_pos;
        ball.vel = DVec2::ZERO;
    }
}
