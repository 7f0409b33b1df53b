//! Simulation state and core types
//!
//! Everything a renderer needs lives here as plain public fields: ball
//! positions, trail lines, effect circles. The `World` owns all of it
//! exclusively; there are no process-wide singletons.

use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::unit_from_angle;

/// Solid RGB color, 8 bits per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Self = Self {
        r: 255,
        g: 255,
        b: 255,
    };

    /// Convert from HSV. Hue in degrees (wrapped into [0, 360)), saturation
    /// and value in [0, 1].
    pub fn from_hsv(hue: f64, saturation: f64, value: f64) -> Self {
        let h = hue.rem_euclid(360.0);
        let c = value * saturation;
        let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
        let m = value - c;

        let (r1, g1, b1) = match (h / 60.0) as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };

        Self {
            r: ((r1 + m) * 255.0).round() as u8,
            g: ((g1 + m) * 255.0).round() as u8,
            b: ((b1 + m) * 255.0).round() as u8,
        }
    }
}

/// Draw layer for effects. Background effects render before the boundary
/// ring, foreground effects after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Layer {
    Background,
    Foreground,
}

/// A transient growing (or shrinking) circle that fades out over time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrowingEffect {
    pub pos: DVec2,
    pub radius: f64,
    /// Radius change in units/sec; negative values shrink the circle
    pub growth_rate: f64,
    pub color: Rgb,
    /// Current opacity in [0, 255]
    pub alpha: f64,
    /// Alpha loss in units/sec
    pub fade_rate: f64,
    pub layer: Layer,
}

impl GrowingEffect {
    pub fn new(
        pos: DVec2,
        radius: f64,
        growth_rate: f64,
        color: Rgb,
        alpha: f64,
        fade_rate: f64,
        layer: Layer,
    ) -> Self {
        Self {
            pos,
            radius,
            growth_rate,
            color,
            alpha,
            fade_rate,
            layer,
        }
    }

    /// Advance the animation. Returns whether the effect is still live.
    pub fn step(&mut self, dt: f64) -> bool {
        self.radius = (self.radius + self.growth_rate * dt).max(0.0);
        self.alpha = (self.alpha - self.fade_rate * dt).clamp(0.0, 255.0);
        self.alpha > 0.0 && self.radius > 0.0
    }
}

/// One stored collision point with the current opacity of its trail line
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TrailLine {
    pub point: DVec2,
    pub opacity: f64,
}

/// A draw-ready trail-line segment from a past collision point toward the
/// ball, with the near-ball end shortened (see [`Ball::trail_segments`])
#[derive(Debug, Clone, Copy)]
pub struct TrailSegment {
    pub from: DVec2,
    pub to: DVec2,
    pub opacity: f64,
}

/// The circular arena wall
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Boundary {
    pub center: DVec2,
    pub radius: f64,
    pub thickness: f64,
}

impl Default for Boundary {
    fn default() -> Self {
        Self {
            center: DEFAULT_BOUNDARY_CENTER,
            radius: DEFAULT_BOUNDARY_RADIUS,
            thickness: DEFAULT_BOUNDARY_THICKNESS,
        }
    }
}

impl Boundary {
    /// Radius of the wall's inner face, where balls make contact
    #[inline]
    pub fn inner_limit(&self) -> f64 {
        self.radius - self.thickness / 2.0
    }
}

/// Tunables fixed for a session. `air_resistance` is a per-tick velocity
/// multiplier, not a physical law: values above 1.0 pump energy in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    pub gravity: DVec2,
    pub air_resistance: f64,
    /// Diameter of newly spawned balls
    pub ball_size: f64,
    /// Spawn speed range, sampled uniformly
    pub min_spawn_speed: f64,
    pub max_spawn_speed: f64,
    /// How long a new ball stays exempt from initiating merges.
    /// `None` means permanently.
    pub invulnerability_secs: Option<f64>,
    /// Oldest collision points past this count are discarded
    pub max_trail_lines: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            gravity: DEFAULT_GRAVITY,
            air_resistance: DEFAULT_AIR_RESISTANCE,
            ball_size: DEFAULT_BALL_SIZE,
            min_spawn_speed: SPAWN_SPEED_MIN,
            max_spawn_speed: SPAWN_SPEED_MAX,
            invulnerability_secs: None,
            max_trail_lines: DEFAULT_MAX_TRAIL_LINES,
        }
    }
}

/// A ball entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub id: u32,
    pub pos: DVec2,
    pub vel: DVec2,
    /// Diameter; modifiers may change it between ticks
    pub size: f64,
    pub color: Rgb,
    /// While set, this ball never initiates a merge (it can still be consumed)
    pub invulnerable: bool,
    /// Remaining invulnerability in seconds; `None` counts down never
    pub invulnerable_timer: Option<f64>,
    /// Past collision points, oldest first
    pub trail: Vec<TrailLine>,
}

impl Ball {
    pub fn new(id: u32, pos: DVec2, vel: DVec2, size: f64, color: Rgb) -> Self {
        Self {
            id,
            pos,
            vel,
            size,
            color,
            invulnerable: true,
            invulnerable_timer: None,
            trail: Vec::new(),
        }
    }

    #[inline]
    pub fn radius(&self) -> f64 {
        self.size / 2.0
    }

    /// Store a new collision point and snap every stored line back to full
    /// opacity. History is capped at `max_lines`, oldest dropped first.
    pub(crate) fn record_collision_line(&mut self, point: DVec2, max_lines: usize) {
        self.trail.push(TrailLine {
            point,
            opacity: LINE_OPACITY_MAX,
        });
        for line in &mut self.trail {
            line.opacity = LINE_OPACITY_MAX;
        }
        if self.trail.len() > max_lines {
            let excess = self.trail.len() - max_lines;
            self.trail.drain(..excess);
        }
    }

    /// Fade stored lines toward the opacity floor
    pub(crate) fn fade_lines(&mut self, dt: f64) {
        for line in &mut self.trail {
            line.opacity = (line.opacity - dt * 255.0).max(LINE_OPACITY_FLOOR);
        }
    }

    /// Tick down the invulnerability window, if it is finite
    pub(crate) fn tick_invulnerability(&mut self, dt: f64) {
        if !self.invulnerable {
            return;
        }
        if let Some(timer) = &mut self.invulnerable_timer {
            *timer -= dt;
            if *timer <= 0.0 {
                self.invulnerable = false;
                self.invulnerable_timer = None;
            }
        }
    }

    /// Draw-ready trail lines from each stored collision point to the ball.
    ///
    /// Purely cosmetic: the near-wall end is pulled toward the ball by
    /// `5 + 2 * (angle / PI)` units, where `angle` is between the line
    /// direction and the boundary normal at the collision point. Segments
    /// shorter than the minimum draw length are skipped.
    pub fn trail_segments(&self, boundary: &Boundary) -> Vec<TrailSegment> {
        let mut segments = Vec::with_capacity(self.trail.len());
        for line in &self.trail {
            let direction = self.pos - line.point;
            let length = direction.length();
            if length <= LINE_MIN_LENGTH {
                continue;
            }
            let direction = direction / length;

            let normal = line.point - boundary.center;
            let normal_length = normal.length();
            if normal_length == 0.0 {
                continue;
            }
            let normal = normal / normal_length;

            let angle = direction.dot(normal).clamp(-1.0, 1.0).acos();
            let shorten = 5.0 + 2.0 * (angle / std::f64::consts::PI);
            segments.push(TrailSegment {
                from: line.point + direction * shorten,
                to: self.pos,
                opacity: line.opacity,
            });
        }
        segments
    }
}

/// The complete simulation state: boundary, balls, live effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    pub boundary: Boundary,
    pub config: SimConfig,
    /// Active balls, kept in spawn order for stable merge processing
    pub balls: Vec<Ball>,
    pub effects: Vec<GrowingEffect>,
    /// Current ring hue in degrees, advanced while hue cycling is on
    pub hue: f64,
    /// Session seed; spawn randomness derives from it and the tick counter
    pub seed: u64,
    pub time_ticks: u64,
    next_id: u32,
}

impl World {
    pub fn new(seed: u64) -> Self {
        Self::with_config(seed, Boundary::default(), SimConfig::default())
    }

    pub fn with_config(seed: u64, boundary: Boundary, config: SimConfig) -> Self {
        Self {
            boundary,
            config,
            balls: Vec::new(),
            effects: Vec::new(),
            hue: 0.0,
            seed,
            time_ticks: 0,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// RNG stream for the next spawn, derived from the session seed, the
    /// tick counter and the entity counter so that even two spawns within
    /// the same tick draw different values
    pub(crate) fn spawn_rng(&self) -> Pcg32 {
        let mix = self
            .time_ticks
            .wrapping_mul(0x9E37_79B9_7F4A_7C15)
            .wrapping_add(u64::from(self.next_id) << 32);
        Pcg32::seed_from_u64(self.seed ^ mix)
    }

    /// Spawn a ball at the boundary center with a uniformly random direction
    /// and speed. With no explicit color, one is drawn at a random hue.
    /// The ball starts invulnerable for the configured window.
    pub fn spawn_ball(&mut self, color: Option<Rgb>) -> u32 {
        let mut rng = self.spawn_rng();
        let angle = rng.random_range(0.0..std::f64::consts::TAU);
        let speed = rng.random_range(self.config.min_spawn_speed..self.config.max_spawn_speed);
        let color = color.unwrap_or_else(|| Rgb::from_hsv(rng.random_range(0.0..360.0), 1.0, 1.0));

        let id = self.next_entity_id();
        let mut ball = Ball::new(
            id,
            self.boundary.center,
            unit_from_angle(angle) * speed,
            self.config.ball_size,
            color,
        );
        ball.invulnerable_timer = self.config.invulnerability_secs;
        log::debug!(
            "spawned ball {id} speed {speed:.0} angle {:.2} rad",
            angle
        );
        self.balls.push(ball);
        id
    }

    pub fn ball(&self, id: u32) -> Option<&Ball> {
        self.balls.iter().find(|b| b.id == id)
    }

    /// Effects in draw order: background layer first, then foreground.
    /// The boundary ring is drawn between the two.
    pub fn effects_by_layer(&self) -> impl Iterator<Item = &GrowingEffect> {
        let background = self
            .effects
            .iter()
            .filter(|e| e.layer == Layer::Background);
        let foreground = self
            .effects
            .iter()
            .filter(|e| e.layer == Layer::Foreground);
        background.chain(foreground)
    }

    /// Ring color for the renderer: hue-cycled or plain white
    pub fn ring_color(&self, hue_cycling: bool) -> Rgb {
        if hue_cycling {
            Rgb::from_hsv(self.hue, 1.0, 1.0)
        } else {
            Rgb::WHITE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effect_lives_until_alpha_exhausted() {
        // alpha 255 at fade 255/sec is exactly one second of life
        let mut effect = GrowingEffect::new(
            DVec2::ZERO,
            25.0,
            10.0,
            Rgb::WHITE,
            255.0,
            255.0,
            Layer::Foreground,
        );

        let dt = 1.0 / 60.0;
        let mut elapsed = 0.0;
        while effect.step(dt) {
            elapsed += dt;
            assert!(elapsed < 1.5, "effect should have died by now");
        }
        assert!((elapsed - 1.0).abs() <= dt + 1e-9);
    }

    #[test]
    fn shrinking_effect_dies_when_radius_hits_zero() {
        let mut effect = GrowingEffect::new(
            DVec2::ZERO,
            10.0,
            -140.0,
            Rgb::WHITE,
            255.0,
            0.0,
            Layer::Foreground,
        );
        assert!(effect.step(0.05));
        assert!(!effect.step(0.05));
        assert_eq!(effect.radius, 0.0);
    }

    #[test]
    fn collision_line_history_is_capped() {
        let mut ball = Ball::new(1, DVec2::ZERO, DVec2::ZERO, 100.0, Rgb::WHITE);
        for i in 0..10 {
            ball.record_collision_line(DVec2::new(i as f64, 0.0), 4);
        }
        assert_eq!(ball.trail.len(), 4);
        // Oldest points were dropped
        assert_eq!(ball.trail[0].point.x, 6.0);
    }

    #[test]
    fn line_opacity_floors_at_90() {
        let mut ball = Ball::new(1, DVec2::ZERO, DVec2::ZERO, 100.0, Rgb::WHITE);
        ball.record_collision_line(DVec2::new(10.0, 0.0), 64);
        for _ in 0..120 {
            ball.fade_lines(0.1);
        }
        assert_eq!(ball.trail[0].opacity, 90.0);
    }

    #[test]
    fn new_collision_resets_all_line_opacities() {
        let mut ball = Ball::new(1, DVec2::ZERO, DVec2::ZERO, 100.0, Rgb::WHITE);
        ball.record_collision_line(DVec2::new(10.0, 0.0), 64);
        ball.fade_lines(0.5);
        assert!(ball.trail[0].opacity < 255.0);

        ball.record_collision_line(DVec2::new(0.0, 10.0), 64);
        assert!(ball.trail.iter().all(|l| l.opacity == 255.0));
    }

    #[test]
    fn trail_segments_shorten_near_the_wall() {
        let boundary = Boundary {
            center: DVec2::ZERO,
            radius: 300.0,
            thickness: 10.0,
        };
        let mut ball = Ball::new(1, DVec2::new(0.0, 0.0), DVec2::ZERO, 100.0, Rgb::WHITE);
        // Collision point straight to the right; line runs back toward center,
        // opposite the boundary normal, so angle = PI and shorten = 7.
        ball.record_collision_line(DVec2::new(295.0, 0.0), 64);

        let segments = ball.trail_segments(&boundary);
        assert_eq!(segments.len(), 1);
        assert!((segments[0].from.x - (295.0 - 7.0)).abs() < 1e-9);
        assert_eq!(segments[0].to, ball.pos);
    }

    #[test]
    fn degenerate_trail_segments_are_skipped() {
        let boundary = Boundary {
            center: DVec2::ZERO,
            radius: 300.0,
            thickness: 10.0,
        };
        let mut ball = Ball::new(1, DVec2::new(2.0, 0.0), DVec2::ZERO, 100.0, Rgb::WHITE);
        // Too short to draw
        ball.record_collision_line(DVec2::new(0.0, 0.0), 64);
        assert!(ball.trail_segments(&boundary).is_empty());
    }

    #[test]
    fn spawn_respects_speed_range_and_invulnerability() {
        let mut world = World::new(7);
        for tick in 0..20 {
            world.time_ticks = tick;
            world.spawn_ball(None);
        }
        for ball in &world.balls {
            let speed = ball.vel.length();
            assert!(speed >= SPAWN_SPEED_MIN && speed < SPAWN_SPEED_MAX);
            assert!(ball.invulnerable);
            assert_eq!(ball.pos, world.boundary.center);
        }
    }

    #[test]
    fn same_tick_spawns_draw_different_velocities() {
        let mut world = World::new(7);
        let first = world.spawn_ball(None);
        let second = world.spawn_ball(None);

        let first = world.ball(first).unwrap();
        let second = world.ball(second).unwrap();
        assert_ne!(first.vel, second.vel);
    }

    #[test]
    fn effects_iterate_background_first() {
        let mut world = World::new(1);
        world.effects.push(GrowingEffect::new(
            DVec2::ZERO,
            1.0,
            0.0,
            Rgb::WHITE,
            255.0,
            0.0,
            Layer::Foreground,
        ));
        world.effects.push(GrowingEffect::new(
            DVec2::ZERO,
            2.0,
            0.0,
            Rgb::WHITE,
            255.0,
            0.0,
            Layer::Background,
        ));

        let layers: Vec<Layer> = world.effects_by_layer().map(|e| e.layer).collect();
        assert_eq!(layers, vec![Layer::Background, Layer::Foreground]);
    }

    #[test]
    fn hsv_primaries() {
        assert_eq!(Rgb::from_hsv(0.0, 1.0, 1.0), Rgb { r: 255, g: 0, b: 0 });
        assert_eq!(Rgb::from_hsv(120.0, 1.0, 1.0), Rgb { r: 0, g: 255, b: 0 });
        assert_eq!(Rgb::from_hsv(240.0, 1.0, 1.0), Rgb { r: 0, g: 0, b: 255 });
        assert_eq!(Rgb::from_hsv(360.0, 1.0, 1.0), Rgb { r: 255, g: 0, b: 0 });
        assert_eq!(Rgb::from_hsv(0.0, 0.0, 1.0), Rgb::WHITE);
    }
}
