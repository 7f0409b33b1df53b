//! Ring Bounce demo host
//!
//! Drives the simulation headless: wires a logging event sink where the
//! audio layer would sit, registers the three classic modifiers, spawns
//! balls periodically and reports what the world is doing. A graphical host
//! would run the same loop and read the same state to draw.

use std::time::{Instant, SystemTime, UNIX_EPOCH};

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use ring_bounce::consts::FRAME_DT;
use ring_bounce::events::{EventSink, HookEvent, ModifierRegistry};
use ring_bounce::sim::{Ball, Rgb, TickInput, World, tick};
use ring_bounce::{Settings, unit_from_angle};

const SETTINGS_PATH: &str = "ring-bounce-settings.json";
const RUN_SECS: f64 = 30.0;
/// One new ball every 3 seconds at 60 Hz
const SPAWN_PERIOD_TICKS: u64 = 180;

/// Stand-in for the audio subsystem: counts and logs notifications
#[derive(Default)]
struct LogSink {
    bounces: u64,
    merges: u64,
}

impl EventSink for LogSink {
    fn on_bounce(&mut self, ball: &Ball) {
        self.bounces += 1;
        log::debug!(
            "bounce: ball {} at ({:.0}, {:.0}) speed {:.0}",
            ball.id,
            ball.pos.x,
            ball.pos.y,
            ball.vel.length()
        );
    }

    fn on_ball_removed(&mut self, ball: &Ball) {
        self.merges += 1;
        log::info!("ball {} was consumed in a merge", ball.id);
    }
}

/// The classic trio of ball modifiers, all host-side
fn classic_modifiers() -> ModifierRegistry {
    let mut registry = ModifierRegistry::new();

    registry.register(
        "Grow on bounce",
        "Ball grows by a fixed amount every time it bounces.",
        |event, ball| {
            if event == HookEvent::Bounce {
                ball.size += 10.0;
            }
        },
    );

    registry.register(
        "Shrink on bounce",
        "Ball shrinks 5% per bounce and speeds up to keep its momentum.",
        |event, ball| {
            if event == HookEvent::Bounce {
                let previous = ball.size;
                ball.size *= 0.95;
                ball.vel *= previous / ball.size;
            }
        },
    );

    let mut rng = Pcg32::seed_from_u64(0xB0B0);
    registry.register(
        "Random velocity",
        "Applies a random velocity and color to each ball when it spawns, \
         so no two launches look alike.",
        move |event, ball| {
            if event == HookEvent::Spawn {
                let angle = rng.random_range(0.0..std::f64::consts::TAU);
                let speed = rng.random_range(100.0..300.0);
                ball.vel = unit_from_angle(angle) * speed;
                ball.color = Rgb {
                    r: rng.random_range(0..=255),
                    g: rng.random_range(0..=255),
                    b: rng.random_range(0..=255),
                };
            }
        },
    );

    registry
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = match Settings::load_from(SETTINGS_PATH) {
        Ok(settings) => {
            log::info!("loaded settings from {SETTINGS_PATH}");
            settings
        }
        Err(err) => {
            log::info!("no settings file ({err}); using defaults");
            let settings = Settings::default();
            if let Err(err) = settings.save_to(SETTINGS_PATH) {
                log::warn!("could not write {SETTINGS_PATH}: {err}");
            }
            settings
        }
    };

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let mut world = World::new(seed);
    // Finite grace period so merges actually happen in the demo
    world.config.invulnerability_secs = Some(2.0);

    let mut sink = LogSink::default();
    let mut modifiers = classic_modifiers();
    modifiers.set_enabled("Shrink on bounce", true);
    modifiers.set_enabled("Random velocity", true);
    for (name, _, enabled) in modifiers.entries() {
        log::info!("modifier '{name}': {}", if enabled { "on" } else { "off" });
    }

    log::info!(
        "running {RUN_SECS}s of simulation at {:.0} Hz, seed {seed}",
        1.0 / FRAME_DT
    );
    let started = Instant::now();
    let total_ticks = (RUN_SECS / FRAME_DT) as u64;
    let mut total_collisions = 0u64;

    for frame in 0..total_ticks {
        let input = TickInput {
            spawn: frame % SPAWN_PERIOD_TICKS == 0,
            spawn_color: None,
        };
        let events = tick(
            &mut world,
            &input,
            &settings,
            &mut sink,
            &mut modifiers,
            FRAME_DT,
        );
        total_collisions += events.len() as u64;

        if frame % 300 == 299 {
            log::info!(
                "t={:>4.1}s balls={} effects={} bounces={}",
                (frame + 1) as f64 * FRAME_DT,
                world.balls.len(),
                world.effects.len(),
                sink.bounces
            );
        }
    }

    log::info!(
        "done in {:.0?}: {} ticks, {} collisions, {} merges, {} balls and {} effects remain",
        started.elapsed(),
        total_ticks,
        total_collisions,
        sink.merges,
        world.balls.len(),
        world.effects.len()
    );
}
