//! Host-facing extension points
//!
//! The simulation calls out through two seams: an [`EventSink`] notified on
//! collisions and ball removals (the audio layer in the original toy), and a
//! [`ModifierRegistry`] of named ball mutators invoked at designated hook
//! events. Both are synchronous, best-effort and fire-and-forget; a sink or
//! modifier can never abort the tick.

use crate::sim::Ball;

/// Named occasions modifiers can react to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookEvent {
    /// A ball bounced off the boundary
    Bounce,
    /// A ball was just spawned
    Spawn,
}

impl HookEvent {
    /// Wire name, matching what hosts historically keyed modifiers on
    pub fn name(self) -> &'static str {
        match self {
            HookEvent::Bounce => "ball_bounce",
            HookEvent::Spawn => "apply",
        }
    }
}

/// Notification point for collision and removal events.
///
/// Called synchronously from inside the tick; implementations must be cheap
/// and must not mutate simulation state (they only get shared references).
pub trait EventSink {
    /// A ball bounced off the boundary this tick
    fn on_bounce(&mut self, ball: &Ball);

    /// A ball was consumed during merge pruning
    fn on_ball_removed(&mut self, _ball: &Ball) {}
}

/// Sink for hosts with nothing to wire up (e.g. no audio device)
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn on_bounce(&mut self, _ball: &Ball) {}
}

/// A named, toggleable ball mutator supplied by the host
pub struct Modifier {
    pub name: String,
    pub description: String,
    pub enabled: bool,
    apply: Box<dyn FnMut(HookEvent, &mut Ball)>,
}

/// Ordered registry of modifiers.
///
/// Replaces the original filename-scan plugin loader: the host registers a
/// typed capability list at startup and toggles entries at runtime. Enabled
/// modifiers run in registration order.
#[derive(Default)]
pub struct ModifierRegistry {
    modifiers: Vec<Modifier>,
}

impl ModifierRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a modifier, disabled until toggled on
    pub fn register(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        apply: impl FnMut(HookEvent, &mut Ball) + 'static,
    ) {
        self.modifiers.push(Modifier {
            name: name.into(),
            description: description.into(),
            enabled: false,
            apply: Box::new(apply),
        });
    }

    /// Flip a modifier on or off. Returns the new state, or `None` if no
    /// modifier has that name.
    pub fn toggle(&mut self, name: &str) -> Option<bool> {
        let modifier = self.modifiers.iter_mut().find(|m| m.name == name)?;
        modifier.enabled = !modifier.enabled;
        Some(modifier.enabled)
    }

    /// Set a modifier's state directly. Returns false if the name is unknown.
    pub fn set_enabled(&mut self, name: &str, enabled: bool) -> bool {
        match self.modifiers.iter_mut().find(|m| m.name == name) {
            Some(modifier) => {
                modifier.enabled = enabled;
                true
            }
            None => false,
        }
    }

    pub fn is_enabled(&self, name: &str) -> bool {
        self.modifiers
            .iter()
            .any(|m| m.name == name && m.enabled)
    }

    /// Registered modifiers for menu-style hosts: (name, description, enabled)
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str, bool)> {
        self.modifiers
            .iter()
            .map(|m| (m.name.as_str(), m.description.as_str(), m.enabled))
    }

    /// Run every enabled modifier against the ball for the given event
    pub fn apply(&mut self, event: HookEvent, ball: &mut Ball) {
        for modifier in self.modifiers.iter_mut().filter(|m| m.enabled) {
            (modifier.apply)(event, ball);
        }
    }
}

impl std::fmt::Debug for ModifierRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.modifiers.iter().map(|m| (&m.name, m.enabled)))
            .finish()
    }
}
