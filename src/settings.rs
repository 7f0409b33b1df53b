//! Runtime feature toggles
//!
//! Each flag can be flipped mid-session without resetting simulation state;
//! the tick reads them fresh every frame. Persisted as a small JSON file by
//! hosts that want toggles to survive restarts.

use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;

/// Visual feature toggles, all independent
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Lines from past collision points to the ball
    pub show_lines: bool,
    /// Continuous shrinking-ghost trail behind each ball
    pub show_trail: bool,
    /// Drift the boundary ring hue over time
    pub change_hue: bool,
    /// Full-arena pulse behind the ring on every bounce
    pub show_background_pulse: bool,
    /// Growing burst at each collision point
    pub show_impact_circles: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            show_lines: true,
            show_trail: true,
            change_hue: true,
            show_background_pulse: true,
            show_impact_circles: true,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file
    pub fn load_from(path: impl AsRef<Path>) -> io::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        serde_json::from_str(&json).map_err(io::Error::other)
    }

    /// Save settings as pretty-printed JSON
    pub fn save_to(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(io::Error::other)?;
        std::fs::write(path, json)
    }
}
