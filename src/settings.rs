//! Simulation settings and preferences
//!
//! Tunables are data-driven: the host passes a JSON document and anything it
//! leaves out keeps its default.

use serde::{Deserialize, Serialize};

use crate::error::SimError;

/// Simulation settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// RNG seed (same seed + same inputs = same run)
    pub seed: u64,

    // === Cameras ===
    /// FPS look, radians per pixel of pointer-lock motion
    pub look_sensitivity: f32,
    /// Orbit rotate, radians per pixel of drag
    pub orbit_rotate_speed: f32,
    /// Orbit zoom, fractional radius change per wheel unit
    pub orbit_zoom_speed: f32,
    /// Vertical field of view (degrees)
    pub fov_degrees: f32,

    // === Movement ===
    /// Selected-object free-move speed (units/s)
    pub move_speed: f32,
    /// Arena walk speed (units/s)
    pub player_move_speed: f32,

    // === Arena ===
    /// Shortest time between hitscan shots (seconds)
    pub fire_interval: f32,
    pub spawn_interval_mean: f32,
    /// Spawn interval varies by up to this much either way
    pub spawn_interval_jitter: f32,

    // === Accessibility ===
    /// Reduced motion (no screen shake)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: 12345,

            look_sensitivity: 0.002,
            orbit_rotate_speed: 0.005,
            orbit_zoom_speed: 0.001,
            fov_degrees: 60.0,

            move_speed: 4.0,
            player_move_speed: 6.0,

            fire_interval: 0.12,
            spawn_interval_mean: 1.5,
            spawn_interval_jitter: 0.5,

            reduced_motion: false,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse settings, falling back to defaults on bad input
    pub fn load_or_default(json: Option<&str>) -> Self {
        match json.map(Self::from_json) {
            Some(Ok(settings)) => {
                log::info!("Loaded settings");
                settings
            }
            Some(Err(err)) => {
                log::warn!("{}, using default settings", err);
                Self::default()
            }
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> Result<String, SimError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        !self.reduced_motion
    }
}
