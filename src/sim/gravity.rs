//! Gravity presets and the vertical bounce integrator

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::scene::ObjectId;
use crate::consts::{BOUNCE_STOP_SPEED, RESTITUTION};
use crate::error::SimError;

/// Named vertical accelerations (units/s²)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GravityPreset {
    #[default]
    Earth,
    Moon,
    Jupiter,
}

impl GravityPreset {
    pub const ALL: [GravityPreset; 3] = [Self::Earth, Self::Moon, Self::Jupiter];

    /// Signed vertical acceleration
    pub fn accel(&self) -> f32 {
        match self {
            GravityPreset::Earth => -9.8,
            GravityPreset::Moon => -1.62,
            GravityPreset::Jupiter => -24.79,
        }
    }

    /// Logical asset name for the ground texture
    pub fn as_str(&self) -> &'static str {
        match self {
            GravityPreset::Earth => "earth",
            GravityPreset::Moon => "moon",
            GravityPreset::Jupiter => "jupiter",
        }
    }

    /// Flat ground color used when no texture could be loaded
    pub fn fallback_color(&self) -> [f32; 3] {
        match self {
            GravityPreset::Earth => [0.29, 0.49, 0.27],
            GravityPreset::Moon => [0.62, 0.62, 0.6],
            GravityPreset::Jupiter => [0.78, 0.58, 0.4],
        }
    }
}

impl fmt::Display for GravityPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GravityPreset {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "earth" => Ok(GravityPreset::Earth),
            "moon" => Ok(GravityPreset::Moon),
            "jupiter" => Ok(GravityPreset::Jupiter),
            _ => Err(SimError::UnknownPreset(s.to_string())),
        }
    }
}

/// Result of one vertical integration step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BounceOutcome {
    /// Above the floor
    Airborne,
    /// Hit the floor and rebounded
    Bounced { impact_speed: f32 },
    /// Hit the floor too slowly to rebound; now at rest on it
    Settled,
}

/// Advance `y`/`vy` under `accel` and resolve floor contact.
///
/// On contact the body is clamped to `floor_y` and keeps half its speed,
/// reversed. Once the rebound speed drops under the stop threshold the body
/// rests at `floor_y` with zero velocity.
pub fn apply_gravity(y: &mut f32, vy: &mut f32, floor_y: f32, accel: f32, dt: f32) -> BounceOutcome {
    *vy += accel * dt;
    *y += *vy * dt;

    if *y > floor_y {
        return BounceOutcome::Airborne;
    }

    *y = floor_y;
    let impact_speed = vy.abs();
    *vy *= -RESTITUTION;
    if vy.abs() < BOUNCE_STOP_SPEED {
        *vy = 0.0;
        BounceOutcome::Settled
    } else {
        BounceOutcome::Bounced { impact_speed }
    }
}

/// Single-object gravity: at most one scene object falls at a time
#[derive(Debug, Clone, PartialEq)]
pub struct GravityBinding {
    pub object: ObjectId,
    pub velocity_y: f32,
    /// Computed once at activation from the object's half-height
    pub floor_y: f32,
    pub active: bool,
}

impl GravityBinding {
    pub fn new(object: ObjectId, floor_y: f32) -> Self {
        Self {
            object,
            velocity_y: 0.0,
            floor_y,
            active: true,
        }
    }
}

/// Ground material as seen by the renderer
///
/// Texture loads are asynchronous and may fail; the ground keeps whatever it
/// last showed, or a flat color if no texture ever arrived.
#[derive(Debug, Clone, Serialize)]
pub struct GroundMaterial {
    pub requested: GravityPreset,
    /// Preset whose texture is currently applied
    pub applied: Option<GravityPreset>,
    pub color: [f32; 3],
}

impl Default for GroundMaterial {
    fn default() -> Self {
        let preset = GravityPreset::default();
        Self {
            requested: preset,
            applied: None,
            color: preset.fallback_color(),
        }
    }
}

impl GroundMaterial {
    pub fn request(&mut self, preset: GravityPreset) {
        self.requested = preset;
    }

    /// Host callback when a texture load finishes
    pub fn texture_loaded(&mut self, preset: GravityPreset, ok: bool) {
        if preset != self.requested {
            // A newer request superseded this load
            return;
        }
        if ok {
            self.applied = Some(preset);
        } else if self.applied.is_none() {
            self.color = preset.fallback_color();
        } else {
            log::warn!("Ground texture '{}' failed to load, keeping previous", preset);
        }
    }
}
