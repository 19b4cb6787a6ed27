//! Control panel values and the HUD model
//!
//! The host UI owns the widgets. The core reads their current values by key
//! when it needs them and parses numbers leniently: anything unparseable is
//! replaced by the caller's default.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Panel keys read by the simulation
pub mod keys {
    pub const PROJECTILE_SPEED: &str = "projectile.speed";
    pub const PROJECTILE_ELEVATION: &str = "projectile.elevation";
    pub const PROJECTILE_AZIMUTH: &str = "projectile.azimuth";
    pub const PROJECTILE_EXTRA_ACCEL: &str = "projectile.extra_accel";

    pub const SPHERE_HEIGHT: &str = "sphere.height";

    pub const WAVE_AMPLITUDE: &str = "wave.amplitude";
    pub const WAVE_NUMBER: &str = "wave.k";
    pub const WAVE_OMEGA: &str = "wave.omega";
    pub const WAVE_PHASE: &str = "wave.phase";
    pub const WAVE_SECOND: &str = "wave.second";
    pub const WAVE2_AMPLITUDE: &str = "wave2.amplitude";
    pub const WAVE2_NUMBER: &str = "wave2.k";
    pub const WAVE2_OMEGA: &str = "wave2.omega";
    pub const WAVE2_PHASE: &str = "wave2.phase";
    pub const WAVE_STANDING: &str = "wave.standing";
    pub const WAVE_HEIGHT_SCALE: &str = "wave.height_scale";
    pub const WAVE_DAMPING: &str = "wave.damping";
    pub const WAVE_LIMIT: &str = "wave.limit";
    pub const WAVE_COLOR_MODE: &str = "wave.color_mode";

    pub const IMPULSE_STRENGTH: &str = "impulse.strength";
    pub const IMPULSE_RADIUS: &str = "impulse.radius";
    pub const IMPULSE_FALLOFF: &str = "impulse.falloff";
}

/// Current values of the host's controls, keyed by name
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UiPanel {
    values: HashMap<String, String>,
}

impl UiPanel {
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Numeric value, or `default` when missing, unparseable or non-finite
    pub fn get_f32(&self, key: &str, default: f32) -> f32 {
        match self.get(key).map(|v| v.trim().parse::<f32>()) {
            Some(Ok(v)) if v.is_finite() => v,
            Some(_) => {
                log::debug!("Control '{}' is not a number, using {}", key, default);
                default
            }
            None => default,
        }
    }

    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.get(key).map(|v| v.trim().to_lowercase()) {
            Some(v) if matches!(v.as_str(), "true" | "1" | "on" | "yes") => true,
            Some(v) if matches!(v.as_str(), "false" | "0" | "off" | "no") => false,
            _ => default,
        }
    }
}

/// Everything the HUD text shows
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HudModel {
    /// 0..1
    pub health_fraction: f32,
    pub score: u64,
    pub kills: u32,
    pub selected_label: Option<String>,
    pub preset_label: String,
    pub wave_state: String,
    pub dead: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_fallback() {
        let mut panel = UiPanel::default();
        panel.set("a", " 2.5 ");
        panel.set("b", "abc");
        panel.set("c", "NaN");
        assert_eq!(panel.get_f32("a", 1.0), 2.5);
        assert_eq!(panel.get_f32("b", 1.0), 1.0);
        assert_eq!(panel.get_f32("c", 1.0), 1.0);
        assert_eq!(panel.get_f32("missing", 7.0), 7.0);
    }

    #[test]
    fn test_bool_values() {
        let mut panel = UiPanel::default();
        panel.set("on", "ON");
        panel.set("off", "0");
        panel.set("junk", "maybe");
        assert!(panel.get_bool("on", false));
        assert!(!panel.get_bool("off", true));
        assert!(panel.get_bool("junk", true));
    }
}
