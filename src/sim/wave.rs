//! Wave lab: analytic wave field plus a damped spring impulse layer
//!
//! Each of the `SAMPLE_COUNT` samples shows the sum of an analytic traveling
//! (or standing) wave and its own spring-damper offset, which click impulses
//! kick and which relaxes back to zero.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::ray::Ray;
use crate::consts::FRAME_DT;
use crate::ui::{UiPanel, keys};

pub const SAMPLE_COUNT: usize = 140;
/// Distance between neighbouring samples along +X
pub const SAMPLE_SPACING: f32 = 0.1;
/// Spring constant pulling impulse offsets back to zero
pub const STIFFNESS: f32 = 12.0;
/// Applied to every impulse on top of the caller's strength
pub const KICK_SCALE: f32 = 3.5;
pub const DEFAULT_LIMIT: f32 = 3.0;
/// Fraction of impulse velocity lost per tick
pub const DEFAULT_DAMPING: f32 = 0.02;
/// Radius of the clickable marker on each sample
pub const MARKER_RADIUS: f32 = 0.06;
/// Height of the rest line
const BASE_HEIGHT: f32 = 1.0;

const SOLID_COLOR: [f32; 3] = [0.3, 0.7, 0.95];

/// One sinusoid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaveParams {
    pub amplitude: f32,
    /// Wavenumber (radians per unit)
    pub k: f32,
    /// Angular frequency (radians per second)
    pub omega: f32,
    pub phase: f32,
}

impl Default for WaveParams {
    fn default() -> Self {
        Self {
            amplitude: 0.3,
            k: 2.0,
            omega: 2.0,
            phase: 0.0,
        }
    }
}

impl WaveParams {
    fn traveling(&self, x: f32, t: f32) -> f32 {
        self.amplitude * (self.k * x + self.omega * t + self.phase).sin()
    }

    fn standing(&self, x: f32, t: f32) -> f32 {
        self.amplitude * (self.k * x).sin() * (self.omega * t).sin()
    }
}

/// Analytic layer configuration
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AnalyticWave {
    pub primary: WaveParams,
    /// Superposed traveling wave, when enabled
    pub secondary: Option<WaveParams>,
    /// Standing mode replaces the traveling sum with the primary's standing form
    pub standing: bool,
}

impl AnalyticWave {
    pub fn value(&self, x: f32, t: f32) -> f32 {
        if self.standing {
            return self.primary.standing(x, t);
        }
        let second = self.secondary.map_or(0.0, |w| w.traveling(x, t));
        self.primary.traveling(x, t) + second
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColorMode {
    /// Blue (low) to white to red (high)
    #[default]
    Height,
    /// Green (still) to yellow to red (fast)
    Velocity,
    Solid,
}

impl ColorMode {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "height" => Some(ColorMode::Height),
            "velocity" => Some(ColorMode::Velocity),
            "solid" => Some(ColorMode::Solid),
            _ => None,
        }
    }
}

fn lerp3(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
    [a[0] + (b[0] - a[0]) * t, a[1] + (b[1] - a[1]) * t, a[2] + (b[2] - a[2]) * t]
}

/// Sample color for a displayed height and impulse velocity
pub fn sample_color(mode: ColorMode, height: f32, velocity: f32, range: f32) -> [f32; 3] {
    const BLUE: [f32; 3] = [0.1, 0.3, 1.0];
    const WHITE: [f32; 3] = [1.0, 1.0, 1.0];
    const RED: [f32; 3] = [1.0, 0.15, 0.1];
    const GREEN: [f32; 3] = [0.1, 0.9, 0.2];
    const YELLOW: [f32; 3] = [1.0, 0.9, 0.1];

    let range = range.max(f32::EPSILON);
    match mode {
        ColorMode::Height => {
            let t = (height / range).clamp(-1.0, 1.0);
            if t < 0.0 {
                lerp3(WHITE, BLUE, -t)
            } else {
                lerp3(WHITE, RED, t)
            }
        }
        ColorMode::Velocity => {
            let t = (velocity.abs() / range).clamp(0.0, 1.0);
            if t < 0.5 {
                lerp3(GREEN, YELLOW, t * 2.0)
            } else {
                lerp3(YELLOW, RED, (t - 0.5) * 2.0)
            }
        }
        ColorMode::Solid => SOLID_COLOR,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RunState {
    #[default]
    Paused,
    Running,
    /// Advance exactly one tick, then pause
    SingleStep,
}

impl RunState {
    pub fn label(&self) -> &'static str {
        match self {
            RunState::Paused => "paused",
            RunState::Running => "running",
            RunState::SingleStep => "step",
        }
    }
}

/// Impulse parameters for a click on a sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpulseParams {
    pub strength: f32,
    /// In samples
    pub radius: f32,
    pub falloff: f32,
}

impl Default for ImpulseParams {
    fn default() -> Self {
        Self {
            strength: 1.0,
            radius: 6.0,
            falloff: 1.0,
        }
    }
}

impl ImpulseParams {
    pub fn from_panel(panel: &UiPanel) -> Self {
        let d = Self::default();
        Self {
            strength: panel.get_f32(keys::IMPULSE_STRENGTH, d.strength),
            radius: panel.get_f32(keys::IMPULSE_RADIUS, d.radius).max(0.0),
            falloff: panel.get_f32(keys::IMPULSE_FALLOFF, d.falloff).max(0.0),
        }
    }
}

/// The full wave lab state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaveField {
    positions: Vec<f32>,
    velocities: Vec<f32>,
    /// Analytic clock
    pub time: f32,
    pub run_state: RunState,
    pub analytic: AnalyticWave,
    pub height_scale: f32,
    damping: f32,
    limit: f32,
    pub color_mode: ColorMode,
    /// World position of sample 0 at rest
    pub origin: Vec3,
}

impl Default for WaveField {
    fn default() -> Self {
        Self::new()
    }
}

impl WaveField {
    pub fn new() -> Self {
        let half_span = (SAMPLE_COUNT - 1) as f32 * SAMPLE_SPACING * 0.5;
        Self {
            positions: vec![0.0; SAMPLE_COUNT],
            velocities: vec![0.0; SAMPLE_COUNT],
            time: 0.0,
            run_state: RunState::Paused,
            analytic: AnalyticWave::default(),
            height_scale: 1.0,
            damping: DEFAULT_DAMPING,
            limit: DEFAULT_LIMIT,
            color_mode: ColorMode::Height,
            origin: Vec3::new(-half_span, BASE_HEIGHT, 0.0),
        }
    }

    /// Pull every wave control from the panel, with defaults
    pub fn apply_panel(&mut self, panel: &UiPanel) {
        let d = WaveParams::default();
        let read = |a, k, w, p| WaveParams {
            amplitude: panel.get_f32(a, d.amplitude),
            k: panel.get_f32(k, d.k),
            omega: panel.get_f32(w, d.omega),
            phase: panel.get_f32(p, d.phase),
        };
        let primary = read(keys::WAVE_AMPLITUDE, keys::WAVE_NUMBER, keys::WAVE_OMEGA, keys::WAVE_PHASE);
        let secondary = panel
            .get_bool(keys::WAVE_SECOND, false)
            .then(|| read(keys::WAVE2_AMPLITUDE, keys::WAVE2_NUMBER, keys::WAVE2_OMEGA, keys::WAVE2_PHASE));
        self.analytic = AnalyticWave {
            primary,
            secondary,
            standing: panel.get_bool(keys::WAVE_STANDING, false),
        };
        self.height_scale = panel.get_f32(keys::WAVE_HEIGHT_SCALE, 1.0);
        self.set_damping(panel.get_f32(keys::WAVE_DAMPING, DEFAULT_DAMPING));
        self.set_limit(panel.get_f32(keys::WAVE_LIMIT, DEFAULT_LIMIT));
        if let Some(name) = panel.get(keys::WAVE_COLOR_MODE) {
            match ColorMode::from_name(name) {
                Some(mode) => self.color_mode = mode,
                None => log::debug!("Unknown color mode '{}', keeping {:?}", name, self.color_mode),
            }
        }
    }

    pub fn limit(&self) -> f32 {
        self.limit
    }

    pub fn damping(&self) -> f32 {
        self.damping
    }

    /// Change the clamp bound; existing offsets are re-clamped at once
    pub fn set_limit(&mut self, limit: f32) {
        self.limit = limit.max(0.0);
        let limit = self.limit;
        for p in &mut self.positions {
            *p = p.clamp(-limit, limit);
        }
    }

    pub fn set_damping(&mut self, damping: f32) {
        self.damping = damping.clamp(0.0, 1.0);
    }

    pub fn impulse_position(&self, i: usize) -> Option<f32> {
        self.positions.get(i).copied()
    }

    pub fn impulse_velocity(&self, i: usize) -> Option<f32> {
        self.velocities.get(i).copied()
    }

    /// Kick samples around `center`. Returns how many samples were touched.
    ///
    /// Samples exactly `radius` away are touched but receive zero weight.
    /// Indices outside the field are skipped, never wrapped.
    pub fn add_impulse(&mut self, center: usize, params: ImpulseParams) -> usize {
        let ImpulseParams {
            strength,
            radius,
            falloff,
        } = params;
        let kick = strength * KICK_SCALE;
        if radius <= 0.0 {
            return match self.velocities.get_mut(center) {
                Some(v) => {
                    *v += kick;
                    1
                }
                None => 0,
            };
        }

        let reach = radius.floor() as usize;
        let start = center.saturating_sub(reach);
        let end = center.saturating_add(reach).min(SAMPLE_COUNT.saturating_sub(1));
        let mut touched = 0;
        for i in start..=end {
            let distance = i.abs_diff(center) as f32;
            if distance > radius {
                continue;
            }
            let weight = (1.0 - distance / radius).powf(falloff);
            self.velocities[i] += kick * weight;
            touched += 1;
        }
        touched
    }

    /// Advance both layers by `dt`
    pub fn step(&mut self, dt: f32) {
        let keep = 1.0 - self.damping;
        let limit = self.limit;
        for (p, v) in self.positions.iter_mut().zip(self.velocities.iter_mut()) {
            *v += -*p * STIFFNESS * dt;
            *v *= keep;
            *p = (*p + *v * dt).clamp(-limit, limit);
        }
        self.time += dt;
    }

    /// Per-frame update according to the run state
    pub fn tick(&mut self, dt: f32) {
        match self.run_state {
            RunState::Paused => {}
            RunState::Running => self.step(dt),
            RunState::SingleStep => {
                self.step(FRAME_DT);
                self.run_state = RunState::Paused;
            }
        }
    }

    pub fn toggle_running(&mut self) {
        self.run_state = match self.run_state {
            RunState::Running => RunState::Paused,
            RunState::Paused | RunState::SingleStep => RunState::Running,
        };
    }

    pub fn request_step(&mut self) {
        self.run_state = RunState::SingleStep;
    }

    /// Zero the impulse layer and the analytic clock
    pub fn reset(&mut self) {
        self.positions.fill(0.0);
        self.velocities.fill(0.0);
        self.time = 0.0;
    }

    pub fn sample_x(i: usize) -> f32 {
        i as f32 * SAMPLE_SPACING
    }

    /// Displayed displacement of sample `i`
    pub fn displacement(&self, i: usize) -> f32 {
        let impulse = self.positions.get(i).copied().unwrap_or(0.0);
        (self.analytic.value(Self::sample_x(i), self.time) + impulse) * self.height_scale
    }

    pub fn displacements(&self) -> Vec<f32> {
        (0..SAMPLE_COUNT).map(|i| self.displacement(i)).collect()
    }

    pub fn colors(&self) -> Vec<[f32; 3]> {
        let range = (self.limit * self.height_scale.abs()).max(1.0);
        (0..SAMPLE_COUNT)
            .map(|i| sample_color(self.color_mode, self.displacement(i), self.velocities[i], range))
            .collect()
    }

    pub fn marker_position(&self, i: usize) -> Vec3 {
        self.origin + Vec3::new(Self::sample_x(i), self.displacement(i), 0.0)
    }

    /// Nearest sample marker hit by the ray
    pub fn pick_sample(&self, ray: &Ray) -> Option<usize> {
        (0..SAMPLE_COUNT)
            .filter_map(|i| ray.intersect_sphere(self.marker_position(i), MARKER_RADIUS).map(|t| (i, t)))
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_impulse_falloff_scenario() {
        let mut field = WaveField::new();
        let touched = field.add_impulse(70, ImpulseParams::default());
        assert_eq!(touched, 13);
        assert!((field.impulse_velocity(70).unwrap() - 3.5).abs() < 1e-6);
        assert!(field.impulse_velocity(64).unwrap().abs() < 1e-6);
        assert!(field.impulse_velocity(76).unwrap().abs() < 1e-6);
        assert!((field.impulse_velocity(67).unwrap() - 1.75).abs() < 1e-6);
        assert_eq!(field.impulse_velocity(63), Some(0.0));
    }

    #[test]
    fn test_impulse_at_edge_does_not_wrap() {
        let mut field = WaveField::new();
        let touched = field.add_impulse(1, ImpulseParams::default());
        // 0..=7
        assert_eq!(touched, 8);
        assert_eq!(field.impulse_velocity(SAMPLE_COUNT - 1), Some(0.0));

        assert_eq!(field.add_impulse(SAMPLE_COUNT + 20, ImpulseParams::default()), 0);
    }

    #[test]
    fn test_relaxation_returns_to_rest() {
        let mut field = WaveField::new();
        field.add_impulse(70, ImpulseParams::default());
        for _ in 0..3000 {
            field.step(FRAME_DT);
            assert!(field.impulse_position(70).unwrap().abs() <= field.limit());
        }
        assert!(field.impulse_position(70).unwrap().abs() < 1e-3);
    }

    #[test]
    fn test_lowering_limit_reclamps() {
        let mut field = WaveField::new();
        field.add_impulse(
            10,
            ImpulseParams {
                strength: 50.0,
                ..Default::default()
            },
        );
        for _ in 0..5 {
            field.step(FRAME_DT);
        }
        assert!(field.impulse_position(10).unwrap() > 0.5);
        field.set_limit(0.5);
        assert!(field.impulse_position(10).unwrap() <= 0.5);
    }

    #[test]
    fn test_single_step_then_paused() {
        let mut field = WaveField::new();
        field.tick(FRAME_DT);
        assert_eq!(field.time, 0.0);

        field.request_step();
        field.tick(0.5);
        assert_eq!(field.run_state, RunState::Paused);
        assert!((field.time - FRAME_DT).abs() < 1e-7);

        field.toggle_running();
        field.tick(0.02);
        assert_eq!(field.run_state, RunState::Running);
    }

    #[test]
    fn test_displacement_sums_layers_then_scales() {
        let mut field = WaveField::new();
        let params = WaveParams {
            amplitude: 0.7,
            k: 3.0,
            omega: 1.5,
            phase: 0.4,
        };
        field.analytic = AnalyticWave {
            primary: params,
            ..Default::default()
        };
        field.add_impulse(30, ImpulseParams::default());
        for _ in 0..5 {
            field.step(FRAME_DT);
        }
        field.height_scale = 2.0;

        let t = field.time;
        for i in [25, 30, 33, 90] {
            let x = i as f32 * SAMPLE_SPACING;
            let analytic = params.amplitude * (params.k * x + params.omega * t + params.phase).sin();
            let expected = 2.0 * (analytic + field.impulse_position(i).unwrap());
            assert!((field.displacement(i) - expected).abs() < 1e-5);
        }
        assert!(field.impulse_position(30).unwrap() > 0.0);
    }

    #[test]
    fn test_standing_wave_nodes() {
        let wave = AnalyticWave {
            standing: true,
            ..Default::default()
        };
        // sin(omega t) = 0 at t = 0 for every x
        assert_eq!(wave.value(1.3, 0.0), 0.0);
        // sin(k x) = 0 at x = 0 for every t
        assert_eq!(wave.value(0.0, 0.7), 0.0);
    }

    #[test]
    fn test_second_wave_superposes() {
        let one = AnalyticWave::default();
        let two = AnalyticWave {
            secondary: Some(WaveParams::default()),
            ..Default::default()
        };
        let (x, t) = (0.4, 0.3);
        assert!((two.value(x, t) - 2.0 * one.value(x, t)).abs() < 1e-6);
    }

    #[test]
    fn test_color_modes() {
        assert_eq!(sample_color(ColorMode::Height, 0.0, 0.0, 1.0), [1.0, 1.0, 1.0]);
        let low = sample_color(ColorMode::Height, -5.0, 0.0, 1.0);
        assert!(low[2] > low[0]);
        let fast = sample_color(ColorMode::Velocity, 0.0, -9.0, 1.0);
        assert!(fast[0] > fast[1]);
        assert_eq!(sample_color(ColorMode::Solid, 3.0, 3.0, 1.0), SOLID_COLOR);
    }

    #[test]
    fn test_pick_sample_marker() {
        let field = WaveField::new();
        let target = field.marker_position(42);
        let ray = Ray::new(target + Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        assert_eq!(field.pick_sample(&ray), Some(42));
    }

    #[test]
    fn test_panel_drives_parameters() {
        let mut panel = UiPanel::default();
        panel.set(keys::WAVE_LIMIT, "1.5");
        panel.set(keys::WAVE_DAMPING, "oops");
        panel.set(keys::WAVE_COLOR_MODE, "velocity");
        panel.set(keys::WAVE_SECOND, "true");
        let mut field = WaveField::new();
        field.apply_panel(&panel);
        assert_eq!(field.limit(), 1.5);
        assert_eq!(field.damping(), DEFAULT_DAMPING);
        assert_eq!(field.color_mode, ColorMode::Velocity);
        assert!(field.analytic.secondary.is_some());
    }
}
