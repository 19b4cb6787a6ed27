//! Orbit and first-person camera models
//!
//! Both cameras expose a `View` so picking and hitscan can build rays without
//! asking the renderer.

use std::f32::consts::{FRAC_PI_2, PI};

use glam::{Vec2, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::input::MoveKeys;
use super::ray::Ray;
use crate::{horizontal, spherical_to_cartesian};

/// Keeps the orbit camera off the poles
pub const POLAR_EPSILON: f32 = 0.01;
/// Largest pitch magnitude for the FPS camera
pub const MAX_PITCH: f32 = FRAC_PI_2 - 0.01;
/// Shake intensity of 1.0 displaces the rendered camera by this much
pub const SHAKE_MAGNITUDE: f32 = 0.25;

/// Camera pose plus projection parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct View {
    pub position: Vec3,
    /// Unit look direction
    pub forward: Vec3,
    pub up: Vec3,
    /// Vertical field of view (radians)
    pub fov_y: f32,
    /// Width / height
    pub aspect: f32,
}

impl View {
    /// Ray through a normalized device coordinate (x, y in [-1, 1], +y up)
    pub fn ray_through(&self, ndc: Vec2) -> Ray {
        let right = self.forward.cross(self.up).normalize_or_zero();
        let up = right.cross(self.forward);
        let half_h = (self.fov_y * 0.5).tan();
        let half_w = half_h * self.aspect;
        let dir = self.forward + right * (ndc.x * half_w) + up * (ndc.y * half_h);
        Ray::new(self.position, dir)
    }
}

/// Spherical-coordinate camera circling a target
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrbitCamera {
    pub target: Vec3,
    pub radius: f32,
    /// Angle from +Y
    pub polar: f32,
    /// Angle around +Y
    pub azimuth: f32,
    pub min_radius: f32,
    pub max_radius: f32,
    /// Radians per pixel of drag
    pub rotate_speed: f32,
    /// Fractional radius change per wheel unit
    pub zoom_speed: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            target: Vec3::new(0.0, 1.0, 0.0),
            radius: 14.0,
            polar: 1.1,
            azimuth: 0.6,
            min_radius: 3.0,
            max_radius: 60.0,
            rotate_speed: 0.005,
            zoom_speed: 0.001,
        }
    }
}

impl OrbitCamera {
    pub fn position(&self) -> Vec3 {
        self.target + spherical_to_cartesian(self.radius, self.polar, self.azimuth)
    }

    /// Rotate from a pointer drag (screen pixels, +y down)
    pub fn drag(&mut self, delta: Vec2) {
        self.azimuth -= delta.x * self.rotate_speed;
        self.polar = (self.polar - delta.y * self.rotate_speed)
            .clamp(POLAR_EPSILON, PI - POLAR_EPSILON);
    }

    /// Zoom from a wheel delta (+ zooms out)
    pub fn zoom(&mut self, wheel: f32) {
        self.radius = (self.radius * (1.0 + wheel * self.zoom_speed))
            .clamp(self.min_radius, self.max_radius);
    }

    pub fn forward(&self) -> Vec3 {
        (self.target - self.position()).normalize_or_zero()
    }

    /// Horizontal forward/right pair for camera-relative movement
    pub fn ground_basis(&self) -> (Vec3, Vec3) {
        let forward = horizontal(self.forward());
        (forward, forward.cross(Vec3::Y))
    }

    pub fn view(&self, fov_y: f32, aspect: f32) -> View {
        View {
            position: self.position(),
            forward: self.forward(),
            up: Vec3::Y,
            fov_y,
            aspect,
        }
    }
}

/// First-person camera: yaw/pitch look, WASD walk, gravity and jump
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FpsCamera {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub velocity_y: f32,
    pub grounded: bool,
    pub eye_height: f32,
    pub gravity: f32,
    pub jump_speed: f32,
    pub move_speed: f32,
    /// Radians per pixel of pointer-lock motion
    pub sensitivity: f32,
}

impl Default for FpsCamera {
    fn default() -> Self {
        let eye_height = 1.7;
        Self {
            position: Vec3::new(0.0, eye_height, 0.0),
            yaw: 0.0,
            pitch: 0.0,
            velocity_y: 0.0,
            grounded: true,
            eye_height,
            gravity: -20.0,
            jump_speed: 7.0,
            move_speed: 6.0,
            sensitivity: 0.002,
        }
    }
}

impl FpsCamera {
    /// Apply relative pointer motion (pixels, +y down)
    pub fn look(&mut self, delta: Vec2) {
        self.yaw -= delta.x * self.sensitivity;
        self.pitch = (self.pitch - delta.y * self.sensitivity).clamp(-MAX_PITCH, MAX_PITCH);
    }

    /// Unit view direction (yaw 0 looks down -Z)
    pub fn forward(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        Vec3::new(-sy * cp, sp, -cy * cp)
    }

    pub fn flat_forward(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        Vec3::new(-sy, 0.0, -cy)
    }

    pub fn right(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        Vec3::new(cy, 0.0, -sy)
    }

    /// Walk, jump and fall for one tick
    pub fn step(&mut self, keys: MoveKeys, jump: bool, dt: f32) {
        let axis = keys.axis();
        let wish = self.flat_forward() * axis.y + self.right() * axis.x;
        let wish = wish.normalize_or_zero();
        self.position += wish * self.move_speed * dt;

        if jump && self.grounded {
            self.velocity_y = self.jump_speed;
            self.grounded = false;
        }
        self.velocity_y += self.gravity * dt;
        self.position.y += self.velocity_y * dt;

        if self.position.y <= self.eye_height {
            self.position.y = self.eye_height;
            self.velocity_y = 0.0;
            self.grounded = true;
        } else {
            self.grounded = false;
        }
    }

    pub fn view(&self, fov_y: f32, aspect: f32) -> View {
        View {
            position: self.position,
            forward: self.forward(),
            up: Vec3::Y,
            fov_y,
            aspect,
        }
    }
}

/// Decaying camera shake. Only ever added to the rendered pose.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScreenShake {
    /// 0..1
    pub intensity: f32,
}

impl ScreenShake {
    pub fn add(&mut self, amount: f32) {
        self.intensity = (self.intensity + amount).min(1.0);
    }

    /// Per-tick decay
    pub fn decay(&mut self) {
        self.intensity *= 0.9;
        if self.intensity < 0.01 {
            self.intensity = 0.0;
        }
    }

    /// Random offset for this frame's rendered camera position
    pub fn offset(&self, rng: &mut impl Rng) -> Vec3 {
        if self.intensity <= 0.0 {
            return Vec3::ZERO;
        }
        let jitter = Vec3::new(
            rng.random_range(-1.0..=1.0),
            rng.random_range(-1.0..=1.0),
            rng.random_range(-1.0..=1.0),
        );
        jitter * self.intensity * SHAKE_MAGNITUDE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_orbit_position_distance() {
        let cam = OrbitCamera::default();
        let d = cam.position().distance(cam.target);
        assert!((d - cam.radius).abs() < 1e-4);
    }

    #[test]
    fn test_orbit_polar_clamped() {
        let mut cam = OrbitCamera::default();
        cam.drag(Vec2::new(0.0, 100_000.0));
        assert!((cam.polar - POLAR_EPSILON).abs() < 1e-6);
        cam.drag(Vec2::new(0.0, -100_000.0));
        assert!((cam.polar - (PI - POLAR_EPSILON)).abs() < 1e-6);
    }

    #[test]
    fn test_orbit_zoom_bounds() {
        let mut cam = OrbitCamera::default();
        for _ in 0..100 {
            cam.zoom(500.0);
        }
        assert_eq!(cam.radius, cam.max_radius);
        for _ in 0..100 {
            cam.zoom(-500.0);
        }
        assert_eq!(cam.radius, cam.min_radius);
    }

    #[test]
    fn test_fps_pitch_clamped() {
        let mut cam = FpsCamera::default();
        cam.look(Vec2::new(0.0, -1.0e6));
        assert!((cam.pitch - MAX_PITCH).abs() < 1e-6);
        assert!(cam.pitch < FRAC_PI_2);
    }

    #[test]
    fn test_fps_basis_is_consistent() {
        let mut cam = FpsCamera::default();
        cam.look(Vec2::new(123.0, 0.0));
        let f = cam.flat_forward();
        let r = cam.right();
        assert!(f.dot(r).abs() < 1e-6);
        assert!((f.cross(Vec3::Y) - r).length() < 1e-5);
    }

    #[test]
    fn test_fps_jump_only_when_grounded() {
        let mut cam = FpsCamera::default();
        cam.step(MoveKeys::default(), true, 1.0 / 60.0);
        assert!(!cam.grounded);
        let vy = cam.velocity_y;

        // Second jump mid-air does nothing extra
        cam.step(MoveKeys::default(), true, 1.0 / 60.0);
        assert!(cam.velocity_y < vy);

        for _ in 0..600 {
            cam.step(MoveKeys::default(), false, 1.0 / 60.0);
        }
        assert!(cam.grounded);
        assert_eq!(cam.position.y, cam.eye_height);
    }

    #[test]
    fn test_fps_walk_forward() {
        let mut cam = FpsCamera::default();
        let keys = MoveKeys {
            forward: true,
            ..Default::default()
        };
        cam.step(keys, false, 0.5);
        assert!((cam.position.z + cam.move_speed * 0.5).abs() < 1e-5);
        assert!(cam.position.x.abs() < 1e-6);
    }

    #[test]
    fn test_center_ray_matches_forward() {
        let cam = OrbitCamera::default();
        let view = cam.view(60f32.to_radians(), 16.0 / 9.0);
        let ray = view.ray_through(Vec2::ZERO);
        assert!((ray.dir - view.forward).length() < 1e-5);

        // Upper half of the screen points above the center ray
        let high = view.ray_through(Vec2::new(0.0, 0.8));
        assert!(high.dir.y > ray.dir.y);
    }

    #[test]
    fn test_shake_decays_to_zero() {
        let mut shake = ScreenShake::default();
        shake.add(0.7);
        let mut rng = Pcg32::seed_from_u64(1);
        assert!(shake.offset(&mut rng).length() <= SHAKE_MAGNITUDE * 3f32.sqrt());
        for _ in 0..100 {
            shake.decay();
        }
        assert_eq!(shake.intensity, 0.0);
        assert_eq!(shake.offset(&mut rng), Vec3::ZERO);
    }
}
