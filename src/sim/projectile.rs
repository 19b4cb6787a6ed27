//! Ballistic projectiles: full 3D integration, no bounce

use glam::Vec3;

use super::body::{Body, BodyId, BodyKind, BodyRegistry};
use crate::consts::*;
use crate::direction_from_angles;
use crate::ui::{UiPanel, keys};

/// Launch parameters, read from the control panel at spawn time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaunchParams {
    pub speed: f32,
    pub elevation_deg: f32,
    pub azimuth_deg: f32,
    /// Added on top of the preset gravity
    pub extra_accel_y: f32,
}

impl Default for LaunchParams {
    fn default() -> Self {
        Self {
            speed: PROJECTILE_SPEED,
            elevation_deg: PROJECTILE_ELEVATION_DEG,
            azimuth_deg: PROJECTILE_AZIMUTH_DEG,
            extra_accel_y: 0.0,
        }
    }
}

impl LaunchParams {
    pub fn from_panel(panel: &UiPanel) -> Self {
        let d = Self::default();
        Self {
            speed: panel.get_f32(keys::PROJECTILE_SPEED, d.speed),
            elevation_deg: panel.get_f32(keys::PROJECTILE_ELEVATION, d.elevation_deg),
            azimuth_deg: panel.get_f32(keys::PROJECTILE_AZIMUTH, d.azimuth_deg),
            extra_accel_y: panel.get_f32(keys::PROJECTILE_EXTRA_ACCEL, d.extra_accel_y),
        }
    }

    pub fn velocity(&self) -> Vec3 {
        direction_from_angles(self.elevation_deg, self.azimuth_deg) * self.speed
    }
}

/// Where a projectile starts: above the selected object, or a fixed point
pub fn launch_origin(selected: Option<Vec3>) -> Vec3 {
    match selected {
        Some(pos) => pos + Vec3::Y * PROJECTILE_ORIGIN_OFFSET,
        None => Vec3::new(0.0, 1.0, 0.0),
    }
}

/// Spawn a projectile with acceleration fixed at the current gravity
pub fn spawn_projectile(
    registry: &mut BodyRegistry<()>,
    params: &LaunchParams,
    gravity: f32,
    origin: Vec3,
) -> BodyId {
    registry.spawn(
        BodyKind::Projectile,
        origin,
        params.velocity(),
        Vec3::new(0.0, gravity + params.extra_accel_y, 0.0),
        PROJECTILE_RADIUS,
        (),
    )
}

/// Advance one projectile. Returns true when it lands this tick.
///
/// Landing clamps the body to the floor and retires it for good.
pub fn step_projectile(body: &mut Body, dt: f32) -> bool {
    if !body.active {
        return false;
    }
    body.integrate(dt);
    let floor = GROUND_Y + body.radius;
    if body.pos.y <= floor {
        body.pos.y = floor;
        body.vel = Vec3::ZERO;
        body.retire();
        return true;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peak_height_matches_ballistics() {
        let mut reg = BodyRegistry::new();
        let params = LaunchParams {
            speed: 10.0,
            elevation_deg: 45.0,
            azimuth_deg: 0.0,
            extra_accel_y: 0.0,
        };
        let origin = Vec3::new(0.0, 1.0, 0.0);
        let id = spawn_projectile(&mut reg, &params, -9.8, origin);

        let mut peak = origin.y;
        let body = &mut reg.get_mut(id).unwrap().body;
        while !step_projectile(body, 1.0 / 120.0) {
            peak = peak.max(body.pos.y);
        }

        let expected = (10.0 * 45f32.to_radians().sin()).powi(2) / (2.0 * 9.8);
        assert!((expected - 2.55).abs() < 0.01);
        assert!(((peak - origin.y) - expected).abs() < 0.1);
    }

    #[test]
    fn test_azimuth_zero_flies_along_x() {
        let v = LaunchParams::default().velocity();
        assert!(v.x > 0.0);
        assert!(v.z.abs() < 1e-5);
    }

    #[test]
    fn test_landing_is_permanent() {
        let mut reg = BodyRegistry::new();
        let params = LaunchParams {
            speed: 3.0,
            elevation_deg: -30.0,
            ..Default::default()
        };
        let id = spawn_projectile(&mut reg, &params, -9.8, Vec3::new(0.0, 0.5, 0.0));
        let body = &mut reg.get_mut(id).unwrap().body;

        let mut landed = false;
        for _ in 0..600 {
            landed |= step_projectile(body, 1.0 / 60.0);
        }
        assert!(landed);
        assert!(!body.active);
        assert_eq!(body.pos.y, PROJECTILE_RADIUS);
        // Further steps never move it
        assert!(!step_projectile(body, 1.0 / 60.0));
        assert_eq!(body.pos.y, PROJECTILE_RADIUS);
    }

    #[test]
    fn test_extra_accel_added_to_gravity() {
        let mut reg = BodyRegistry::new();
        let params = LaunchParams {
            extra_accel_y: 2.0,
            ..Default::default()
        };
        let id = spawn_projectile(&mut reg, &params, -1.62, Vec3::ZERO);
        let accel = reg.get(id).unwrap().body.accel;
        assert!((accel.y - 0.38).abs() < 1e-5);
    }

    #[test]
    fn test_launch_origin_fallback() {
        assert_eq!(launch_origin(None), Vec3::new(0.0, 1.0, 0.0));
        let above = launch_origin(Some(Vec3::new(2.0, 1.0, 3.0)));
        assert_eq!(above, Vec3::new(2.0, 1.0 + PROJECTILE_ORIGIN_OFFSET, 3.0));
    }

    #[test]
    fn test_params_fall_back_on_bad_input() {
        let mut panel = UiPanel::default();
        panel.set(keys::PROJECTILE_SPEED, "fast");
        panel.set(keys::PROJECTILE_ELEVATION, "60");
        let params = LaunchParams::from_panel(&panel);
        assert_eq!(params.speed, PROJECTILE_SPEED);
        assert_eq!(params.elevation_deg, 60.0);
    }
}
