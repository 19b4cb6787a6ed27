//! Kinetic Sandbox - real-time kinematic simulation and interaction layer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (integrators, collisions, combat, cameras)
//! - `session`: Frame-driven controller that owns the simulation context
//! - `renderer`: Per-frame data handed to the external 3D engine
//! - `ui`: Control panel values and HUD model
//! - `settings`: Data-driven tunables
//! - `platform`: Browser adapter (wasm32 only)

pub mod error;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;
pub mod ui;

pub use error::SimError;
pub use renderer::RenderFrame;
pub use session::{Session, UiAction};
pub use settings::Settings;

use glam::Vec3;

/// Simulation configuration constants
pub mod consts {
    /// Longest frame delta the simulation will integrate (~33 ms)
    pub const MAX_DT: f32 = 1.0 / 30.0;
    /// Nominal frame delta used by headless drivers and tests
    pub const FRAME_DT: f32 = 1.0 / 60.0;

    /// Ground plane height
    pub const GROUND_Y: f32 = 0.0;

    /// Bounce restitution (fraction of vertical speed kept per bounce)
    pub const RESTITUTION: f32 = 0.5;
    /// Vertical speed below which a bouncing body comes to rest
    pub const BOUNCE_STOP_SPEED: f32 = 0.5;

    /// Falling sphere defaults
    pub const FALLING_SPHERE_RADIUS: f32 = 0.3;
    pub const FALLING_SPHERE_HEIGHT: f32 = 5.0;

    /// Projectile defaults
    pub const PROJECTILE_RADIUS: f32 = 0.2;
    pub const PROJECTILE_SPEED: f32 = 10.0;
    pub const PROJECTILE_ELEVATION_DEG: f32 = 45.0;
    pub const PROJECTILE_AZIMUTH_DEG: f32 = 0.0;
    /// Launch height above the selected object's center
    pub const PROJECTILE_ORIGIN_OFFSET: f32 = 1.0;
}

/// Unit direction from elevation (above horizontal) and azimuth (around +Y,
/// 0° along +X), both in degrees.
#[inline]
pub fn direction_from_angles(elevation_deg: f32, azimuth_deg: f32) -> Vec3 {
    let el = elevation_deg.to_radians();
    let az = azimuth_deg.to_radians();
    Vec3::new(el.cos() * az.cos(), el.sin(), el.cos() * az.sin())
}

/// Convert spherical (radius, polar from +Y, azimuth around +Y) to cartesian
#[inline]
pub fn spherical_to_cartesian(radius: f32, polar: f32, azimuth: f32) -> Vec3 {
    let sin_polar = polar.sin();
    Vec3::new(
        radius * sin_polar * azimuth.sin(),
        radius * polar.cos(),
        radius * sin_polar * azimuth.cos(),
    )
}

/// Project a vector onto the horizontal plane and normalize it
#[inline]
pub fn horizontal(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z).normalize_or_zero()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_from_angles_reference_axis() {
        let d = direction_from_angles(0.0, 0.0);
        assert!((d - Vec3::X).length() < 1e-6);

        let up = direction_from_angles(90.0, 0.0);
        assert!((up - Vec3::Y).length() < 1e-6);

        let side = direction_from_angles(0.0, 90.0);
        assert!((side - Vec3::Z).length() < 1e-6);
    }

    #[test]
    fn test_spherical_to_cartesian_radius() {
        let p = spherical_to_cartesian(10.0, 1.0, 2.0);
        assert!((p.length() - 10.0).abs() < 1e-4);

        // Polar 0 sits on the +Y pole
        let pole = spherical_to_cartesian(3.0, 0.0, 1.3);
        assert!((pole - Vec3::new(0.0, 3.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_horizontal_drops_vertical() {
        let h = horizontal(Vec3::new(3.0, 7.0, 4.0));
        assert!(h.y.abs() < 1e-6);
        assert!((h.length() - 1.0).abs() < 1e-6);
        assert_eq!(horizontal(Vec3::Y), Vec3::ZERO);
    }
}
