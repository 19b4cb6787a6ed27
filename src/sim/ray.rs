//! Ray casting against bounding volumes
//!
//! Picking and hitscan both reduce to "nearest positive hit distance along a
//! ray", so every test returns the entry distance `t` or `None`.

use glam::Vec3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit length
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self {
            origin,
            dir: dir.normalize_or_zero(),
        }
    }

    #[inline]
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.dir * t
    }

    /// Distance to the first intersection with a sphere
    ///
    /// A ray starting inside the sphere reports `t = 0`.
    pub fn intersect_sphere(&self, center: Vec3, radius: f32) -> Option<f32> {
        let oc = self.origin - center;
        let b = oc.dot(self.dir);
        let c = oc.length_squared() - radius * radius;
        if c <= 0.0 {
            return Some(0.0);
        }
        // Origin outside and pointing away
        if b > 0.0 {
            return None;
        }
        let disc = b * b - c;
        if disc < 0.0 {
            return None;
        }
        Some(-b - disc.sqrt())
    }

    /// Slab test against an axis-aligned box
    pub fn intersect_aabb(&self, min: Vec3, max: Vec3) -> Option<f32> {
        let mut t_near = 0.0_f32;
        let mut t_far = f32::INFINITY;

        for axis in 0..3 {
            let o = self.origin[axis];
            let d = self.dir[axis];
            let (lo, hi) = (min[axis], max[axis]);

            if d.abs() < 1e-8 {
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / d;
            let mut t0 = (lo - o) * inv;
            let mut t1 = (hi - o) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_near = t_near.max(t0);
            t_far = t_far.min(t1);
            if t_near > t_far {
                return None;
            }
        }

        Some(t_near)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sphere_hit_distance() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z);
        let t = ray.intersect_sphere(Vec3::ZERO, 1.0).unwrap();
        assert!((t - 9.0).abs() < 1e-5);
        assert!((ray.point_at(t) - Vec3::new(0.0, 0.0, 1.0)).length() < 1e-5);
    }

    #[test]
    fn test_sphere_miss_and_behind() {
        let ray = Ray::new(Vec3::new(0.0, 2.0, 10.0), Vec3::NEG_Z);
        assert!(ray.intersect_sphere(Vec3::ZERO, 1.0).is_none());

        let away = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::Z);
        assert!(away.intersect_sphere(Vec3::ZERO, 1.0).is_none());
    }

    #[test]
    fn test_sphere_origin_inside() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        assert_eq!(ray.intersect_sphere(Vec3::ZERO, 2.0), Some(0.0));
    }

    #[test]
    fn test_aabb_hit_and_miss() {
        let ray = Ray::new(Vec3::new(-5.0, 0.5, 0.5), Vec3::X);
        let t = ray
            .intersect_aabb(Vec3::ZERO, Vec3::ONE)
            .expect("ray should hit box");
        assert!((t - 5.0).abs() < 1e-5);

        let miss = Ray::new(Vec3::new(-5.0, 2.0, 0.5), Vec3::X);
        assert!(miss.intersect_aabb(Vec3::ZERO, Vec3::ONE).is_none());

        // Axis-parallel ray outside the slab
        let parallel = Ray::new(Vec3::new(-5.0, 0.5, 3.0), Vec3::X);
        assert!(parallel.intersect_aabb(Vec3::ZERO, Vec3::ONE).is_none());
    }

    #[test]
    fn test_aabb_behind_origin() {
        let ray = Ray::new(Vec3::new(5.0, 0.5, 0.5), Vec3::X);
        assert!(ray.intersect_aabb(Vec3::ZERO, Vec3::ONE).is_none());
    }
}
