//! Kinematic body registry
//!
//! Every simulated thing that moves on its own (falling spheres, projectiles,
//! debris, threats) is a `Body`. Registries are generic over a per-kind payload
//! so combat data rides along with the shared kinematic core.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Registry-unique body identifier
pub type BodyId = u32;

/// What a body is, fixed at creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyKind {
    FallingSphere,
    Projectile,
    Debris,
    Threat,
}

/// Shared kinematic state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub id: BodyId,
    pub kind: BodyKind,
    pub pos: Vec3,
    pub vel: Vec3,
    /// Constant for the body's lifetime
    pub accel: Vec3,
    pub radius: f32,
    /// False means scheduled for removal
    pub active: bool,
}

impl Body {
    /// Semi-implicit Euler step with the body's own acceleration
    #[inline]
    pub fn integrate(&mut self, dt: f32) {
        self.vel += self.accel * dt;
        self.pos += self.vel * dt;
    }

    /// Mark for removal. A retired body is never reactivated.
    #[inline]
    pub fn retire(&mut self) {
        self.active = false;
    }

    /// Sphere-sphere overlap test
    #[inline]
    pub fn overlaps(&self, center: Vec3, radius: f32) -> bool {
        let reach = self.radius + radius;
        self.pos.distance_squared(center) < reach * reach
    }
}

/// A body plus its kind-specific payload
#[derive(Debug, Clone)]
pub struct Entry<T> {
    pub body: Body,
    pub extra: T,
}

/// Owns one family of bodies in spawn order
#[derive(Debug, Clone)]
pub struct BodyRegistry<T> {
    entries: Vec<Entry<T>>,
    next_id: BodyId,
}

impl<T> Default for BodyRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> BodyRegistry<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 1,
        }
    }

    /// Add a body and return its id
    pub fn spawn(
        &mut self,
        kind: BodyKind,
        pos: Vec3,
        vel: Vec3,
        accel: Vec3,
        radius: f32,
        extra: T,
    ) -> BodyId {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push(Entry {
            body: Body {
                id,
                kind,
                pos,
                vel,
                accel,
                radius,
                active: true,
            },
            extra,
        });
        id
    }

    pub fn get(&self, id: BodyId) -> Option<&Entry<T>> {
        self.entries.iter().find(|e| e.body.id == id)
    }

    pub fn get_mut(&mut self, id: BodyId) -> Option<&mut Entry<T>> {
        self.entries.iter_mut().find(|e| e.body.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entry<T>> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entry<T>> {
        self.entries.iter_mut()
    }

    /// Bodies not yet scheduled for removal
    pub fn active(&self) -> impl Iterator<Item = &Entry<T>> {
        self.entries.iter().filter(|e| e.body.active)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove every inactive body, returning what was removed (spawn order kept)
    pub fn sweep(&mut self) -> Vec<Entry<T>> {
        if self.entries.iter().all(|e| e.body.active) {
            return Vec::new();
        }
        let (keep, gone): (Vec<_>, Vec<_>) = std::mem::take(&mut self.entries)
            .into_iter()
            .partition(|e| e.body.active);
        self.entries = keep;
        gone
    }

    /// Drop every body. Ids keep counting up so stale ids never alias.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spawn_at(reg: &mut BodyRegistry<()>, y: f32) -> BodyId {
        reg.spawn(
            BodyKind::Projectile,
            Vec3::new(0.0, y, 0.0),
            Vec3::ZERO,
            Vec3::ZERO,
            0.5,
            (),
        )
    }

    #[test]
    fn test_ids_are_unique_after_clear() {
        let mut reg = BodyRegistry::new();
        let a = spawn_at(&mut reg, 1.0);
        reg.clear();
        let b = spawn_at(&mut reg, 1.0);
        assert_ne!(a, b);
    }

    #[test]
    fn test_sweep_removes_only_inactive() {
        let mut reg = BodyRegistry::new();
        let a = spawn_at(&mut reg, 1.0);
        let b = spawn_at(&mut reg, 2.0);
        let c = spawn_at(&mut reg, 3.0);

        reg.get_mut(b).unwrap().body.retire();
        let gone = reg.sweep();

        assert_eq!(gone.len(), 1);
        assert_eq!(gone[0].body.id, b);
        let ids: Vec<_> = reg.iter().map(|e| e.body.id).collect();
        assert_eq!(ids, vec![a, c]);
    }

    #[test]
    fn test_integrate_semi_implicit() {
        let mut reg = BodyRegistry::new();
        let id = reg.spawn(
            BodyKind::Projectile,
            Vec3::ZERO,
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, -10.0, 0.0),
            0.1,
            (),
        );
        let body = &mut reg.get_mut(id).unwrap().body;
        body.integrate(0.1);
        // Velocity updates first, then position uses the new velocity
        assert!((body.vel.y + 1.0).abs() < 1e-6);
        assert!((body.pos.y + 0.1).abs() < 1e-6);
        assert!((body.pos.x - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_overlaps() {
        let mut reg = BodyRegistry::new();
        let id = spawn_at(&mut reg, 0.0);
        let body = &reg.get(id).unwrap().body;
        assert!(body.overlaps(Vec3::new(0.9, 0.0, 0.0), 0.5));
        assert!(!body.overlaps(Vec3::new(1.1, 0.0, 0.0), 0.5));
    }
}
