//! Selectable scene objects, picking and collision-blocked free movement

use glam::{Quat, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::ray::Ray;
use crate::consts::GROUND_Y;

pub type ObjectId = u32;

/// Idle spin rate (radians/second)
pub const IDLE_SPIN_SPEED: f32 = 0.6;
/// Collision radius as a fraction of the bounding-box diagonal
pub const COLLISION_RADIUS_SCALE: f32 = 0.4;
/// Extra clearance kept between objects when moving
pub const COLLISION_MARGIN: f32 = 0.1;

/// Shape tag stored on each object at creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectKind {
    Sphere,
    Cube,
    Torus,
    Cone,
    Cylinder,
}

impl ObjectKind {
    pub fn label(&self) -> &'static str {
        match self {
            ObjectKind::Sphere => "Sphere",
            ObjectKind::Cube => "Cube",
            ObjectKind::Torus => "Torus",
            ObjectKind::Cone => "Cone",
            ObjectKind::Cylinder => "Cylinder",
        }
    }
}

/// A selectable object in the sandbox
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneObject {
    pub id: ObjectId,
    pub kind: ObjectKind,
    /// Bounding-box center
    pub pos: Vec3,
    pub half_extents: Vec3,
    pub color: [f32; 3],
    /// Idle spin angle around +Y
    pub spin: f32,
    /// Idle animation suspended (e.g. while under gravity)
    pub idle_paused: bool,
}

impl SceneObject {
    pub fn new(id: ObjectId, kind: ObjectKind, pos: Vec3, half_extents: Vec3, color: [f32; 3]) -> Self {
        Self {
            id,
            kind,
            pos,
            half_extents,
            color,
            spin: 0.0,
            idle_paused: false,
        }
    }

    /// Approximate sphere radius for movement blocking
    pub fn collision_radius(&self) -> f32 {
        (self.half_extents * 2.0).length() * COLLISION_RADIUS_SCALE
    }

    /// Resting height of the center when sitting on the ground
    pub fn floor_y(&self) -> f32 {
        GROUND_Y + self.half_extents.y
    }

    pub fn orientation(&self) -> Quat {
        Quat::from_rotation_y(self.spin)
    }

    pub fn animate(&mut self, dt: f32) {
        if !self.idle_paused {
            self.spin = (self.spin + IDLE_SPIN_SPEED * dt) % std::f32::consts::TAU;
        }
    }

    pub fn randomize_color(&mut self, rng: &mut impl Rng) {
        self.color = [
            rng.random_range(0.2..1.0),
            rng.random_range(0.2..1.0),
            rng.random_range(0.2..1.0),
        ];
    }

    fn ray_hit(&self, ray: &Ray) -> Option<f32> {
        ray.intersect_aabb(self.pos - self.half_extents, self.pos + self.half_extents)
    }
}

/// The default sandbox layout
pub fn default_objects() -> Vec<SceneObject> {
    let layout = [
        (ObjectKind::Sphere, Vec3::new(-4.0, 1.0, 0.0), Vec3::splat(1.0), [0.9, 0.3, 0.3]),
        (ObjectKind::Cube, Vec3::new(0.0, 0.75, 0.0), Vec3::splat(0.75), [0.3, 0.6, 0.9]),
        (ObjectKind::Torus, Vec3::new(4.0, 1.0, 0.0), Vec3::new(1.2, 0.4, 1.2), [0.9, 0.8, 0.3]),
        (ObjectKind::Cone, Vec3::new(-2.0, 1.0, -4.0), Vec3::new(0.7, 1.0, 0.7), [0.4, 0.9, 0.5]),
        (ObjectKind::Cylinder, Vec3::new(2.0, 1.0, -4.0), Vec3::new(0.6, 1.0, 0.6), [0.7, 0.4, 0.9]),
    ];
    layout
        .into_iter()
        .enumerate()
        .map(|(i, (kind, pos, half, color))| SceneObject::new(i as ObjectId + 1, kind, pos, half, color))
        .collect()
}

/// Nearest object hit by the ray
pub fn pick(objects: &[SceneObject], ray: &Ray) -> Option<ObjectId> {
    objects
        .iter()
        .filter_map(|o| o.ray_hit(ray).map(|t| (o.id, t)))
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(id, _)| id)
}

/// Result of a free-move attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// No directional input
    Idle,
    Moved,
    /// Candidate position too close to another object; nothing moved
    Blocked(ObjectId),
}

/// Move one object along a horizontal direction, all-or-nothing.
///
/// The whole displacement is refused if the candidate position comes within
/// the combined collision radii plus margin of any other object.
pub fn try_move(objects: &mut [SceneObject], id: ObjectId, direction: Vec3, speed: f32, dt: f32) -> MoveOutcome {
    let direction = Vec3::new(direction.x, 0.0, direction.z);
    if direction.length_squared() < 1e-12 {
        return MoveOutcome::Idle;
    }
    let Some(idx) = objects.iter().position(|o| o.id == id) else {
        return MoveOutcome::Idle;
    };

    let mover = &objects[idx];
    let candidate = mover.pos + direction.normalize() * speed * dt;
    let mover_radius = mover.collision_radius();

    let blocker = objects.iter().find(|other| {
        other.id != id
            && candidate.distance(other.pos) < mover_radius + other.collision_radius() + COLLISION_MARGIN
    });
    if let Some(other) = blocker {
        return MoveOutcome::Blocked(other.id);
    }

    objects[idx].pos = candidate;
    MoveOutcome::Moved
}
