//! Sandbox mode: selectable objects, gravity, falling spheres and projectiles

use glam::{Vec2, Vec3};
use rand::Rng;
use rand_pcg::Pcg32;

use super::body::{BodyId, BodyKind, BodyRegistry};
use super::camera::{OrbitCamera, View};
use super::gravity::{BounceOutcome, GravityBinding, GravityPreset, GroundMaterial, apply_gravity};
use super::input::TickInput;
use super::projectile::{LaunchParams, launch_origin, spawn_projectile, step_projectile};
use super::scene::{ObjectId, SceneObject, default_objects, pick, try_move};
use super::state::SimEvent;
use crate::consts::*;
use crate::error::SimError;
use crate::settings::Settings;
use crate::ui::{UiPanel, keys};

/// Falling spheres appear within this horizontal distance of the origin
const SPHERE_SPREAD: f32 = 3.0;

#[derive(Debug, Clone)]
pub struct Sandbox {
    pub objects: Vec<SceneObject>,
    pub selected: Option<ObjectId>,
    /// Single-object gravity, at most one at a time
    pub gravity: Option<GravityBinding>,
    pub preset: GravityPreset,
    pub ground: GroundMaterial,
    pub spheres: BodyRegistry<()>,
    pub projectiles: BodyRegistry<()>,
    pub camera: OrbitCamera,
    pub move_speed: f32,
}

impl Sandbox {
    pub fn new(settings: &Settings) -> Self {
        let camera = OrbitCamera {
            rotate_speed: settings.orbit_rotate_speed,
            zoom_speed: settings.orbit_zoom_speed,
            ..OrbitCamera::default()
        };
        Self {
            objects: default_objects(),
            selected: None,
            gravity: None,
            preset: GravityPreset::default(),
            ground: GroundMaterial::default(),
            spheres: BodyRegistry::new(),
            projectiles: BodyRegistry::new(),
            camera,
            move_speed: settings.move_speed,
        }
    }

    pub fn object(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    fn object_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.objects.iter_mut().find(|o| o.id == id)
    }

    pub fn selected_object(&self) -> Option<&SceneObject> {
        self.selected.and_then(|id| self.object(id))
    }

    /// Change the selection.
    ///
    /// Selecting an object cancels any gravity binding. The object that was
    /// falling keeps its idle animation paused.
    pub fn select(&mut self, id: Option<ObjectId>, rng: &mut Pcg32, events: &mut Vec<SimEvent>) {
        let label = match id {
            Some(id) => {
                let Some(obj) = self.object_mut(id) else {
                    log::warn!("Ignoring selection of unknown object {}", id);
                    return;
                };
                obj.randomize_color(rng);
                let label = obj.kind.label().to_string();
                if let Some(binding) = self.gravity.take() {
                    log::debug!("Gravity on object {} cancelled by selection", binding.object);
                }
                Some(label)
            }
            None => None,
        };
        self.selected = id;
        events.push(SimEvent::SelectionChanged { object: id, label });
    }

    /// Pick through a screen point and select what it hits (or nothing)
    pub fn select_at(&mut self, view: &View, ndc: Vec2, rng: &mut Pcg32, events: &mut Vec<SimEvent>) {
        let ray = view.ray_through(ndc);
        let hit = pick(&self.objects, &ray);
        if hit != self.selected || hit.is_some() {
            self.select(hit, rng, events);
        }
    }

    /// Start single-object gravity on the selection
    pub fn activate_gravity(&mut self) -> Result<ObjectId, SimError> {
        let id = self.selected.ok_or(SimError::NoSelection {
            operation: "gravity",
        })?;
        let obj = self.object_mut(id).ok_or(SimError::NoSelection {
            operation: "gravity",
        })?;
        obj.idle_paused = true;
        let floor = obj.floor_y();
        self.gravity = Some(GravityBinding::new(id, floor));
        log::info!("Gravity ({}) on object {}", self.preset, id);
        Ok(id)
    }

    /// Drop a sphere from the panel height at a random horizontal spot
    pub fn spawn_sphere(&mut self, panel: &UiPanel, rng: &mut Pcg32) -> BodyId {
        let height = panel.get_f32(keys::SPHERE_HEIGHT, FALLING_SPHERE_HEIGHT);
        let pos = Vec3::new(
            rng.random_range(-SPHERE_SPREAD..=SPHERE_SPREAD),
            height.max(GROUND_Y + FALLING_SPHERE_RADIUS),
            rng.random_range(-SPHERE_SPREAD..=SPHERE_SPREAD),
        );
        let id = self.spheres.spawn(
            BodyKind::FallingSphere,
            pos,
            Vec3::ZERO,
            Vec3::new(0.0, self.preset.accel(), 0.0),
            FALLING_SPHERE_RADIUS,
            (),
        );
        log::debug!("Falling sphere #{} at {:?}", id, pos);
        id
    }

    /// Launch a projectile with the panel's parameters
    pub fn launch_projectile(&mut self, panel: &UiPanel) -> BodyId {
        let params = LaunchParams::from_panel(panel);
        let origin = launch_origin(self.selected_object().map(|o| o.pos));
        let id = spawn_projectile(&mut self.projectiles, &params, self.preset.accel(), origin);
        log::debug!("Projectile #{} launched with {:?}", id, params);
        id
    }

    /// Switch preset. Falling bodies pick up the new acceleration next tick.
    pub fn set_preset(&mut self, preset: GravityPreset, events: &mut Vec<SimEvent>) {
        if preset == self.preset {
            return;
        }
        self.preset = preset;
        for entry in self.spheres.iter_mut() {
            entry.body.accel.y = preset.accel();
        }
        self.ground.request(preset);
        events.push(SimEvent::GroundTextureRequested(preset));
        log::info!("Gravity preset: {} ({} m/s²)", preset, preset.accel());
    }

    /// One sandbox tick (camera, animation, movement, all integrators)
    pub fn step(&mut self, input: &TickInput, dt: f32, events: &mut Vec<SimEvent>) {
        if input.drag_delta != Vec2::ZERO {
            self.camera.drag(input.drag_delta);
        }
        if input.wheel != 0.0 {
            self.camera.zoom(input.wheel);
        }

        for obj in &mut self.objects {
            obj.animate(dt);
        }

        if let Some(id) = self.selected.filter(|_| input.keys.any()) {
            let axis = input.keys.axis();
            let (forward, right) = self.camera.ground_basis();
            let direction = forward * axis.y + right * axis.x;
            try_move(&mut self.objects, id, direction, self.move_speed, dt);
        }

        self.step_gravity_binding(dt, events);

        for entry in self.spheres.iter_mut() {
            let body = &mut entry.body;
            if !body.active {
                continue;
            }
            let floor = GROUND_Y + body.radius;
            let outcome = apply_gravity(&mut body.pos.y, &mut body.vel.y, floor, body.accel.y, dt);
            if outcome == BounceOutcome::Settled {
                body.retire();
                events.push(SimEvent::BodySettled {
                    id: body.id,
                    kind: body.kind,
                });
            }
        }

        for entry in self.projectiles.iter_mut() {
            if step_projectile(&mut entry.body, dt) {
                events.push(SimEvent::ProjectileLanded {
                    id: entry.body.id,
                    position: entry.body.pos,
                });
            }
        }

        self.spheres.sweep();
        self.projectiles.sweep();
    }

    fn step_gravity_binding(&mut self, dt: f32, events: &mut Vec<SimEvent>) {
        let accel = self.preset.accel();
        let Some(binding) = self.gravity.as_mut() else {
            return;
        };
        let Some(obj) = self.objects.iter_mut().find(|o| o.id == binding.object) else {
            self.gravity = None;
            return;
        };
        if !binding.active {
            return;
        }
        let outcome = apply_gravity(&mut obj.pos.y, &mut binding.velocity_y, binding.floor_y, accel, dt);
        if outcome == BounceOutcome::Settled {
            binding.active = false;
            obj.idle_paused = false;
            let object = obj.id;
            self.gravity = None;
            events.push(SimEvent::ObjectSettled { object });
        }
    }

    /// Put every object back and drop all bodies
    pub fn reset(&mut self) {
        self.objects = default_objects();
        self.selected = None;
        self.gravity = None;
        self.spheres.clear();
        self.projectiles.clear();
    }
}
