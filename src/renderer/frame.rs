//! Per-frame snapshot of everything the renderer draws

use glam::{Quat, Vec3};
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::sim::camera::View;
use crate::sim::combat::{HIT_FLASH_TIME, Tracer};
use crate::sim::gravity::GravityPreset;
use crate::sim::scene::ObjectKind;
use crate::sim::state::{SimContext, SimMode};
use crate::sim::wave::{MARKER_RADIUS, SAMPLE_SPACING};

/// Caps per frame (must match the host's instance buffers)
pub const MAX_INSTANCES: usize = 2048;
pub const MAX_TRACERS: usize = 64;

const SPHERE_COLOR: [f32; 3] = [0.85, 0.85, 0.9];
const PROJECTILE_COLOR: [f32; 3] = [1.0, 0.55, 0.1];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CameraPose {
    /// Includes the shake offset
    pub position: Vec3,
    pub forward: Vec3,
    pub up: Vec3,
    pub fov_y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Shape {
    Object(ObjectKind),
    Sphere,
    /// One sphere of a compound threat
    ThreatPart,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Instance {
    pub id: u32,
    pub shape: Shape,
    pub position: Vec3,
    pub orientation: Quat,
    pub scale: Vec3,
    pub color: [f32; 3],
    /// 0..1 selection or hit highlight
    pub highlight: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaveFrame {
    /// Rest position of sample 0
    pub origin: Vec3,
    pub spacing: f32,
    pub marker_radius: f32,
    pub heights: Vec<f32>,
    pub colors: Vec<[f32; 3]>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GroundFrame {
    /// None means draw the flat color
    pub texture: Option<GravityPreset>,
    pub color: [f32; 3],
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FxLevels {
    pub shake: f32,
    pub damage_flash: f32,
    pub dead: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderFrame {
    pub mode: SimMode,
    pub time: f32,
    pub camera: CameraPose,
    pub instances: Vec<Instance>,
    pub wave: Option<WaveFrame>,
    pub tracers: Vec<Tracer>,
    pub ground: GroundFrame,
    pub fx: FxLevels,
}

impl RenderFrame {
    pub fn build(ctx: &SimContext, aspect: f32) -> Self {
        let mut instances = Vec::new();
        let mut wave = None;
        let mut tracers = Vec::new();
        let mut fx = FxLevels {
            shake: 0.0,
            damage_flash: 0.0,
            dead: false,
        };

        let view = match ctx.mode {
            SimMode::Sandbox => {
                sandbox_instances(ctx, &mut instances);
                ctx.sandbox.camera.view(ctx.fov_y, aspect)
            }
            SimMode::WaveLab => {
                wave = Some(WaveFrame {
                    origin: ctx.wave.origin,
                    spacing: SAMPLE_SPACING,
                    marker_radius: MARKER_RADIUS,
                    heights: ctx.wave.displacements(),
                    colors: ctx.wave.colors(),
                });
                ctx.wave_camera.view(ctx.fov_y, aspect)
            }
            SimMode::Arena => {
                arena_instances(ctx, &mut instances);
                tracers.extend(ctx.arena.tracers.iter().take(MAX_TRACERS).copied());
                fx = FxLevels {
                    shake: ctx.arena.shake.intensity,
                    damage_flash: ctx.arena.player.damage_flash,
                    dead: !ctx.arena.player.is_alive(),
                };
                ctx.arena.player.camera.view(ctx.fov_y, aspect)
            }
        };
        instances.truncate(MAX_INSTANCES);

        // Separate stream so drawing never perturbs the simulation RNG
        let mut fx_rng = Pcg32::seed_from_u64(ctx.seed ^ ctx.time_ticks);
        let shake = ctx.arena.shake.offset(&mut fx_rng);
        let position = if ctx.mode == SimMode::Arena {
            view.position + shake
        } else {
            view.position
        };

        let ground = &ctx.sandbox.ground;
        Self {
            mode: ctx.mode,
            time: ctx.time,
            camera: pose(&view, position),
            instances,
            wave,
            tracers,
            ground: GroundFrame {
                texture: ground.applied,
                color: ground.color,
            },
            fx,
        }
    }
}

fn pose(view: &View, position: Vec3) -> CameraPose {
    CameraPose {
        position,
        forward: view.forward,
        up: view.up,
        fov_y: view.fov_y,
    }
}

fn sandbox_instances(ctx: &SimContext, out: &mut Vec<Instance>) {
    let sandbox = &ctx.sandbox;
    for obj in &sandbox.objects {
        out.push(Instance {
            id: obj.id,
            shape: Shape::Object(obj.kind),
            position: obj.pos,
            orientation: obj.orientation(),
            scale: obj.half_extents,
            color: obj.color,
            highlight: if sandbox.selected == Some(obj.id) { 1.0 } else { 0.0 },
        });
    }
    let bodies = sandbox
        .spheres
        .active()
        .map(|e| (&e.body, SPHERE_COLOR))
        .chain(sandbox.projectiles.iter().map(|e| (&e.body, PROJECTILE_COLOR)));
    for (body, color) in bodies {
        out.push(Instance {
            id: body.id,
            shape: Shape::Sphere,
            position: body.pos,
            orientation: Quat::IDENTITY,
            scale: Vec3::splat(body.radius),
            color,
            highlight: 0.0,
        });
    }
}

fn arena_instances(ctx: &SimContext, out: &mut Vec<Instance>) {
    let arena = &ctx.arena;
    for entry in arena.threats.active() {
        let threat = &entry.extra;
        let highlight = (threat.flash / HIT_FLASH_TIME).clamp(0.0, 1.0);
        for part in &threat.parts {
            out.push(Instance {
                id: part.id,
                shape: Shape::ThreatPart,
                position: entry.body.pos + threat.orientation * part.offset,
                orientation: threat.orientation,
                scale: Vec3::splat(part.radius),
                color: threat.variant.color(),
                highlight,
            });
        }
    }
    for entry in arena.debris.active() {
        out.push(Instance {
            id: entry.body.id,
            shape: Shape::Sphere,
            position: entry.body.pos,
            orientation: Quat::IDENTITY,
            scale: Vec3::splat(entry.body.radius),
            color: entry.extra.color,
            highlight: 0.0,
        });
    }
}
