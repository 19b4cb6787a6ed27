//! Arena combat: threat spawning, homing, hitscan, knockback and shatter
//!
//! Threats are compound bodies. Each part gets an id in the `PartTable` so a
//! hitscan ray that strikes any part resolves to the owning threat.
//! Every timed effect (hit flash, tracer, debris lifetime, fire cooldown) is
//! a countdown or timestamp on simulation time.

use std::collections::HashMap;
use std::f32::consts::PI;

use glam::{Quat, Vec3};
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::body::{Body, BodyId, BodyKind, BodyRegistry};
use super::camera::ScreenShake;
use super::input::TickInput;
use super::player::{DamageOutcome, PLAYER_HITBOX_RADIUS, PlayerState};
use super::ray::Ray;
use super::state::SimEvent;
use crate::consts::GROUND_Y;
use crate::settings::Settings;

// Spawning
pub const SPAWN_DISTANCE_MIN: f32 = 18.0;
pub const SPAWN_DISTANCE_MAX: f32 = 30.0;
/// Half-angle of the spawn cone around the view direction
pub const SPAWN_CONE_HALF_ANGLE: f32 = 35.0 * PI / 180.0;
pub const SPAWN_HEIGHT_MIN: f32 = 0.8;
pub const SPAWN_HEIGHT_MAX: f32 = 3.5;
pub const THREAT_SPEED_MIN: f32 = 3.0;
pub const THREAT_SPEED_MAX: f32 = 6.0;
/// Shortest gap between spawns regardless of jitter
pub const MIN_SPAWN_INTERVAL: f32 = 0.1;

// Threat motion
/// Fraction of speed shed per second
pub const THREAT_DRAG: f32 = 0.15;
pub const DESPAWN_DISTANCE: f32 = 60.0;
pub const CONTACT_DAMAGE: u32 = 20;

// Weapon
pub const HITSCAN_RANGE: f32 = 100.0;
pub const SHOT_DAMAGE: i32 = 1;
pub const KNOCKBACK_SPEED: f32 = 4.0;
pub const HIT_FLASH_TIME: f32 = 0.1;
pub const TRACER_TIME: f32 = 0.08;

// Debris
pub const DEBRIS_RADIUS: f32 = 0.08;
pub const DEBRIS_GRAVITY: f32 = -9.8;
pub const DEBRIS_RESTITUTION: f32 = 0.4;
/// Horizontal speed kept on ground contact
pub const DEBRIS_FRICTION: f32 = 0.6;
/// Fraction of speed shed per second
pub const DEBRIS_DRAG: f32 = 0.8;
pub const DEBRIS_PER_UNIT_RADIUS: f32 = 12.0;
pub const DEBRIS_LIFETIME_MIN: f32 = 1.2;
pub const DEBRIS_LIFETIME_MAX: f32 = 2.5;

pub type PartId = u32;

/// Threat archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThreatVariant {
    /// Small and fast
    Dart,
    Orb,
    /// Big, slow and tough
    Hulk,
}

impl ThreatVariant {
    pub fn speed_multiplier(&self) -> f32 {
        match self {
            ThreatVariant::Dart => 1.6,
            ThreatVariant::Orb => 1.0,
            ThreatVariant::Hulk => 0.6,
        }
    }

    pub fn radius(&self) -> f32 {
        match self {
            ThreatVariant::Dart => 0.35,
            ThreatVariant::Orb => 0.6,
            ThreatVariant::Hulk => 1.1,
        }
    }

    pub fn hp(&self) -> i32 {
        match self {
            ThreatVariant::Dart => 1,
            ThreatVariant::Orb => 2,
            ThreatVariant::Hulk => 5,
        }
    }

    pub fn reward(&self) -> u64 {
        match self {
            ThreatVariant::Dart => 150,
            ThreatVariant::Orb => 100,
            ThreatVariant::Hulk => 300,
        }
    }

    pub fn color(&self) -> [f32; 3] {
        match self {
            ThreatVariant::Dart => [1.0, 0.85, 0.2],
            ThreatVariant::Orb => [0.9, 0.2, 0.3],
            ThreatVariant::Hulk => [0.6, 0.2, 0.9],
        }
    }

    /// Part spheres (local offset, radius) in a frame facing -Z
    pub fn part_layout(&self) -> &'static [(Vec3, f32)] {
        const DART: [(Vec3, f32); 2] = [(Vec3::ZERO, 0.25), (Vec3::new(0.0, 0.0, -0.3), 0.12)];
        const ORB: [(Vec3, f32); 3] = [
            (Vec3::ZERO, 0.45),
            (Vec3::new(0.4, 0.0, 0.0), 0.18),
            (Vec3::new(-0.4, 0.0, 0.0), 0.18),
        ];
        const HULK: [(Vec3, f32); 4] = [
            (Vec3::ZERO, 0.8),
            (Vec3::new(0.0, 0.75, -0.3), 0.4),
            (Vec3::new(0.85, 0.0, 0.0), 0.35),
            (Vec3::new(-0.85, 0.0, 0.0), 0.35),
        ];
        match self {
            ThreatVariant::Dart => &DART,
            ThreatVariant::Orb => &ORB,
            ThreatVariant::Hulk => &HULK,
        }
    }

    /// Weighted pick: orbs common, hulks rare
    pub fn random(rng: &mut impl Rng) -> Self {
        match rng.random_range(0..10) {
            0..=4 => ThreatVariant::Orb,
            5..=7 => ThreatVariant::Dart,
            _ => ThreatVariant::Hulk,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Part {
    pub id: PartId,
    pub offset: Vec3,
    pub radius: f32,
}

/// Combat payload carried by threat bodies
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Threat {
    pub variant: ThreatVariant,
    pub hp: i32,
    pub reward: u64,
    pub alive: bool,
    pub orientation: Quat,
    pub parts: Vec<Part>,
    /// Hit flash countdown (seconds)
    pub flash: f32,
}

impl Threat {
    /// Apply damage. Returns true only on the call that kills it.
    pub fn damage(&mut self, amount: i32) -> bool {
        if !self.alive {
            return false;
        }
        self.hp -= amount;
        if self.hp <= 0 {
            self.alive = false;
            return true;
        }
        false
    }
}

/// Part id to owning threat
#[derive(Debug, Clone, Default)]
pub struct PartTable {
    owners: HashMap<PartId, BodyId>,
    next_id: PartId,
}

impl PartTable {
    pub fn insert(&mut self, owner: BodyId) -> PartId {
        self.next_id += 1;
        self.owners.insert(self.next_id, owner);
        self.next_id
    }

    pub fn owner(&self, part: PartId) -> Option<BodyId> {
        self.owners.get(&part).copied()
    }

    pub fn remove(&mut self, parts: &[Part]) {
        for part in parts {
            self.owners.remove(&part.id);
        }
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    pub fn clear(&mut self) {
        self.owners.clear();
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Debris {
    pub color: [f32; 3],
    /// Remaining seconds
    pub lifetime: f32,
    pub bounced: bool,
}

/// Shot visualization from muzzle to impact (or max range)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tracer {
    pub from: Vec3,
    pub to: Vec3,
    /// Remaining seconds
    pub ttl: f32,
}

/// A resolved hitscan hit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotHit {
    pub threat: BodyId,
    pub part: PartId,
    pub point: Vec3,
    pub distance: f32,
}

/// Why a threat left the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ThreatFate {
    Flying,
    OutOfRange,
    HitPlayer,
    Missed,
}

/// Arena mode state
#[derive(Debug, Clone)]
pub struct Arena {
    pub player: PlayerState,
    pub threats: BodyRegistry<Threat>,
    pub debris: BodyRegistry<Debris>,
    pub parts: PartTable,
    pub tracers: Vec<Tracer>,
    pub shake: ScreenShake,
    /// Arena clock (seconds), drives the fire cooldown
    pub time: f32,
    /// Countdown to the next spawn
    pub spawn_timer: f32,
    last_shot: Option<f32>,
    spawn_mean: f32,
    spawn_jitter: f32,
    fire_interval: f32,
    shake_enabled: bool,
}

impl Arena {
    pub fn new(settings: &Settings) -> Self {
        let mut player = PlayerState::default();
        player.camera.sensitivity = settings.look_sensitivity;
        player.camera.move_speed = settings.player_move_speed;
        Self {
            player,
            threats: BodyRegistry::new(),
            debris: BodyRegistry::new(),
            parts: PartTable::default(),
            tracers: Vec::new(),
            shake: ScreenShake::default(),
            time: 0.0,
            spawn_timer: settings.spawn_interval_mean,
            last_shot: None,
            spawn_mean: settings.spawn_interval_mean.max(MIN_SPAWN_INTERVAL),
            spawn_jitter: settings.spawn_interval_jitter.abs(),
            fire_interval: settings.fire_interval.max(0.0),
            shake_enabled: settings.effective_screen_shake(),
        }
    }

    fn next_spawn_interval(&self, rng: &mut Pcg32) -> f32 {
        let lo = self.spawn_mean - self.spawn_jitter;
        let hi = self.spawn_mean + self.spawn_jitter;
        rng.random_range(lo..=hi).max(MIN_SPAWN_INTERVAL)
    }

    fn add_shake(&mut self, amount: f32) {
        if self.shake_enabled {
            self.shake.add(amount);
        }
    }

    /// Advance the arena by one tick
    pub fn update(&mut self, input: &TickInput, rng: &mut Pcg32, dt: f32, events: &mut Vec<SimEvent>) {
        self.time += dt;

        if self.player.is_alive() {
            if input.pointer_locked {
                self.player.camera.look(input.look_delta);
            }
            self.player.camera.step(input.keys, input.jump, dt);

            if input.pointer_locked {
                self.spawn_timer -= dt;
                if self.spawn_timer <= 0.0 {
                    self.spawn_threat(rng);
                    self.spawn_timer = self.next_spawn_interval(rng);
                }
            }

            self.update_threats(rng, dt, events);

            if input.fire && input.pointer_locked && self.player.is_alive() {
                self.fire(rng, events);
            }
        }

        self.update_debris(dt);
        self.sweep();

        for t in &mut self.tracers {
            t.ttl -= dt;
        }
        self.tracers.retain(|t| t.ttl > 0.0);
        self.player.decay_flash(dt);
        self.shake.decay();
    }

    /// Spawn one threat inside the forward cone
    pub fn spawn_threat(&mut self, rng: &mut Pcg32) -> BodyId {
        let camera = &self.player.camera;
        let angle = rng.random_range(-SPAWN_CONE_HALF_ANGLE..=SPAWN_CONE_HALF_ANGLE);
        let dir = Quat::from_rotation_y(angle) * camera.flat_forward();
        let distance = rng.random_range(SPAWN_DISTANCE_MIN..=SPAWN_DISTANCE_MAX);
        let height = rng.random_range(SPAWN_HEIGHT_MIN..=SPAWN_HEIGHT_MAX);
        let feet = Vec3::new(camera.position.x, GROUND_Y, camera.position.z);
        let pos = feet + dir * distance + Vec3::Y * height;

        let variant = ThreatVariant::random(rng);
        let speed = rng.random_range(THREAT_SPEED_MIN..=THREAT_SPEED_MAX) * variant.speed_multiplier();
        let heading = (self.player.hitbox_center() - pos).normalize_or_zero();
        let payload = Threat {
            variant,
            hp: variant.hp(),
            reward: variant.reward(),
            alive: true,
            orientation: facing(heading),
            parts: Vec::new(),
            flash: 0.0,
        };
        let id = self.threats.spawn(
            BodyKind::Threat,
            pos,
            heading * speed,
            Vec3::ZERO,
            variant.radius(),
            payload,
        );

        let parts = variant
            .part_layout()
            .iter()
            .map(|&(offset, radius)| Part {
                id: self.parts.insert(id),
                offset,
                radius,
            })
            .collect();
        if let Some(entry) = self.threats.get_mut(id) {
            entry.extra.parts = parts;
        }
        log::debug!("Spawned {:?} #{} at {:?}", variant, id, pos);
        id
    }

    fn update_threats(&mut self, rng: &mut Pcg32, dt: f32, events: &mut Vec<SimEvent>) {
        let player_center = self.player.hitbox_center();
        let eye = self.player.camera.position;
        let forward = self.player.camera.flat_forward();
        let keep = (1.0 - THREAT_DRAG * dt).max(0.0);
        let mut contacts = 0u32;

        for entry in self.threats.iter_mut() {
            if !entry.body.active || !entry.extra.alive {
                continue;
            }
            let body = &mut entry.body;
            let threat = &mut entry.extra;

            body.integrate(dt);
            if body.vel.length_squared() > 1e-8 {
                threat.orientation = facing(body.vel);
            }
            body.vel *= keep;
            threat.flash = (threat.flash - dt).max(0.0);

            let fate = if body.pos.distance_squared(player_center) > DESPAWN_DISTANCE * DESPAWN_DISTANCE {
                ThreatFate::OutOfRange
            } else if body.overlaps(player_center, PLAYER_HITBOX_RADIUS) {
                ThreatFate::HitPlayer
            } else if (body.pos - eye).dot(forward) < 0.0 {
                ThreatFate::Missed
            } else {
                ThreatFate::Flying
            };

            match fate {
                ThreatFate::Flying => {}
                ThreatFate::OutOfRange | ThreatFate::Missed => {
                    log::debug!("Threat #{} left the arena ({:?})", body.id, fate);
                    threat.alive = false;
                    body.retire();
                }
                ThreatFate::HitPlayer => {
                    threat.alive = false;
                    body.retire();
                    shatter(&mut self.debris, body, threat.variant, Vec3::ZERO, rng);
                    contacts += 1;
                }
            }
        }

        for _ in 0..contacts {
            self.hurt_player(CONTACT_DAMAGE, events);
        }
    }

    fn hurt_player(&mut self, amount: u32, events: &mut Vec<SimEvent>) {
        match self.player.take_damage(amount) {
            DamageOutcome::Ignored => {}
            DamageOutcome::Hurt { remaining } => {
                self.add_shake(0.3 * amount as f32 / CONTACT_DAMAGE as f32);
                events.push(SimEvent::PlayerDamaged { amount, hp: remaining });
            }
            DamageOutcome::Killed => {
                self.add_shake(1.0);
                events.push(SimEvent::PlayerDamaged { amount, hp: 0 });
                events.push(SimEvent::PlayerDied {
                    score: self.player.score,
                    kills: self.player.kills,
                });
                events.push(SimEvent::ReleasePointerLock);
                log::info!(
                    "Player died: score {} with {} kills",
                    self.player.score,
                    self.player.kills
                );
            }
        }
    }

    /// Nearest threat part along the ray, within range
    pub fn cast(&self, ray: &Ray) -> Option<ShotHit> {
        let mut best: Option<ShotHit> = None;
        for entry in self.threats.active() {
            let threat = &entry.extra;
            if !threat.alive {
                continue;
            }
            for part in &threat.parts {
                let center = entry.body.pos + threat.orientation * part.offset;
                let Some(t) = ray.intersect_sphere(center, part.radius) else {
                    continue;
                };
                if t > HITSCAN_RANGE || best.is_some_and(|b| b.distance <= t) {
                    continue;
                }
                let Some(owner) = self.parts.owner(part.id) else {
                    continue;
                };
                best = Some(ShotHit {
                    threat: owner,
                    part: part.id,
                    point: ray.point_at(t),
                    distance: t,
                });
            }
        }
        best
    }

    /// Fire if the cooldown allows. Returns the hit, if any.
    pub fn fire(&mut self, rng: &mut Pcg32, events: &mut Vec<SimEvent>) -> Option<ShotHit> {
        if self.last_shot.is_some_and(|last| self.time - last < self.fire_interval) {
            return None;
        }
        self.last_shot = Some(self.time);

        let camera = &self.player.camera;
        let ray = Ray::new(camera.position, camera.forward());
        let hit = self.cast(&ray);
        let end = hit.map_or_else(|| ray.point_at(HITSCAN_RANGE), |h| h.point);
        self.tracers.push(Tracer {
            from: ray.origin,
            to: end,
            ttl: TRACER_TIME,
        });

        let shot = hit?;
        let entry = self.threats.get_mut(shot.threat)?;
        entry.body.vel += ray.dir * KNOCKBACK_SPEED;
        entry.extra.flash = HIT_FLASH_TIME;
        if entry.extra.damage(SHOT_DAMAGE) {
            entry.body.retire();
            let variant = entry.extra.variant;
            let reward = entry.extra.reward;
            shatter(&mut self.debris, &entry.body, variant, ray.dir * 2.0, rng);
            self.player.add_kill(reward);
            self.add_shake(0.15);
            events.push(SimEvent::ThreatKilled {
                id: shot.threat,
                variant,
                score: self.player.score,
            });
            log::info!("Killed {:?} #{} (+{})", variant, shot.threat, reward);
        }
        Some(shot)
    }

    fn update_debris(&mut self, dt: f32) {
        let keep = (1.0 - DEBRIS_DRAG * dt).max(0.0);
        for entry in self.debris.iter_mut() {
            let body = &mut entry.body;
            if !body.active {
                continue;
            }
            body.integrate(dt);
            let floor = GROUND_Y + body.radius;
            if body.pos.y <= floor {
                body.pos.y = floor;
                if entry.extra.bounced {
                    body.vel.y = 0.0;
                } else {
                    body.vel.y = -body.vel.y * DEBRIS_RESTITUTION;
                    entry.extra.bounced = true;
                }
                body.vel.x *= DEBRIS_FRICTION;
                body.vel.z *= DEBRIS_FRICTION;
            }
            body.vel *= keep;

            entry.extra.lifetime -= dt;
            if entry.extra.lifetime <= 0.0 {
                body.retire();
            }
        }
    }

    fn sweep(&mut self) {
        for gone in self.threats.sweep() {
            self.parts.remove(&gone.extra.parts);
        }
        self.debris.sweep();
    }

    /// Restore the arena to a fresh run
    pub fn reset(&mut self, events: &mut Vec<SimEvent>) {
        self.player.reset();
        self.threats.clear();
        self.debris.clear();
        self.parts.clear();
        self.tracers.clear();
        self.shake = ScreenShake::default();
        self.spawn_timer = self.spawn_mean;
        self.last_shot = None;
        events.push(SimEvent::GameReset);
        log::info!("Arena reset");
    }
}

/// Break a threat into debris. Count scales with its radius.
pub fn shatter(
    debris: &mut BodyRegistry<Debris>,
    body: &Body,
    variant: ThreatVariant,
    bias: Vec3,
    rng: &mut impl Rng,
) -> usize {
    let count = (body.radius * DEBRIS_PER_UNIT_RADIUS).ceil().clamp(4.0, 24.0) as usize;
    for _ in 0..count {
        let offset = random_unit(rng) * rng.random_range(0.0..body.radius);
        let outward = offset.normalize_or_zero() * rng.random_range(2.0..5.0);
        let up = Vec3::Y * rng.random_range(1.0..4.0);
        let vel = outward + bias + up;
        debris.spawn(
            BodyKind::Debris,
            body.pos + offset,
            vel,
            Vec3::new(0.0, DEBRIS_GRAVITY, 0.0),
            DEBRIS_RADIUS,
            Debris {
                color: variant.color(),
                lifetime: rng.random_range(DEBRIS_LIFETIME_MIN..DEBRIS_LIFETIME_MAX),
                bounced: false,
            },
        );
    }
    count
}

/// Rotation turning the model's -Z nose toward `dir`
fn facing(dir: Vec3) -> Quat {
    dir.try_normalize()
        .map_or(Quat::IDENTITY, |d| Quat::from_rotation_arc(Vec3::NEG_Z, d))
}

fn random_unit(rng: &mut impl Rng) -> Vec3 {
    let v = Vec3::new(
        rng.random_range(-1.0..1.0),
        rng.random_range(-1.0..1.0),
        rng.random_range(-1.0..1.0),
    );
    v.try_normalize().unwrap_or(Vec3::Y)
}
