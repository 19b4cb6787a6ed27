//! Deterministic simulation module
//!
//! All kinematics and gameplay live here. This module must be pure and deterministic:
//! - Explicit, clamped frame delta only
//! - Seeded RNG only
//! - Stable iteration order (spawn order / object id)
//! - No rendering or platform dependencies

pub mod body;
pub mod camera;
pub mod combat;
pub mod gravity;
pub mod input;
pub mod player;
pub mod projectile;
pub mod ray;
pub mod sandbox;
pub mod scene;
pub mod state;
pub mod tick;
pub mod wave;

pub use body::{Body, BodyId, BodyKind, BodyRegistry, Entry};
pub use camera::{FpsCamera, OrbitCamera, ScreenShake, View};
pub use combat::{Arena, Debris, PartTable, Threat, ThreatVariant, Tracer};
pub use gravity::{BounceOutcome, GravityBinding, GravityPreset, GroundMaterial, apply_gravity};
pub use input::{InputEvent, InputState, Key, MoveKeys, PointerButton, TickInput};
pub use player::{DamageOutcome, PlayerPhase, PlayerState};
pub use projectile::{LaunchParams, step_projectile};
pub use ray::Ray;
pub use sandbox::Sandbox;
pub use scene::{MoveOutcome, ObjectId, ObjectKind, SceneObject};
pub use state::{SimContext, SimEvent, SimMode};
pub use tick::{clamp_dt, tick};
pub use wave::{ColorMode, ImpulseParams, RunState, WaveField};
