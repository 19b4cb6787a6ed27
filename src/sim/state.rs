//! Simulation context and the event stream
//!
//! Everything the three modes need lives in one `SimContext`, built once by
//! the session and reset explicitly.

use std::fmt;
use std::str::FromStr;

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::body::{BodyId, BodyKind};
use super::camera::OrbitCamera;
use super::combat::{Arena, ThreatVariant};
use super::gravity::GravityPreset;
use super::sandbox::Sandbox;
use super::scene::ObjectId;
use super::wave::WaveField;
use crate::error::SimError;
use crate::settings::Settings;

/// Which simulation is ticking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SimMode {
    /// Gravity, projectiles, selection and free-move under the orbit camera
    #[default]
    Sandbox,
    /// Wave relaxation under the orbit camera
    WaveLab,
    /// Threats and hitscan under the FPS camera
    Arena,
}

impl SimMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SimMode::Sandbox => "sandbox",
            SimMode::WaveLab => "wave",
            SimMode::Arena => "arena",
        }
    }

    /// Arena needs pointer lock; the others use drag and click
    pub fn wants_pointer_lock(&self) -> bool {
        matches!(self, SimMode::Arena)
    }
}

impl fmt::Display for SimMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SimMode {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sandbox" => Ok(SimMode::Sandbox),
            "wave" | "wavelab" => Ok(SimMode::WaveLab),
            "arena" => Ok(SimMode::Arena),
            _ => Err(SimError::UnknownAction(format!("mode:{}", s))),
        }
    }
}

/// UI-observable changes, drained by the host every frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SimEvent {
    /// Blocking message for the user
    Notice(String),
    SelectionChanged {
        object: Option<ObjectId>,
        label: Option<String>,
    },
    /// Host should start loading the ground texture for this preset
    GroundTextureRequested(GravityPreset),
    /// A scene object under gravity came to rest
    ObjectSettled { object: ObjectId },
    BodySettled { id: BodyId, kind: BodyKind },
    ProjectileLanded { id: BodyId, position: Vec3 },
    PlayerDamaged { amount: u32, hp: u32 },
    ThreatKilled { id: BodyId, variant: ThreatVariant, score: u64 },
    PlayerDied { score: u64, kills: u32 },
    /// Host should exit pointer lock
    ReleasePointerLock,
    GameReset,
    ModeChanged(SimMode),
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct SimContext {
    pub seed: u64,
    pub rng: Pcg32,
    pub mode: SimMode,
    pub sandbox: Sandbox,
    pub wave: WaveField,
    pub wave_camera: OrbitCamera,
    pub arena: Arena,
    /// Vertical field of view (radians)
    pub fov_y: f32,
    /// Simulated seconds
    pub time: f32,
    pub time_ticks: u64,
    pub events: Vec<SimEvent>,
}

impl SimContext {
    pub fn new(settings: &Settings) -> Self {
        let wave_camera = OrbitCamera {
            radius: 12.0,
            polar: 1.35,
            azimuth: 0.0,
            rotate_speed: settings.orbit_rotate_speed,
            zoom_speed: settings.orbit_zoom_speed,
            ..OrbitCamera::default()
        };
        Self {
            seed: settings.seed,
            rng: Pcg32::seed_from_u64(settings.seed),
            mode: SimMode::default(),
            sandbox: Sandbox::new(settings),
            wave: WaveField::new(),
            wave_camera,
            arena: Arena::new(settings),
            fov_y: settings.fov_degrees.to_radians(),
            time: 0.0,
            time_ticks: 0,
            events: Vec::new(),
        }
    }

    pub fn set_mode(&mut self, mode: SimMode) {
        if mode == self.mode {
            return;
        }
        if self.mode.wants_pointer_lock() {
            self.events.push(SimEvent::ReleasePointerLock);
        }
        self.mode = mode;
        self.events.push(SimEvent::ModeChanged(mode));
        log::info!("Mode: {}", mode);
    }

    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }
}
