//! Frame-driven controller that owns the simulation
//!
//! The host feeds raw input events as they arrive, calls `frame` once per
//! rendered frame, and drains the event stream afterwards.

use std::str::FromStr;

use crate::error::SimError;
use crate::renderer::RenderFrame;
use crate::settings::Settings;
use crate::sim::gravity::GravityPreset;
use crate::sim::input::{InputEvent, InputState};
use crate::sim::state::{SimContext, SimEvent, SimMode};
use crate::sim::tick::{clamp_dt, tick};
use crate::ui::{HudModel, UiPanel};

/// Buttons on the host's control panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    ActivateGravity,
    SpawnSphere,
    LaunchProjectile,
    SetPreset(GravityPreset),
    SetMode(SimMode),
    ToggleWave,
    StepWave,
    ResetWave,
    ResetSandbox,
    ResetGame,
}

impl FromStr for UiAction {
    type Err = SimError;

    /// `name` or `name:argument`, e.g. `gravity`, `preset:moon`, `mode:arena`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (name, arg) = match s.split_once(':') {
            Some((name, arg)) => (name, Some(arg)),
            None => (s, None),
        };
        match (name.to_lowercase().as_str(), arg) {
            ("gravity", None) => Ok(UiAction::ActivateGravity),
            ("sphere", None) => Ok(UiAction::SpawnSphere),
            ("projectile", None) => Ok(UiAction::LaunchProjectile),
            ("preset", Some(preset)) => Ok(UiAction::SetPreset(preset.parse()?)),
            ("mode", Some(mode)) => Ok(UiAction::SetMode(mode.parse()?)),
            ("wave.toggle", None) => Ok(UiAction::ToggleWave),
            ("wave.step", None) => Ok(UiAction::StepWave),
            ("wave.reset", None) => Ok(UiAction::ResetWave),
            ("sandbox.reset", None) => Ok(UiAction::ResetSandbox),
            ("reset", None) => Ok(UiAction::ResetGame),
            _ => Err(SimError::UnknownAction(s.to_string())),
        }
    }
}

pub struct Session {
    ctx: SimContext,
    input: InputState,
    panel: UiPanel,
    settings: Settings,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl Session {
    pub fn new(settings: Settings) -> Self {
        log::info!("Session started (seed {})", settings.seed);
        Self {
            ctx: SimContext::new(&settings),
            input: InputState::default(),
            panel: UiPanel::default(),
            settings,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn context(&self) -> &SimContext {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut SimContext {
        &mut self.ctx
    }

    pub fn set_control(&mut self, key: &str, value: &str) {
        self.panel.set(key, value);
    }

    pub fn mode(&self) -> SimMode {
        self.ctx.mode
    }

    pub fn handle_event(&mut self, event: InputEvent) {
        self.input.apply(event);
    }

    /// Advance one rendered frame and describe what to draw.
    ///
    /// A frame with no usable delta leaves pending input for the next one.
    pub fn frame(&mut self, dt: f32) -> RenderFrame {
        if clamp_dt(dt) > 0.0 {
            let input = self.input.snapshot();
            tick(&mut self.ctx, &input, &self.panel, dt);
        }
        RenderFrame::build(&self.ctx, self.input.aspect())
    }

    /// Run an action. Refusals become a `Notice` event.
    pub fn perform(&mut self, action: UiAction) {
        if let Err(err) = self.try_perform(action) {
            self.notify(err);
        }
    }

    /// Parse and run an action by name. Unknown names become a `Notice`.
    pub fn perform_named(&mut self, name: &str) {
        match name.parse::<UiAction>() {
            Ok(action) => self.perform(action),
            Err(err) => self.notify(err),
        }
    }

    fn notify(&mut self, err: SimError) {
        log::warn!("{}", err);
        self.ctx.events.push(SimEvent::Notice(err.to_string()));
    }

    pub fn try_perform(&mut self, action: UiAction) -> Result<(), SimError> {
        let ctx = &mut self.ctx;
        match action {
            UiAction::ActivateGravity => {
                ctx.sandbox.activate_gravity()?;
            }
            UiAction::SpawnSphere => {
                ctx.sandbox.spawn_sphere(&self.panel, &mut ctx.rng);
            }
            UiAction::LaunchProjectile => {
                ctx.sandbox.launch_projectile(&self.panel);
            }
            UiAction::SetPreset(preset) => ctx.sandbox.set_preset(preset, &mut ctx.events),
            UiAction::SetMode(mode) => ctx.set_mode(mode),
            UiAction::ToggleWave => ctx.wave.toggle_running(),
            UiAction::StepWave => ctx.wave.request_step(),
            UiAction::ResetWave => ctx.wave.reset(),
            UiAction::ResetSandbox => ctx.sandbox.reset(),
            UiAction::ResetGame => ctx.arena.reset(&mut ctx.events),
        }
        Ok(())
    }

    /// Host callback when a ground texture load finishes
    pub fn texture_loaded(&mut self, preset: GravityPreset, ok: bool) {
        self.ctx.sandbox.ground.texture_loaded(preset, ok);
    }

    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        self.ctx.drain_events()
    }

    pub fn hud(&self) -> HudModel {
        let ctx = &self.ctx;
        let player = &ctx.arena.player;
        HudModel {
            health_fraction: player.health_fraction(),
            score: player.score,
            kills: player.kills,
            selected_label: ctx.sandbox.selected_object().map(|o| o.kind.label().to_string()),
            preset_label: ctx.sandbox.preset.to_string(),
            wave_state: ctx.wave.run_state.label().to_string(),
            dead: !player.is_alive(),
        }
    }
}
