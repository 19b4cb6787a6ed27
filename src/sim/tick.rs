//! Per-frame simulation tick
//!
//! Clamps the frame delta and advances whichever mode is current.

use super::input::TickInput;
use super::state::{SimContext, SimMode};
use super::wave::ImpulseParams;
use crate::consts::MAX_DT;
use crate::ui::UiPanel;

/// Used when the host has not reported a viewport yet
const FALLBACK_ASPECT: f32 = 16.0 / 9.0;

/// Frame delta the integrators will actually see
pub fn clamp_dt(dt: f32) -> f32 {
    if dt.is_finite() && dt > 0.0 { dt.min(MAX_DT) } else { 0.0 }
}

/// Advance the current mode by one frame
pub fn tick(ctx: &mut SimContext, input: &TickInput, panel: &UiPanel, dt: f32) {
    let dt = clamp_dt(dt);
    if dt == 0.0 {
        return;
    }
    ctx.time += dt;
    ctx.time_ticks += 1;

    let aspect = if input.aspect > 0.0 {
        input.aspect
    } else {
        FALLBACK_ASPECT
    };

    match ctx.mode {
        SimMode::Sandbox => {
            if let Some(ndc) = input.click {
                let view = ctx.sandbox.camera.view(ctx.fov_y, aspect);
                ctx.sandbox.select_at(&view, ndc, &mut ctx.rng, &mut ctx.events);
            }
            ctx.sandbox.step(input, dt, &mut ctx.events);
        }
        SimMode::WaveLab => {
            ctx.wave_camera.drag(input.drag_delta);
            if input.wheel != 0.0 {
                ctx.wave_camera.zoom(input.wheel);
            }
            ctx.wave.apply_panel(panel);
            if let Some(ndc) = input.click {
                let ray = ctx.wave_camera.view(ctx.fov_y, aspect).ray_through(ndc);
                if let Some(i) = ctx.wave.pick_sample(&ray) {
                    let touched = ctx.wave.add_impulse(i, ImpulseParams::from_panel(panel));
                    log::debug!("Impulse at sample {} touched {}", i, touched);
                }
            }
            ctx.wave.tick(dt);
        }
        SimMode::Arena => {
            ctx.arena.update(input, &mut ctx.rng, dt, &mut ctx.events);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::FRAME_DT;
    use crate::settings::Settings;
    use crate::sim::wave::SAMPLE_COUNT;

    #[test]
    fn test_dt_clamped() {
        assert_eq!(clamp_dt(0.5), MAX_DT);
        assert_eq!(clamp_dt(FRAME_DT), FRAME_DT);
        assert_eq!(clamp_dt(-1.0), 0.0);
        assert_eq!(clamp_dt(f32::NAN), 0.0);
    }

    #[test]
    fn test_only_current_mode_ticks() {
        let mut ctx = SimContext::new(&Settings::default());
        let panel = UiPanel::default();
        ctx.wave.toggle_running();
        tick(&mut ctx, &TickInput::default(), &panel, FRAME_DT);
        assert_eq!(ctx.wave.time, 0.0);

        ctx.set_mode(SimMode::WaveLab);
        tick(&mut ctx, &TickInput::default(), &panel, FRAME_DT);
        assert!(ctx.wave.time > 0.0);
    }

    #[test]
    fn test_wave_click_adds_impulse() {
        let mut ctx = SimContext::new(&Settings::default());
        ctx.set_mode(SimMode::WaveLab);
        let target = ctx.wave.marker_position(SAMPLE_COUNT / 2);
        // Aim the camera straight at the middle sample
        ctx.wave_camera.target = target;
        let input = TickInput {
            click: Some(glam::Vec2::ZERO),
            aspect: 1.0,
            ..Default::default()
        };
        tick(&mut ctx, &input, &UiPanel::default(), FRAME_DT);
        let kicked = (0..SAMPLE_COUNT).filter(|&i| ctx.wave.impulse_velocity(i).unwrap_or(0.0) > 0.0);
        assert!(kicked.count() > 0);
    }

    #[test]
    fn test_determinism() {
        let settings = Settings::default();
        let mut a = SimContext::new(&settings);
        let mut b = SimContext::new(&settings);
        a.set_mode(SimMode::Arena);
        b.set_mode(SimMode::Arena);
        let input = TickInput {
            pointer_locked: true,
            fire: true,
            aspect: 1.0,
            ..Default::default()
        };
        let panel = UiPanel::default();
        for _ in 0..600 {
            tick(&mut a, &input, &panel, FRAME_DT);
            tick(&mut b, &input, &panel, FRAME_DT);
        }
        assert_eq!(a.arena.threats.len(), b.arena.threats.len());
        assert_eq!(a.arena.player.hp, b.arena.player.hp);
        assert_eq!(a.arena.player.score, b.arena.player.score);
    }
}
