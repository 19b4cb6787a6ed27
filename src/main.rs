//! Kinetic Sandbox entry point
//!
//! Native builds run a short scripted headless session in every mode and log
//! what happened. The web build is driven from JavaScript through
//! `platform::web::WebSession`.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use kinetic_sandbox::consts::FRAME_DT;
    use kinetic_sandbox::sim::{InputEvent, PointerButton, SimEvent, SimMode};
    use kinetic_sandbox::ui::keys;
    use kinetic_sandbox::{Session, Settings, UiAction};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Kinetic Sandbox (native) starting...");

    let settings_json = std::env::args().nth(1).and_then(|path| match std::fs::read_to_string(&path) {
        Ok(json) => Some(json),
        Err(err) => {
            log::warn!("Could not read settings '{}': {}", path, err);
            None
        }
    });
    let mut session = Session::new(Settings::load_or_default(settings_json.as_deref()));
    let settings = session.settings();
    log::info!(
        "fov {}°, fire interval {}s, reduced motion {}",
        settings.fov_degrees,
        settings.fire_interval,
        settings.reduced_motion
    );

    let run = |session: &mut Session, seconds: f32| {
        let frames = (seconds / FRAME_DT) as usize;
        let mut events = Vec::new();
        for _ in 0..frames {
            session.frame(FRAME_DT);
            events.extend(session.drain_events());
        }
        events
    };

    // Sandbox: gravity without a selection is refused, then click the cube
    // (under the orbit target), lift it and drop it
    let click = |session: &mut Session, x: f32, y: f32| {
        session.handle_event(InputEvent::PointerDown {
            x,
            y,
            button: PointerButton::Primary,
        });
        session.handle_event(InputEvent::PointerUp {
            x,
            y,
            button: PointerButton::Primary,
        });
    };
    session.handle_event(InputEvent::Resize {
        width: 1280.0,
        height: 720.0,
    });
    session.perform(UiAction::ActivateGravity);
    click(&mut session, 640.0, 360.0);
    session.frame(FRAME_DT);
    let selected = session.context().sandbox.selected;
    if let Some(obj) = session.context_mut().sandbox.objects.iter_mut().find(|o| Some(o.id) == selected) {
        obj.pos.y += 4.0;
    }
    session.perform(UiAction::ActivateGravity);
    session.set_control(keys::SPHERE_HEIGHT, "8");
    session.perform(UiAction::SpawnSphere);
    session.perform(UiAction::LaunchProjectile);
    session.perform_named("preset:moon");
    for event in run(&mut session, 6.0) {
        log::info!("sandbox: {:?}", event);
    }

    // Wave lab: flat analytic layer, click the middle sample, let it ring
    session.perform(UiAction::SetMode(SimMode::WaveLab));
    session.set_control(keys::WAVE_AMPLITUDE, "0");
    session.perform(UiAction::ToggleWave);
    click(&mut session, 640.0, 360.0);
    run(&mut session, 3.0);
    let peak = session
        .context()
        .wave
        .displacements()
        .into_iter()
        .fold(0.0_f32, |m, d| m.max(d.abs()));
    log::info!("wave: peak displacement {:.3} after 3s", peak);

    // Arena: hold fire with the pointer locked until something happens
    session.perform(UiAction::SetMode(SimMode::Arena));
    session.handle_event(InputEvent::PointerLockChanged(true));
    session.handle_event(InputEvent::PointerDown {
        x: 0.0,
        y: 0.0,
        button: PointerButton::Primary,
    });
    let events = run(&mut session, 20.0);
    let kills = events.iter().filter(|e| matches!(e, SimEvent::ThreatKilled { .. })).count();
    let hits = events.iter().filter(|e| matches!(e, SimEvent::PlayerDamaged { .. })).count();
    let hud = session.hud();
    log::info!(
        "arena: {} kills, {} hits taken, score {}, hp {:.0}%{}",
        kills,
        hits,
        hud.score,
        hud.health_fraction * 100.0,
        if hud.dead { " (dead)" } else { "" }
    );

    for event in session.drain_events() {
        if let SimEvent::Notice(msg) = event {
            log::info!("notice: {}", msg);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::start, this is just to satisfy the compiler
}
