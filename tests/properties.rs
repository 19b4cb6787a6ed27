use glam::Vec3;
use kinetic_sandbox::settings::Settings;
use kinetic_sandbox::sim::body::BodyRegistry;
use kinetic_sandbox::sim::combat::Arena;
use kinetic_sandbox::sim::gravity::{BounceOutcome, apply_gravity};
use kinetic_sandbox::sim::player::{DamageOutcome, PlayerState};
use kinetic_sandbox::sim::projectile::{LaunchParams, spawn_projectile, step_projectile};
use kinetic_sandbox::sim::scene::{MoveOutcome, ObjectKind, SceneObject, try_move};
use kinetic_sandbox::sim::wave::{ImpulseParams, SAMPLE_COUNT, WaveField};
use kinetic_sandbox::sim::{SimEvent, TickInput};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_pcg::Pcg32;

const DT: f32 = 1.0 / 60.0;

proptest! {
    #[test]
    fn test_bounce_always_settles_on_floor(
        height in 0.1f32..50.0,
        floor in 0.0f32..3.0,
        g in prop::sample::select(vec![-9.8f32, -1.62, -24.79]),
        dt in 0.001f32..(1.0 / 30.0),
    ) {
        let (mut y, mut vy) = (floor + height, 0.0f32);
        let mut ticks = 0u32;
        loop {
            let outcome = apply_gravity(&mut y, &mut vy, floor, g, dt);
            prop_assert!(y >= floor);
            if outcome == BounceOutcome::Settled {
                break;
            }
            ticks += 1;
            prop_assert!(ticks < 200_000);
        }
        prop_assert_eq!(y, floor);
        prop_assert_eq!(vy, 0.0);
    }

    #[test]
    fn test_projectile_never_bounces(
        speed in 0.0f32..40.0,
        elevation in -89.0f32..89.0,
        azimuth in 0.0f32..360.0,
        extra in -5.0f32..5.0,
        start_y in 0.2f32..10.0,
    ) {
        let mut reg = BodyRegistry::new();
        let params = LaunchParams {
            speed,
            elevation_deg: elevation,
            azimuth_deg: azimuth,
            extra_accel_y: extra,
        };
        let id = spawn_projectile(&mut reg, &params, -9.8, Vec3::new(0.0, start_y, 0.0));
        let body = &mut reg.get_mut(id).unwrap().body;

        let mut landed_at = None;
        for tick in 0..20_000 {
            if step_projectile(body, DT) {
                landed_at = Some(tick);
                break;
            }
        }
        prop_assert!(landed_at.is_some());
        let radius = body.radius;
        for _ in 0..10 {
            prop_assert!(!step_projectile(body, DT));
            prop_assert!(!body.active);
            prop_assert_eq!(body.pos.y, radius);
        }
    }

    #[test]
    fn test_wave_offsets_stay_bounded(
        kicks in prop::collection::vec((0usize..SAMPLE_COUNT, -20.0f32..20.0, 0.0f32..15.0, 0.0f32..4.0), 1..8),
        limit in 0.0f32..5.0,
        damping in 0.0f32..0.2,
        ticks in 1usize..120,
    ) {
        let mut field = WaveField::new();
        field.set_limit(limit);
        field.set_damping(damping);
        for (center, strength, radius, falloff) in kicks {
            field.add_impulse(center, ImpulseParams { strength, radius, falloff });
            for _ in 0..ticks {
                field.step(DT);
                for i in 0..SAMPLE_COUNT {
                    prop_assert!(field.impulse_position(i).unwrap().abs() <= field.limit());
                }
            }
        }
    }

    #[test]
    fn test_move_blocked_only_within_threshold(gap in 0.0f32..6.0, speed in 0.1f32..10.0) {
        let half = Vec3::splat(0.5);
        let mut objects = vec![
            SceneObject::new(1, ObjectKind::Cube, Vec3::new(0.0, 0.5, 0.0), half, [1.0; 3]),
            SceneObject::new(2, ObjectKind::Cube, Vec3::new(gap, 0.5, 0.0), half, [1.0; 3]),
        ];
        let threshold = objects[0].collision_radius() + objects[1].collision_radius() + 0.1;
        let candidate_x = speed * DT;
        let outcome = try_move(&mut objects, 1, Vec3::X, speed, DT);
        if (gap - candidate_x).abs() < threshold {
            prop_assert_eq!(outcome, MoveOutcome::Blocked(2));
            prop_assert_eq!(objects[0].pos.x, 0.0);
        } else {
            prop_assert_eq!(outcome, MoveOutcome::Moved);
            prop_assert!((objects[0].pos.x - candidate_x).abs() < 1e-5);
        }
    }

    #[test]
    fn test_threat_dies_exactly_once(shots in 1usize..20, seed in any::<u64>()) {
        let mut arena = Arena::new(&Settings::default());
        let mut rng = Pcg32::seed_from_u64(seed);
        let id = arena.spawn_threat(&mut rng);
        let entry = arena.threats.get_mut(id).unwrap();
        let mut deaths = 0;
        for _ in 0..shots {
            if entry.extra.damage(1) {
                deaths += 1;
            }
        }
        let hp = entry.extra.variant.hp();
        prop_assert_eq!(deaths, usize::from(shots as i32 >= hp));
        prop_assert_eq!(entry.extra.alive, (shots as i32) < hp);
    }

    #[test]
    fn test_dead_player_stays_frozen(hits in prop::collection::vec(1u32..200, 1..20)) {
        let mut player = PlayerState::default();
        let mut deaths = 0;
        for amount in hits {
            let before = (player.hp, player.score, player.kills);
            match player.take_damage(amount) {
                DamageOutcome::Killed => deaths += 1,
                DamageOutcome::Ignored => {
                    prop_assert_eq!(before, (player.hp, player.score, player.kills));
                }
                DamageOutcome::Hurt { remaining } => prop_assert!(remaining > 0),
            }
            player.add_kill(10);
        }
        prop_assert!(deaths <= 1);
        if deaths == 1 {
            prop_assert_eq!(player.hp, 0);
        }
    }
}

#[test]
fn test_dead_arena_ignores_input() {
    let mut arena = Arena::new(&Settings::default());
    let mut rng = Pcg32::seed_from_u64(1);
    let mut events = Vec::new();
    arena.player.take_damage(u32::MAX);
    let before = arena.player.camera.position;
    let input = TickInput {
        pointer_locked: true,
        fire: true,
        jump: true,
        ..Default::default()
    };
    for _ in 0..120 {
        arena.update(&input, &mut rng, DT, &mut events);
    }
    assert_eq!(arena.player.camera.position, before);
    assert!(arena.threats.is_empty());
    assert!(!events.iter().any(|e| matches!(e, SimEvent::ThreatKilled { .. })));
}
