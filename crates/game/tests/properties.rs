//! Behavioural properties of the universe, exercised through its public API.

use glam::Vec3;
use runner_game::{
    GameError, HookState, InputKind, LevelDef, Universe, UniverseConfig, UpdateTarget,
};

const DT: f32 = 1.0 / 60.0;

fn flat_universe() -> Universe {
    Universe::with_level(UniverseConfig::default(), &LevelDef::flat())
}

/// Flat floor with one anchor straight ahead of slot 0's eye.
fn hook_universe(anchor_distance: f32) -> Universe {
    let spawn = Vec3::new(0.0, 0.0, 0.0);
    let level = LevelDef::new("hook_range", spawn)
        .with_block(Vec3::new(-20.0, -1.0, -20.0), Vec3::new(40.0, 1.0, 40.0))
        .with_anchor(Vec3::new(0.0, 1.4, anchor_distance));
    Universe::with_level(UniverseConfig::default(), &level)
}

fn eye_to_anchor(universe: &Universe, player: usize) -> f32 {
    let config = &universe.config().movement;
    let eye = universe.player(player).unwrap().eye_position(config);
    eye.distance(universe.world().anchors()[0].position)
}

#[test]
fn test_go_then_stop_moves_nothing() {
    for kind in [
        (InputKind::GoLeft, InputKind::StopLeft),
        (InputKind::GoForward, InputKind::StopForward),
        (InputKind::GoRight, InputKind::StopRight),
        (InputKind::GoBack, InputKind::StopBack),
    ] {
        let mut universe = flat_universe();
        let start: Vec<Vec3> = universe.players().iter().map(|p| p.position()).collect();

        for player in 0..2 {
            universe.apply_input(player, kind.0).unwrap();
            universe.apply_input(player, kind.1).unwrap();
        }
        universe.update(UpdateTarget::All, DT).unwrap();

        for player in 0..2 {
            assert_eq!(universe.player(player).unwrap().position(), start[player], "{:?}", kind);
        }
    }
}

#[test]
fn test_go_twice_equals_go_once() {
    let mut once = flat_universe();
    let mut twice = flat_universe();

    once.apply_input(0, InputKind::GoRight).unwrap();
    twice.apply_input(0, InputKind::GoRight).unwrap();
    twice.apply_input(0, InputKind::GoRight).unwrap();

    for _ in 0..20 {
        once.update(UpdateTarget::Player(0), DT).unwrap();
        twice.update(UpdateTarget::Player(0), DT).unwrap();
    }

    assert_eq!(once.player(0).unwrap().movement, twice.player(0).unwrap().movement);
}

#[test]
fn test_cast_without_anchor_returns_to_idle() {
    let mut universe = flat_universe();

    universe.apply_input(0, InputKind::Cast).unwrap();
    universe.update(UpdateTarget::Player(0), DT).unwrap();

    assert_eq!(universe.player(0).unwrap().hook_state(), HookState::Idle);
}

#[test]
fn test_cast_outside_angle_tolerance_misses() {
    let mut universe = hook_universe(5.0);
    // Turn well away from the anchor before casting
    universe.apply_mouse_look(0, 1000.0, 0.0).unwrap();
    universe.apply_input(0, InputKind::Cast).unwrap();
    universe.update(UpdateTarget::Player(0), 0.0).unwrap();

    assert_eq!(universe.player(0).unwrap().hook_state(), HookState::Idle);
}

#[test]
fn test_release_from_idle_is_safe() {
    let mut universe = flat_universe();

    universe.apply_input(0, InputKind::Release).unwrap();
    universe.apply_input(0, InputKind::Release).unwrap();
    universe.update(UpdateTarget::All, DT).unwrap();

    assert_eq!(universe.player(0).unwrap().hook_state(), HookState::Idle);
}

#[test]
fn test_snapshot_invariants_hold_every_tick() {
    let mut universe = Universe::new();
    universe.apply_input(0, InputKind::GoForward).unwrap();
    universe.apply_input(1, InputKind::GoLeft).unwrap();

    for tick in 0..120 {
        if tick == 30 {
            universe.apply_input(0, InputKind::Jump).unwrap();
        }
        universe.update(UpdateTarget::All, DT).unwrap();

        for viewer in 0..2 {
            let snapshot = universe.snapshot(viewer).unwrap();
            let vertices = snapshot.positions.len() / 3;
            assert!(snapshot.indices.iter().all(|&i| (i as usize) < vertices));
            assert_eq!(snapshot.colors.len() % 4, 0);
            assert!(snapshot.is_consistent());
        }
    }
}

#[test]
fn test_standing_on_a_platform_is_grounded() {
    let level = LevelDef::new("step", Vec3::new(0.0, 3.0, 0.0))
        .with_block(Vec3::new(-2.0, 2.0, -2.0), Vec3::new(4.0, 1.0, 4.0));
    let mut universe = Universe::with_level(UniverseConfig::default(), &level);

    let player = universe.player(0).unwrap();
    assert_eq!(player.position().y, 3.0);
    assert_eq!(player.velocity().y, 0.0);

    universe.update(UpdateTarget::Player(0), DT).unwrap();

    assert!(universe.player(0).unwrap().is_grounded(), "Should be on ground");
    assert_eq!(universe.player(0).unwrap().position().y, 3.0);
}

#[test]
fn test_forward_distance_matches_speed() {
    let mut universe = flat_universe();
    let speed = universe.config().movement.move_speed;
    let start = universe.player(0).unwrap().position();

    universe.apply_input(0, InputKind::GoForward).unwrap();
    let ticks = 60;
    for _ in 0..ticks {
        universe.update(UpdateTarget::Player(0), DT).unwrap();
    }

    let moved = universe.player(0).unwrap().position() - start;
    let expected = ticks as f32 * DT * speed;
    // Facing +Z, within one fixed step of travel
    let step = universe.config().fixed_step.unwrap_or(DT);
    assert!((moved.z - expected).abs() <= speed * step * 1.5, "moved {} expected {}", moved.z, expected);
    assert!(moved.x.abs() < 1e-4);
    assert!(moved.y.abs() < 1e-4);
}

#[test]
fn test_diagonal_is_not_faster() {
    let mut straight = flat_universe();
    let mut diagonal = flat_universe();
    let start = straight.player(0).unwrap().position();

    straight.apply_input(0, InputKind::GoForward).unwrap();
    diagonal.apply_input(0, InputKind::GoForward).unwrap();
    diagonal.apply_input(0, InputKind::GoRight).unwrap();

    for _ in 0..30 {
        straight.update(UpdateTarget::Player(0), DT).unwrap();
        diagonal.update(UpdateTarget::Player(0), DT).unwrap();
    }

    let d_straight = (straight.player(0).unwrap().position() - start).length();
    let d_diagonal = (diagonal.player(0).unwrap().position() - start).length();
    assert!((d_straight - d_diagonal).abs() < 1e-3, "{} vs {}", d_straight, d_diagonal);
}

#[test]
fn test_cast_pull_release_scenario() {
    let mut universe = hook_universe(5.0);

    universe.apply_input(0, InputKind::Cast).unwrap();
    universe.update(UpdateTarget::Player(0), 0.0).unwrap();
    assert!(matches!(
        universe.player(0).unwrap().hook_state(),
        HookState::Attached { .. }
    ));

    universe.apply_input(0, InputKind::Pull).unwrap();
    universe.update(UpdateTarget::Player(0), 0.0).unwrap();
    assert!(universe.player(0).unwrap().hook_state().is_pulling());

    let min_distance = universe.config().hook.min_distance;
    let mut last = eye_to_anchor(&universe, 0);
    for _ in 0..240 {
        universe.update(UpdateTarget::Player(0), DT).unwrap();
        let d = eye_to_anchor(&universe, 0);
        assert!(d <= last + 1e-4, "Distance should shrink: {} -> {}", last, d);
        assert!(d >= min_distance - 1e-3);
        last = d;
    }
    assert!((last - min_distance).abs() < 0.05, "Should end near the minimum, got {}", last);
    if let HookState::Pulling { pulled_distance, pull_time, .. } = universe.player(0).unwrap().hook_state() {
        assert!(pulled_distance > 3.5);
        assert!(pull_time > 3.0);
    } else {
        panic!("Hook should still be pulling");
    }
}

#[test]
fn test_release_preserves_velocity() {
    let mut universe = hook_universe(15.0);

    universe.apply_input(0, InputKind::Cast).unwrap();
    universe.apply_input(0, InputKind::Pull).unwrap();
    for _ in 0..5 {
        universe.update(UpdateTarget::Player(0), DT).unwrap();
    }
    let velocity = universe.player(0).unwrap().velocity();
    assert!(velocity.z > 0.0, "Pull should be carrying the player");

    universe.apply_input(0, InputKind::Release).unwrap();
    universe.update(UpdateTarget::Player(0), 0.0).unwrap();

    let player = universe.player(0).unwrap();
    assert_eq!(player.hook_state(), HookState::Idle);
    assert_eq!(player.velocity(), velocity);
}

#[test]
fn test_recast_while_attached_is_ignored() {
    let mut universe = hook_universe(5.0);
    universe.apply_input(0, InputKind::Cast).unwrap();
    universe.update(UpdateTarget::Player(0), 0.0).unwrap();
    let attached = universe.player(0).unwrap().hook_state();

    universe.apply_input(0, InputKind::Cast).unwrap();
    universe.update(UpdateTarget::Player(0), 0.0).unwrap();

    assert_eq!(universe.player(0).unwrap().hook_state(), attached);
}

#[test]
fn test_caller_errors() {
    let mut universe = flat_universe();

    assert_eq!(
        universe.apply_input(2, InputKind::GoLeft),
        Err(GameError::InvalidPlayer { index: 2, count: 2 })
    );
    assert_eq!(universe.apply_input_code(0, 12), Err(GameError::UnknownInput(12)));
    assert_eq!(universe.apply_input_code(0, 1), Ok(()));
    assert!(universe.update(UpdateTarget::Player(7), DT).is_err());
}
