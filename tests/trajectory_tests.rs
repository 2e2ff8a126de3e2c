use bevy::math::Vec2;
use kings_planet::dialogue::DirectionHint;
use kings_planet::phase::Phase;
use kings_planet::trajectory::{
    allowed_for_phase, extend_target, select_kind, Trajectory, TrajectoryKind, TrajectoryParams,
    TARGET_OVERSHOOT,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

const EPSILON: f32 = 0.001;

fn all_kinds() -> [TrajectoryKind; 4] {
    [
        TrajectoryKind::Linear,
        TrajectoryKind::Bezier,
        TrajectoryKind::Arc,
        TrajectoryKind::Zigzag,
    ]
}

#[test]
fn test_duration_is_distance_over_speed() {
    let mut rng = StdRng::seed_from_u64(1);
    let trajectory = Trajectory::new(
        TrajectoryKind::Linear,
        Vec2::new(0.0, 0.0),
        Vec2::new(300.0, 0.0),
        150.0,
        &mut rng,
    );
    assert!((trajectory.duration - 2.0).abs() < EPSILON);
}

#[test]
fn test_position_at_zero_is_start() {
    let mut rng = StdRng::seed_from_u64(2);
    let start = Vec2::new(240.0, -95.0);
    let target = Vec2::new(-400.0, -150.0);
    for kind in all_kinds() {
        let trajectory = Trajectory::new(kind, start, target, 200.0, &mut rng);
        let pos = trajectory.position_at(0.0);
        assert!(pos.distance(start) < EPSILON, "{kind:?} started at {pos}");
    }
}

#[test]
fn test_position_at_duration_is_target() {
    // The arc and zigzag offsets are sine terms that vanish at the endpoints,
    // so every kind must land on the target.
    let mut rng = StdRng::seed_from_u64(3);
    let start = Vec2::new(240.0, -95.0);
    let target = Vec2::new(-400.0, -150.0);
    for kind in all_kinds() {
        let trajectory = Trajectory::new(kind, start, target, 200.0, &mut rng);
        let pos = trajectory.position_at(trajectory.duration);
        assert!(pos.distance(target) < EPSILON, "{kind:?} ended at {pos}");
    }
}

#[test]
fn test_progress_clamps_past_duration() {
    let mut rng = StdRng::seed_from_u64(4);
    for kind in all_kinds() {
        let trajectory = Trajectory::new(
            kind,
            Vec2::new(0.0, 0.0),
            Vec2::new(100.0, 50.0),
            100.0,
            &mut rng,
        );
        let at_end = trajectory.position_at(trajectory.duration);
        let past_end = trajectory.position_at(trajectory.duration * 10.0);
        assert!(at_end.distance(past_end) < EPSILON);
        assert!(trajectory.finished(trajectory.duration));
        assert!(!trajectory.finished(trajectory.duration * 0.5));
    }
}

#[test]
fn test_arc_rises_above_the_chord() {
    let mut rng = StdRng::seed_from_u64(5);
    let start = Vec2::new(0.0, 0.0);
    let target = Vec2::new(200.0, 0.0);
    let trajectory = Trajectory::new(TrajectoryKind::Arc, start, target, 100.0, &mut rng);
    let TrajectoryParams::Arc { peak_height } = trajectory.params else {
        panic!("expected arc params");
    };
    assert!((30.0..=60.0).contains(&peak_height));
    let midway = trajectory.position_at(trajectory.duration * 0.5);
    assert!((midway.y - peak_height).abs() < EPSILON);
}

#[test]
fn test_zigzag_oscillates_around_the_chord() {
    let mut rng = StdRng::seed_from_u64(6);
    let start = Vec2::new(0.0, 0.0);
    let target = Vec2::new(600.0, 0.0);
    let trajectory = Trajectory::new(TrajectoryKind::Zigzag, start, target, 100.0, &mut rng);
    let TrajectoryParams::Zigzag { amplitude, .. } = trajectory.params else {
        panic!("expected zigzag params");
    };
    let mut above = false;
    let mut below = false;
    let steps = 200;
    for i in 0..=steps {
        let pos = trajectory.position_at(trajectory.duration * i as f32 / steps as f32);
        assert!(pos.y.abs() <= amplitude + EPSILON);
        if pos.y > 1.0 {
            above = true;
        }
        if pos.y < -1.0 {
            below = true;
        }
    }
    assert!(above && below);
}

#[test]
fn test_bezier_control_jitter_stays_in_range() {
    let mut rng = StdRng::seed_from_u64(7);
    let start = Vec2::new(-100.0, 0.0);
    let target = Vec2::new(100.0, 0.0);
    for _ in 0..200 {
        let trajectory = Trajectory::new(TrajectoryKind::Bezier, start, target, 100.0, &mut rng);
        let TrajectoryParams::Bezier { control } = trajectory.params else {
            panic!("expected bezier params");
        };
        let midpoint = (start + target) * 0.5;
        assert!((control.x - midpoint.x).abs() <= 100.0 + EPSILON);
        assert!((control.y - midpoint.y).abs() <= 80.0 + EPSILON);
    }
}

#[test]
fn test_extend_target_overshoots_past_the_player() {
    let start = Vec2::new(240.0, -95.0);
    let player = Vec2::new(-240.0, -150.0);
    let extended = extend_target(start, player);
    let expected = player + (player - start).normalize() * TARGET_OVERSHOOT;
    assert!(extended.distance(expected) < EPSILON);
    // Past the player, along the same line.
    assert!(extended.distance(start) > player.distance(start));
}

#[test]
fn test_extend_target_degenerate_spawn_still_moves() {
    let pos = Vec2::new(10.0, 10.0);
    let extended = extend_target(pos, pos);
    assert!(extended.distance(pos) > 1.0);
}

#[test]
fn test_selected_kind_always_allowed_for_phase() {
    let mut rng = StdRng::seed_from_u64(8);
    let hints = [
        DirectionHint::Down,
        DirectionHint::Up,
        DirectionHint::Center,
        DirectionHint::Multi,
        DirectionHint::Random,
        DirectionHint::Weak,
        DirectionHint::Plea,
    ];
    for phase in [Phase::One, Phase::Two, Phase::Three] {
        let allowed = allowed_for_phase(phase);
        for hint in hints {
            for _ in 0..50 {
                let kind = select_kind(hint, phase, &mut rng);
                assert!(allowed.contains(&kind), "{kind:?} not allowed in {phase:?}");
            }
        }
    }
}

#[test]
fn test_phase_allow_lists() {
    assert_eq!(
        allowed_for_phase(Phase::One),
        &[TrajectoryKind::Linear, TrajectoryKind::Bezier, TrajectoryKind::Arc]
    );
    assert_eq!(
        allowed_for_phase(Phase::Two),
        &[
            TrajectoryKind::Bezier,
            TrajectoryKind::Zigzag,
            TrajectoryKind::Arc,
            TrajectoryKind::Linear
        ]
    );
    assert_eq!(
        allowed_for_phase(Phase::Three),
        &[TrajectoryKind::Linear, TrajectoryKind::Bezier]
    );
}

#[test]
fn test_zigzag_never_selected_in_phase_three() {
    // Random hint prefers every kind, but phase three forbids zigzag and arc.
    let mut rng = StdRng::seed_from_u64(9);
    for _ in 0..500 {
        let kind = select_kind(DirectionHint::Random, Phase::Three, &mut rng);
        assert!(matches!(kind, TrajectoryKind::Linear | TrajectoryKind::Bezier));
    }
}
