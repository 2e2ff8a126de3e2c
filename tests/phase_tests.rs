use kings_planet::phase::{self, Phase};

#[test]
fn test_phase_thresholds() {
    assert_eq!(phase::evaluate(1.0, Phase::One), Phase::One);
    assert_eq!(phase::evaluate(0.61, Phase::One), Phase::One);
    assert_eq!(phase::evaluate(0.60, Phase::One), Phase::Two);
    assert_eq!(phase::evaluate(0.21, Phase::Two), Phase::Two);
    assert_eq!(phase::evaluate(0.20, Phase::Two), Phase::Three);
    assert_eq!(phase::evaluate(0.0, Phase::Three), Phase::Three);
}

#[test]
fn test_phase_never_regresses() {
    // Healing back above a threshold must not drop the phase.
    assert_eq!(phase::evaluate(0.95, Phase::Two), Phase::Two);
    assert_eq!(phase::evaluate(0.95, Phase::Three), Phase::Three);
    assert_eq!(phase::evaluate(0.5, Phase::Three), Phase::Three);
}

#[test]
fn test_phase_monotonic_under_decreasing_health() {
    let mut current = Phase::One;
    let mut percent = 1.0_f32;
    while percent >= 0.0 {
        let next = phase::evaluate(percent, current);
        assert!(next >= current, "phase regressed at {percent}");
        current = next;
        percent -= 0.01;
    }
    assert_eq!(current, Phase::Three);
}

#[test]
fn test_phase_advances_one_step_per_evaluation() {
    // Even a one-shot drop to zero only advances a single step per call.
    assert_eq!(phase::evaluate(0.0, Phase::One), Phase::Two);
    assert_eq!(phase::evaluate(0.0, Phase::Two), Phase::Three);
}

#[test]
fn test_cooldown_ranges_per_phase() {
    assert_eq!(Phase::One.cooldown_range_ms(), (2000, 3000));
    assert_eq!(Phase::Two.cooldown_range_ms(), (1000, 1500));
    assert_eq!(Phase::Three.cooldown_range_ms(), (3000, 4000));
    for phase in [Phase::One, Phase::Two, Phase::Three] {
        let (min, max) = phase.cooldown_range_ms();
        assert!(min < max);
    }
}

#[test]
fn test_phase_drop_below_sixty_percent_switches_cadence() {
    // King at 65% then parried down to 55%: next re-roll uses phase two.
    let current = phase::evaluate(0.65, Phase::One);
    assert_eq!(current, Phase::One);
    assert_eq!(current.cooldown_range_ms(), (2000, 3000));

    let current = phase::evaluate(0.55, current);
    assert_eq!(current, Phase::Two);
    assert_eq!(current.cooldown_range_ms(), (1000, 1500));
}
