use kings_planet::combat::{resolve_player_contact, ContactOutcome};
use kings_planet::game::{
    EncounterState, GameStatus, KING_HIT_DAMAGE, KING_MAX_HEALTH, PLAYER_MAX_HEALTH,
};
use kings_planet::phase::{self, Phase};
use kings_planet::records::{Records, Settings};

#[test]
fn test_dodge_ignores_contact() {
    let mut encounter = EncounterState::default();
    let outcome = resolve_player_contact(true, false, &mut encounter);
    assert_eq!(outcome, ContactOutcome::Ignored);
    assert_eq!(encounter.player_health, PLAYER_MAX_HEALTH);
    assert_eq!(encounter.combo, 0);
}

#[test]
fn test_dodge_wins_over_parry() {
    // Both windows open: the dodge check runs first.
    let mut encounter = EncounterState::default();
    let outcome = resolve_player_contact(true, true, &mut encounter);
    assert_eq!(outcome, ContactOutcome::Ignored);
    assert_eq!(encounter.combo, 0);
}

#[test]
fn test_parry_builds_combo() {
    let mut encounter = EncounterState::default();
    let outcome = resolve_player_contact(false, true, &mut encounter);
    assert_eq!(outcome, ContactOutcome::Parried { healed: false });
    assert_eq!(encounter.combo, 1);
    assert_eq!(encounter.max_combo, 1);
}

#[test]
fn test_hit_damages_and_resets_combo() {
    let mut encounter = EncounterState::default();
    resolve_player_contact(false, true, &mut encounter);
    resolve_player_contact(false, true, &mut encounter);
    assert_eq!(encounter.combo, 2);

    let outcome = resolve_player_contact(false, false, &mut encounter);
    assert_eq!(outcome, ContactOutcome::Hit);
    assert_eq!(encounter.player_health, PLAYER_MAX_HEALTH - 1);
    assert_eq!(encounter.combo, 0);
    assert_eq!(encounter.max_combo, 2);
}

#[test]
fn test_fifth_parry_heals_when_below_max() {
    let mut encounter = EncounterState::default();
    encounter.player_health = 1;
    for i in 1..=4 {
        let outcome = resolve_player_contact(false, true, &mut encounter);
        assert_eq!(outcome, ContactOutcome::Parried { healed: false }, "parry {i}");
    }
    let outcome = resolve_player_contact(false, true, &mut encounter);
    assert_eq!(outcome, ContactOutcome::Parried { healed: true });
    assert_eq!(encounter.player_health, 2);
    assert_eq!(encounter.combo, 5);
}

#[test]
fn test_fifth_parry_does_not_heal_past_cap() {
    let mut encounter = EncounterState::default();
    for _ in 0..5 {
        resolve_player_contact(false, true, &mut encounter);
    }
    assert_eq!(encounter.combo, 5);
    assert_eq!(encounter.player_health, PLAYER_MAX_HEALTH);
}

#[test]
fn test_heal_milestone_repeats_every_five() {
    let mut encounter = EncounterState::default();
    encounter.player_health = 1;
    let mut heals = 0;
    for _ in 0..10 {
        if let ContactOutcome::Parried { healed: true } =
            resolve_player_contact(false, true, &mut encounter)
        {
            heals += 1;
        }
    }
    assert_eq!(heals, 2);
    assert_eq!(encounter.player_health, PLAYER_MAX_HEALTH);
}

#[test]
fn test_full_fight_parried_to_victory() {
    // Ten reflected bubbles land; the King falls and the phase walks 1→2→3.
    let mut encounter = EncounterState::default();
    for _ in 0..(KING_MAX_HEALTH / KING_HIT_DAMAGE) {
        encounter.damage_king(KING_HIT_DAMAGE);
        encounter.phase = phase::evaluate(encounter.king_health_percent(), encounter.phase);
    }
    assert_eq!(encounter.king_health, 0);
    assert_eq!(encounter.phase, Phase::Three);
    assert_eq!(encounter.check_end(), Some(GameStatus::Victory));
}

#[test]
fn test_three_hits_end_in_defeat() {
    let mut encounter = EncounterState::default();
    for _ in 0..3 {
        assert_eq!(encounter.check_end(), None);
        resolve_player_contact(false, false, &mut encounter);
    }
    assert_eq!(encounter.player_health, 0);
    assert_eq!(encounter.check_end(), Some(GameStatus::Defeat));
}

#[test]
fn test_victory_wins_the_tie() {
    let mut encounter = EncounterState::default();
    encounter.player_health = 0;
    encounter.king_health = 0;
    assert_eq!(encounter.check_end(), Some(GameStatus::Victory));
}

#[test]
fn test_king_health_floor_at_zero() {
    let mut encounter = EncounterState::default();
    encounter.king_health = 5;
    encounter.damage_king(KING_HIT_DAMAGE);
    assert_eq!(encounter.king_health, 0);
    assert_eq!(encounter.king_health_percent(), 0.0);
}

#[test]
fn test_reset_restores_defaults() {
    let mut encounter = EncounterState::default();
    resolve_player_contact(false, false, &mut encounter);
    encounter.damage_king(30);
    encounter.phase = Phase::Two;
    encounter.status = GameStatus::Defeat;

    encounter.reset();
    assert_eq!(encounter.player_health, PLAYER_MAX_HEALTH);
    assert_eq!(encounter.king_health, KING_MAX_HEALTH);
    assert_eq!(encounter.phase, Phase::One);
    assert_eq!(encounter.combo, 0);
    assert_eq!(encounter.status, GameStatus::Playing);
}

#[test]
fn test_records_completion_math() {
    let mut records = Records::default();
    records.record_completion(false, 30, 3);
    assert_eq!(records.total_plays, 1);
    assert_eq!(records.victories, 0);
    assert_eq!(records.best_time, None);
    assert_eq!(records.max_combo, 3);

    records.record_completion(true, 90, 8);
    assert_eq!(records.victories, 1);
    assert_eq!(records.best_time, Some(90));
    assert_eq!(records.average_play_time, 60);
    assert_eq!(records.win_rate_percent(), 50);

    // A faster win takes the record; a slower one does not.
    records.record_completion(true, 45, 2);
    assert_eq!(records.best_time, Some(45));
    records.record_completion(true, 70, 2);
    assert_eq!(records.best_time, Some(45));
    assert_eq!(records.max_combo, 8);
}

#[test]
fn test_settings_defaults() {
    let settings = Settings::default();
    assert_eq!(settings.sfx_level(), 0.8);
    assert_eq!(settings.bgm_level(), 0.7);
    assert!(!settings.fullscreen);
    assert_eq!(settings.controls.jump_key(), bevy::input::keyboard::KeyCode::Space);
    assert_eq!(settings.controls.dodge_key(), bevy::input::keyboard::KeyCode::KeyZ);
    assert_eq!(settings.controls.parry_key(), bevy::input::keyboard::KeyCode::KeyX);
}

#[test]
fn test_adjust_bgm_clamps_to_volume_range() {
    let mut settings = Settings::default();
    settings.adjust_bgm(10);
    assert_eq!(settings.bgm_volume, 80);
    assert_eq!(settings.bgm_level(), 0.8);

    settings.adjust_bgm(100);
    assert_eq!(settings.bgm_volume, 100);

    settings.adjust_bgm(-500);
    assert_eq!(settings.bgm_volume, 0);
    assert_eq!(settings.bgm_level(), 0.0);
}

#[test]
fn test_controls_hint_holds_before_fading() {
    use kings_planet::game::hint_alpha;
    // Fully visible for the first three quarters of the window.
    assert_eq!(hint_alpha(0.0), 1.0);
    assert_eq!(hint_alpha(0.5), 1.0);
    assert_eq!(hint_alpha(0.75), 1.0);
    // Then a linear ramp down to invisible.
    let mid_fade = hint_alpha(0.875);
    assert!(mid_fade > 0.4 && mid_fade < 0.6);
    assert_eq!(hint_alpha(1.0), 0.0);
}

#[test]
fn test_unknown_binding_falls_back() {
    let mut settings = Settings::default();
    settings.controls.parry = "no_such_key".to_string();
    assert_eq!(settings.controls.parry_key(), bevy::input::keyboard::KeyCode::KeyX);
}
