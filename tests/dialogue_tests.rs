use kings_planet::dialogue::{
    select_weighted, BubbleKind, DialogueEntry, DialogueLibrary, DirectionHint,
};
use kings_planet::phase::Phase;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;

fn entry(id: &str, weight: u32) -> DialogueEntry {
    DialogueEntry {
        id: id.to_string(),
        text: format!("{id}!"),
        kind: BubbleKind::Command,
        weight,
        direction: DirectionHint::Center,
        count: 1,
    }
}

#[test]
fn test_select_weighted_empty_returns_none() {
    let mut rng = StdRng::seed_from_u64(7);
    assert!(select_weighted(&[], &mut rng).is_none());
}

#[test]
fn test_select_weighted_single_entry_always_wins() {
    let entries = vec![entry("only", 1)];
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..100 {
        let picked = select_weighted(&entries, &mut rng).unwrap();
        assert_eq!(picked.id, "only");
    }
}

#[test]
fn test_select_weighted_distribution_roughly_uniform() {
    let entries = vec![entry("a", 1), entry("b", 1), entry("c", 1)];
    let mut rng = StdRng::seed_from_u64(42);
    let mut counts: HashMap<String, u32> = HashMap::new();
    let draws = 6000;
    for _ in 0..draws {
        let picked = select_weighted(&entries, &mut rng).unwrap();
        *counts.entry(picked.id.clone()).or_default() += 1;
    }
    for id in ["a", "b", "c"] {
        let share = counts[id] as f64 / draws as f64;
        assert!(share > 0.25 && share < 0.42, "{id} drawn {share}");
    }
}

#[test]
fn test_select_weighted_respects_heavy_weight() {
    let entries = vec![entry("heavy", 100), entry("light", 1)];
    let mut rng = StdRng::seed_from_u64(13);
    let mut heavy = 0;
    let draws = 2000;
    for _ in 0..draws {
        if select_weighted(&entries, &mut rng).unwrap().id == "heavy" {
            heavy += 1;
        }
    }
    assert!(heavy as f64 / draws as f64 > 0.95);
}

#[test]
fn test_select_weighted_treats_zero_weight_as_one() {
    // A zero-weight entry must still be reachable.
    let entries = vec![entry("zero", 0), entry("one", 1)];
    let mut rng = StdRng::seed_from_u64(99);
    let mut zero_seen = false;
    for _ in 0..1000 {
        if select_weighted(&entries, &mut rng).unwrap().id == "zero" {
            zero_seen = true;
            break;
        }
    }
    assert!(zero_seen);
}

#[test]
fn test_fallback_table_covers_every_phase() {
    let library = DialogueLibrary::fallback();
    let mut rng = StdRng::seed_from_u64(5);
    for phase in [Phase::One, Phase::Two, Phase::Three] {
        let pattern = library
            .select("king", phase, phase.dialogue_kind(), &mut rng)
            .unwrap_or_else(|| panic!("fallback table missing entries for {phase:?}"));
        assert!(!pattern.text.is_empty());
        assert!(pattern.count >= 1);
        assert!(pattern.speed > 0.0);
    }
}

#[test]
fn test_select_unknown_character_returns_none() {
    let library = DialogueLibrary::fallback();
    let mut rng = StdRng::seed_from_u64(5);
    assert!(library
        .select("fox", Phase::One, BubbleKind::Command, &mut rng)
        .is_none());
}

#[test]
fn test_select_mismatched_kind_returns_none() {
    // Phase one only holds commands; asking for rage there is a miss.
    let library = DialogueLibrary::fallback();
    let mut rng = StdRng::seed_from_u64(5);
    assert!(library
        .select("king", Phase::One, BubbleKind::Rage, &mut rng)
        .is_none());
}

#[test]
fn test_shipped_dialogue_asset_parses_and_covers_every_phase() {
    let library = DialogueLibrary::read().expect("shipped dialogue asset should parse");
    let mut rng = StdRng::seed_from_u64(11);
    for phase in [Phase::One, Phase::Two, Phase::Three] {
        assert!(library
            .select("king", phase, phase.dialogue_kind(), &mut rng)
            .is_some());
    }
}

#[test]
fn test_bubble_kind_speeds() {
    assert_eq!(BubbleKind::Command.speed(), 200.0);
    assert_eq!(BubbleKind::Rage.speed(), 300.0);
    assert_eq!(BubbleKind::Plea.speed(), 150.0);
}

#[test]
fn test_phase_dialogue_kinds() {
    assert_eq!(Phase::One.dialogue_kind(), BubbleKind::Command);
    assert_eq!(Phase::Two.dialogue_kind(), BubbleKind::Rage);
    assert_eq!(Phase::Three.dialogue_kind(), BubbleKind::Plea);
}
