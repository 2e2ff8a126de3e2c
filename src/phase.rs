use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::dialogue::BubbleKind;
use crate::game::{AppState, EncounterState, GameStatus};

pub const PHASE_2_HEALTH_PERCENT: f32 = 0.60;
pub const PHASE_3_HEALTH_PERCENT: f32 = 0.20;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub enum Phase {
    #[default]
    One,
    Two,
    Three,
}

impl Phase {
    /// Min/max delay in milliseconds between attack bursts. Phase three is
    /// deliberately slow: the King is pleading, not pressing.
    pub fn cooldown_range_ms(self) -> (u64, u64) {
        match self {
            Phase::One => (2000, 3000),
            Phase::Two => (1000, 1500),
            Phase::Three => (3000, 4000),
        }
    }

    pub fn dialogue_kind(self) -> BubbleKind {
        match self {
            Phase::One => BubbleKind::Command,
            Phase::Two => BubbleKind::Rage,
            Phase::Three => BubbleKind::Plea,
        }
    }
}

/// Threshold policy for the encounter. Phases only ever advance, one step at
/// a time, no matter how far health drops in a single tick.
pub fn evaluate(health_percent: f32, current: Phase) -> Phase {
    match current {
        Phase::One if health_percent <= PHASE_2_HEALTH_PERCENT => Phase::Two,
        Phase::Two if health_percent <= PHASE_3_HEALTH_PERCENT => Phase::Three,
        _ => current,
    }
}

#[derive(Event)]
pub struct PhaseChanged(pub Phase);

pub struct PhasePlugin;

impl Plugin for PhasePlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<PhaseChanged>().add_systems(
            Update,
            phase_transition_system.run_if(in_state(AppState::InGame)),
        );
    }
}

pub fn phase_transition_system(
    mut encounter: ResMut<EncounterState>,
    mut phase_events: EventWriter<PhaseChanged>,
) {
    if encounter.status != GameStatus::Playing {
        return;
    }
    let next = evaluate(encounter.king_health_percent(), encounter.phase);
    if next != encounter.phase {
        encounter.phase = next;
        info!("king enters {:?}", next);
        phase_events.send(PhaseChanged(next));
    }
}
