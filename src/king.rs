use bevy::prelude::*;
use std::time::Duration;

use crate::game::{AppState, EncounterState, GameStatus, FLOOR_Y};
use crate::phase::Phase;

pub const KING_SIZE: Vec2 = Vec2::new(50.0, 70.0);
pub const KING_START_X: f32 = 240.0;
pub const KING_GROUND_Y: f32 = FLOOR_Y + KING_SIZE.y * 0.5;

const SWAY_AMPLITUDE: f32 = 40.0;
const SWAY_SPEED: f32 = 2.5;
const ADVANCE_SPEED: f32 = 25.0;
const FLASH_SECONDS: f32 = 0.15;

#[derive(Component)]
pub struct King {
    pub home_x: f32,
    pub flash_timer: Timer,
}

impl King {
    fn new() -> Self {
        let mut flash_timer = Timer::from_seconds(FLASH_SECONDS, TimerMode::Once);
        flash_timer.tick(Duration::from_secs_f32(FLASH_SECONDS));
        Self {
            home_x: KING_START_X,
            flash_timer,
        }
    }
}

/// The King flinches white for a moment; sent on both attack and hit.
#[derive(Event)]
pub struct KingFlash;

pub fn phase_tint(phase: Phase) -> Color {
    match phase {
        Phase::One => Color::rgb(0.91, 0.3, 0.24),
        Phase::Two => Color::rgb(1.0, 0.1, 0.1),
        Phase::Three => Color::rgb(0.58, 0.65, 0.65),
    }
}

pub struct KingPlugin;

impl Plugin for KingPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<KingFlash>()
            .add_systems(OnEnter(AppState::InGame), spawn_king)
            .add_systems(
                Update,
                (king_behavior_system, king_tint_system)
                    .chain()
                    .run_if(in_state(AppState::InGame)),
            )
            .add_systems(OnExit(AppState::InGame), despawn_king);
    }
}

fn spawn_king(mut commands: Commands) {
    commands.spawn((
        SpriteBundle {
            sprite: Sprite {
                color: phase_tint(Phase::One),
                custom_size: Some(KING_SIZE),
                ..default()
            },
            transform: Transform::from_xyz(KING_START_X, KING_GROUND_Y, 1.0),
            ..default()
        },
        King::new(),
        Name::new("King"),
    ));
}

fn king_behavior_system(
    time: Res<Time>,
    encounter: Res<EncounterState>,
    mut query: Query<(&King, &mut Transform)>,
) {
    let Ok((king, mut transform)) = query.get_single_mut() else {
        return;
    };
    if encounter.status != GameStatus::Playing {
        return;
    }
    match encounter.phase {
        // Immovable on his throne.
        Phase::One => {
            transform.translation.x = king.home_x;
        }
        // Anxious pacing.
        Phase::Two => {
            transform.translation.x =
                king.home_x + (time.elapsed_seconds() * SWAY_SPEED).sin() * SWAY_AMPLITUDE;
        }
        // Leaves the throne, creeping toward the prince, never past mid-screen.
        Phase::Three => {
            transform.translation.x =
                (transform.translation.x - ADVANCE_SPEED * time.delta_seconds()).max(0.0);
        }
    }
}

fn king_tint_system(
    time: Res<Time>,
    encounter: Res<EncounterState>,
    mut flash_events: EventReader<KingFlash>,
    mut query: Query<(&mut King, &mut Sprite)>,
) {
    let Ok((mut king, mut sprite)) = query.get_single_mut() else {
        return;
    };

    for _ in flash_events.read() {
        king.flash_timer.reset();
    }

    king.flash_timer.tick(time.delta());
    if !king.flash_timer.finished() {
        sprite.color = Color::WHITE;
    } else {
        sprite.color = phase_tint(encounter.phase);
    }
}

fn despawn_king(mut commands: Commands, query: Query<Entity, With<King>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}
