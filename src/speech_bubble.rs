use bevy::prelude::*;

use crate::components::{Lifetime, Velocity};
use crate::dialogue::AttackPattern;
use crate::game::{AppState, FLOOR_Y, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::trajectory::Trajectory;

pub const BUBBLE_SIZE: Vec2 = Vec2::new(64.0, 40.0);
pub const CONTACT_RADIUS: f32 = 40.0;
pub const REFLECT_SPEED: f32 = 400.0;
pub const SPAWN_STAGGER_SECONDS: f32 = 0.2;
pub const BUBBLE_LIFETIME_SECONDS: f32 = 8.0;
const OFFSCREEN_MARGIN: f32 = 100.0;

/// An attack in flight. Position is a pure function of the trajectory and
/// the bubble's own age, so pacing hitches cannot bend the path.
#[derive(Component)]
pub struct SpeechBubble {
    pub trajectory: Trajectory,
    pub age: f32,
}

/// Parried bubble on its way back to the King. Straight-line flight; the
/// original trajectory is discarded at the moment of the parry.
#[derive(Component)]
pub struct Reflected;

pub struct SpeechBubblePlugin;

impl Plugin for SpeechBubblePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (
                bubble_flight_system,
                reflected_flight_system,
                bubble_lifetime_system,
            )
                .chain()
                .run_if(in_state(AppState::InGame)),
        )
        .add_systems(OnExit(AppState::InGame), despawn_all_bubbles);
    }
}

pub fn spawn_speech_bubble(
    commands: &mut Commands,
    asset_server: &AssetServer,
    pattern: &AttackPattern,
    trajectory: Trajectory,
) {
    let kind = pattern.kind;
    commands
        .spawn((
            SpriteBundle {
                sprite: Sprite {
                    color: kind.tint().with_a(0.9),
                    custom_size: Some(BUBBLE_SIZE * kind.text_scale()),
                    ..default()
                },
                transform: Transform::from_xyz(trajectory.start.x, trajectory.start.y, 2.0),
                ..default()
            },
            SpeechBubble {
                trajectory,
                age: 0.0,
            },
            Lifetime {
                timer: Timer::from_seconds(BUBBLE_LIFETIME_SECONDS, TimerMode::Once),
            },
            Name::new("SpeechBubble"),
        ))
        .with_children(|parent| {
            parent.spawn(Text2dBundle {
                text: Text::from_section(
                    pattern.text.clone(),
                    TextStyle {
                        font: asset_server.load("fonts/FiraSans-Bold.ttf"),
                        font_size: 16.0 * kind.text_scale(),
                        color: Color::rgb(0.05, 0.05, 0.1),
                    },
                ),
                transform: Transform::from_xyz(0.0, 0.0, 0.1),
                ..default()
            });
        });
}

fn outside_play_area(pos: Vec2) -> bool {
    pos.x.abs() > SCREEN_WIDTH * 0.5 + OFFSCREEN_MARGIN
        || pos.y.abs() > SCREEN_HEIGHT * 0.5 + OFFSCREEN_MARGIN
}

pub fn bubble_flight_system(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut SpeechBubble, &mut Transform), Without<Reflected>>,
) {
    for (entity, mut bubble, mut transform) in query.iter_mut() {
        bubble.age += time.delta_seconds();
        let pos = bubble.trajectory.position_at(bubble.age);
        transform.translation.x = pos.x;
        transform.translation.y = pos.y;

        if bubble.trajectory.finished(bubble.age) || pos.y <= FLOOR_Y || outside_play_area(pos) {
            commands.entity(entity).despawn_recursive();
        }
    }
}

pub fn reflected_flight_system(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &Velocity, &mut Transform), With<Reflected>>,
) {
    for (entity, velocity, mut transform) in query.iter_mut() {
        transform.translation.x += velocity.x * time.delta_seconds();
        transform.translation.y += velocity.y * time.delta_seconds();
        if outside_play_area(transform.translation.truncate()) {
            commands.entity(entity).despawn_recursive();
        }
    }
}

fn bubble_lifetime_system(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut Lifetime), Or<(With<SpeechBubble>, With<Reflected>)>>,
) {
    for (entity, mut lifetime) in query.iter_mut() {
        lifetime.timer.tick(time.delta());
        if lifetime.timer.just_finished() {
            commands.entity(entity).despawn_recursive();
        }
    }
}

fn despawn_all_bubbles(
    mut commands: Commands,
    query: Query<Entity, Or<(With<SpeechBubble>, With<Reflected>)>>,
) {
    for entity in query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}
