use bevy::prelude::*;
use std::time::Duration;

use crate::audio::{PlaySoundEvent, SoundEffect};
use crate::components::Velocity;
use crate::game::{AppState, EncounterState, GameStatus, FLOOR_Y, SCREEN_WIDTH};
use crate::records::Settings;

pub const PLAYER_SIZE: Vec2 = Vec2::new(40.0, 60.0);
pub const PLAYER_START_X: f32 = -240.0;

const MOVE_SPEED: f32 = 200.0;
const DODGE_BURST_SPEED: f32 = 420.0;
const JUMP_VELOCITY: f32 = 380.0;
const GRAVITY: f32 = 1000.0;

const DODGE_WINDOW_SECONDS: f32 = 0.3;
const DODGE_COOLDOWN_SECONDS: f32 = 1.0;
const PARRY_WINDOW_SECONDS: f32 = 0.2;

const PRINCE_COLOR: Color = Color::rgb(1.0, 0.9, 0.55);
const PRINCE_PARRY_COLOR: Color = Color::rgb(0.6, 0.9, 1.0);

/// Ground height for the player's sprite center.
pub const PLAYER_GROUND_Y: f32 = FLOOR_Y + PLAYER_SIZE.y * 0.5;

#[derive(Component)]
pub struct Prince {
    pub dodge_window: Timer,
    pub dodge_cooldown: Timer,
    pub parry_window: Timer,
    pub grounded: bool,
    pub facing: f32,
}

impl Prince {
    pub fn new() -> Self {
        Self {
            dodge_window: expired_timer(DODGE_WINDOW_SECONDS),
            dodge_cooldown: expired_timer(DODGE_COOLDOWN_SECONDS),
            parry_window: expired_timer(PARRY_WINDOW_SECONDS),
            grounded: true,
            facing: 1.0,
        }
    }

    pub fn is_dodging(&self) -> bool {
        !self.dodge_window.finished()
    }

    pub fn is_parrying(&self) -> bool {
        !self.parry_window.finished()
    }
}

impl Default for Prince {
    fn default() -> Self {
        Self::new()
    }
}

fn expired_timer(seconds: f32) -> Timer {
    let mut timer = Timer::from_seconds(seconds, TimerMode::Once);
    timer.tick(Duration::from_secs_f32(seconds));
    timer
}

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(AppState::InGame), spawn_prince)
            .add_systems(
                Update,
                (
                    prince_input_system,
                    prince_physics_system,
                    prince_visual_system,
                )
                    .chain()
                    .run_if(in_state(AppState::InGame)),
            )
            .add_systems(OnExit(AppState::InGame), despawn_prince);
    }
}

fn spawn_prince(mut commands: Commands) {
    commands.spawn((
        SpriteBundle {
            sprite: Sprite {
                color: PRINCE_COLOR,
                custom_size: Some(PLAYER_SIZE),
                ..default()
            },
            transform: Transform::from_xyz(PLAYER_START_X, PLAYER_GROUND_Y, 1.0),
            ..default()
        },
        Prince::new(),
        Velocity(Vec2::ZERO),
        Name::new("Prince"),
    ));
}

fn prince_input_system(
    time: Res<Time>,
    keyboard_input: Res<ButtonInput<KeyCode>>,
    settings: Res<Settings>,
    encounter: Res<EncounterState>,
    mut query: Query<(&mut Prince, &mut Velocity)>,
    mut sound_events: EventWriter<PlaySoundEvent>,
) {
    let Ok((mut prince, mut velocity)) = query.get_single_mut() else {
        return;
    };

    prince.dodge_window.tick(time.delta());
    prince.dodge_cooldown.tick(time.delta());
    prince.parry_window.tick(time.delta());

    if encounter.status != GameStatus::Playing {
        velocity.x = 0.0;
        return;
    }

    let controls = &settings.controls;
    let mut direction = 0.0;
    if keyboard_input.pressed(controls.left_key()) {
        direction -= 1.0;
    }
    if keyboard_input.pressed(controls.right_key()) {
        direction += 1.0;
    }
    if direction != 0.0 {
        prince.facing = direction;
    }

    // Dodge overrides steering for the duration of its burst.
    if prince.is_dodging() {
        velocity.x = prince.facing * DODGE_BURST_SPEED;
    } else {
        velocity.x = direction * MOVE_SPEED;
    }

    if keyboard_input.just_pressed(controls.jump_key()) && prince.grounded {
        velocity.y = JUMP_VELOCITY;
        prince.grounded = false;
        sound_events.send(PlaySoundEvent(SoundEffect::Jump));
    }

    if keyboard_input.just_pressed(controls.dodge_key()) && prince.dodge_cooldown.finished() {
        prince.dodge_window.reset();
        prince.dodge_cooldown.reset();
        sound_events.send(PlaySoundEvent(SoundEffect::Dodge));
    }

    if keyboard_input.just_pressed(controls.parry_key()) && prince.parry_window.finished() {
        prince.parry_window.reset();
    }
}

fn prince_physics_system(
    time: Res<Time>,
    mut query: Query<(&mut Prince, &mut Velocity, &mut Transform)>,
) {
    let Ok((mut prince, mut velocity, mut transform)) = query.get_single_mut() else {
        return;
    };
    let dt = time.delta_seconds();

    if !prince.grounded {
        velocity.y -= GRAVITY * dt;
    }

    transform.translation.x += velocity.x * dt;
    transform.translation.y += velocity.y * dt;

    let limit = SCREEN_WIDTH * 0.5 - PLAYER_SIZE.x * 0.5;
    transform.translation.x = transform.translation.x.clamp(-limit, limit);

    if transform.translation.y <= PLAYER_GROUND_Y {
        transform.translation.y = PLAYER_GROUND_Y;
        velocity.y = 0.0;
        prince.grounded = true;
    }
}

fn prince_visual_system(mut query: Query<(&Prince, &mut Sprite)>) {
    let Ok((prince, mut sprite)) = query.get_single_mut() else {
        return;
    };
    if prince.is_parrying() {
        sprite.color = PRINCE_PARRY_COLOR;
    } else if prince.is_dodging() {
        sprite.color = PRINCE_COLOR.with_a(0.4);
    } else {
        sprite.color = PRINCE_COLOR;
    }
}

fn despawn_prince(mut commands: Commands, query: Query<Entity, With<Prince>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}
