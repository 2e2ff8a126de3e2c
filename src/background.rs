use bevy::prelude::*;
use rand::Rng;

use crate::game::{AppState, FLOOR_Y, SCREEN_HEIGHT, SCREEN_WIDTH};

const BACKGROUND_Z: f32 = -10.0;
const STAR_COUNT: usize = 60;

#[derive(Component)]
struct BackgroundDecor;

pub struct BackgroundPlugin;

impl Plugin for BackgroundPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(AppState::InGame), setup_background)
            .add_systems(
                Update,
                twinkle_stars_system.run_if(in_state(AppState::InGame)),
            )
            .add_systems(OnExit(AppState::InGame), cleanup_background);
    }
}

#[derive(Component)]
struct Star {
    phase_offset: f32,
    base_alpha: f32,
}

fn setup_background(mut commands: Commands) {
    let mut rng = rand::thread_rng();

    // Night sky backdrop.
    commands.spawn((
        SpriteBundle {
            sprite: Sprite {
                color: Color::rgb(0.05, 0.04, 0.12),
                custom_size: Some(Vec2::new(SCREEN_WIDTH, SCREEN_HEIGHT)),
                ..default()
            },
            transform: Transform::from_xyz(0.0, 0.0, BACKGROUND_Z - 1.0),
            ..default()
        },
        BackgroundDecor,
        Name::new("NightSky"),
    ));

    for i in 0..STAR_COUNT {
        let x = rng.gen_range(-SCREEN_WIDTH * 0.5..SCREEN_WIDTH * 0.5);
        let y = rng.gen_range(FLOOR_Y + 40.0..SCREEN_HEIGHT * 0.5);
        let base_alpha = rng.gen_range(0.3..1.0);
        commands.spawn((
            SpriteBundle {
                sprite: Sprite {
                    color: Color::rgba(1.0, 1.0, 1.0, base_alpha),
                    custom_size: Some(Vec2::splat(rng.gen_range(1.5..3.0))),
                    ..default()
                },
                transform: Transform::from_xyz(x, y, BACKGROUND_Z),
                ..default()
            },
            Star {
                phase_offset: rng.gen_range(0.0..std::f32::consts::TAU),
                base_alpha,
            },
            BackgroundDecor,
            Name::new(format!("Star_{i}")),
        ));
    }

    // The tiny planet's surface.
    commands.spawn((
        SpriteBundle {
            sprite: Sprite {
                color: Color::rgb(0.35, 0.3, 0.45),
                custom_size: Some(Vec2::new(SCREEN_WIDTH, SCREEN_HEIGHT * 0.5 + FLOOR_Y)),
                ..default()
            },
            transform: Transform::from_xyz(0.0, (FLOOR_Y - SCREEN_HEIGHT * 0.5) * 0.5, BACKGROUND_Z),
            ..default()
        },
        BackgroundDecor,
        Name::new("PlanetSurface"),
    ));

    // The King's throne, behind his spot on the right.
    commands.spawn((
        SpriteBundle {
            sprite: Sprite {
                color: Color::rgb(0.5, 0.12, 0.18),
                custom_size: Some(Vec2::new(110.0, 160.0)),
                ..default()
            },
            transform: Transform::from_xyz(300.0, FLOOR_Y + 80.0, BACKGROUND_Z + 1.0),
            ..default()
        },
        BackgroundDecor,
        Name::new("Throne"),
    ));
    commands.spawn((
        SpriteBundle {
            sprite: Sprite {
                color: Color::rgb(0.65, 0.5, 0.15),
                custom_size: Some(Vec2::new(130.0, 20.0)),
                ..default()
            },
            transform: Transform::from_xyz(300.0, FLOOR_Y + 170.0, BACKGROUND_Z + 1.0),
            ..default()
        },
        BackgroundDecor,
        Name::new("ThroneCrest"),
    ));
}

fn twinkle_stars_system(time: Res<Time>, mut query: Query<(&Star, &mut Sprite)>) {
    for (star, mut sprite) in query.iter_mut() {
        let flicker = (time.elapsed_seconds() * 2.0 + star.phase_offset).sin() * 0.2;
        sprite
            .color
            .set_a((star.base_alpha + flicker).clamp(0.1, 1.0));
    }
}

fn cleanup_background(mut commands: Commands, query: Query<Entity, With<BackgroundDecor>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}
