use bevy::prelude::*;

pub mod audio;
pub mod background;
pub mod combat;
pub mod components;
pub mod dialogue;
pub mod game;
pub mod king;
pub mod phase;
pub mod player;
pub mod records;
pub mod scheduler;
pub mod speech_bubble;
pub mod trajectory;
pub mod visual_effects;

use audio::GameAudioPlugin;
use background::BackgroundPlugin;
use combat::CombatPlugin;
use dialogue::DialoguePlugin;
use game::{GamePlugin, SCREEN_HEIGHT, SCREEN_WIDTH};
use king::KingPlugin;
use phase::PhasePlugin;
use player::PlayerPlugin;
use records::RecordsPlugin;
use scheduler::SchedulerPlugin;
use speech_bubble::SpeechBubblePlugin;
use visual_effects::VisualEffectsPlugin;

pub fn run() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "The King's Planet".into(),
                resolution: (SCREEN_WIDTH, SCREEN_HEIGHT).into(),
                resizable: false,
                ..default()
            }),
            ..default()
        }))
        .add_plugins((
            GamePlugin,
            RecordsPlugin,
            DialoguePlugin,
            PhasePlugin,
            PlayerPlugin,
            KingPlugin,
            SchedulerPlugin,
            SpeechBubblePlugin,
            CombatPlugin,
            GameAudioPlugin,
            VisualEffectsPlugin,
            BackgroundPlugin,
        ))
        .add_systems(Startup, setup_camera)
        .run();
}

fn setup_camera(mut commands: Commands) {
    let mut camera_bundle = Camera2dBundle::default();
    camera_bundle.transform.translation.z = 999.0;
    commands.spawn(camera_bundle);
}
