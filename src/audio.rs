use bevy::audio::Volume;
use bevy::prelude::*;

use crate::game::AppState;
use crate::records::Settings;

#[derive(Event)]
pub struct PlaySoundEvent(pub SoundEffect);

#[derive(Component)]
struct BackgroundMusic;

#[derive(Debug, Clone, Copy)]
pub enum SoundEffect {
    PlayerHit,
    KingHit,
    ParrySuccess,
    Dodge,
    Jump,
    KingSpeaks,
    PhaseShift,
    Victory,
    Defeat,
}

pub struct GameAudioPlugin;

impl Plugin for GameAudioPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<PlaySoundEvent>()
            .add_systems(Update, play_sound_system)
            .add_systems(OnEnter(AppState::InGame), start_background_music)
            .add_systems(OnExit(AppState::InGame), stop_background_music);
    }
}

fn start_background_music(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    settings: Res<Settings>,
) {
    commands.spawn((
        AudioBundle {
            source: asset_server.load("audio/king_theme_placeholder.ogg"),
            settings: PlaybackSettings::LOOP.with_volume(Volume::new(settings.bgm_level())),
        },
        BackgroundMusic,
        Name::new("BackgroundMusic"),
    ));
}

fn stop_background_music(mut commands: Commands, query: Query<Entity, With<BackgroundMusic>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}

fn play_sound_system(
    mut sound_events: EventReader<PlaySoundEvent>,
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    settings: Res<Settings>,
) {
    for event in sound_events.read() {
        let sound_effect = match event.0 {
            SoundEffect::PlayerHit => "audio/player_hit_placeholder.ogg",
            SoundEffect::KingHit => "audio/king_hit_placeholder.ogg",
            SoundEffect::ParrySuccess => "audio/parry_success_placeholder.ogg",
            SoundEffect::Dodge => "audio/dodge_placeholder.ogg",
            SoundEffect::Jump => "audio/jump_placeholder.ogg",
            SoundEffect::KingSpeaks => "audio/king_speaks_placeholder.ogg",
            SoundEffect::PhaseShift => "audio/phase_shift_placeholder.ogg",
            SoundEffect::Victory => "audio/victory_placeholder.ogg",
            SoundEffect::Defeat => "audio/defeat_placeholder.ogg",
        };
        commands.spawn(AudioBundle {
            source: asset_server.load(sound_effect),
            settings: PlaybackSettings::DESPAWN.with_volume(Volume::new(settings.sfx_level())),
        });
    }
}
