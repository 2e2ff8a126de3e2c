use bevy::prelude::*;

use crate::audio::{PlaySoundEvent, SoundEffect};
use crate::components::Velocity;
use crate::game::{AppState, EncounterState, GameStatus, KING_HIT_DAMAGE};
use crate::king::{King, KingFlash};
use crate::player::Prince;
use crate::speech_bubble::{self, Reflected, SpeechBubble, CONTACT_RADIUS, REFLECT_SPEED};
use crate::visual_effects::spawn_floating_text;

const PARRY_TEXT_COLOR: Color = Color::rgb(1.0, 0.95, 0.4);
const HEAL_TEXT_COLOR: Color = Color::rgb(0.5, 1.0, 0.6);
const DAMAGE_TEXT_COLOR: Color = Color::rgb(1.0, 0.8, 0.8);
const REFLECTED_TINT: Color = Color::rgb(1.0, 0.95, 0.5);

/// What happened when an enemy bubble reached the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactOutcome {
    /// Dodge window open: the bubble passes through untouched.
    Ignored,
    /// Parry window open: combo counted, bubble flies back.
    Parried { healed: bool },
    /// Neither window: a heart is lost and the combo resets.
    Hit,
}

/// Resolution order is fixed: dodge beats parry beats damage.
pub fn resolve_player_contact(
    dodging: bool,
    parrying: bool,
    encounter: &mut EncounterState,
) -> ContactOutcome {
    if dodging {
        return ContactOutcome::Ignored;
    }
    if parrying {
        encounter.add_combo();
        let healed = encounter.parry_heal_due();
        if healed {
            encounter.heal_player();
        }
        return ContactOutcome::Parried { healed };
    }
    encounter.damage_player();
    ContactOutcome::Hit
}

pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (
                player_contact_system.after(speech_bubble::bubble_flight_system),
                king_contact_system.after(speech_bubble::reflected_flight_system),
            )
                .run_if(in_state(AppState::InGame)),
        );
    }
}

#[allow(clippy::too_many_arguments)]
fn player_contact_system(
    mut commands: Commands,
    time: Res<Time>,
    asset_server: Res<AssetServer>,
    mut encounter: ResMut<EncounterState>,
    player_query: Query<(&Transform, &Prince)>,
    king_query: Query<&Transform, (With<King>, Without<Prince>)>,
    mut bubble_query: Query<
        (Entity, &Transform, &mut Sprite),
        (With<SpeechBubble>, Without<Reflected>, Without<Prince>, Without<King>),
    >,
    mut sound_events: EventWriter<PlaySoundEvent>,
) {
    if encounter.status != GameStatus::Playing {
        return;
    }
    let Ok((player_tf, prince)) = player_query.get_single() else {
        return;
    };
    let player_pos = player_tf.translation.truncate();

    for (entity, bubble_tf, mut sprite) in bubble_query.iter_mut() {
        let bubble_pos = bubble_tf.translation.truncate();
        if player_pos.distance(bubble_pos) > CONTACT_RADIUS {
            continue;
        }

        match resolve_player_contact(prince.is_dodging(), prince.is_parrying(), &mut encounter) {
            ContactOutcome::Ignored => {}
            ContactOutcome::Parried { healed } => {
                let toward_king = king_query
                    .get_single()
                    .map(|king_tf| {
                        (king_tf.translation.truncate() - bubble_pos).normalize_or_zero()
                    })
                    .unwrap_or(Vec2::X);
                commands
                    .entity(entity)
                    .remove::<SpeechBubble>()
                    .insert((Reflected, Velocity(toward_king * REFLECT_SPEED)));
                sprite.color = REFLECTED_TINT;

                sound_events.send(PlaySoundEvent(SoundEffect::ParrySuccess));
                spawn_floating_text(
                    &mut commands,
                    &asset_server,
                    player_tf.translation,
                    "Perfect!",
                    PARRY_TEXT_COLOR,
                    &time,
                );
                if healed {
                    spawn_floating_text(
                        &mut commands,
                        &asset_server,
                        player_tf.translation + Vec3::new(0.0, 24.0, 0.0),
                        "+\u{2665}",
                        HEAL_TEXT_COLOR,
                        &time,
                    );
                }
            }
            ContactOutcome::Hit => {
                commands.entity(entity).despawn_recursive();
                sound_events.send(PlaySoundEvent(SoundEffect::PlayerHit));
            }
        }
    }
}

fn king_contact_system(
    mut commands: Commands,
    time: Res<Time>,
    asset_server: Res<AssetServer>,
    mut encounter: ResMut<EncounterState>,
    king_query: Query<&Transform, With<King>>,
    reflected_query: Query<(Entity, &Transform), (With<Reflected>, Without<King>)>,
    mut sound_events: EventWriter<PlaySoundEvent>,
    mut flash_events: EventWriter<KingFlash>,
) {
    if encounter.status != GameStatus::Playing {
        return;
    }
    let Ok(king_tf) = king_query.get_single() else {
        return;
    };
    let king_pos = king_tf.translation.truncate();

    for (entity, bubble_tf) in reflected_query.iter() {
        if king_pos.distance(bubble_tf.translation.truncate()) > CONTACT_RADIUS {
            continue;
        }
        // Despawned on contact, so each reflected bubble lands at most once.
        commands.entity(entity).despawn_recursive();
        encounter.damage_king(KING_HIT_DAMAGE);
        flash_events.send(KingFlash);
        sound_events.send(PlaySoundEvent(SoundEffect::KingHit));
        spawn_floating_text(
            &mut commands,
            &asset_server,
            king_tf.translation,
            &format!("-{KING_HIT_DAMAGE}"),
            DAMAGE_TEXT_COLOR,
            &time,
        );
    }
}
