use bevy::prelude::*;

use crate::audio::{PlaySoundEvent, SoundEffect};
use crate::phase::{Phase, PhaseChanged};
use crate::records::{Records, Settings};

pub const SCREEN_WIDTH: f32 = 800.0;
pub const SCREEN_HEIGHT: f32 = 600.0;
pub const FLOOR_Y: f32 = -180.0;

pub const PLAYER_MAX_HEALTH: i32 = 3;
pub const KING_MAX_HEALTH: i32 = 100;
pub const KING_HIT_DAMAGE: i32 = 10;
pub const PARRY_HEAL_INTERVAL: u32 = 5;

const FONT_PATH: &str = "fonts/FiraSans-Bold.ttf";
const HEALTH_BAR_WIDTH: f32 = 400.0;

#[derive(States, Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum AppState {
    #[default]
    MainMenu,
    InGame,
    GameOver,
    Victory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameStatus {
    #[default]
    Playing,
    Victory,
    Defeat,
}

#[derive(Resource)]
pub struct EncounterState {
    pub player_health: i32,
    pub king_health: i32,
    pub phase: Phase,
    pub combo: u32,
    pub max_combo: u32,
    pub elapsed_seconds: f32,
    pub status: GameStatus,
}

impl Default for EncounterState {
    fn default() -> Self {
        Self {
            player_health: PLAYER_MAX_HEALTH,
            king_health: KING_MAX_HEALTH,
            phase: Phase::One,
            combo: 0,
            max_combo: 0,
            elapsed_seconds: 0.0,
            status: GameStatus::Playing,
        }
    }
}

impl EncounterState {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn king_health_percent(&self) -> f32 {
        self.king_health.max(0) as f32 / KING_MAX_HEALTH as f32
    }

    pub fn damage_player(&mut self) {
        self.player_health = (self.player_health - 1).max(0);
        self.combo = 0;
    }

    pub fn heal_player(&mut self) {
        self.player_health = (self.player_health + 1).min(PLAYER_MAX_HEALTH);
    }

    pub fn damage_king(&mut self, amount: i32) {
        self.king_health = (self.king_health - amount).max(0);
    }

    pub fn add_combo(&mut self) -> u32 {
        self.combo += 1;
        self.max_combo = self.max_combo.max(self.combo);
        self.combo
    }

    /// Every fifth consecutive parry restores a heart, never past the cap.
    pub fn parry_heal_due(&self) -> bool {
        self.combo > 0
            && self.combo % PARRY_HEAL_INTERVAL == 0
            && self.player_health < PLAYER_MAX_HEALTH
    }

    /// Victory wins the tie when both healths reach zero on the same tick.
    pub fn check_end(&self) -> Option<GameStatus> {
        if self.king_health <= 0 {
            Some(GameStatus::Victory)
        } else if self.player_health <= 0 {
            Some(GameStatus::Defeat)
        } else {
            None
        }
    }
}

#[derive(Component)]
struct MainMenuUI;

#[derive(Component)]
struct InGameUI;

#[derive(Component)]
struct EndScreenUI;

#[derive(Component)]
struct KingHealthBarFill;

#[derive(Component)]
struct HeartsText;

#[derive(Component)]
struct ComboText;

#[derive(Component)]
struct TimerText;

#[derive(Component)]
struct BgmVolumeText;

#[derive(Component)]
struct ControlsHint {
    timer: Timer,
}

#[derive(Component)]
struct NarrationText {
    timer: Timer,
}

pub struct GamePlugin;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<AppState>()
            .init_resource::<EncounterState>()
            .add_systems(OnEnter(AppState::MainMenu), setup_main_menu_ui)
            .add_systems(
                Update,
                (main_menu_input_system, update_bgm_volume_text)
                    .run_if(in_state(AppState::MainMenu)),
            )
            .add_systems(OnExit(AppState::MainMenu), despawn_ui_by_marker::<MainMenuUI>)
            .add_systems(
                OnEnter(AppState::InGame),
                (setup_ingame_ui, spawn_opening_narration),
            )
            .add_systems(
                Update,
                (
                    update_encounter_timer,
                    update_ingame_ui,
                    fade_controls_hint_system,
                    phase_narration_system,
                    narration_lifetime_system,
                    end_condition_system,
                )
                    .chain()
                    .run_if(in_state(AppState::InGame)),
            )
            .add_systems(OnExit(AppState::InGame), despawn_ui_by_marker::<InGameUI>)
            .add_systems(OnEnter(AppState::GameOver), setup_defeat_ui)
            .add_systems(OnExit(AppState::GameOver), despawn_ui_by_marker::<EndScreenUI>)
            .add_systems(OnEnter(AppState::Victory), setup_victory_ui)
            .add_systems(OnExit(AppState::Victory), despawn_ui_by_marker::<EndScreenUI>)
            .add_systems(
                Update,
                end_screen_input_system
                    .run_if(in_state(AppState::GameOver).or_else(in_state(AppState::Victory))),
            );
    }
}

fn despawn_ui_by_marker<T: Component>(mut commands: Commands, query: Query<Entity, With<T>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}

fn ui_text(font: Handle<Font>, value: &str, size: f32, color: Color) -> TextBundle {
    TextBundle::from_section(
        value,
        TextStyle {
            font,
            font_size: size,
            color,
        },
    )
}

fn setup_main_menu_ui(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    records: Res<Records>,
    settings: Res<Settings>,
) {
    let font = asset_server.load(FONT_PATH);
    commands
        .spawn((
            NodeBundle {
                style: Style {
                    width: Val::Percent(100.0),
                    height: Val::Percent(100.0),
                    flex_direction: FlexDirection::Column,
                    align_items: AlignItems::Center,
                    justify_content: JustifyContent::Center,
                    row_gap: Val::Px(18.0),
                    ..default()
                },
                ..default()
            },
            MainMenuUI,
            Name::new("MainMenuUI"),
        ))
        .with_children(|parent| {
            parent.spawn(ui_text(
                font.clone(),
                "The King's Planet",
                64.0,
                Color::rgb(1.0, 0.85, 0.3),
            ));
            parent.spawn(ui_text(
                font.clone(),
                "The King demands a subject. The little prince refuses.",
                20.0,
                Color::rgb(0.8, 0.8, 0.85),
            ));
            parent.spawn(ui_text(font.clone(), "Press SPACE to face the King", 28.0, Color::WHITE));
            let stats = if records.total_plays > 0 {
                let best = records
                    .best_time
                    .map(|secs| format!("{secs}s"))
                    .unwrap_or_else(|| "--".to_string());
                format!(
                    "Best time: {}   Max combo: {}   Win rate: {}%",
                    best,
                    records.max_combo,
                    records.win_rate_percent()
                )
            } else {
                "No attempts yet".to_string()
            };
            parent.spawn(ui_text(font.clone(), &stats, 18.0, Color::rgb(0.6, 0.6, 0.7)));
            parent.spawn((
                ui_text(
                    font,
                    &format!("Music volume: {}%   (-/+)", settings.bgm_volume),
                    16.0,
                    Color::rgb(0.5, 0.5, 0.6),
                ),
                BgmVolumeText,
            ));
        });
}

fn main_menu_input_system(
    keyboard_input: Res<ButtonInput<KeyCode>>,
    mut encounter: ResMut<EncounterState>,
    mut settings: ResMut<Settings>,
    mut next_app_state: ResMut<NextState<AppState>>,
) {
    if keyboard_input.just_pressed(KeyCode::Space) {
        encounter.reset();
        next_app_state.set(AppState::InGame);
    }

    let delta = if keyboard_input.just_pressed(KeyCode::Minus) {
        -10
    } else if keyboard_input.just_pressed(KeyCode::Equal) {
        10
    } else {
        0
    };
    if delta != 0 {
        settings.adjust_bgm(delta);
        if let Err(e) = settings.save() {
            warn!("unable to save settings to '{}': {e}", crate::records::SETTINGS_PATH);
        }
    }
}

fn update_bgm_volume_text(
    settings: Res<Settings>,
    mut query: Query<&mut Text, With<BgmVolumeText>>,
) {
    if !settings.is_changed() {
        return;
    }
    for mut text in query.iter_mut() {
        text.sections[0].value = format!("Music volume: {}%   (-/+)", settings.bgm_volume);
    }
}

fn setup_ingame_ui(mut commands: Commands, asset_server: Res<AssetServer>) {
    let font = asset_server.load(FONT_PATH);
    commands
        .spawn((
            NodeBundle {
                style: Style {
                    width: Val::Percent(100.0),
                    flex_direction: FlexDirection::Column,
                    align_items: AlignItems::Center,
                    padding: UiRect::all(Val::Px(10.0)),
                    row_gap: Val::Px(6.0),
                    ..default()
                },
                ..default()
            },
            InGameUI,
            Name::new("InGameUI"),
        ))
        .with_children(|parent| {
            parent.spawn(ui_text(font.clone(), "THE KING", 18.0, Color::rgb(1.0, 0.85, 0.3)));
            // Dark backing bar with a red fill resized each frame.
            parent
                .spawn(NodeBundle {
                    style: Style {
                        width: Val::Px(HEALTH_BAR_WIDTH),
                        height: Val::Px(18.0),
                        ..default()
                    },
                    background_color: Color::rgb(0.15, 0.15, 0.2).into(),
                    ..default()
                })
                .with_children(|bar| {
                    bar.spawn((
                        NodeBundle {
                            style: Style {
                                width: Val::Px(HEALTH_BAR_WIDTH),
                                height: Val::Percent(100.0),
                                ..default()
                            },
                            background_color: Color::rgb(0.91, 0.3, 0.24).into(),
                            ..default()
                        },
                        KingHealthBarFill,
                    ));
                });
            parent
                .spawn(NodeBundle {
                    style: Style {
                        width: Val::Px(HEALTH_BAR_WIDTH),
                        justify_content: JustifyContent::SpaceBetween,
                        ..default()
                    },
                    ..default()
                })
                .with_children(|row| {
                    row.spawn((
                        ui_text(
                            font.clone(),
                            "\u{2665}\u{2665}\u{2665}",
                            24.0,
                            Color::rgb(1.0, 0.4, 0.5),
                        ),
                        HeartsText,
                    ));
                    row.spawn((
                        ui_text(font.clone(), "", 20.0, Color::rgb(1.0, 0.85, 0.3)),
                        ComboText,
                    ));
                    row.spawn((ui_text(font.clone(), "0s", 20.0, Color::WHITE), TimerText));
                });
            parent.spawn((
                ui_text(
                    font,
                    "Arrows: move   Space: jump   Z: dodge   X: parry",
                    16.0,
                    Color::rgba(0.8, 0.8, 0.85, 1.0),
                ),
                ControlsHint {
                    timer: Timer::from_seconds(4.0, TimerMode::Once),
                },
            ));
        });
}

fn update_encounter_timer(time: Res<Time>, mut encounter: ResMut<EncounterState>) {
    if encounter.status == GameStatus::Playing {
        encounter.elapsed_seconds += time.delta_seconds();
    }
}

fn update_ingame_ui(
    encounter: Res<EncounterState>,
    mut bar_query: Query<&mut Style, With<KingHealthBarFill>>,
    mut text_queries: ParamSet<(
        Query<&mut Text, With<HeartsText>>,
        Query<&mut Text, With<ComboText>>,
        Query<&mut Text, With<TimerText>>,
    )>,
) {
    for mut style in bar_query.iter_mut() {
        style.width = Val::Px(HEALTH_BAR_WIDTH * encounter.king_health_percent());
    }
    for mut text in text_queries.p0().iter_mut() {
        text.sections[0].value = "\u{2665}".repeat(encounter.player_health.max(0) as usize);
    }
    for mut text in text_queries.p1().iter_mut() {
        text.sections[0].value = if encounter.combo > 1 {
            format!("{} COMBO", encounter.combo)
        } else {
            String::new()
        };
    }
    for mut text in text_queries.p2().iter_mut() {
        text.sections[0].value = format!("{}s", encounter.elapsed_seconds as u32);
    }
}

/// The hint holds full alpha for the first three quarters of its window,
/// then ramps out over the last quarter.
pub fn hint_alpha(fraction: f32) -> f32 {
    ((1.0 - fraction) / 0.25).clamp(0.0, 1.0)
}

fn fade_controls_hint_system(time: Res<Time>, mut query: Query<(&mut ControlsHint, &mut Text)>) {
    for (mut hint, mut text) in query.iter_mut() {
        hint.timer.tick(time.delta());
        let alpha = hint_alpha(hint.timer.fraction());
        let color = text.sections[0].style.color;
        text.sections[0].style.color = color.with_a(alpha);
    }
}

fn spawn_narration(commands: &mut Commands, asset_server: &AssetServer, line: &str, seconds: f32) {
    commands.spawn((
        TextBundle::from_section(
            line,
            TextStyle {
                font: asset_server.load(FONT_PATH),
                font_size: 26.0,
                color: Color::rgb(0.95, 0.95, 1.0),
            },
        )
        .with_text_justify(JustifyText::Center)
        .with_style(Style {
            position_type: PositionType::Absolute,
            left: Val::Percent(10.0),
            right: Val::Percent(10.0),
            top: Val::Px(150.0),
            justify_content: JustifyContent::Center,
            ..default()
        }),
        NarrationText {
            timer: Timer::from_seconds(seconds, TimerMode::Once),
        },
        InGameUI,
        Name::new("NarrationText"),
    ));
}

fn spawn_opening_narration(mut commands: Commands, asset_server: Res<AssetServer>) {
    spawn_narration(
        &mut commands,
        &asset_server,
        "\"Ah! A subject! Approach, that I may see you better.\"",
        4.0,
    );
}

fn phase_narration_system(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    mut phase_events: EventReader<PhaseChanged>,
    mut sound_events: EventWriter<PlaySoundEvent>,
) {
    for PhaseChanged(phase) in phase_events.read() {
        let line = match phase {
            Phase::One => continue,
            Phase::Two => "\"Oh? You... you dare defy your King?!\"",
            Phase::Three => "\"Please... do not go. I shall make you a minister!\"",
        };
        spawn_narration(&mut commands, &asset_server, line, 3.0);
        sound_events.send(PlaySoundEvent(SoundEffect::PhaseShift));
    }
}

fn narration_lifetime_system(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut NarrationText)>,
) {
    for (entity, mut narration) in query.iter_mut() {
        narration.timer.tick(time.delta());
        if narration.timer.just_finished() {
            commands.entity(entity).despawn_recursive();
        }
    }
}

fn end_condition_system(
    mut encounter: ResMut<EncounterState>,
    mut records: ResMut<Records>,
    mut next_app_state: ResMut<NextState<AppState>>,
    mut sound_events: EventWriter<PlaySoundEvent>,
) {
    if encounter.status != GameStatus::Playing {
        return;
    }
    let Some(outcome) = encounter.check_end() else {
        return;
    };
    encounter.status = outcome;
    let victory = outcome == GameStatus::Victory;
    records.record_completion(victory, encounter.elapsed_seconds as u32, encounter.max_combo);
    if let Err(e) = records.save() {
        warn!("unable to save records to '{}': {e}", crate::records::RECORDS_PATH);
    }
    if victory {
        sound_events.send(PlaySoundEvent(SoundEffect::Victory));
        next_app_state.set(AppState::Victory);
    } else {
        sound_events.send(PlaySoundEvent(SoundEffect::Defeat));
        next_app_state.set(AppState::GameOver);
    }
}

fn setup_end_screen_ui(
    commands: &mut Commands,
    asset_server: &AssetServer,
    title: &str,
    title_color: Color,
    lines: Vec<String>,
) {
    let font = asset_server.load(FONT_PATH);
    commands
        .spawn((
            NodeBundle {
                style: Style {
                    width: Val::Percent(100.0),
                    height: Val::Percent(100.0),
                    flex_direction: FlexDirection::Column,
                    align_items: AlignItems::Center,
                    justify_content: JustifyContent::Center,
                    row_gap: Val::Px(14.0),
                    ..default()
                },
                background_color: Color::rgba(0.0, 0.0, 0.05, 0.85).into(),
                ..default()
            },
            EndScreenUI,
            Name::new("EndScreenUI"),
        ))
        .with_children(|parent| {
            parent.spawn(ui_text(font.clone(), title, 56.0, title_color));
            for line in lines {
                parent.spawn(ui_text(font.clone(), &line, 22.0, Color::rgb(0.85, 0.85, 0.9)));
            }
            parent.spawn(ui_text(font, "Press R to return", 20.0, Color::rgb(0.6, 0.6, 0.7)));
        });
}

fn setup_victory_ui(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    encounter: Res<EncounterState>,
) {
    setup_end_screen_ui(
        &mut commands,
        &asset_server,
        "THE KING YIELDS",
        Color::rgb(1.0, 0.85, 0.3),
        vec![
            "\"Grown-ups are certainly very, very odd,\" said the little prince.".to_string(),
            format!(
                "Time: {}s   Max combo: {}",
                encounter.elapsed_seconds as u32, encounter.max_combo
            ),
        ],
    );
}

fn setup_defeat_ui(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    encounter: Res<EncounterState>,
) {
    setup_end_screen_ui(
        &mut commands,
        &asset_server,
        "GAME OVER",
        Color::rgb(0.91, 0.3, 0.24),
        vec![
            "The King's words were too heavy to bear.".to_string(),
            format!("Survived {}s", encounter.elapsed_seconds as u32),
        ],
    );
}

fn end_screen_input_system(
    keyboard_input: Res<ButtonInput<KeyCode>>,
    mut next_app_state: ResMut<NextState<AppState>>,
) {
    if keyboard_input.just_pressed(KeyCode::KeyR) {
        next_app_state.set(AppState::MainMenu);
    }
}
