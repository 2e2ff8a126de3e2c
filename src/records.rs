use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::{error::Error, fs};

pub const SETTINGS_PATH: &str = "assets/settings.ron";
pub const RECORDS_PATH: &str = "assets/records.ron";

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ControlBindings {
    pub left: String,
    pub right: String,
    pub jump: String,
    pub dodge: String,
    pub parry: String,
}

impl Default for ControlBindings {
    fn default() -> Self {
        Self {
            left: "left".into(),
            right: "right".into(),
            jump: "space".into(),
            dodge: "z".into(),
            parry: "x".into(),
        }
    }
}

fn key_code(name: &str) -> Option<KeyCode> {
    match name.to_ascii_lowercase().as_str() {
        "left" => Some(KeyCode::ArrowLeft),
        "right" => Some(KeyCode::ArrowRight),
        "up" => Some(KeyCode::ArrowUp),
        "down" => Some(KeyCode::ArrowDown),
        "space" => Some(KeyCode::Space),
        "shift" => Some(KeyCode::ShiftLeft),
        "a" => Some(KeyCode::KeyA),
        "c" => Some(KeyCode::KeyC),
        "d" => Some(KeyCode::KeyD),
        "s" => Some(KeyCode::KeyS),
        "w" => Some(KeyCode::KeyW),
        "x" => Some(KeyCode::KeyX),
        "z" => Some(KeyCode::KeyZ),
        _ => None,
    }
}

impl ControlBindings {
    pub fn left_key(&self) -> KeyCode {
        key_code(&self.left).unwrap_or(KeyCode::ArrowLeft)
    }
    pub fn right_key(&self) -> KeyCode {
        key_code(&self.right).unwrap_or(KeyCode::ArrowRight)
    }
    pub fn jump_key(&self) -> KeyCode {
        key_code(&self.jump).unwrap_or(KeyCode::Space)
    }
    pub fn dodge_key(&self) -> KeyCode {
        key_code(&self.dodge).unwrap_or(KeyCode::KeyZ)
    }
    pub fn parry_key(&self) -> KeyCode {
        key_code(&self.parry).unwrap_or(KeyCode::KeyX)
    }
}

#[derive(Resource, Serialize, Deserialize, Debug, Clone)]
pub struct Settings {
    pub bgm_volume: u32,
    pub sfx_volume: u32,
    pub fullscreen: bool,
    pub controls: ControlBindings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bgm_volume: 70,
            sfx_volume: 80,
            fullscreen: false,
            controls: ControlBindings::default(),
        }
    }
}

impl Settings {
    pub fn read() -> Result<Self, Box<dyn Error>> {
        let content = fs::read_to_string(SETTINGS_PATH)?;
        let settings = ron::from_str(&content)?;
        Ok(settings)
    }

    pub fn save(&self) -> Result<(), Box<dyn Error>> {
        let content = ron::ser::to_string_pretty(self, Default::default())?;
        fs::write(SETTINGS_PATH, content)?;
        Ok(())
    }

    pub fn sfx_level(&self) -> f32 {
        self.sfx_volume.min(100) as f32 / 100.0
    }

    pub fn bgm_level(&self) -> f32 {
        self.bgm_volume.min(100) as f32 / 100.0
    }

    /// Nudge the music volume, clamped to 0..=100.
    pub fn adjust_bgm(&mut self, delta: i32) {
        self.bgm_volume = (self.bgm_volume as i32 + delta).clamp(0, 100) as u32;
    }
}

#[derive(Resource, Serialize, Deserialize, Debug, Clone, Default)]
pub struct Records {
    pub best_time: Option<u32>,
    pub max_combo: u32,
    pub total_plays: u32,
    pub victories: u32,
    pub total_play_time: u32,
    pub average_play_time: u32,
}

impl Records {
    pub fn read() -> Result<Self, Box<dyn Error>> {
        let content = fs::read_to_string(RECORDS_PATH)?;
        let records = ron::from_str(&content)?;
        Ok(records)
    }

    pub fn save(&self) -> Result<(), Box<dyn Error>> {
        let content = ron::ser::to_string_pretty(self, Default::default())?;
        fs::write(RECORDS_PATH, content)?;
        Ok(())
    }

    pub fn record_completion(&mut self, victory: bool, play_time_secs: u32, max_combo: u32) {
        self.total_plays += 1;
        self.total_play_time += play_time_secs;
        self.average_play_time = self.total_play_time / self.total_plays;
        if victory {
            self.victories += 1;
            if self.best_time.map_or(true, |best| play_time_secs < best) {
                self.best_time = Some(play_time_secs);
            }
        }
        if max_combo > self.max_combo {
            self.max_combo = max_combo;
        }
    }

    pub fn win_rate_percent(&self) -> u32 {
        if self.total_plays == 0 {
            return 0;
        }
        self.victories * 100 / self.total_plays
    }
}

pub struct RecordsPlugin;

impl Plugin for RecordsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Settings>()
            .init_resource::<Records>()
            .add_systems(Startup, load_persisted_state);
    }
}

fn load_persisted_state(mut commands: Commands) {
    let settings = match Settings::read() {
        Ok(settings) => {
            info!("loaded settings from '{SETTINGS_PATH}'");
            settings
        }
        Err(e) => {
            warn!("unable to load settings from '{SETTINGS_PATH}', using defaults: {e}");
            Settings::default()
        }
    };
    commands.insert_resource(settings);

    let records = match Records::read() {
        Ok(records) => {
            info!("loaded records from '{RECORDS_PATH}'");
            records
        }
        Err(e) => {
            warn!("unable to load records from '{RECORDS_PATH}', starting fresh: {e}");
            Records::default()
        }
    };
    commands.insert_resource(records);
}
