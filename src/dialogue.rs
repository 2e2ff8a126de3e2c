use bevy::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::{error::Error, fs};

use crate::phase::Phase;

pub const DIALOGUE_PATH: &str = "assets/data/king_dialogues.ron";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BubbleKind {
    Command,
    Rage,
    Plea,
}

impl BubbleKind {
    pub fn speed(self) -> f32 {
        match self {
            BubbleKind::Command => 200.0,
            BubbleKind::Rage => 300.0,
            BubbleKind::Plea => 150.0,
        }
    }

    pub fn tint(self) -> Color {
        match self {
            BubbleKind::Command => Color::rgb(1.0, 0.85, 0.3),
            BubbleKind::Rage => Color::rgb(1.0, 0.3, 0.2),
            BubbleKind::Plea => Color::rgb(0.6, 0.7, 0.9),
        }
    }

    pub fn text_scale(self) -> f32 {
        match self {
            BubbleKind::Command => 1.0,
            BubbleKind::Rage => 1.25,
            BubbleKind::Plea => 0.85,
        }
    }
}

/// Hint from the dialogue data about how a burst should approach the player.
/// Feeds trajectory-kind selection; it is a preference, not a guarantee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DirectionHint {
    Down,
    Up,
    Center,
    Multi,
    Random,
    Weak,
    Plea,
}

fn default_count() -> u32 {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialogueEntry {
    pub id: String,
    pub text: String,
    pub kind: BubbleKind,
    pub weight: u32,
    pub direction: DirectionHint,
    #[serde(default = "default_count")]
    pub count: u32,
}

/// One attack's worth of resolved dialogue: what the King says and how the
/// resulting bubbles fly.
#[derive(Debug, Clone)]
pub struct AttackPattern {
    pub text: String,
    pub kind: BubbleKind,
    pub direction: DirectionHint,
    pub speed: f32,
    pub count: u32,
}

type CharacterTable = HashMap<Phase, HashMap<BubbleKind, Vec<DialogueEntry>>>;

#[derive(Resource, Serialize, Deserialize, Debug, Clone)]
pub struct DialogueLibrary {
    pub tables: HashMap<String, CharacterTable>,
}

impl Default for DialogueLibrary {
    fn default() -> Self {
        Self::fallback()
    }
}

impl DialogueLibrary {
    pub fn read() -> Result<Self, Box<dyn Error>> {
        let content = fs::read_to_string(DIALOGUE_PATH)?;
        let library = ron::from_str(&content)?;
        Ok(library)
    }

    pub fn select(
        &self,
        character: &str,
        phase: Phase,
        kind: BubbleKind,
        rng: &mut impl Rng,
    ) -> Option<AttackPattern> {
        let entries = self.tables.get(character)?.get(&phase)?.get(&kind)?;
        let entry = select_weighted(entries, rng)?;
        Some(AttackPattern {
            text: entry.text.clone(),
            kind,
            direction: entry.direction,
            speed: kind.speed(),
            count: entry.count.max(1),
        })
    }

    /// Built-in table used when the RON asset is missing or malformed. Covers
    /// every (phase, kind) pair the encounter asks for, so a failed load only
    /// costs variety.
    pub fn fallback() -> Self {
        let mut king: CharacterTable = HashMap::new();

        king.insert(
            Phase::One,
            HashMap::from([(
                BubbleKind::Command,
                vec![
                    entry("sit_down", "Sit down!", BubbleKind::Command, 2, DirectionHint::Down, 1),
                    entry("rise", "Rise!", BubbleKind::Command, 2, DirectionHint::Up, 1),
                    entry("approach", "Approach!", BubbleKind::Command, 1, DirectionHint::Center, 1),
                ],
            )]),
        );

        king.insert(
            Phase::Two,
            HashMap::from([(
                BubbleKind::Rage,
                vec![
                    entry("obey", "OBEY ME!", BubbleKind::Rage, 2, DirectionHint::Down, 3),
                    entry("insolence", "INSOLENCE!", BubbleKind::Rage, 2, DirectionHint::Multi, 4),
                    entry("my_order", "IT IS AN ORDER!", BubbleKind::Rage, 1, DirectionHint::Random, 5),
                ],
            )]),
        );

        king.insert(
            Phase::Three,
            HashMap::from([(
                BubbleKind::Plea,
                vec![
                    entry("stay", "Do not leave me...", BubbleKind::Plea, 2, DirectionHint::Weak, 1),
                    entry("beg", "I beg you...", BubbleKind::Plea, 2, DirectionHint::Plea, 1),
                    entry("alone", "I am so alone...", BubbleKind::Plea, 1, DirectionHint::Weak, 1),
                ],
            )]),
        );

        Self {
            tables: HashMap::from([("king".to_string(), king)]),
        }
    }
}

fn entry(
    id: &str,
    text: &str,
    kind: BubbleKind,
    weight: u32,
    direction: DirectionHint,
    count: u32,
) -> DialogueEntry {
    DialogueEntry {
        id: id.to_string(),
        text: text.to_string(),
        kind,
        weight,
        direction,
        count,
    }
}

/// Weighted pick: one uniform draw over the weight total, then walk the list.
/// Zero weights count as one so a sloppy data file cannot starve an entry.
pub fn select_weighted<'a>(
    entries: &'a [DialogueEntry],
    rng: &mut impl Rng,
) -> Option<&'a DialogueEntry> {
    if entries.is_empty() {
        return None;
    }
    let total: u32 = entries.iter().map(|e| e.weight.max(1)).sum();
    let mut roll = rng.gen_range(0..total) as i64;
    for entry in entries {
        roll -= entry.weight.max(1) as i64;
        if roll < 0 {
            return Some(entry);
        }
    }
    entries.first()
}

pub struct DialoguePlugin;

impl Plugin for DialoguePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DialogueLibrary>()
            .add_systems(Startup, load_dialogue_library);
    }
}

fn load_dialogue_library(mut commands: Commands) {
    let library = match DialogueLibrary::read() {
        Ok(library) => {
            info!("loaded dialogue table from '{DIALOGUE_PATH}'");
            library
        }
        Err(e) => {
            warn!("dialogue table unavailable ('{DIALOGUE_PATH}': {e}), using built-in lines");
            DialogueLibrary::fallback()
        }
    };
    commands.insert_resource(library);
}
