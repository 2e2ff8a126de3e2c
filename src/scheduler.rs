use bevy::prelude::*;
use rand::Rng;
use std::time::Duration;

use crate::audio::{PlaySoundEvent, SoundEffect};
use crate::dialogue::{AttackPattern, DialogueLibrary};
use crate::game::{AppState, EncounterState, GameStatus};
use crate::king::{King, KingFlash};
use crate::phase::Phase;
use crate::player::Prince;
use crate::speech_bubble::{spawn_speech_bubble, SPAWN_STAGGER_SECONDS};
use crate::trajectory::{extend_target, select_kind, Trajectory, TrajectoryKind};

/// Spawn point offset above the King's head.
const MOUTH_OFFSET: Vec2 = Vec2::new(0.0, 50.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Waiting,
    Firing,
}

/// One burst in progress: every bubble shares the pattern, the trajectory
/// kind, and the aim point captured when the burst began.
struct AttackBurst {
    pattern: AttackPattern,
    kind: TrajectoryKind,
    aim: Vec2,
    remaining: u32,
}

#[derive(Resource)]
pub struct AttackScheduler {
    state: SchedulerState,
    wait_timer: Timer,
    stagger_timer: Timer,
    burst: Option<AttackBurst>,
}

impl Default for AttackScheduler {
    fn default() -> Self {
        Self {
            state: SchedulerState::Idle,
            wait_timer: Timer::from_seconds(1.0, TimerMode::Once),
            stagger_timer: Timer::from_seconds(SPAWN_STAGGER_SECONDS, TimerMode::Repeating),
            burst: None,
        }
    }
}

impl AttackScheduler {
    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Re-roll the delay from the phase's range as it stands right now. A
    /// phase change mid-wait does not shorten the pending delay.
    pub fn schedule(&mut self, phase: Phase, rng: &mut impl Rng) {
        let (min_ms, max_ms) = phase.cooldown_range_ms();
        let delay = Duration::from_millis(rng.gen_range(min_ms..=max_ms));
        self.wait_timer = Timer::new(delay, TimerMode::Once);
        self.state = SchedulerState::Waiting;
        self.burst = None;
    }

    /// Drop everything pending so nothing fires into a torn-down encounter.
    pub fn cancel(&mut self) {
        self.state = SchedulerState::Idle;
        self.burst = None;
    }
}

pub struct SchedulerPlugin;

impl Plugin for SchedulerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AttackScheduler>()
            .add_systems(OnEnter(AppState::InGame), start_scheduler)
            .add_systems(
                Update,
                attack_schedule_system.run_if(in_state(AppState::InGame)),
            )
            .add_systems(OnExit(AppState::InGame), stop_scheduler);
    }
}

fn start_scheduler(mut scheduler: ResMut<AttackScheduler>, encounter: Res<EncounterState>) {
    let mut rng = rand::thread_rng();
    scheduler.schedule(encounter.phase, &mut rng);
}

fn stop_scheduler(mut scheduler: ResMut<AttackScheduler>) {
    scheduler.cancel();
}

#[allow(clippy::too_many_arguments)]
fn attack_schedule_system(
    mut commands: Commands,
    time: Res<Time>,
    asset_server: Res<AssetServer>,
    mut scheduler: ResMut<AttackScheduler>,
    encounter: Res<EncounterState>,
    dialogue: Res<DialogueLibrary>,
    player_query: Query<&Transform, With<Prince>>,
    king_query: Query<&Transform, (With<King>, Without<Prince>)>,
    mut sound_events: EventWriter<PlaySoundEvent>,
    mut flash_events: EventWriter<KingFlash>,
) {
    if encounter.status != GameStatus::Playing {
        return;
    }
    let mut rng = rand::thread_rng();

    match scheduler.state {
        SchedulerState::Idle => {}
        SchedulerState::Waiting => {
            scheduler.wait_timer.tick(time.delta());
            if !scheduler.wait_timer.just_finished() {
                return;
            }
            let phase = encounter.phase;
            let Some(pattern) = dialogue.select("king", phase, phase.dialogue_kind(), &mut rng)
            else {
                // No line for this lookup: skip the cycle, try again later.
                warn!("no dialogue entry for {:?}, skipping attack cycle", phase);
                scheduler.schedule(phase, &mut rng);
                return;
            };
            let (Ok(player_tf), Ok(king_tf)) =
                (player_query.get_single(), king_query.get_single())
            else {
                scheduler.schedule(phase, &mut rng);
                return;
            };

            let kind = select_kind(pattern.direction, phase, &mut rng);
            let aim = player_tf.translation.truncate();
            info!("king attacks: \"{}\" x{} ({:?})", pattern.text, pattern.count, kind);

            let mut burst = AttackBurst {
                pattern,
                kind,
                aim,
                remaining: 0,
            };
            burst.remaining = burst.pattern.count;

            fire_one(
                &mut commands,
                &asset_server,
                &mut burst,
                king_tf.translation.truncate(),
                &mut rng,
            );
            sound_events.send(PlaySoundEvent(SoundEffect::KingSpeaks));
            flash_events.send(KingFlash);

            if burst.remaining == 0 {
                scheduler.schedule(encounter.phase, &mut rng);
            } else {
                scheduler.burst = Some(burst);
                scheduler.stagger_timer =
                    Timer::from_seconds(SPAWN_STAGGER_SECONDS, TimerMode::Repeating);
                scheduler.state = SchedulerState::Firing;
            }
        }
        SchedulerState::Firing => {
            scheduler.stagger_timer.tick(time.delta());
            if !scheduler.stagger_timer.just_finished() {
                return;
            }
            let Ok(king_tf) = king_query.get_single() else {
                scheduler.schedule(encounter.phase, &mut rng);
                return;
            };
            let king_pos = king_tf.translation.truncate();
            let finished = match scheduler.burst.as_mut() {
                Some(burst) if burst.remaining > 0 => {
                    fire_one(&mut commands, &asset_server, burst, king_pos, &mut rng);
                    burst.remaining == 0
                }
                _ => true,
            };
            if finished {
                // Delay re-rolled from the phase as read at burst end.
                scheduler.schedule(encounter.phase, &mut rng);
            }
        }
    }
}

/// Spawn a single bubble of the burst from the King's fresh position, aimed
/// through the captured aim point and 400 units past it.
fn fire_one(
    commands: &mut Commands,
    asset_server: &AssetServer,
    burst: &mut AttackBurst,
    king_pos: Vec2,
    rng: &mut impl Rng,
) {
    let start = king_pos + MOUTH_OFFSET;
    let target = extend_target(start, burst.aim);
    let trajectory = Trajectory::new(burst.kind, start, target, burst.pattern.speed, rng);
    spawn_speech_bubble(commands, asset_server, &burst.pattern, trajectory);
    burst.remaining = burst.remaining.saturating_sub(1);
}
