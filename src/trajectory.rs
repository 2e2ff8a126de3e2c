use bevy::prelude::*;
use rand::seq::SliceRandom;
use rand::Rng;
use std::f32::consts::PI;

use crate::dialogue::DirectionHint;
use crate::phase::Phase;

/// How far past the player's captured position the aim point is extended, so
/// a missed bubble keeps flying and leaves the screen instead of parking.
pub const TARGET_OVERSHOOT: f32 = 400.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrajectoryKind {
    Linear,
    Bezier,
    Arc,
    Zigzag,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrajectoryParams {
    Linear,
    Bezier { control: Vec2 },
    Arc { peak_height: f32 },
    Zigzag { amplitude: f32, frequency: f32 },
}

#[derive(Debug, Clone, Copy)]
pub struct Trajectory {
    pub start: Vec2,
    pub target: Vec2,
    pub duration: f32,
    pub params: TrajectoryParams,
}

impl Trajectory {
    pub fn new(
        kind: TrajectoryKind,
        start: Vec2,
        target: Vec2,
        speed: f32,
        rng: &mut impl Rng,
    ) -> Self {
        let duration = (start.distance(target) / speed.max(f32::EPSILON)).max(f32::EPSILON);
        let params = match kind {
            TrajectoryKind::Linear => TrajectoryParams::Linear,
            TrajectoryKind::Bezier => {
                let midpoint = (start + target) * 0.5;
                TrajectoryParams::Bezier {
                    control: midpoint
                        + Vec2::new(rng.gen_range(-100.0..=100.0), rng.gen_range(-80.0..=80.0)),
                }
            }
            TrajectoryKind::Arc => TrajectoryParams::Arc {
                peak_height: rng.gen_range(30.0..=60.0),
            },
            // Integer frequency keeps the sine term zero at both endpoints.
            TrajectoryKind::Zigzag => TrajectoryParams::Zigzag {
                amplitude: rng.gen_range(30.0..=60.0),
                frequency: rng.gen_range(3..=6) as f32,
            },
        };
        Self {
            start,
            target,
            duration,
            params,
        }
    }

    pub fn position_at(&self, elapsed: f32) -> Vec2 {
        let t = (elapsed / self.duration).clamp(0.0, 1.0);
        match self.params {
            TrajectoryParams::Linear => self.start.lerp(self.target, t),
            TrajectoryParams::Bezier { control } => {
                let u = 1.0 - t;
                self.start * (u * u) + control * (2.0 * u * t) + self.target * (t * t)
            }
            TrajectoryParams::Arc { peak_height } => {
                let mut pos = self.start.lerp(self.target, t);
                pos.y += peak_height * (t * PI).sin();
                pos
            }
            TrajectoryParams::Zigzag {
                amplitude,
                frequency,
            } => {
                let mut pos = self.start.lerp(self.target, t);
                pos.y += amplitude * (t * PI * frequency).sin();
                pos
            }
        }
    }

    pub fn finished(&self, elapsed: f32) -> bool {
        elapsed >= self.duration
    }
}

/// Extend the aim point 400 units past the player along the flight line.
pub fn extend_target(start: Vec2, player_pos: Vec2) -> Vec2 {
    let dir = (player_pos - start).normalize_or_zero();
    if dir == Vec2::ZERO {
        return player_pos + Vec2::new(-TARGET_OVERSHOOT, 0.0);
    }
    player_pos + dir * TARGET_OVERSHOOT
}

pub fn allowed_for_phase(phase: Phase) -> &'static [TrajectoryKind] {
    use TrajectoryKind::*;
    match phase {
        Phase::One => &[Linear, Bezier, Arc],
        Phase::Two => &[Bezier, Zigzag, Arc, Linear],
        Phase::Three => &[Linear, Bezier],
    }
}

pub fn direction_preferences(direction: DirectionHint) -> &'static [TrajectoryKind] {
    use TrajectoryKind::*;
    match direction {
        DirectionHint::Down => &[Arc, Bezier],
        DirectionHint::Up => &[Arc, Linear],
        DirectionHint::Center => &[Linear, Bezier],
        DirectionHint::Multi => &[Bezier, Zigzag, Arc],
        DirectionHint::Random => &[Linear, Bezier, Arc, Zigzag],
        DirectionHint::Weak => &[Linear],
        DirectionHint::Plea => &[Linear, Bezier],
    }
}

/// One kind per attack group: the phase allow-list intersected with the
/// direction preference, falling back to the first allowed kind.
pub fn select_kind(direction: DirectionHint, phase: Phase, rng: &mut impl Rng) -> TrajectoryKind {
    let allowed = allowed_for_phase(phase);
    let candidates: Vec<TrajectoryKind> = direction_preferences(direction)
        .iter()
        .copied()
        .filter(|kind| allowed.contains(kind))
        .collect();
    if let Some(kind) = candidates.choose(rng) {
        return *kind;
    }
    allowed.first().copied().unwrap_or(TrajectoryKind::Linear)
}
