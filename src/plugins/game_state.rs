// Score, level progression state machine, and the fixed-step rule systems
// (shot resolution -> scoring -> level-complete check -> delayed advance).

use std::num::NonZeroU32;

use bevy::prelude::*;

use crate::plugins::core_sim::{SimSet, SimState};
use crate::plugins::events::{
    LevelClearedEvent, LevelStartedEvent, ScoreChangedEvent, SessionRestartEvent, TargetDestroyedEvent,
};
use crate::plugins::targets::{generate_targets, resolve_shot, Shot, TargetSet};
use crate::plugins::tuning::GameTuning;

/// Wave number, starting at 1. Zero is unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Level(NonZeroU32);

impl Level {
    pub const FIRST: Level = Level(NonZeroU32::MIN);

    pub fn new(number: u32) -> Option<Self> {
        NonZeroU32::new(number).map(Level)
    }
    pub fn number(self) -> u32 {
        self.0.get()
    }
    pub fn next(self) -> Self {
        Level(self.0.saturating_add(1))
    }
}

impl Default for Level {
    fn default() -> Self { Level::FIRST }
}

#[derive(Resource, Debug, Default, Clone, PartialEq, Eq)]
pub struct Score {
    pub value: u64,
    pub shots: u32,
    pub hits: u32,
}

/// `score + points_per_hit * level * hits`.
pub fn apply_hits(score: u64, hits: usize, level: Level, points_per_hit: u64) -> u64 {
    let gained = points_per_hit
        .saturating_mul(level.number() as u64)
        .saturating_mul(hits as u64);
    score.saturating_add(gained)
}

pub fn check_level_complete(active_targets: usize, score: u64) -> bool {
    active_targets == 0 && score > 0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LevelPhase {
    #[default]
    Active,
    Clearing { advance_at_tick: u64 },
}

#[derive(Resource, Debug, Default, Clone, PartialEq, Eq)]
pub struct LevelProgress {
    pub level: Level,
    pub phase: LevelPhase,
}

impl LevelProgress {
    /// Enter `Clearing` if the level is complete. Returns true only on the call that schedules;
    /// further calls while a transition is pending are no-ops.
    pub fn schedule_advance(&mut self, active_targets: usize, score: u64, now_tick: u64, delay_ticks: u64) -> bool {
        if self.phase != LevelPhase::Active || !check_level_complete(active_targets, score) {
            return false;
        }
        self.phase = LevelPhase::Clearing { advance_at_tick: now_tick + delay_ticks };
        true
    }

    pub fn is_clearing(&self) -> bool {
        matches!(self.phase, LevelPhase::Clearing { .. })
    }

    pub fn due(&self, now_tick: u64) -> bool {
        matches!(self.phase, LevelPhase::Clearing { advance_at_tick } if now_tick >= advance_at_tick)
    }

    /// Move to the next level from whatever the current level is now.
    pub fn advance(&mut self) -> Level {
        self.level = self.level.next();
        self.phase = LevelPhase::Active;
        self.level
    }
}

/// Shots waiting for the next fixed step. Input pushes, the rules drain.
#[derive(Resource, Debug, Default)]
pub struct ShotQueue {
    shots: Vec<Shot>,
}
impl ShotQueue {
    pub fn push(&mut self, shot: Shot) {
        self.shots.push(shot);
    }
    pub fn len(&self) -> usize {
        self.shots.len()
    }
    pub fn is_empty(&self) -> bool {
        self.shots.is_empty()
    }
    fn drain(&mut self) -> std::vec::Drain<'_, Shot> {
        self.shots.drain(..)
    }
    fn clear(&mut self) {
        self.shots.clear();
    }
}

pub struct GameStatePlugin;
impl Plugin for GameStatePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(Score::default())
            .insert_resource(LevelProgress::default())
            .insert_resource(TargetSet::default())
            .insert_resource(ShotQueue::default())
            .add_systems(Startup, start_session)
            .add_systems(Update, apply_restart)
            .add_systems(
                FixedUpdate,
                (process_shots, advance_level_when_due, prune_destroyed_targets)
                    .chain()
                    .in_set(SimSet::Rules),
            );
    }
}

fn start_level(level: Level, set: &mut TargetSet, tuning: &GameTuning, ev_started: &mut EventWriter<LevelStartedEvent>) {
    let targets = generate_targets(level, &tuning.spawn, &mut rand::thread_rng());
    let target_count = targets.len();
    let generation = set.regenerate(targets);
    info!("LEVEL start level={} targets={} generation={}", level.number(), target_count, generation);
    ev_started.send(LevelStartedEvent { level: level.number(), target_count, generation });
}

fn start_session(
    mut set: ResMut<TargetSet>,
    progress: Res<LevelProgress>,
    tuning: Res<GameTuning>,
    mut ev_started: EventWriter<LevelStartedEvent>,
) {
    start_level(progress.level, &mut set, &tuning, &mut ev_started);
}

pub fn process_shots(
    mut queue: ResMut<ShotQueue>,
    mut set: ResMut<TargetSet>,
    mut score: ResMut<Score>,
    mut progress: ResMut<LevelProgress>,
    sim: Res<SimState>,
    tuning: Res<GameTuning>,
    mut ev_destroyed: EventWriter<TargetDestroyedEvent>,
    mut ev_score: EventWriter<ScoreChangedEvent>,
    mut ev_cleared: EventWriter<LevelClearedEvent>,
) {
    if queue.is_empty() {
        return;
    }
    let remove_at = sim.tick + tuning.explosion_ticks();
    let delay = tuning.level_advance_delay_ticks();
    for shot in queue.drain() {
        score.shots += 1;
        let hits = resolve_shot(&shot, &mut set, tuning.hit_radius, remove_at);
        if hits.is_empty() {
            continue;
        }
        let generation = set.generation();
        for t in &hits {
            ev_destroyed.send(TargetDestroyedEvent { id: t.id, position: t.position, generation });
        }
        let before = score.value;
        score.value = apply_hits(score.value, hits.len(), progress.level, tuning.points_per_hit);
        score.hits += hits.len() as u32;
        ev_score.send(ScoreChangedEvent { score: score.value, delta: score.value - before });
        info!("SHOT hits={} score={} remaining={}", hits.len(), score.value, set.active_count());

        // Same step as the hit: clearing the last bug schedules the advance without waiting a frame.
        if progress.schedule_advance(set.active_count(), score.value, sim.tick, delay) {
            info!("LEVEL cleared level={} advance_in_ticks={}", progress.level.number(), delay);
            ev_cleared.send(LevelClearedEvent { level: progress.level.number() });
        }
    }
}

pub fn advance_level_when_due(
    sim: Res<SimState>,
    mut progress: ResMut<LevelProgress>,
    mut set: ResMut<TargetSet>,
    tuning: Res<GameTuning>,
    mut ev_started: EventWriter<LevelStartedEvent>,
) {
    if !progress.due(sim.tick) {
        return;
    }
    let level = progress.advance();
    start_level(level, &mut set, &tuning, &mut ev_started);
}

fn prune_destroyed_targets(sim: Res<SimState>, mut set: ResMut<TargetSet>) {
    let removed = set.prune_due(sim.tick);
    if !removed.is_empty() {
        debug!("TARGETS pruned={} left={}", removed.len(), set.targets().len());
    }
}

fn apply_restart(
    mut ev_restart: EventReader<SessionRestartEvent>,
    mut score: ResMut<Score>,
    mut progress: ResMut<LevelProgress>,
    mut set: ResMut<TargetSet>,
    mut queue: ResMut<ShotQueue>,
    tuning: Res<GameTuning>,
    mut ev_score: EventWriter<ScoreChangedEvent>,
    mut ev_started: EventWriter<LevelStartedEvent>,
) {
    if ev_restart.read().count() == 0 {
        return;
    }
    info!("SESSION restart previous_score={} previous_level={}", score.value, progress.level.number());
    *score = Score::default();
    *progress = LevelProgress::default();
    queue.clear();
    ev_score.send(ScoreChangedEvent { score: 0, delta: 0 });
    start_level(progress.level, &mut set, &tuning, &mut ev_started);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_zero_is_unrepresentable() {
        assert!(Level::new(0).is_none());
        assert_eq!(Level::new(3).map(Level::number), Some(3));
        assert_eq!(Level::FIRST.next().number(), 2);
    }

    #[test]
    fn hits_are_weighted_by_level() {
        assert_eq!(apply_hits(0, 2, Level::FIRST, 100), 200);
        assert_eq!(apply_hits(200, 1, Level::new(3).unwrap(), 100), 500);
        assert_eq!(apply_hits(700, 0, Level::FIRST, 100), 700);
    }

    #[test]
    fn level_complete_needs_points() {
        assert!(!check_level_complete(0, 0));
        assert!(check_level_complete(0, 100));
        assert!(!check_level_complete(1, 100));
    }

    #[test]
    fn scheduling_is_idempotent() {
        let mut p = LevelProgress::default();
        assert!(!p.schedule_advance(2, 100, 10, 120), "targets remain");
        assert!(p.schedule_advance(0, 100, 10, 120));
        assert_eq!(p.phase, LevelPhase::Clearing { advance_at_tick: 130 });
        assert!(!p.schedule_advance(0, 100, 50, 120), "already pending");
        assert_eq!(p.phase, LevelPhase::Clearing { advance_at_tick: 130 });
    }

    #[test]
    fn advance_after_deadline() {
        let mut p = LevelProgress::default();
        p.schedule_advance(0, 700, 0, 120);
        assert!(!p.due(119));
        assert!(p.due(120));
        assert_eq!(p.advance().number(), 2);
        assert_eq!(p.phase, LevelPhase::Active);
        assert!(!p.due(1000));
    }

    #[test]
    fn shot_queue_drains_in_order() {
        let mut q = ShotQueue::default();
        q.push(Shot::new(Vec3::ZERO, Vec3::X, 0.1).unwrap());
        q.push(Shot::new(Vec3::ZERO, Vec3::Y, 0.2).unwrap());
        let stamps: Vec<f32> = q.drain().map(|s| s.timestamp()).collect();
        assert_eq!(stamps, vec![0.1, 0.2]);
        assert!(q.is_empty());
    }
}
