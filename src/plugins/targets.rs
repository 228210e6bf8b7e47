//! Target ("bug") set management and hit resolution.
//!
//! The set is stored as an `Arc<[Target]>` and every mutation swaps in a new
//! slice, so a snapshot taken by a reader stays consistent while shots are
//! being resolved against the live set.

use std::sync::Arc;

use bevy::prelude::*;
use rand::Rng;

use crate::error::{GameError, GameResult};
use crate::plugins::game_state::Level;
use crate::plugins::tuning::SpawnConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Target {
    pub id: TargetId,
    pub position: Vec3,
    pub destroyed: bool,
}

/// One fire action with its resolved aim point. Only constructible with finite coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shot {
    origin: Vec3,
    aim_point: Vec3,
    timestamp: f32,
}

impl Shot {
    pub fn new(origin: Vec3, aim_point: Vec3, timestamp: f32) -> GameResult<Self> {
        if !(origin.is_finite() && aim_point.is_finite()) {
            return Err(GameError::NonFiniteShot {
                origin: origin.to_array(),
                aim: aim_point.to_array(),
            });
        }
        Ok(Self { origin, aim_point, timestamp })
    }
    pub fn origin(&self) -> Vec3 { self.origin }
    pub fn aim_point(&self) -> Vec3 { self.aim_point }
    pub fn timestamp(&self) -> f32 { self.timestamp }
}

pub fn target_count(level: Level, cfg: &SpawnConfig) -> usize {
    cfg.base_count
        .saturating_add(level.number().saturating_mul(cfg.per_level)) as usize
}

fn sample_axis(rng: &mut impl Rng, (lo, hi): (f32, f32)) -> f32 {
    if lo >= hi {
        return lo;
    }
    rng.gen_range(lo..=hi).clamp(lo, hi)
}

/// Fresh batch for `level`: ids `0..n`, uniform positions inside the spawn bounds.
pub fn generate_targets(level: Level, cfg: &SpawnConfig, rng: &mut impl Rng) -> Vec<Target> {
    let n = target_count(level, cfg);
    (0..n)
        .map(|i| Target {
            id: TargetId(i as u32),
            position: Vec3::new(
                sample_axis(rng, cfg.bounds.x),
                sample_axis(rng, cfg.bounds.y),
                sample_axis(rng, cfg.bounds.z),
            ),
            destroyed: false,
        })
        .collect()
}

/// Ids of live targets strictly closer than `radius` to `aim`. No early exit.
pub fn find_hits(aim: Vec3, targets: &[Target], radius: f32) -> Vec<TargetId> {
    targets
        .iter()
        .filter(|t| !t.destroyed && t.position.distance(aim) < radius)
        .map(|t| t.id)
        .collect()
}

#[derive(Resource, Debug, Clone)]
pub struct TargetSet {
    targets: Arc<[Target]>,
    generation: u64,
    // (target, tick at which it leaves the set)
    pending_removal: Vec<(TargetId, u64)>,
}

impl Default for TargetSet {
    fn default() -> Self {
        Self { targets: Arc::from(Vec::new()), generation: 0, pending_removal: Vec::new() }
    }
}

impl TargetSet {
    /// Replace the whole set. Pending removals of the old set are dropped. Returns the new generation.
    pub fn regenerate(&mut self, targets: Vec<Target>) -> u64 {
        self.targets = Arc::from(targets);
        self.generation += 1;
        self.pending_removal.clear();
        self.generation
    }

    pub fn snapshot(&self) -> Arc<[Target]> {
        Arc::clone(&self.targets)
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn get(&self, id: TargetId) -> Option<&Target> {
        self.targets.iter().find(|t| t.id == id)
    }

    pub fn live(&self) -> impl Iterator<Item = &Target> {
        self.targets.iter().filter(|t| !t.destroyed)
    }

    /// Targets not yet destroyed.
    pub fn active_count(&self) -> usize {
        self.live().count()
    }

    pub fn pending_removals(&self) -> usize {
        self.pending_removal.len()
    }

    fn mark_destroyed(&mut self, ids: &[TargetId], remove_at_tick: u64) -> Vec<Target> {
        if ids.is_empty() {
            return Vec::new();
        }
        let mut hits = Vec::with_capacity(ids.len());
        let next: Vec<Target> = self
            .targets
            .iter()
            .map(|t| {
                if !t.destroyed && ids.contains(&t.id) {
                    let done = Target { destroyed: true, ..*t };
                    hits.push(done);
                    done
                } else {
                    *t
                }
            })
            .collect();
        self.targets = Arc::from(next);
        self.pending_removal.extend(hits.iter().map(|t| (t.id, remove_at_tick)));
        hits
    }

    /// Drop destroyed targets whose removal tick has passed. Returns their ids.
    pub fn prune_due(&mut self, now_tick: u64) -> Vec<TargetId> {
        let (due, keep): (Vec<_>, Vec<_>) =
            self.pending_removal.iter().copied().partition(|(_, at)| *at <= now_tick);
        if due.is_empty() {
            return Vec::new();
        }
        self.pending_removal = keep;
        let ids: Vec<TargetId> = due.into_iter().map(|(id, _)| id).collect();
        let next: Vec<Target> = self.targets.iter().filter(|t| !ids.contains(&t.id)).copied().collect();
        self.targets = Arc::from(next);
        ids
    }
}

/// Mark every live target within `radius` of the shot's aim point destroyed and return them.
/// Always resolved against the set as it is now, never a stale snapshot.
pub fn resolve_shot(shot: &Shot, set: &mut TargetSet, radius: f32, remove_at_tick: u64) -> Vec<Target> {
    let ids = find_hits(shot.aim_point(), set.targets(), radius);
    set.mark_destroyed(&ids, remove_at_tick)
}
