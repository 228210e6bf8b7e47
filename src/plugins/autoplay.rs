use bevy::prelude::*;

use crate::plugins::core_sim::{AutoConfig, SimSet, SimState, FIXED_HZ};
use crate::plugins::events::ShotFiredEvent;
use crate::plugins::game_state::{process_shots, LevelProgress, Score, ShotQueue};
use crate::plugins::shooting::queue_shot;
use crate::plugins::targets::TargetSet;
use crate::plugins::turret::muzzle_position;

#[derive(Resource, Default)]
pub struct AutoRuntime { pub next_fire_tick: u64 }
#[derive(Resource, Default)]
pub struct LogState { pub last_logged_second: u64 }

/// Scripted player for unattended runs: fires at the lowest-id live bug on a fixed interval.
pub struct AutoplayPlugin;
impl Plugin for AutoplayPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AutoRuntime>()
            .init_resource::<LogState>()
            .add_systems(
                FixedUpdate,
                (scripted_autoplay.before(process_shots), debug_log_each_second).in_set(SimSet::Rules),
            );
    }
}

fn scripted_autoplay(
    sim: Res<SimState>,
    cfg: Res<AutoConfig>,
    mut runtime: ResMut<AutoRuntime>,
    set: Res<TargetSet>,
    mut queue: ResMut<ShotQueue>,
    mut ev_shot: EventWriter<ShotFiredEvent>,
) {
    if !cfg.autoplay || sim.tick < runtime.next_fire_tick { return; }
    let interval_ticks = ((cfg.fire_interval_seconds * FIXED_HZ as f32) as u64).max(1);
    runtime.next_fire_tick = sim.tick + interval_ticks;
    let Some(target) = set.live().min_by_key(|t| t.id) else { return; };
    if queue_shot(muzzle_position(), target.position, sim.elapsed_seconds, &mut queue, &mut ev_shot) {
        debug!("AUTOPLAY fire t={:.2}s target={} at=({:.2},{:.2},{:.2})",
            sim.elapsed_seconds, target.id.0,
            target.position.x, target.position.y, target.position.z);
    }
}

fn debug_log_each_second(
    sim: Res<SimState>,
    cfg: Res<AutoConfig>,
    mut log_state: ResMut<LogState>,
    score: Res<Score>,
    progress: Res<LevelProgress>,
    set: Res<TargetSet>,
) {
    if !cfg.autoplay || sim.tick == 0 || sim.tick % FIXED_HZ != 0 { return; }
    let current_second = sim.tick / FIXED_HZ;
    if current_second == log_state.last_logged_second { return; }
    log_state.last_logged_second = current_second;
    info!("AUTOPLAY T+{}s level={} score={} live={} shots={} hits={}",
        current_second, progress.level.number(), score.value,
        set.active_count(), score.shots, score.hits);
}
