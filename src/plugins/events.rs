// Typed gameplay events. Rules emit these; visuals, audio and HUD subscribe.
use bevy::prelude::*;

use crate::plugins::targets::TargetId;

#[derive(Event, Debug, Clone, Copy)]
pub struct ShotFiredEvent {
    pub origin: Vec3,
    pub aim_point: Vec3,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct TargetDestroyedEvent {
    pub id: TargetId,
    pub position: Vec3,
    pub generation: u64,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct ScoreChangedEvent {
    pub score: u64,
    pub delta: u64,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct LevelClearedEvent {
    pub level: u32,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct LevelStartedEvent {
    pub level: u32,
    pub target_count: usize,
    pub generation: u64,
}

/// Full restart: score back to zero, level back to 1.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct SessionRestartEvent;

pub struct EventsPlugin;
impl Plugin for EventsPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<ShotFiredEvent>()
            .add_event::<TargetDestroyedEvent>()
            .add_event::<ScoreChangedEvent>()
            .add_event::<LevelClearedEvent>()
            .add_event::<LevelStartedEvent>()
            .add_event::<SessionRestartEvent>();
    }
}
