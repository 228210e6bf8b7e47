//! Convenience re-exports for frequently used types & plugins.
pub use crate::error::{GameError, GameResult};
pub use crate::plugins::core_sim::{SimState, AutoConfig, CoreSimPlugin, SimSet, FIXED_HZ};
pub use crate::plugins::tuning::{GameTuning, SpawnConfig, SpawnBounds, TuningPlugin};
pub use crate::plugins::events::{
    EventsPlugin, ShotFiredEvent, TargetDestroyedEvent, ScoreChangedEvent,
    LevelClearedEvent, LevelStartedEvent, SessionRestartEvent,
};
pub use crate::plugins::targets::{Target, TargetId, TargetSet, Shot, generate_targets, resolve_shot};
pub use crate::plugins::game_state::{
    GameStatePlugin, Score, Level, LevelPhase, LevelProgress, ShotQueue, apply_hits, check_level_complete,
};
pub use crate::plugins::shooting::{ShootingPlugin, AimPoint, queue_shot};
pub use crate::plugins::autoplay::AutoplayPlugin;
pub use crate::plugins::camera::{CameraPlugin, GameCamera};
pub use crate::plugins::scene::ScenePlugin;
pub use crate::plugins::turret::TurretPlugin;
pub use crate::plugins::bugs::{BugsPlugin, BugVisual};
pub use crate::plugins::laser::LaserPlugin;
pub use crate::plugins::particles::ParticlePlugin;
pub use crate::plugins::game_audio::GameAudioPlugin;
pub use crate::plugins::hud::{HudPlugin, Hud, LevelLabel, ClearedBanner};
pub use crate::plugins::background::BackgroundPlugin;
