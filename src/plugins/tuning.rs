// Gameplay tuning loaded from RON (spawn bounds, hit radius, timings, audio toggles).
use bevy::prelude::*;
use serde::Deserialize;
#[cfg(not(target_arch = "wasm32"))]
use std::fs;

use crate::error::{GameError, GameResult};
use crate::plugins::core_sim::FIXED_HZ;

#[cfg(not(target_arch = "wasm32"))]
const TUNING_PATH: &str = "assets/config/tuning.ron";

/// Upper bounds on spawn counts; anything larger is a typo, not a difficulty curve.
pub const MAX_BASE_COUNT: u32 = 100;
pub const MAX_PER_LEVEL: u32 = 50;

/// Inclusive world-space box bugs spawn in. An axis with `min == max` is a fixed coordinate.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct SpawnBounds {
    pub x: (f32, f32),
    pub y: (f32, f32),
    pub z: (f32, f32),
}
impl SpawnBounds {
    pub fn contains(&self, p: Vec3) -> bool {
        let inside = |v: f32, (lo, hi): (f32, f32)| v >= lo && v <= hi;
        inside(p.x, self.x) && inside(p.y, self.y) && inside(p.z, self.z)
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct SpawnConfig {
    pub base_count: u32,
    pub per_level: u32,
    pub bounds: SpawnBounds,
}
impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            base_count: 5,
            per_level: 2,
            bounds: SpawnBounds { x: (-4.0, 4.0), y: (0.5, 2.5), z: (0.0, 0.0) },
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct AudioConfig {
    pub music: bool,
    pub sfx: bool,
    pub music_volume: f32,
}
impl Default for AudioConfig {
    fn default() -> Self {
        Self { music: true, sfx: true, music_volume: 0.4 }
    }
}

#[derive(Resource, Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct GameTuning {
    pub spawn: SpawnConfig,
    pub hit_radius: f32,
    pub points_per_hit: u64,
    pub level_advance_delay_seconds: f32,
    pub explosion_seconds: f32,
    pub aim_plane_z: f32,
    pub laser_flash_seconds: f32,
    pub audio: AudioConfig,
}

impl Default for GameTuning {
    fn default() -> Self {
        Self {
            spawn: SpawnConfig::default(),
            hit_radius: 0.7,
            points_per_hit: 100,
            level_advance_delay_seconds: 2.0,
            explosion_seconds: 1.0,
            aim_plane_z: 0.0,
            laser_flash_seconds: 0.2,
            audio: AudioConfig::default(),
        }
    }
}

impl GameTuning {
    pub fn from_ron(data: &str) -> GameResult<Self> {
        let tuning: GameTuning = ron::from_str(data)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn validate(&self) -> GameResult<()> {
        if !(self.hit_radius.is_finite() && self.hit_radius > 0.0) {
            return Err(GameError::InvalidTuning(format!("hit_radius must be > 0, got {}", self.hit_radius)));
        }
        // Per-level growth keeps every level strictly harder than the previous one.
        if self.spawn.per_level == 0 {
            return Err(GameError::InvalidTuning("spawn.per_level must be >= 1".into()));
        }
        if self.spawn.base_count > MAX_BASE_COUNT || self.spawn.per_level > MAX_PER_LEVEL {
            return Err(GameError::InvalidTuning(format!(
                "spawn counts too large: base_count={} (max {MAX_BASE_COUNT}), per_level={} (max {MAX_PER_LEVEL})",
                self.spawn.base_count, self.spawn.per_level,
            )));
        }
        // A cleared level must leave score > 0 or it never advances.
        if self.points_per_hit == 0 {
            return Err(GameError::InvalidTuning("points_per_hit must be >= 1".into()));
        }
        let b = self.spawn.bounds;
        for (axis, (lo, hi)) in [("x", b.x), ("y", b.y), ("z", b.z)] {
            if !(lo.is_finite() && hi.is_finite()) || lo > hi {
                return Err(GameError::InvalidTuning(format!("spawn.bounds.{axis} invalid: ({lo}, {hi})")));
            }
        }
        for (name, secs) in [
            ("level_advance_delay_seconds", self.level_advance_delay_seconds),
            ("explosion_seconds", self.explosion_seconds),
            ("laser_flash_seconds", self.laser_flash_seconds),
        ] {
            if !(secs.is_finite() && secs >= 0.0) {
                return Err(GameError::InvalidTuning(format!("{name} must be >= 0, got {secs}")));
            }
        }
        Ok(())
    }

    pub fn level_advance_delay_ticks(&self) -> u64 {
        seconds_to_ticks(self.level_advance_delay_seconds)
    }

    pub fn explosion_ticks(&self) -> u64 {
        seconds_to_ticks(self.explosion_seconds)
    }
}

pub fn seconds_to_ticks(seconds: f32) -> u64 {
    (seconds * FIXED_HZ as f32).round().max(0.0) as u64
}

#[cfg(target_arch = "wasm32")]
pub fn load_tuning() -> GameResult<GameTuning> {
    // No filesystem in the browser: embed at compile time.
    GameTuning::from_ron(include_str!("../../assets/config/tuning.ron"))
}

#[cfg(not(target_arch = "wasm32"))]
pub fn load_tuning() -> GameResult<GameTuning> {
    let data = fs::read_to_string(TUNING_PATH).map_err(|source| GameError::ConfigRead {
        path: TUNING_PATH.into(),
        source,
    })?;
    GameTuning::from_ron(&data)
}

pub struct TuningPlugin;
impl Plugin for TuningPlugin {
    fn build(&self, app: &mut App) {
        // Respect a pre-inserted GameTuning (tests, tooling).
        if app.world().contains_resource::<GameTuning>() {
            return;
        }
        let tuning = match load_tuning() {
            Ok(t) => {
                info!("TUNING loaded hit_radius={} base_count={} per_level={}", t.hit_radius, t.spawn.base_count, t.spawn.per_level);
                t
            }
            Err(e) => {
                error!("TUNING falling back to defaults: {e}");
                GameTuning::default()
            }
        };
        app.insert_resource(tuning);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shipped_tuning_parses() {
        let t = GameTuning::from_ron(include_str!("../../assets/config/tuning.ron")).unwrap();
        assert_eq!(t.spawn.base_count, 5);
        assert_eq!(t.spawn.per_level, 2);
        assert!(t.hit_radius > 0.0);
    }

    #[test]
    fn rejects_non_positive_radius() {
        let mut t = GameTuning::default();
        t.hit_radius = 0.0;
        assert!(matches!(t.validate(), Err(GameError::InvalidTuning(_))));
        t.hit_radius = f32::NAN;
        assert!(t.validate().is_err());
    }

    #[test]
    fn rejects_inverted_bounds() {
        let mut t = GameTuning::default();
        t.spawn.bounds.y = (2.0, 1.0);
        assert!(t.validate().is_err());
    }

    #[test]
    fn rejects_flat_difficulty() {
        let mut t = GameTuning::default();
        t.spawn.per_level = 0;
        assert!(t.validate().is_err());
    }

    #[test]
    fn rejects_zero_points() {
        let mut t = GameTuning::default();
        t.points_per_hit = 0;
        assert!(matches!(t.validate(), Err(GameError::InvalidTuning(_))));
    }

    #[test]
    fn rejects_runaway_spawn_counts() {
        let mut t = GameTuning::default();
        t.spawn.per_level = 4_000_000_000;
        assert!(matches!(t.validate(), Err(GameError::InvalidTuning(_))));
        t.spawn.per_level = MAX_PER_LEVEL;
        assert!(t.validate().is_ok());
        t.spawn.base_count = MAX_BASE_COUNT + 1;
        assert!(t.validate().is_err());
    }

    #[test]
    fn malformed_ron_is_parse_error() {
        assert!(matches!(GameTuning::from_ron("( spawn: "), Err(GameError::ConfigParse(_))));
    }

    #[test]
    fn delay_converts_to_fixed_ticks() {
        let t = GameTuning::default();
        assert_eq!(t.level_advance_delay_ticks(), 120);
        assert_eq!(t.explosion_ticks(), 60);
    }
}
