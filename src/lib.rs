//! Library entry for the game binary & integration tests.
//! Exposes plugin modules and a prelude for common types.

pub mod plugins {
    pub mod core_sim;
    pub mod tuning;
    pub mod events;
    pub mod targets;
    pub mod game_state;
    pub mod shooting;
    pub mod autoplay;
    pub mod camera;
    pub mod scene;
    pub mod turret;
    pub mod bugs;
    pub mod laser;
    pub mod particles;
    pub mod game_audio;
    pub mod hud;
    pub mod background;
}
pub mod error;
pub mod prelude;
