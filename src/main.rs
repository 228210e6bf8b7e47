use bevy::prelude::*;
#[cfg(not(target_arch = "wasm32"))]
use bevy::diagnostic::{FrameTimeDiagnosticsPlugin, LogDiagnosticsPlugin};

use bug_blaster::prelude::*;

fn main() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    let auto = AutoConfig::from_args(std::env::args());
    let mut app = App::new();
    app.insert_resource(Msaa::Sample4)
        .insert_resource(auto);

    // Web build serves assets from the binary.
    #[cfg(target_arch = "wasm32")]
    app.add_plugins(bevy_embedded_assets::EmbeddedAssetPlugin {
        mode: bevy_embedded_assets::PluginMode::ReplaceDefault,
    });

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Bug Blaster".into(),
                fit_canvas_to_parent: true,
                ..default()
            }),
            ..default()
        }))
        .add_plugins(TuningPlugin)       // RON tuning (must precede gameplay)
        .add_plugins(EventsPlugin)       // typed gameplay events
        .add_plugins(CoreSimPlugin)      // fixed 60 Hz tick + run control
        .add_plugins(GameStatePlugin)    // targets, hits, score, level progression
        .add_plugins(ShootingPlugin)     // pointer aim + fire input
        .add_plugins(AutoplayPlugin)     // scripted player (--autoplay)
        .add_plugins(CameraPlugin)
        .add_plugins(ScenePlugin)        // lights + ground
        .add_plugins(BackgroundPlugin)   // code rain
        .add_plugins(TurretPlugin)
        .add_plugins(BugsPlugin)         // bug visuals mirror the target set
        .add_plugins(LaserPlugin)
        .add_plugins(ParticlePlugin)     // explosions & sparks
        .add_plugins(GameAudioPlugin)
        .add_plugins(HudPlugin);

    #[cfg(not(target_arch = "wasm32"))]
    app.add_plugins(FrameTimeDiagnosticsPlugin)
        .add_plugins(LogDiagnosticsPlugin::default());

    app.run();
}
