use bug_blaster::prelude::*;
use bevy::prelude::*;

// Helper to build a minimal app (no assets/scene) for deterministic fixed tick tests.
fn build_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .add_plugins(CoreSimPlugin); // provides tick_state system in FixedUpdate
    app
}

#[test]
fn ticks_advance() {
    let mut app = build_app();
    // Directly run FixedUpdate schedule 5 times (bypasses time driver).
    for _ in 0..5 { app.world_mut().run_schedule(FixedUpdate); }
    let sim = app.world().get_resource::<SimState>().unwrap();
    assert_eq!(sim.tick, 5, "expected tick to be 5 after 5 fixed steps");
    assert!((sim.elapsed_seconds - (5.0/60.0)).abs() < 1e-6);
}

#[test]
fn auto_config_defaults_to_interactive() {
    let app = build_app();
    let cfg = app.world().get_resource::<AutoConfig>().unwrap();
    assert!(!cfg.autoplay);
    assert!(cfg.run_duration_seconds.is_none());
}

#[test]
fn pre_inserted_auto_config_is_kept() {
    let mut app = App::new();
    app.insert_resource(AutoConfig { autoplay: true, run_duration_seconds: Some(3.0), fire_interval_seconds: 0.25 })
        .add_plugins(MinimalPlugins)
        .add_plugins(CoreSimPlugin);
    let cfg = app.world().resource::<AutoConfig>();
    assert!(cfg.autoplay);
    assert_eq!(cfg.run_duration_seconds, Some(3.0));
}
