use bug_blaster::prelude::*;
use bevy::ecs::system::RunSystemOnce;
use bevy::prelude::*;

const ORIGIN: Vec3 = Vec3::new(0.0, 2.0, 0.0);

// Headless gameplay app: rules only, default tuning, no window or assets.
fn build_app() -> App {
    let mut app = App::new();
    app.insert_resource(GameTuning::default())
        .add_plugins(MinimalPlugins)
        .add_plugins(TuningPlugin)
        .add_plugins(EventsPlugin)
        .add_plugins(CoreSimPlugin)
        .add_plugins(GameStatePlugin);
    app.update(); // Startup: level 1 is generated
    app
}

fn step(app: &mut App, ticks: usize) {
    for _ in 0..ticks { app.world_mut().run_schedule(FixedUpdate); }
}

fn fire(app: &mut App, aim: Vec3) {
    let shot = Shot::new(ORIGIN, aim, 0.0).unwrap();
    app.world_mut().resource_mut::<ShotQueue>().push(shot);
}

/// Replace the generated layout with bugs on a row at x = -3..=3, one unit apart.
fn row_layout(app: &mut App) -> Vec<Vec3> {
    let positions: Vec<Vec3> = (0..7).map(|i| Vec3::new(i as f32 - 3.0, 1.5, 0.0)).collect();
    let targets = positions
        .iter()
        .enumerate()
        .map(|(i, p)| Target { id: TargetId(i as u32), position: *p, destroyed: false })
        .collect();
    app.world_mut().resource_mut::<TargetSet>().regenerate(targets);
    positions
}

fn score(app: &App) -> u64 { app.world().resource::<Score>().value }
fn progress(app: &App) -> LevelProgress { app.world().resource::<LevelProgress>().clone() }
fn active(app: &App) -> usize { app.world().resource::<TargetSet>().active_count() }

#[test]
fn session_starts_at_level_one_with_seven_bugs() {
    let app = build_app();
    assert_eq!(progress(&app).level.number(), 1);
    assert_eq!(app.world().resource::<TargetSet>().targets().len(), 7);
    assert_eq!(score(&app), 0);
    let events = app.world().resource::<Events<LevelStartedEvent>>();
    let started: Vec<_> = events.get_reader().read(events).copied().collect();
    assert_eq!(started.len(), 1);
    assert_eq!(started[0].target_count, 7);
}

#[test]
fn clearing_level_one_advances_to_level_two() {
    let mut app = build_app();
    let positions = row_layout(&mut app);

    // Midway between the first two bugs: both within 0.7.
    fire(&mut app, Vec3::new(-2.5, 1.5, 0.0));
    step(&mut app, 1);
    assert_eq!(score(&app), 200);
    assert_eq!(active(&app), 5);

    for p in &positions[2..] {
        fire(&mut app, *p);
    }
    step(&mut app, 1);
    assert_eq!(active(&app), 0);
    assert_eq!(score(&app), 700);
    assert!(progress(&app).is_clearing(), "last hit schedules the advance in the same tick");

    // Delay is 2 s = 120 ticks from the clearing tick.
    step(&mut app, 119);
    assert_eq!(progress(&app).level.number(), 1);
    step(&mut app, 1);
    let p = progress(&app);
    assert_eq!(p.level.number(), 2);
    assert_eq!(p.phase, LevelPhase::Active);
    assert_eq!(app.world().resource::<TargetSet>().targets().len(), 9);
    assert_eq!(active(&app), 9);
}

#[test]
fn shots_while_clearing_do_not_reschedule() {
    let mut app = build_app();
    let positions = row_layout(&mut app);
    for p in &positions {
        fire(&mut app, *p);
    }
    step(&mut app, 1);
    let first = progress(&app).phase;
    assert!(matches!(first, LevelPhase::Clearing { .. }));

    step(&mut app, 30);
    fire(&mut app, positions[0]);
    step(&mut app, 1);
    assert_eq!(progress(&app).phase, first);
    assert_eq!(score(&app), 700);
}

#[test]
fn destroyed_bugs_are_pruned_after_explosion() {
    let mut app = build_app();
    let positions = row_layout(&mut app);
    fire(&mut app, positions[6]);
    step(&mut app, 1);
    assert_eq!(app.world().resource::<TargetSet>().targets().len(), 7);
    step(&mut app, 60);
    let set = app.world().resource::<TargetSet>();
    assert_eq!(set.targets().len(), 6);
    assert!(set.get(TargetId(6)).is_none());
}

#[test]
fn miss_leaves_score_and_targets_untouched() {
    let mut app = build_app();
    row_layout(&mut app);
    fire(&mut app, Vec3::new(0.5, 4.0, 0.0));
    step(&mut app, 1);
    assert_eq!(score(&app), 0);
    assert_eq!(active(&app), 7);
    assert_eq!(app.world().resource::<Score>().shots, 1);
}

#[test]
fn nan_aim_never_reaches_the_rules() {
    let mut app = build_app();
    row_layout(&mut app);
    let before = app.world().resource::<TargetSet>().snapshot();
    let queued = app.world_mut().run_system_once(
        |mut queue: ResMut<ShotQueue>, mut ev_shot: EventWriter<ShotFiredEvent>| {
            queue_shot(ORIGIN, Vec3::new(f32::NAN, 1.5, 0.0), 0.0, &mut queue, &mut ev_shot)
        },
    );
    assert!(!queued);
    assert!(app.world().resource::<ShotQueue>().is_empty());
    let fired = app.world().resource::<Events<ShotFiredEvent>>();
    assert_eq!(fired.get_reader().read(fired).count(), 0);

    step(&mut app, 1);
    assert_eq!(score(&app), 0);
    assert_eq!(app.world().resource::<Score>().shots, 0);
    assert_eq!(&before[..], app.world().resource::<TargetSet>().targets());
}

#[test]
fn valid_input_shot_is_queued_and_announced() {
    let mut app = build_app();
    let positions = row_layout(&mut app);
    let aim = positions[0];
    let queued = app.world_mut().run_system_once(
        move |mut queue: ResMut<ShotQueue>, mut ev_shot: EventWriter<ShotFiredEvent>| {
            queue_shot(ORIGIN, aim, 0.0, &mut queue, &mut ev_shot)
        },
    );
    assert!(queued);
    assert_eq!(app.world().resource::<ShotQueue>().len(), 1);
    let fired = app.world().resource::<Events<ShotFiredEvent>>();
    assert_eq!(fired.get_reader().read(fired).count(), 1);
    step(&mut app, 1);
    assert_eq!(score(&app), 100);
}

#[test]
fn queued_shot_resolves_against_the_live_set() {
    let mut app = build_app();
    let positions = row_layout(&mut app);
    fire(&mut app, positions[3]);
    // The set is replaced before the shot is processed; old positions no longer exist.
    let far: Vec<Target> = (0..7)
        .map(|i| Target { id: TargetId(i), position: Vec3::new(i as f32, 40.0, 0.0), destroyed: false })
        .collect();
    app.world_mut().resource_mut::<TargetSet>().regenerate(far);
    step(&mut app, 1);
    assert_eq!(score(&app), 0);
    assert_eq!(active(&app), 7);
}

#[test]
fn level_two_hits_are_worth_double() {
    let mut app = build_app();
    let positions = row_layout(&mut app);
    for p in &positions { fire(&mut app, *p); }
    step(&mut app, 121);
    assert_eq!(progress(&app).level.number(), 2);

    let target = app.world().resource::<TargetSet>().targets()[0];
    fire(&mut app, target.position);
    step(&mut app, 1);
    assert!(score(&app) >= 700 + 200);
    assert_eq!((score(&app) - 700) % 200, 0);
}

#[test]
fn restart_resets_score_and_level() {
    let mut app = build_app();
    let positions = row_layout(&mut app);
    for p in &positions { fire(&mut app, *p); }
    step(&mut app, 121);
    assert_eq!(progress(&app).level.number(), 2);

    app.world_mut().send_event(SessionRestartEvent);
    app.update();
    assert_eq!(score(&app), 0);
    assert_eq!(progress(&app), LevelProgress::default());
    assert_eq!(app.world().resource::<TargetSet>().targets().len(), 7);
}

#[test]
fn autoplay_clears_a_level() {
    let mut app = App::new();
    app.insert_resource(GameTuning::default())
        .insert_resource(AutoConfig { autoplay: true, run_duration_seconds: None, fire_interval_seconds: 0.1 })
        .add_plugins(MinimalPlugins)
        .add_plugins(EventsPlugin)
        .add_plugins(CoreSimPlugin)
        .add_plugins(GameStatePlugin)
        .add_plugins(AutoplayPlugin);
    app.update();
    step(&mut app, 600);
    assert!(progress(&app).level.number() >= 2, "autoplay should clear level 1 within 10 s");
    assert!(score(&app) >= 700);
}
