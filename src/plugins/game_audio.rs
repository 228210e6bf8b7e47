use bevy::prelude::*;
use bevy::audio::{AudioSource, AudioBundle, PlaybackSettings, PlaybackMode, Volume};
use crate::plugins::events::{
    LevelClearedEvent,
    ShotFiredEvent,
    TargetDestroyedEvent,
};
use crate::plugins::tuning::GameTuning;

pub struct GameAudioPlugin;

#[derive(Resource, Clone)]
struct SfxHandles {
    laser: Handle<AudioSource>,
    explosion: Handle<AudioSource>,
    level_complete: Handle<AudioSource>,
    music: Handle<AudioSource>,
}

/// Browsers refuse to start audio before a user gesture; music waits for the first click or key.
#[derive(Resource, Default)]
struct MusicUnlock {
    started: bool,
}

impl Plugin for GameAudioPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MusicUnlock>()
            .add_systems(Startup, load_audio_assets)
            .add_systems(Update, (start_music_on_interaction, ensure_music_loop, play_event_sfx));
    }
}

fn load_audio_assets(mut commands: Commands, assets: Res<AssetServer>) {
    // Expected files: assets/audio/{laser,explosion,level-complete,arcade-loop}.mp3
    commands.insert_resource(SfxHandles {
        laser: assets.load("audio/laser.mp3"),
        explosion: assets.load("audio/explosion.mp3"),
        level_complete: assets.load("audio/level-complete.mp3"),
        music: assets.load("audio/arcade-loop.mp3"),
    });
}

#[derive(Component)]
struct MusicTag;

fn spawn_music(commands: &mut Commands, sfx: &SfxHandles, volume: f32) {
    commands.spawn((
        AudioBundle {
            source: sfx.music.clone(),
            settings: PlaybackSettings {
                mode: PlaybackMode::Loop,
                volume: Volume::new(volume),
                ..default()
            }
        },
        MusicTag,
    ));
}

fn start_music_on_interaction(
    mut commands: Commands,
    mut unlock: ResMut<MusicUnlock>,
    mouse: Option<Res<ButtonInput<MouseButton>>>,
    keys: Option<Res<ButtonInput<KeyCode>>>,
    touches: Option<Res<Touches>>,
    sfx: Option<Res<SfxHandles>>,
    tuning: Res<GameTuning>,
) {
    if unlock.started || !tuning.audio.music { return; }
    let interacted = mouse.as_ref().is_some_and(|m| m.get_just_pressed().next().is_some())
        || keys.as_ref().is_some_and(|k| k.get_just_pressed().next().is_some())
        || touches.as_ref().is_some_and(|t| t.any_just_pressed());
    if !interacted { return; }
    let Some(sfx) = sfx else { return; };
    spawn_music(&mut commands, &sfx, tuning.audio.music_volume);
    unlock.started = true;
    info!("AUDIO music started");
}

// Respawn the loop if it was despawned after starting.
fn ensure_music_loop(
    mut commands: Commands,
    unlock: Res<MusicUnlock>,
    q_music: Query<(), With<MusicTag>>,
    sfx: Option<Res<SfxHandles>>,
    tuning: Res<GameTuning>,
) {
    if !unlock.started || !q_music.is_empty() { return; }
    if let Some(sfx) = sfx {
        spawn_music(&mut commands, &sfx, tuning.audio.music_volume);
    }
}

fn one_shot(commands: &mut Commands, source: &Handle<AudioSource>, volume: f32) {
    commands.spawn(AudioBundle {
        source: source.clone(),
        settings: PlaybackSettings {
            mode: PlaybackMode::Despawn,
            volume: Volume::new(volume),
            ..default()
        }
    });
}

fn play_event_sfx(
    sfx: Option<Res<SfxHandles>>,
    tuning: Res<GameTuning>,
    mut commands: Commands,
    mut ev_shot: EventReader<ShotFiredEvent>,
    mut ev_destroyed: EventReader<TargetDestroyedEvent>,
    mut ev_cleared: EventReader<LevelClearedEvent>,
) {
    let Some(sfx) = sfx.filter(|_| tuning.audio.sfx) else {
        ev_shot.clear();
        ev_destroyed.clear();
        ev_cleared.clear();
        return;
    };

    for _ in ev_shot.read() {
        one_shot(&mut commands, &sfx.laser, 0.7);
    }
    // One explosion per frame is enough even when a shot takes out several bugs.
    if ev_destroyed.read().count() > 0 {
        one_shot(&mut commands, &sfx.explosion, 0.9);
    }
    for _ in ev_cleared.read() {
        one_shot(&mut commands, &sfx.level_complete, 1.0);
    }
}
